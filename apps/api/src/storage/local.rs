use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectBackend, StorageError, StorageType};

/// Locators for locally stored documents always start with this path.
pub const LOCAL_LOCATOR_PREFIX: &str = "/uploads/resumes/";

/// Filesystem backend rooted at a single directory.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_key(key) {
            return Err(StorageError::InvalidLocator(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

/// Keys are generated names; anything that could escape the root is refused.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(&['/', '\\'][..])
        && !key.contains("..")
        && key != "."
}

#[async_trait]
impl ObjectBackend for LocalBackend {
    fn storage_type(&self) -> StorageType {
        StorageType::Local
    }

    fn locator_for(&self, key: &str) -> String {
        format!("{LOCAL_LOCATOR_PREFIX}{key}")
    }

    fn key_from_locator(&self, locator: &str) -> Option<String> {
        locator
            .strip_prefix(LOCAL_LOCATOR_PREFIX)
            .map(String::from)
    }

    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(path, &body).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
