//! Storage Gateway: persists uploaded document bytes behind one interface.
//!
//! Two backends implement `ObjectBackend`: S3 (or any S3-compatible endpoint)
//! and the local filesystem. The remote backend is only present when the
//! configuration carries a bucket and credentials; when it is present every
//! store is attempted remotely first and falls back to local storage on any
//! remote failure. Locators are self-describing, so fetch and delete route
//! to the right backend without extra state.

pub mod local;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub use local::LocalBackend;
pub use s3::S3Backend;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file name has no extension")]
    MissingExtension,

    #[error("extension '{0}' is not allowed")]
    DisallowedExtension(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("locator is not recognised by any configured backend: {0}")]
    InvalidLocator(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("local store error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    S3,
    Local,
}

/// Result of a successful store: the locator plus the backend that took it.
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub locator: String,
    pub storage_type: StorageType,
}

/// A place document bytes can live. Keys are bare generated file names.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    fn storage_type(&self) -> StorageType;

    fn locator_for(&self, key: &str) -> String;

    /// Returns the key if this backend produced the locator.
    fn key_from_locator(&self, locator: &str) -> Option<String>;

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

pub struct StorageGateway {
    remote: Option<Arc<dyn ObjectBackend>>,
    local: Arc<dyn ObjectBackend>,
}

impl StorageGateway {
    pub fn new(remote: Option<Arc<dyn ObjectBackend>>, local: Arc<dyn ObjectBackend>) -> Self {
        Self { remote, local }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Stores `body` under a freshly generated name carrying the original extension.
    /// The extension is validated before any backend is touched.
    pub async fn store(
        &self,
        body: Bytes,
        original_filename: &str,
    ) -> Result<StoredDocument, StorageError> {
        let ext = allowed_extension(original_filename)?;
        let key = unique_filename(&ext);
        let content_type = content_type_for(&ext);

        if let Some(remote) = &self.remote {
            match remote.put(&key, body.clone(), content_type).await {
                Ok(()) => {
                    info!("Stored {key} in remote object store");
                    return Ok(StoredDocument {
                        locator: remote.locator_for(&key),
                        storage_type: remote.storage_type(),
                    });
                }
                Err(e) => {
                    warn!("Remote store failed for {key}, falling back to local storage: {e}");
                }
            }
        }

        self.local.put(&key, body, content_type).await?;
        info!("Stored {key} on local filesystem");
        Ok(StoredDocument {
            locator: self.local.locator_for(&key),
            storage_type: self.local.storage_type(),
        })
    }

    pub async fn fetch(&self, locator: &str) -> Result<Bytes, StorageError> {
        let (backend, key) = self.route(locator)?;
        backend.get(&key).await
    }

    /// Best-effort removal. Failures are logged and reported as `false`.
    pub async fn delete(&self, locator: &str) -> bool {
        let result = match self.route(locator) {
            Ok((backend, key)) => backend.delete(&key).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete stored document {locator}: {e}");
                false
            }
        }
    }

    fn route(&self, locator: &str) -> Result<(&dyn ObjectBackend, String), StorageError> {
        if let Some(key) = self.local.key_from_locator(locator) {
            return Ok((self.local.as_ref(), key));
        }
        if let Some(remote) = &self.remote {
            if let Some(key) = remote.key_from_locator(locator) {
                return Ok((remote.as_ref(), key));
            }
        }
        Err(StorageError::InvalidLocator(locator.to_string()))
    }
}

/// Lower-cased extension of `filename`, if it is on the allow-list.
pub fn allowed_extension(filename: &str) -> Result<String, StorageError> {
    let ext = file_extension(filename).ok_or(StorageError::MissingExtension)?;
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::DisallowedExtension(ext))
    }
}

/// Lower-cased text after the last `.`, ignoring any directory components.
pub fn file_extension(name: &str) -> Option<String> {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

fn unique_filename(ext: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Remote backend that fails every call and counts attempts.
    struct FailingRemote {
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ObjectBackend for FailingRemote {
        fn storage_type(&self) -> StorageType {
            StorageType::S3
        }

        fn locator_for(&self, key: &str) -> String {
            format!("https://broken.s3.amazonaws.com/{key}")
        }

        fn key_from_locator(&self, locator: &str) -> Option<String> {
            locator
                .strip_prefix("https://broken.s3.amazonaws.com/")
                .map(String::from)
        }

        async fn put(&self, _: &str, _: Bytes, _: &str) -> Result<(), StorageError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Remote("InvalidAccessKeyId".to_string()))
        }

        async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn delete(&self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Remote("network unreachable".to_string()))
        }
    }

    fn local_gateway(dir: &tempfile::TempDir) -> StorageGateway {
        StorageGateway::new(None, Arc::new(LocalBackend::new(dir.path())))
    }

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("Resume.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("a/b/cv.final.docx").as_deref(), Some("docx"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".bashrc"), None);
    }

    #[test]
    fn test_allowed_extension_rejects_executables() {
        assert!(matches!(
            allowed_extension("malware.exe"),
            Err(StorageError::DisallowedExtension(ext)) if ext == "exe"
        ));
        assert!(allowed_extension("cv.docx").is_ok());
    }

    #[test]
    fn test_unique_filenames_differ() {
        let a = unique_filename("pdf");
        let b = unique_filename("pdf");
        assert_ne!(a, b);
        assert!(a.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_local_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = local_gateway(&dir);
        let bytes = Bytes::from_static(b"%PDF-1.4 fake resume bytes");

        let stored = gateway.store(bytes.clone(), "resume.pdf").await.unwrap();
        assert_eq!(stored.storage_type, StorageType::Local);
        assert!(stored.locator.starts_with(local::LOCAL_LOCATOR_PREFIX));

        let fetched = gateway.fetch(&stored.locator).await.unwrap();
        assert_eq!(fetched, bytes);
    }

    #[tokio::test]
    async fn test_disallowed_extension_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote {
            puts: AtomicUsize::new(0),
        });
        let gateway = StorageGateway::new(
            Some(remote.clone()),
            Arc::new(LocalBackend::new(dir.path())),
        );

        let result = gateway.store(Bytes::from_static(b"MZ"), "malware.exe").await;
        assert!(matches!(result, Err(StorageError::DisallowedExtension(_))));
        assert_eq!(remote.puts.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FailingRemote {
            puts: AtomicUsize::new(0),
        });
        let gateway = StorageGateway::new(
            Some(remote.clone()),
            Arc::new(LocalBackend::new(dir.path())),
        );

        let stored = gateway
            .store(Bytes::from_static(b"docx bytes"), "cv.docx")
            .await
            .unwrap();
        assert_eq!(remote.puts.load(Ordering::SeqCst), 1);
        assert_eq!(stored.storage_type, StorageType::Local);
        assert_eq!(
            gateway.fetch(&stored.locator).await.unwrap(),
            Bytes::from_static(b"docx bytes")
        );
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(
            Some(Arc::new(FailingRemote {
                puts: AtomicUsize::new(0),
            })),
            Arc::new(LocalBackend::new(dir.path())),
        );

        assert!(!gateway.delete("https://broken.s3.amazonaws.com/x.pdf").await);
        assert!(!gateway.delete("ftp://nowhere/x.pdf").await);
    }

    #[tokio::test]
    async fn test_delete_removes_local_object() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = local_gateway(&dir);
        let stored = gateway
            .store(Bytes::from_static(b"bytes"), "cv.pdf")
            .await
            .unwrap();

        assert!(gateway.delete(&stored.locator).await);
        assert!(matches!(
            gateway.fetch(&stored.locator).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_locator_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = local_gateway(&dir);
        assert!(matches!(
            gateway.fetch("https://elsewhere.example.com/cv.pdf").await,
            Err(StorageError::InvalidLocator(_))
        ));
    }
}
