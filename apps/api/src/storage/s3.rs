use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::{ObjectBackend, StorageError, StorageType};
use crate::config::Config;

/// S3 (or MinIO) backend. Locators are public-style object URLs.
pub struct S3Backend {
    client: aws_sdk_s3::Client,
    bucket: String,
    base_url: String,
}

impl S3Backend {
    /// Builds the backend when bucket and credentials are configured.
    pub async fn from_config(config: &Config) -> Option<Self> {
        if !config.remote_storage_configured() {
            return None;
        }
        let bucket = config.s3_bucket.clone()?;
        let client = build_s3_client(config).await?;
        let base_url = match &config.s3_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            None => format!("https://{bucket}.s3.amazonaws.com"),
        };
        Some(Self {
            client,
            bucket,
            base_url,
        })
    }
}

/// Constructs an S3 client for AWS, or for a custom endpoint when one is set.
async fn build_s3_client(config: &Config) -> Option<aws_sdk_s3::Client> {
    let credentials = Credentials::new(
        config.aws_access_key_id.as_deref()?,
        config.aws_secret_access_key.as_deref()?,
        None,
        None,
        "resume-intel-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials);
    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    Some(aws_sdk_s3::Client::new(&loader.load().await))
}

fn remote_error<E: std::error::Error>(e: E) -> StorageError {
    StorageError::Remote(DisplayErrorContext(&e).to_string())
}

#[async_trait]
impl ObjectBackend for S3Backend {
    fn storage_type(&self) -> StorageType {
        StorageType::S3
    }

    fn locator_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn key_from_locator(&self, locator: &str) -> Option<String> {
        locator
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .map(String::from)
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    StorageError::NotFound(key.to_string())
                } else {
                    remote_error(e)
                }
            })?;

        let data = output.body.collect().await.map_err(remote_error)?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }
}
