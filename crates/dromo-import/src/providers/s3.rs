//! S3 object store
//!
//! Reads source files for imports and stores processed output.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Region, SharedCredentialsProvider};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::object_store::ObjectStore;
use crate::config::S3Config;
use crate::error::{Error, Result};

/// S3-backed object store bound to a single bucket
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store
    ///
    /// Static credentials are used when both keys are configured; otherwise the
    /// default AWS credential chain applies.
    pub async fn new(config: &S3Config) -> Result<Self> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| Error::Config("AWS_S3_BUCKET not configured".to_string()))?;

        let region_provider = RegionProviderChain::first_try(Region::new(config.region.clone()));
        let mut loader =
            aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region_provider);

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials = Credentials::new(
                access_key.as_str(),
                secret_key.as_str(),
                None,
                None,
                "dromo-import",
            );
            loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str());
        }

        let sdk_config = loader.load().await;
        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);

        // S3-compatible stores (MinIO) need path-style addressing
        if config.endpoint_url.is_some() {
            s3_config = s3_config.force_path_style(true);
        }

        let client = Client::from_conf(s3_config.build());
        tracing::debug!("S3 client created for bucket {}", bucket);

        Ok(Self { client, bucket })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::storage(format!(
                    "Error reading s3://{}/{}: {}",
                    self.bucket,
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Error::storage(format!("Error reading body of {}: {}", key, e)))?
            .into_bytes();

        tracing::info!(
            "Read {} ({} bytes) from S3 bucket {}",
            key,
            data.len(),
            self.bucket
        );
        Ok(data)
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                Error::storage(format!(
                    "Error writing s3://{}/{}: {}",
                    self.bucket,
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!("Wrote {} ({} bytes) to S3 bucket {}", key, size, self.bucket);
        Ok(format!("s3://{}/{}", self.bucket, key))
    }

    fn name(&self) -> &str {
        "s3"
    }
}
