//! Dromo headless import API client

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::DromoConfig;
use crate::error::{Error, Result};

use super::import_provider::{CreatedImport, ImportProvider};

const LICENSE_HEADER: &str = "X-Dromo-License-Key";

/// Keys Dromo has used for the presigned upload URL, in lookup order
const UPLOAD_URL_KEYS: [&str; 4] = ["upload_url", "upload", "uploadUrl", "file_upload_url"];

/// Dromo API client
pub struct DromoClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: DromoConfig,
}

#[derive(Serialize)]
struct CreateImportRequest<'a> {
    schema_id: Option<&'a str>,
    original_filename: &'a str,
}

#[derive(Deserialize)]
struct PresignedUrlResponse {
    presigned_url: Option<String>,
}

impl DromoClient {
    /// Create a new Dromo client with a bounded request timeout
    pub fn new(config: &DromoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn license_key(&self) -> Result<&str> {
        self.config
            .license_key
            .as_deref()
            .ok_or_else(|| Error::Config("Dromo license key not configured".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Turn a non-2xx response into an upstream error carrying the body text
    async fn ensure_success(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed: HTTP {} - {}", context, status, body);
        Err(Error::upstream(format!(
            "Dromo API error ({}): HTTP {} - {}",
            context,
            status.as_u16(),
            body
        )))
    }

    fn send_error(context: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::upstream(format!("{} timed out: {}", context, err))
        } else {
            Error::upstream(format!("{} failed: {}", context, err))
        }
    }
}

/// Pull the import id and upload URL out of a create-import response
fn parse_created_import(body: &Value) -> Result<CreatedImport> {
    let import_id = match body.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(Error::upstream(format!(
                "Missing 'id' in Dromo response: {}",
                body
            )))
        }
    };

    let upload_url = UPLOAD_URL_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            let keys: Vec<&str> = body
                .as_object()
                .map(|o| o.keys().map(String::as_str).collect())
                .unwrap_or_default();
            Error::upstream(format!(
                "No upload URL found in Dromo response. Available keys: {:?}",
                keys
            ))
        })?;

    Ok(CreatedImport {
        import_id,
        upload_url,
    })
}

#[async_trait]
impl ImportProvider for DromoClient {
    fn ensure_configured(&self) -> Result<()> {
        self.license_key().map(|_| ())
    }

    async fn create_import(&self, filename: &str) -> Result<CreatedImport> {
        let license_key = self.license_key()?;
        let request = CreateImportRequest {
            schema_id: self.config.schema_id.as_deref(),
            original_filename: filename,
        };

        let response = self
            .client
            .post(self.url("headless/imports/"))
            .header(LICENSE_HEADER, license_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::send_error("Create import", e))?;

        let response = Self::ensure_success(response, "create import").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::upstream(format!("Invalid create import response: {}", e)))?;

        tracing::debug!("Dromo create import response: {}", body);
        parse_created_import(&body)
    }

    async fn upload_file(&self, upload_url: &str, data: Bytes) -> Result<()> {
        let size = data.len();
        let response = self
            .client
            .put(upload_url)
            .body(data)
            .send()
            .await
            .map_err(|e| Self::send_error("File upload", e))?;

        Self::ensure_success(response, "file upload").await?;
        tracing::debug!("Uploaded {} bytes to Dromo", size);
        Ok(())
    }

    async fn fetch_processed_data(&self, import_id: &str) -> Result<Bytes> {
        let license_key = self.license_key()?;

        let response = self
            .client
            .get(self.url(&format!("upload/{}/url/", import_id)))
            .header(LICENSE_HEADER, license_key)
            .send()
            .await
            .map_err(|e| Self::send_error("Presigned URL request", e))?;

        let response = Self::ensure_success(response, "presigned URL").await?;
        let presigned: PresignedUrlResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(format!("Invalid presigned URL response: {}", e)))?;

        let download_url = presigned
            .presigned_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::upstream(format!("No presigned_url in response for import {}", import_id))
            })?;

        let response = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(|e| Self::send_error("Processed data download", e))?;

        let response = Self::ensure_success(response, "processed data download").await?;
        let data = response.bytes().await?;

        tracing::debug!("Downloaded {} bytes of processed data for {}", data.len(), import_id);
        Ok(data)
    }

    fn name(&self) -> &str {
        "dromo"
    }
}
