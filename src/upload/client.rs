use super::error::{UploadError, FOLDER_FALLBACK};
use super::types::SelectedFile;
use crate::utils::attachment_filename;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const UPLOAD_PATH: &str = "/upload";
const PROCESS_PATH: &str = "/process";
const OPEN_FOLDER_PATH: &str = "/open-folder";
const HEALTH_PATH: &str = "/health";
const REPORT_PATH: &str = "/download/final_report";
const REPORT_FALLBACK_NAME: &str = "final_report.xlsx";

/// The server calls the upload workflow depends on.
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Sends one workbook tagged with its file type. Resolves to the response text.
    async fn upload_file(&self, file: &SelectedFile) -> Result<String, UploadError>;

    /// Asks the server to build the report from the uploaded workbooks.
    async fn process_files(&self) -> Result<String, UploadError>;

    /// Asks the server to reveal its output folder.
    async fn open_processed_folder(&self) -> Result<String, UploadError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the server's health text, or the reason it could not be reached.
    pub async fn health_check(&self) -> Result<String, UploadError> {
        let health_error = |detail: String| UploadError::Health { detail };

        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| health_error(format!("Server unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Health check failed with status: {}", status);
            return Err(health_error(format!(
                "Health check failed with status: {}",
                status
            )));
        }
        response
            .text()
            .await
            .map_err(|e| health_error(format!("Failed to read health response: {}", e)))
    }

    /// Saves the newest report into `dest_dir` and returns where it landed.
    pub async fn download_final_report(&self, dest_dir: &Path) -> Result<PathBuf, UploadError> {
        let report_error = |detail: String| UploadError::Report { detail };

        let response = self
            .client
            .get(self.url(REPORT_PATH))
            .send()
            .await
            .map_err(|e| report_error(format!("Failed to download report: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Report download failed with status {}: {}", status, body);
            let detail = if body.is_empty() {
                format!("Report download failed with status: {}", status)
            } else {
                body
            };
            return Err(report_error(detail));
        }

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| REPORT_FALLBACK_NAME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| report_error(format!("Failed to read report: {}", e)))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| report_error(format!("Failed to create {}: {}", dest_dir.display(), e)))?;

        let target = dest_dir.join(file_name);
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| report_error(format!("Failed to save {}: {}", target.display(), e)))?;

        info!("Saved final report ({} bytes) to {}", bytes.len(), target.display());
        Ok(target)
    }

    async fn send_upload(&self, file: &SelectedFile) -> Result<Response, String> {
        let content = tokio::fs::read(&file.path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", file.path.display(), e))?;

        debug!(
            "Read {} bytes from {} for {}",
            content.len(),
            file.path.display(),
            file.file_type
        );

        let part = Part::bytes(content).file_name(file.name.clone());
        let form = Form::new()
            .part("file", part)
            .text("file_type", file.file_type.as_str());

        self.client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Failed to send request: {}", e))
    }
}

#[async_trait]
impl UploadBackend for HttpBackend {
    async fn upload_file(&self, file: &SelectedFile) -> Result<String, UploadError> {
        info!("Uploading {} as {}", file.name, file.file_type);
        let failed = || UploadError::Upload {
            file_type: file.file_type,
        };

        let response = self.send_upload(file).await.map_err(|e| {
            error!("Upload of {} failed: {}", file.name, e);
            failed()
        })?;

        let status = response.status();
        if !status.is_success() {
            // The server's explanation is only logged; the user sees the generic message.
            let body = response.text().await.unwrap_or_default();
            error!(
                "Upload of {} failed with status {}: {}",
                file.name, status, body
            );
            return Err(failed());
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read upload response for {}: {}", file.name, e);
            failed()
        })?;
        info!("Uploaded {}: {}", file.name, body);
        Ok(body)
    }

    async fn process_files(&self) -> Result<String, UploadError> {
        info!("Requesting processing of uploaded files");
        let response = self
            .client
            .post(self.url(PROCESS_PATH))
            .send()
            .await
            .map_err(|e| {
                error!("Processing request failed: {}", e);
                UploadError::process(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            let body = body.unwrap_or_default();
            error!("Processing failed with status {}: {}", status, body);
            return Err(UploadError::process(body));
        }

        let body = body.map_err(|e| UploadError::process(e.to_string()))?;
        info!("Processing finished: {}", body);
        Ok(body)
    }

    async fn open_processed_folder(&self) -> Result<String, UploadError> {
        let response = self
            .client
            .get(self.url(OPEN_FOLDER_PATH))
            .send()
            .await
            .map_err(|e| {
                warn!("Open folder request failed: {}", e);
                UploadError::Folder {
                    detail: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Open folder failed with status: {}", status);
            return Err(UploadError::Folder {
                detail: FOLDER_FALLBACK.to_string(),
            });
        }

        response.text().await.map_err(|e| UploadError::Folder {
            detail: e.to_string(),
        })
    }
}
