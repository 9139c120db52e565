use super::client::UploadBackend;
use super::error::UploadError;
use super::types::{FileSelection, FileStatus, SelectedFile, UploadStatus};
use super::validation::validate_selection;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const UPLOADING_MESSAGE: &str = "Uploading files...";
pub const PROCESSING_MESSAGE: &str = "Files uploaded, processing...";
pub const SUCCESS_MESSAGE: &str = "All files uploaded and processed successfully!";
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(2);

/// The parts of the window the controller is allowed to touch.
pub trait UploadView {
    fn set_status(&mut self, message: &str);
    fn set_progress(&mut self, percent: u8);
    fn set_progress_visible(&mut self, visible: bool);
    /// `true` while an upload is running; the trigger is disabled meanwhile.
    fn set_busy(&mut self, busy: bool);
    fn record_file(&mut self, status: FileStatus);
}

/// A single view mutation, used to ship updates across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Status(String),
    Progress(u8),
    ProgressVisible(bool),
    Busy(bool),
    File(FileStatus),
}

impl UploadView for Vec<ViewEvent> {
    fn set_status(&mut self, message: &str) {
        self.push(ViewEvent::Status(message.to_string()));
    }

    fn set_progress(&mut self, percent: u8) {
        self.push(ViewEvent::Progress(percent));
    }

    fn set_progress_visible(&mut self, visible: bool) {
        self.push(ViewEvent::ProgressVisible(visible));
    }

    fn set_busy(&mut self, busy: bool) {
        self.push(ViewEvent::Busy(busy));
    }

    fn record_file(&mut self, status: FileStatus) {
        self.push(ViewEvent::File(status));
    }
}

/// Drives validate → upload ×3 → process and mirrors every step into a view.
pub struct UploadController<B> {
    backend: B,
    reset_delay: Duration,
}

impl<B: UploadBackend> UploadController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    /// How long the finished progress bar stays on screen.
    pub fn with_reset_delay(mut self, reset_delay: Duration) -> Self {
        self.reset_delay = reset_delay;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn upload_files<V: UploadView>(
        &self,
        selection: &FileSelection,
        view: &mut V,
    ) -> Result<(), UploadError> {
        view.set_busy(true);

        let files = match validate_selection(selection) {
            Ok(files) => files,
            Err(e) => {
                info!("Selection rejected: {}", e);
                view.set_status(&e.to_string());
                view.set_busy(false);
                return Err(e.into());
            }
        };

        view.set_progress_visible(true);
        view.set_progress(0);
        view.set_status(UPLOADING_MESSAGE);

        let result = self.upload_and_process(&files, view).await;

        match &result {
            Ok(()) => {
                view.set_progress(100);
                view.set_status(SUCCESS_MESSAGE);
            }
            Err(e) => {
                warn!("Upload workflow failed: {}", e);
                view.set_status(&format!("Error: {}", e));
                view.set_progress(0);
            }
        }
        view.set_busy(false);

        if result.is_ok() {
            tokio::time::sleep(self.reset_delay).await;
            view.set_progress(0);
            view.set_progress_visible(false);
        }

        result
    }

    async fn upload_and_process<V: UploadView>(
        &self,
        files: &[SelectedFile; 3],
        view: &mut V,
    ) -> Result<(), UploadError> {
        let [account_payables, bank_balance, cash_management] = files;

        // All three run to completion so every outcome can be recorded.
        let outcomes = tokio::join!(
            self.backend.upload_file(account_payables),
            self.backend.upload_file(bank_balance),
            self.backend.upload_file(cash_management),
        );

        let mut first_error = None;
        for (file, outcome) in files.iter().zip([outcomes.0, outcomes.1, outcomes.2]) {
            let status = match outcome {
                Ok(body) => {
                    debug!("{} accepted: {}", file.file_type, body);
                    UploadStatus::Success
                }
                Err(e) => {
                    let status = UploadStatus::Error(e.to_string());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    status
                }
            };
            view.record_file(FileStatus {
                file_type: file.file_type,
                name: file.name.clone(),
                status,
            });
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        view.set_progress(50);
        view.set_status(PROCESSING_MESSAGE);

        self.backend.process_files().await?;
        Ok(())
    }

    /// Asks the server to open its output folder and reports the answer.
    /// Progress and busy state are left untouched.
    pub async fn open_processed_folder<V: UploadView>(&self, view: &mut V) {
        match self.backend.open_processed_folder().await {
            Ok(message) => view.set_status(&message),
            Err(e) => view.set_status(&format!("Error opening folder: {}", e)),
        }
    }
}
