mod client;
mod controller;
mod error;
mod types;
mod validation;

pub use client::{HttpBackend, UploadBackend};
pub use controller::{
    UploadController, UploadView, ViewEvent, DEFAULT_RESET_DELAY, PROCESSING_MESSAGE,
    SUCCESS_MESSAGE, UPLOADING_MESSAGE,
};
pub use error::{UploadError, ValidationError};
pub use types::{FileSelection, FileStatus, FileType, SelectedFile, UploadStatus};
pub use validation::validate_selection;
