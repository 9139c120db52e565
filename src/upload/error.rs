use super::types::FileType;
use crate::utils::field_label;
use thiserror::Error;

/// Problems caught before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload the {} file.", field_label(.file_type.input_id()))]
    Missing { file_type: FileType },
    #[error("{file_name} is not a valid Excel file.")]
    NotExcel { file_name: String },
}

/// Every way an upload, processing or folder request can fail.
///
/// The `Display` text is exactly what ends up in the status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to upload {file_type}")]
    Upload { file_type: FileType },
    #[error("{detail}")]
    Process { detail: String },
    #[error("{detail}")]
    Folder { detail: String },
    #[error("{detail}")]
    Report { detail: String },
    #[error("{detail}")]
    Health { detail: String },
}

pub(crate) const PROCESS_FALLBACK: &str = "Failed to process files";
pub(crate) const FOLDER_FALLBACK: &str = "Failed to open folder";

impl UploadError {
    pub fn process(body: impl Into<String>) -> Self {
        let detail = body.into();
        if detail.is_empty() {
            UploadError::Process {
                detail: PROCESS_FALLBACK.to_string(),
            }
        } else {
            UploadError::Process { detail }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_error_names_the_wire_tag() {
        let err = UploadError::Upload {
            file_type: FileType::BankBalance,
        };
        assert_eq!(err.to_string(), "Failed to upload bank_balance");
    }

    #[test]
    fn empty_process_body_falls_back() {
        assert_eq!(UploadError::process("").to_string(), "Failed to process files");
        assert_eq!(UploadError::process("disk full").to_string(), "disk full");
    }

    #[test]
    fn validation_errors_pass_through_unchanged() {
        let err: UploadError = ValidationError::NotExcel {
            file_name: "a.csv".into(),
        }
        .into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "a.csv is not a valid Excel file.");
    }
}
