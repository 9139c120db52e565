use super::error::ValidationError;
use super::types::{display_name, FileSelection, FileType, SelectedFile};

const EXCEL_SUFFIX: &str = ".xlsx";

/// Checks the three pickers in fixed order and stops at the first problem.
///
/// Only the filename suffix is inspected; the content is never opened.
pub fn validate_selection(selection: &FileSelection) -> Result<[SelectedFile; 3], ValidationError> {
    let [first, second, third] = FileType::ALL;
    Ok([
        validate_slot(selection, first)?,
        validate_slot(selection, second)?,
        validate_slot(selection, third)?,
    ])
}

fn validate_slot(selection: &FileSelection, file_type: FileType) -> Result<SelectedFile, ValidationError> {
    let path = selection
        .get(file_type)
        .ok_or(ValidationError::Missing { file_type })?;

    let file_name = display_name(path);
    if !file_name.ends_with(EXCEL_SUFFIX) {
        return Err(ValidationError::NotExcel { file_name });
    }

    Ok(SelectedFile::new(file_type, path))
}
