use std::fmt;
use std::path::{Path, PathBuf};

/// The three spreadsheets the server needs before it can build the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    AccountPayables,
    BankBalance,
    CashManagement,
}

impl FileType {
    /// Fixed order in which the pickers are checked and uploads are started.
    pub const ALL: [FileType; 3] = [
        FileType::AccountPayables,
        FileType::BankBalance,
        FileType::CashManagement,
    ];

    /// Tag sent in the `file_type` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::AccountPayables => "account_payables",
            FileType::BankBalance => "bank_balance",
            FileType::CashManagement => "cash_management",
        }
    }

    /// Identifier of the picker this file is chosen with.
    pub fn input_id(self) -> &'static str {
        match self {
            FileType::AccountPayables => "accountPayables",
            FileType::BankBalance => "bankBalance",
            FileType::CashManagement => "cashManagement",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FileType::AccountPayables => "Account Payables",
            FileType::BankBalance => "Bank Balance",
            FileType::CashManagement => "Cash Management",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user picked in each of the three slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    account_payables: Option<PathBuf>,
    bank_balance: Option<PathBuf>,
    cash_management: Option<PathBuf>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_type: FileType, path: impl Into<PathBuf>) -> Self {
        self.set(file_type, Some(path.into()));
        self
    }

    pub fn get(&self, file_type: FileType) -> Option<&Path> {
        self.slot(file_type).as_deref()
    }

    pub fn set(&mut self, file_type: FileType, path: Option<PathBuf>) {
        *self.slot_mut(file_type) = path;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, file_type: FileType) -> &Option<PathBuf> {
        match file_type {
            FileType::AccountPayables => &self.account_payables,
            FileType::BankBalance => &self.bank_balance,
            FileType::CashManagement => &self.cash_management,
        }
    }

    fn slot_mut(&mut self, file_type: FileType) -> &mut Option<PathBuf> {
        match file_type {
            FileType::AccountPayables => &mut self.account_payables,
            FileType::BankBalance => &mut self.bank_balance,
            FileType::CashManagement => &mut self.cash_management,
        }
    }
}

/// A picked file that passed validation and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_type: FileType,
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn new(file_type: FileType, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            file_type,
            path,
            name,
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Success,
    Error(String),
}

/// Outcome of one upload, kept for the details list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub file_type: FileType,
    pub name: String,
    pub status: UploadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_and_picker_ids() {
        let tags: Vec<_> = FileType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, ["account_payables", "bank_balance", "cash_management"]);

        let ids: Vec<_> = FileType::ALL.iter().map(|t| t.input_id()).collect();
        assert_eq!(ids, ["accountPayables", "bankBalance", "cashManagement"]);
    }

    #[test]
    fn selection_slots_are_independent() {
        let mut selection = FileSelection::new().with(FileType::BankBalance, "/tmp/bb.xlsx");
        assert_eq!(selection.get(FileType::AccountPayables), None);
        assert_eq!(
            selection.get(FileType::BankBalance),
            Some(Path::new("/tmp/bb.xlsx"))
        );

        selection.set(FileType::BankBalance, None);
        assert_eq!(selection, FileSelection::default());
    }

    #[test]
    fn selected_file_takes_its_name_from_the_path() {
        let file = SelectedFile::new(FileType::CashManagement, "/data/in/cash.xlsx");
        assert_eq!(file.name, "cash.xlsx");
    }
}
