pub mod content_disposition;
pub mod label;

pub use content_disposition::attachment_filename;
pub use label::field_label;
