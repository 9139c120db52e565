pub mod config;
pub mod upload;
pub mod utils;
