pub mod domain;
pub mod error;
pub mod file_type;
pub mod protocol;
