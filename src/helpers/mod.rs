pub mod media_type;
pub mod sanitize;
pub mod temp_file;

pub use sanitize::secure_filename;
pub use temp_file::TempFile;
