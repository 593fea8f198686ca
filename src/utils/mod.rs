pub mod environment;
pub mod terminal;

pub use environment::{LOG_ENV, STORE_ENV, default_store_path, log_file_path};
pub use terminal::sanitize_line;
