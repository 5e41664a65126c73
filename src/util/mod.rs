pub mod logging;
pub mod paths;

pub use logging::init_file_logging;
pub use paths::{config_path, data_dir, init_data_dir, log_file_path, saves_dir};
