pub mod config;
pub mod logging;

pub use config::{load_config, read_domains};
pub use logging::init_logging;
