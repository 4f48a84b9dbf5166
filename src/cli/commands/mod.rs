//! CLI command implementations.

mod config;
mod init;
mod search;
mod upload;

pub use config::run_config;
pub use init::run_init;
pub use search::run_search;
pub use upload::run_upload;
