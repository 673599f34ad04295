//! CLI command handlers, one file per command.

mod config;
mod upload;
mod watch;

pub use config::run_config;
pub use upload::run_upload;
pub use watch::run_watch;
