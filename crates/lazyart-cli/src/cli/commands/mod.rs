//! CLI command handlers. Each command is in its own file.

mod checksum;
mod config;
mod resolve;

pub use checksum::run_checksum;
pub use config::run_show_config;
pub use resolve::{run_resolve, ResolveArgs};
