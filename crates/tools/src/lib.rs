//! Factory Tools
//!
//! CLI tools for generating and inspecting variable factory wrappers.

pub mod report;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `info` for the generator crates and `warn` for others.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,factory_tools=info,factory_codegen=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
