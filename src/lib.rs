//! # Plotkit
//!
//! G-code post-processor for GRBL pen-plotting writing machines.
//!
//! Plotkit takes independently produced writing and drawing G-code
//! programs, normalizes missing feed-rate directives, injects
//! ink-replenishment and paper-change macros at computed points, and merges
//! the two streams into one continuous job with a guaranteed paper-change
//! boundary between them.
//!
//! ## Architecture
//!
//! Plotkit is organized as a workspace:
//!
//! 1. **plotkit-post** - the post-processing engine (classification,
//!    insertion policies, safe-position guard, stream merging)
//! 2. **plotkit-settings** - configuration schema, validation, persistence
//! 3. **plotkit** - the command-line binary that ties them together

pub use plotkit_post::{
    merge_streams, process_stream, InkPolicy, Instruction, MacroContext, MacroSet, MergeOutput,
    MergeParams, MergeSummary, OpCode, PassOutput, PassParams, PassSummary, PlotterProfile,
    PostError, PostResult,
};

pub use plotkit_settings::{
    Config, InkMode, SettingsError, SettingsResult, DEFAULT_CONFIG_FILE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
/// - DEBUG level when `verbose` is set, INFO otherwise
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(default_level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
