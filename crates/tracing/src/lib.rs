//! [`tracing`] output for canonical log lines.
//!
//! [`TracingSink`] turns a drained [`canonlog::Record`] into a single event on
//! the [`TARGET`] target, so whatever subscriber the process installs decides
//! where the line is written.

mod config;
mod sink;

pub use config::{ConfigError, EmitConfig, Format, LevelConfig};
pub use sink::TracingSink;

/// Target of emitted canonical log line events.
pub const TARGET: &str = "canonical_log_line";

/// Drains `ctx` and emits it as a `tracing` event configured by `config`.
///
/// Returns false when there was nothing to emit.
pub fn emit_line(ctx: &canonlog::Context, config: &EmitConfig) -> bool {
	canonlog::emit(ctx, &TracingSink::new(config.clone()))
}
