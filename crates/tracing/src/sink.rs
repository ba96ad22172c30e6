use canonlog::{Record, Sink};

use crate::TARGET;
use crate::config::{EmitConfig, Format, LevelConfig};

/// [`Sink`] that emits each record as one `tracing` event.
///
/// The event has target [`TARGET`], the configured level and message, and an
/// `attrs` field holding the rendered record.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
	config: EmitConfig,
}

impl TracingSink {
	pub fn new(config: EmitConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &EmitConfig {
		&self.config
	}

	fn render(&self, record: &Record) -> String {
		match self.config.format {
			Format::Logfmt => record.logfmt().to_string(),
			Format::Json => record.to_json().unwrap_or_else(|err| {
				tracing::warn!(target: "canonlog", error = %err, "json rendering failed; falling back to logfmt");
				record.logfmt().to_string()
			}),
		}
	}
}

macro_rules! event_at {
	($level:expr, $message:expr, $attrs:expr) => {
		match $level {
			LevelConfig::Trace => tracing::trace!(target: TARGET, attrs = %$attrs, "{}", $message),
			LevelConfig::Debug => tracing::debug!(target: TARGET, attrs = %$attrs, "{}", $message),
			LevelConfig::Info => tracing::info!(target: TARGET, attrs = %$attrs, "{}", $message),
			LevelConfig::Warn => tracing::warn!(target: TARGET, attrs = %$attrs, "{}", $message),
			LevelConfig::Error => tracing::error!(target: TARGET, attrs = %$attrs, "{}", $message),
		}
	};
}

impl Sink for TracingSink {
	fn emit(&self, record: &Record) {
		let attrs = self.render(record);
		event_at!(self.config.level, self.config.message, attrs);
	}
}
