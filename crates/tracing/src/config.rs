//! Emit configuration.

use serde::{Deserialize, Serialize};

/// How a [`crate::TracingSink`] renders and levels its event.
///
/// Every field has a default, so an empty TOML table is a valid config:
///
/// ```
/// use canonlog_tracing::{EmitConfig, Format, LevelConfig};
///
/// let config = EmitConfig::from_toml_str("level = \"warn\"\nformat = \"json\"").unwrap();
/// assert_eq!(config.level, LevelConfig::Warn);
/// assert_eq!(config.format, Format::Json);
/// assert_eq!(config.message, "canonical-log-line");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
	/// Event message.
	pub message: String,
	pub level: LevelConfig,
	pub format: Format,
}

impl Default for EmitConfig {
	fn default() -> Self {
		Self {
			message: "canonical-log-line".to_string(),
			level: LevelConfig::default(),
			format: Format::default(),
		}
	}
}

impl EmitConfig {
	/// Parses a config from TOML.
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	pub fn with_level(mut self, level: LevelConfig) -> Self {
		self.level = level;
		self
	}

	pub fn with_format(mut self, format: Format) -> Self {
		self.format = format;
		self
	}
}

/// Serializable mirror of [`tracing::Level`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelConfig {
	Trace,
	Debug,
	#[default]
	Info,
	Warn,
	Error,
}

impl From<LevelConfig> for tracing::Level {
	fn from(level: LevelConfig) -> Self {
		match level {
			LevelConfig::Trace => tracing::Level::TRACE,
			LevelConfig::Debug => tracing::Level::DEBUG,
			LevelConfig::Info => tracing::Level::INFO,
			LevelConfig::Warn => tracing::Level::WARN,
			LevelConfig::Error => tracing::Level::ERROR,
		}
	}
}

/// Rendering of the record inside the event's `attrs` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
	/// `key=value` pairs separated by spaces.
	#[default]
	Logfmt,
	/// A JSON object with keys in record order.
	Json,
}

/// Config parsing failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid emit config: {0}")]
	Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(EmitConfig::from_toml_str("").unwrap(), EmitConfig::default());
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = EmitConfig::from_toml_str("colour = true").unwrap_err();
		assert!(err.to_string().starts_with("invalid emit config:"), "{err}");
	}

	#[test]
	fn bad_level_is_rejected() {
		assert!(EmitConfig::from_toml_str("level = \"loud\"").is_err());
	}

	#[test]
	fn builder_methods() {
		let config = EmitConfig::default()
			.with_message("request")
			.with_level(LevelConfig::Debug)
			.with_format(Format::Json);
		assert_eq!(config.message, "request");
		assert_eq!(tracing::Level::from(config.level), tracing::Level::DEBUG);
		assert_eq!(config.format, Format::Json);
	}
}
