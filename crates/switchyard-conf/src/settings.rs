//! Settings structures and loading

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "SWITCHYARD_LOG_LEVEL";
/// Environment variable overriding `logging.format`
pub const ENV_LOG_FORMAT: &str = "SWITCHYARD_LOG_FORMAT";
/// Environment variable overriding `router.normalize_trailing_slash`
pub const ENV_NORMALIZE_TRAILING_SLASH: &str = "SWITCHYARD_NORMALIZE_TRAILING_SLASH";

/// Errors raised while loading or validating settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {message}")]
	Invalid { key: String, message: String },

	#[error("Failed to initialise logging: {0}")]
	Logging(String),
}

impl SettingsError {
	fn invalid(key: &str, message: impl Into<String>) -> Self {
		SettingsError::Invalid {
			key: key.to_string(),
			message: message.into(),
		}
	}
}

impl From<SettingsError> for switchyard_exception::Error {
	fn from(error: SettingsError) -> Self {
		switchyard_exception::Error::Configuration(error.to_string())
	}
}

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub router: RouterSettings,
	pub resolvers: ResolverSettings,
	pub logging: LoggingSettings,
}

impl Settings {
	/// Parse settings from TOML text; missing sections and keys take defaults
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_conf::Settings;
	///
	/// let settings = Settings::from_toml_str(
	///     r#"
	///     [router]
	///     normalize_trailing_slash = false
	///     "#,
	/// )
	/// .unwrap();
	/// assert!(!settings.router.normalize_trailing_slash);
	/// assert_eq!(settings.logging.level, "info");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Settings = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read and parse a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = Self::from_toml_str(&source)?;
		tracing::debug!(path = %path.display(), "loaded settings");
		Ok(settings)
	}

	/// Apply overrides from the process environment
	pub fn apply_env(&mut self) -> Result<(), SettingsError> {
		self.apply_env_with(|key| std::env::var(key).ok())
	}

	/// Apply overrides using `lookup` in place of the process environment
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_conf::{LogFormat, Settings};
	///
	/// let mut settings = Settings::default();
	/// settings
	///     .apply_env_with(|key| match key {
	///         "SWITCHYARD_LOG_FORMAT" => Some("compact".to_string()),
	///         _ => None,
	///     })
	///     .unwrap();
	/// assert_eq!(settings.logging.format, LogFormat::Compact);
	/// ```
	pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), SettingsError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(level) = lookup(ENV_LOG_LEVEL) {
			self.logging.level = level;
		}
		if let Some(format) = lookup(ENV_LOG_FORMAT) {
			self.logging.format = format.parse()?;
		}
		if let Some(flag) = lookup(ENV_NORMALIZE_TRAILING_SLASH) {
			self.router.normalize_trailing_slash = parse_bool(ENV_NORMALIZE_TRAILING_SLASH, &flag)?;
		}
		self.validate()
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		self.resolvers.validate()?;
		self.logging.validate()
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		other => Err(SettingsError::invalid(
			key,
			format!("expected a boolean, got `{}`", other),
		)),
	}
}

/// `[router]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Strip trailing slashes from templates and request paths, except for `/`
	pub normalize_trailing_slash: bool,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			normalize_trailing_slash: true,
		}
	}
}

/// `[resolvers]` section: ordered names of the built-in resolvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
	pub arguments: Vec<String>,
	pub responses: Vec<String>,
}

impl ResolverSettings {
	/// Built-in argument resolvers, in the recommended order
	pub const KNOWN_ARGUMENTS: &'static [&'static str] =
		&["request", "path", "payload", "service", "response", "default"];

	/// Built-in response resolvers, in the recommended order
	pub const KNOWN_RESPONSES: &'static [&'static str] =
		&["passthrough", "json", "xml", "html", "stream", "raw"];

	fn validate(&self) -> Result<(), SettingsError> {
		check_names("resolvers.arguments", &self.arguments, Self::KNOWN_ARGUMENTS)?;
		check_names("resolvers.responses", &self.responses, Self::KNOWN_RESPONSES)
	}
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			arguments: Self::KNOWN_ARGUMENTS.iter().map(|s| s.to_string()).collect(),
			responses: Self::KNOWN_RESPONSES.iter().map(|s| s.to_string()).collect(),
		}
	}
}

fn check_names(key: &str, names: &[String], known: &[&str]) -> Result<(), SettingsError> {
	if names.is_empty() {
		return Err(SettingsError::invalid(key, "at least one resolver is required"));
	}
	match names.iter().find(|name| !known.contains(&name.as_str())) {
		Some(unknown) => Err(SettingsError::invalid(
			key,
			format!(
				"unknown resolver `{}` (expected one of: {})",
				unknown,
				known.join(", ")
			),
		)),
		None => Ok(()),
	}
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// A level (`info`) or a filter directive (`switchyard_routing=debug,info`)
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Full,
		}
	}
}

impl LoggingSettings {
	/// Build the subscriber filter described by `level`
	pub fn env_filter(&self) -> Result<EnvFilter, SettingsError> {
		self.validate()?;
		EnvFilter::try_new(&self.level)
			.map_err(|e| SettingsError::invalid("logging.level", e.to_string()))
	}

	fn validate(&self) -> Result<(), SettingsError> {
		let level = self.level.trim();
		// A bare word is a level; directives are checked by the filter parser
		if level.contains('=') || level.contains(',') {
			return EnvFilter::try_new(level)
				.map(|_| ())
				.map_err(|e| SettingsError::invalid("logging.level", e.to_string()));
		}
		LevelFilter::from_str(level).map(|_| ()).map_err(|_| {
			SettingsError::invalid(
				"logging.level",
				format!(
					"unknown level `{}` (expected trace, debug, info, warn, error or off)",
					level
				),
			)
		})
	}
}

/// Output format of the fmt subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Full,
	Compact,
	Pretty,
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			LogFormat::Full => "full",
			LogFormat::Compact => "compact",
			LogFormat::Pretty => "pretty",
		})
	}
}

impl FromStr for LogFormat {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"full" => Ok(LogFormat::Full),
			"compact" => Ok(LogFormat::Compact),
			"pretty" => Ok(LogFormat::Pretty),
			other => Err(SettingsError::invalid(
				"logging.format",
				format!("unknown format `{}` (expected full, compact or pretty)", other),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[rstest]
	fn test_defaults_follow_recommended_order() {
		// Act
		let settings = Settings::default();

		// Assert
		assert!(settings.router.normalize_trailing_slash);
		assert_eq!(settings.resolvers.arguments[0], "request");
		assert_eq!(settings.resolvers.arguments.last().unwrap(), "default");
		assert_eq!(settings.resolvers.responses[0], "passthrough");
		assert_eq!(settings.resolvers.responses.last().unwrap(), "raw");
		assert_eq!(settings.logging.format, LogFormat::Full);
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_empty_document_is_default() {
		let settings = Settings::from_toml_str("").unwrap();

		assert_eq!(settings, Settings::default());
	}

	#[rstest]
	fn test_full_document() {
		// Arrange
		let source = r#"
			[router]
			normalize_trailing_slash = false

			[resolvers]
			arguments = ["path", "default"]
			responses = ["json", "raw"]

			[logging]
			level = "debug"
			format = "pretty"
		"#;

		// Act
		let settings = Settings::from_toml_str(source).unwrap();

		// Assert
		assert!(!settings.router.normalize_trailing_slash);
		assert_eq!(settings.resolvers.arguments, vec!["path", "default"]);
		assert_eq!(settings.resolvers.responses, vec!["json", "raw"]);
		assert_eq!(settings.logging.level, "debug");
		assert_eq!(settings.logging.format, LogFormat::Pretty);
	}

	#[rstest]
	#[case("[resolvers]\narguments = []", "resolvers.arguments")]
	#[case("[resolvers]\narguments = [\"cookie\"]", "resolvers.arguments")]
	#[case("[resolvers]\nresponses = [\"yaml\"]", "resolvers.responses")]
	#[case("[logging]\nlevel = \"loud\"", "logging.level")]
	fn test_invalid_values(#[case] source: &str, #[case] expected_key: &str) {
		let err = Settings::from_toml_str(source).unwrap_err();

		match err {
			SettingsError::Invalid { key, .. } => assert_eq!(key, expected_key),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[rstest]
	fn test_malformed_toml() {
		let err = Settings::from_toml_str("[router\n").unwrap_err();

		assert!(matches!(err, SettingsError::Parse(_)));
	}

	#[rstest]
	fn test_unknown_format_is_rejected_by_toml() {
		let err = Settings::from_toml_str("[logging]\nformat = \"json\"").unwrap_err();

		assert!(matches!(err, SettingsError::Parse(_)));
	}

	#[rstest]
	fn test_env_overrides() {
		// Arrange
		let mut settings = Settings::default();
		let lookup = env(&[
			(ENV_LOG_LEVEL, "warn"),
			(ENV_LOG_FORMAT, "Compact"),
			(ENV_NORMALIZE_TRAILING_SLASH, "off"),
		]);

		// Act
		settings.apply_env_with(lookup).unwrap();

		// Assert
		assert_eq!(settings.logging.level, "warn");
		assert_eq!(settings.logging.format, LogFormat::Compact);
		assert!(!settings.router.normalize_trailing_slash);
	}

	#[rstest]
	fn test_env_absent_keeps_values() {
		let mut settings = Settings::default();

		settings.apply_env_with(env(&[])).unwrap();

		assert_eq!(settings, Settings::default());
	}

	#[rstest]
	#[case(ENV_NORMALIZE_TRAILING_SLASH, "maybe")]
	#[case(ENV_LOG_FORMAT, "xml")]
	#[case(ENV_LOG_LEVEL, "chatty")]
	fn test_env_invalid_override(#[case] key: &str, #[case] value: &str) {
		let mut settings = Settings::default();

		let result = settings.apply_env_with(env(&[(key, value)]));

		assert!(matches!(result, Err(SettingsError::Invalid { .. })));
	}

	#[rstest]
	#[case("info")]
	#[case("TRACE")]
	#[case("off")]
	#[case("switchyard_routing=debug,info")]
	fn test_accepted_levels(#[case] level: &str) {
		let logging = LoggingSettings {
			level: level.to_string(),
			..LoggingSettings::default()
		};

		assert!(logging.env_filter().is_ok());
	}

	#[rstest]
	fn test_from_missing_file() {
		let err = Settings::from_file("/nonexistent/switchyard.toml").unwrap_err();

		assert!(matches!(err, SettingsError::Io { .. }));
		assert!(err.to_string().contains("/nonexistent/switchyard.toml"));
	}

	#[rstest]
	fn test_converts_to_configuration_error() {
		let err: switchyard_exception::Error = SettingsError::invalid("router", "bad").into();

		assert!(matches!(err, switchyard_exception::Error::Configuration(_)));
		assert_eq!(err.status_code(), 500);
	}
}
