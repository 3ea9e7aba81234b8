//! Logging initialisation

use crate::settings::{LogFormat, LoggingSettings, SettingsError};

/// Install a global fmt subscriber built from `settings`.
///
/// Fails with [`SettingsError::Logging`] when a global subscriber is
/// already set.
///
/// # Examples
///
/// ```no_run
/// use switchyard_conf::{Settings, init_logging};
///
/// let mut settings = Settings::default();
/// settings.apply_env().unwrap();
/// init_logging(&settings.logging).unwrap();
/// ```
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
	let builder = tracing_subscriber::fmt().with_env_filter(settings.env_filter()?);

	let result = match settings.format {
		LogFormat::Full => builder.try_init(),
		LogFormat::Compact => builder.compact().try_init(),
		LogFormat::Pretty => builder.pretty().try_init(),
	};

	result.map_err(|e| SettingsError::Logging(e.to_string()))
}
