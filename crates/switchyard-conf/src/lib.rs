//! # Switchyard Conf
//!
//! Settings for the dispatch core, loaded from TOML and adjusted through
//! `SWITCHYARD_*` environment variables.
//!
//! ```toml
//! [router]
//! normalize_trailing_slash = true
//!
//! [resolvers]
//! arguments = ["request", "path", "payload", "service", "response", "default"]
//! responses = ["passthrough", "json", "xml", "html", "stream", "raw"]
//!
//! [logging]
//! level = "info"
//! format = "full"
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_logging;
pub use settings::{
	LogFormat, LoggingSettings, ResolverSettings, RouterSettings, Settings, SettingsError,
};
