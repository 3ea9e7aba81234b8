//! # Switchyard Exception
//!
//! Typed errors raised while registering routes and dispatching requests.
//!
//! Every fallible operation in the workspace returns [`Result`]. The
//! dispatcher never translates these errors into responses itself; the wire
//! adapter decides how to render them, usually by mapping
//! [`Error::status_code`] onto the HTTP status line.
//!
//! ## Examples
//!
//! ```
//! use switchyard_exception::{Error, ErrorKind};
//!
//! let error = Error::MethodNotAllowed {
//!     method: "DELETE".to_string(),
//!     path: "/users/42".to_string(),
//!     allowed: vec!["GET".to_string(), "POST".to_string()],
//! };
//!
//! assert_eq!(error.status_code(), 405);
//! assert_eq!(error.kind(), ErrorKind::Routing);
//! assert_eq!(error.to_string(), "Method DELETE not allowed. Allowed: GET, POST");
//! ```

use indexmap::IndexMap;
use thiserror::Error;

/// Field name to the list of violation messages reported for it.
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Result alias used across the switchyard crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// No route answered the request (404 / 405).
	Routing,
	/// The client sent something unusable (400 / 422).
	Client,
	/// A registration-time defect that must abort startup.
	Boot,
	/// A programming or configuration defect surfaced at request time (500).
	Server,
}

/// Errors raised by route registration, matching and handler invocation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// No route is registered for the requested path under any method
	#[error("Route not found: {path}")]
	RouteNotFound { method: String, path: String },

	/// The path is registered, but not for the requested method
	#[error("Method {method} not allowed. Allowed: {}", allowed.join(", "))]
	MethodNotAllowed {
		method: String,
		path: String,
		allowed: Vec<String>,
	},

	/// Malformed request payload
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// The payload decoded but failed validation
	#[error("Validation failed for {} field(s)", errors.len())]
	Validation { errors: FieldErrors },

	/// No argument resolver claimed a parameter and it has no default
	#[error("Could not resolve argument `{parameter}` for handler `{handler}`")]
	MissingArgument { parameter: String, handler: String },

	/// The same method and path were registered twice
	#[error("Duplicate route defined: [{method}] {path}")]
	DuplicateRoute { method: String, path: String },

	/// Invalid registration or settings
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// A value could not be encoded into a response body
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Any other defect surfaced while handling a request
	#[error("Server error: {0}")]
	Server(String),
}

impl Error {
	/// HTTP status code conventionally associated with this error.
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_exception::Error;
	///
	/// assert_eq!(Error::BadRequest("bad json".into()).status_code(), 400);
	/// assert_eq!(Error::Server("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::RouteNotFound { .. } => 404,
			Error::MethodNotAllowed { .. } => 405,
			Error::BadRequest(_) => 400,
			Error::Validation { .. } => 422,
			Error::MissingArgument { .. }
			| Error::DuplicateRoute { .. }
			| Error::Configuration(_)
			| Error::Serialization(_)
			| Error::Server(_) => 500,
		}
	}

	/// Coarse category, for callers that do not need the full variant.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::RouteNotFound { .. } | Error::MethodNotAllowed { .. } => ErrorKind::Routing,
			Error::BadRequest(_) | Error::Validation { .. } => ErrorKind::Client,
			Error::DuplicateRoute { .. } | Error::Configuration(_) => ErrorKind::Boot,
			Error::MissingArgument { .. } | Error::Serialization(_) | Error::Server(_) => {
				ErrorKind::Server
			}
		}
	}

	/// Methods that would have matched, for a 405 outcome.
	pub fn allowed_methods(&self) -> Option<&[String]> {
		match self {
			Error::MethodNotAllowed { allowed, .. } => Some(allowed),
			_ => None,
		}
	}

	/// Per-field violations, for a 422 outcome.
	pub fn field_errors(&self) -> Option<&FieldErrors> {
		match self {
			Error::Validation { errors } => Some(errors),
			_ => None,
		}
	}

	/// Whether the error is the client's fault (4xx).
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code())
	}
}
