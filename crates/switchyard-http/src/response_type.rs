//! Encoding hint attached to a route.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use switchyard_exception::Error;

/// How a handler's return value should be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
	#[default]
	Json,
	Xml,
	Html,
	Stream,
	Raw,
}

impl ResponseType {
	/// The `Content-Type` asserted for this encoding, if any
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::ResponseType;
	///
	/// assert_eq!(ResponseType::Json.mime(), Some("application/json"));
	/// assert_eq!(ResponseType::Stream.mime(), None);
	/// ```
	pub fn mime(self) -> Option<&'static str> {
		match self {
			ResponseType::Json => Some("application/json"),
			ResponseType::Xml => Some("application/xml"),
			ResponseType::Html => Some("text/html"),
			ResponseType::Stream | ResponseType::Raw => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ResponseType::Json => "json",
			ResponseType::Xml => "xml",
			ResponseType::Html => "html",
			ResponseType::Stream => "stream",
			ResponseType::Raw => "raw",
		}
	}
}

impl fmt::Display for ResponseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ResponseType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"json" => Ok(ResponseType::Json),
			"xml" => Ok(ResponseType::Xml),
			"html" => Ok(ResponseType::Html),
			"stream" => Ok(ResponseType::Stream),
			"raw" => Ok(ResponseType::Raw),
			other => Err(Error::Configuration(format!(
				"unknown response type `{}`",
				other
			))),
		}
	}
}
