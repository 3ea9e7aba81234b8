//! The request abstraction handed to the dispatcher by a wire adapter.

mod input;
mod params;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri, Version};
use indexmap::IndexMap;
use switchyard_exception::{Error, Result};

/// An incoming HTTP request.
///
/// Besides the usual method, URI, headers and body, a request carries a
/// string-keyed attribute bag. The invoker copies matched path parameters
/// into it before arguments are resolved.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Percent-decoded query parameters, in the order they appear
	pub query_params: IndexMap<String, String>,
	attributes: IndexMap<String, String>,
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Request;
	/// use http::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/users")
	///     .header("content-type", "application/json")
	///     .body(r#"{"name":"ada"}"#)
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.method, Method::POST);
	/// assert_eq!(request.header("Content-Type"), Some("application/json"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}
}

/// Builder for [`Request`]
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	invalid_header: Option<String>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			invalid_header: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace all headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a single header; an invalid name or value fails at `build`
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			_ => {
				self.invalid_header.get_or_insert_with(|| name.to_string());
			}
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finish the request, parsing the URI and its query string
	pub fn build(self) -> Result<Request> {
		if let Some(name) = self.invalid_header {
			return Err(Error::BadRequest(format!("invalid header `{}`", name)));
		}
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid uri `{}`: {}", self.uri, e)))?;
		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers: self.headers,
			body: self.body,
			query_params,
			attributes: IndexMap::new(),
		})
	}
}
