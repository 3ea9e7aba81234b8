use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::pin::Pin;
use switchyard_exception::{Error, Result};

/// Error type carried by streaming bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for streaming body
pub type StreamBody = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, BoxError>> + Send>>;

/// Response payload: fully buffered, or a stream handed through untouched
pub enum Body {
	Full(Bytes),
	Stream(StreamBody),
}

impl Default for Body {
	fn default() -> Self {
		Body::Full(Bytes::new())
	}
}

impl fmt::Debug for Body {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Body::Full(bytes) => f.debug_tuple("Full").field(bytes).finish(),
			Body::Stream(_) => f.write_str("Stream(..)"),
		}
	}
}

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Body,
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::ACCEPTED);
	/// assert_eq!(response.status, StatusCode::ACCEPTED);
	/// assert_eq!(response.body_bytes().map(|b| b.len()), Some(0));
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Body::default(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 201 Created status
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	/// Create a Response with HTTP 204 No Content status
	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// Create a redirect to `location`
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::redirect("/login", StatusCode::FOUND);
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.header("location"), Some("/login"));
	/// ```
	pub fn redirect(location: &str, status: StatusCode) -> Self {
		Self::new(status).with_header(header::LOCATION.as_str(), location)
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	/// Replace the body with buffered bytes
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Body::Full(body.into());
		self
	}

	/// Replace the body with a stream
	pub fn with_stream<S, E>(mut self, stream: S) -> Self
	where
		S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
		E: Into<BoxError>,
	{
		self.body = Body::Stream(Box::pin(stream.map_err(|e: E| -> BoxError { e.into() })));
		self
	}

	/// Set a header, replacing existing values; invalid names or values are ignored
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Response;
	///
	/// let response = Response::ok().with_header("X-Request-Id", "abc");
	/// assert_eq!(response.header("x-request-id"), Some("abc"));
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Append a header, keeping existing values
	pub fn with_added_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.append(name, value);
		}
		self
	}

	pub fn with_content_type(self, content_type: &str) -> Self {
		self.with_header(header::CONTENT_TYPE.as_str(), content_type)
	}

	/// First value of a header
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	pub fn has_header(&self, name: &str) -> bool {
		self.headers.contains_key(name)
	}

	pub fn content_type(&self) -> Option<&str> {
		self.header(header::CONTENT_TYPE.as_str())
	}

	/// Set the response body to JSON and add appropriate Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"path": "/a/é"})).unwrap();
	///
	/// assert_eq!(response.content_type(), Some("application/json"));
	/// assert_eq!(response.body_bytes().unwrap().as_ref(), r#"{"path":"/a/é"}"#.as_bytes());
	/// ```
	pub fn with_json<T: Serialize + ?Sized>(self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		Ok(self.with_body(json).with_content_type("application/json"))
	}

	/// Set the response body to an XML document built from `data`
	///
	/// See [`crate::xml::to_document`] for the mapping rules.
	pub fn with_xml(self, data: &Value) -> Result<Self> {
		let document = crate::xml::to_document(data)?;
		Ok(self
			.with_body(document)
			.with_content_type("application/xml"))
	}

	pub fn with_html(self, html: impl Into<Bytes>) -> Self {
		self.with_body(html).with_content_type("text/html")
	}

	/// Append a `Set-Cookie` header
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Response;
	///
	/// let response = Response::ok()
	///     .with_cookie("session", "abc")
	///     .with_cookie("theme", "dark");
	///
	/// let cookies: Vec<_> = response.headers.get_all("set-cookie").iter().collect();
	/// assert_eq!(cookies.len(), 2);
	/// ```
	pub fn with_cookie(self, name: &str, value: &str) -> Self {
		self.with_added_header(header::SET_COOKIE.as_str(), &format!("{}={}", name, value))
	}

	/// Serve `contents` as a file download named `filename`
	pub fn attachment(self, filename: &str, contents: impl Into<Bytes>) -> Self {
		let filename = filename.replace('"', "");
		self.with_body(contents)
			.with_content_type("application/octet-stream")
			.with_header(
				header::CONTENT_DISPOSITION.as_str(),
				&format!("attachment; filename=\"{}\"", filename),
			)
	}

	/// Gzip the buffered body and set `Content-Encoding`
	///
	/// Streaming bodies cannot be compressed here and are rejected.
	pub fn gzip(mut self) -> Result<Self> {
		let Body::Full(contents) = &self.body else {
			return Err(Error::Server(
				"cannot gzip a streaming response body".to_string(),
			));
		};
		let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
		encoder
			.write_all(contents)
			.map_err(|e| Error::Server(format!("gzip failed: {}", e)))?;
		let compressed = encoder
			.finish()
			.map_err(|e| Error::Server(format!("gzip failed: {}", e)))?;
		self.body = Body::Full(Bytes::from(compressed));
		Ok(self.with_header(header::CONTENT_ENCODING.as_str(), "gzip"))
	}

	/// The buffered body, or `None` for a streaming body
	pub fn body_bytes(&self) -> Option<&Bytes> {
		match &self.body {
			Body::Full(bytes) => Some(bytes),
			Body::Stream(_) => None,
		}
	}

	pub fn is_streaming(&self) -> bool {
		matches!(self.body, Body::Stream(_))
	}

	/// Drain the body into memory, polling a stream to completion if needed
	pub async fn collect_body(self) -> Result<Bytes> {
		match self.body {
			Body::Full(bytes) => Ok(bytes),
			Body::Stream(mut stream) => {
				let mut buffer = Vec::new();
				while let Some(chunk) = stream.next().await {
					let chunk = chunk.map_err(|e| Error::Server(e.to_string()))?;
					buffer.extend_from_slice(&chunk);
				}
				Ok(Bytes::from(buffer))
			}
		}
	}
}

/// Renders a typed error for the wire.
///
/// 405 responses carry an `Allow` header; 422 responses list the failing
/// fields under `errors` with the `VALIDATION_FIELDS` code.
impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = match &error {
			Error::Validation { errors } => serde_json::json!({
				"statusCode": status.as_u16(),
				"code": "VALIDATION_FIELDS",
				"message": error.to_string(),
				"errors": errors,
			}),
			_ => serde_json::json!({
				"statusCode": status.as_u16(),
				"error": error.to_string(),
			}),
		};

		let mut response = Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::new(StatusCode::INTERNAL_SERVER_ERROR));
		if let Some(allowed) = error.allowed_methods() {
			response = response.with_header(header::ALLOW.as_str(), &allowed.join(", "));
		}
		response
	}
}
