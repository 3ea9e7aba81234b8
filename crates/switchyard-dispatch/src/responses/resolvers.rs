//! Built-in response resolvers.

use super::ResponseResolver;
use serde_json::Value;
use switchyard_exception::{Error, Result};
use switchyard_http::{Body, Request, Response, ResponseType};
use switchyard_types::{ReturnValue, RouteMetadata};

/// Returns a handler-built response, filling in a missing content type
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl ResponseResolver for PassthroughResolver {
	fn name(&self) -> &'static str {
		"passthrough"
	}

	fn supports(&self, value: &ReturnValue, _request: &Request, _metadata: &RouteMetadata) -> bool {
		value.is_response()
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		let ReturnValue::Response(response) = value else {
			return Err(unexpected("passthrough", &value));
		};
		match metadata.response_type.mime() {
			Some(mime) if response.content_type().is_none() => Ok(response.with_content_type(mime)),
			_ => Ok(response),
		}
	}
}

/// Serializes data as JSON; strings become JSON-quoted
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResolver;

impl ResponseResolver for JsonResolver {
	fn name(&self) -> &'static str {
		"json"
	}

	fn supports(&self, value: &ReturnValue, _request: &Request, metadata: &RouteMetadata) -> bool {
		metadata.response_type == ResponseType::Json && value.as_value().is_some()
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		let ReturnValue::Value(data) = value else {
			return Err(unexpected("json", &value));
		};
		Response::new(metadata.status).with_json(&data)
	}
}

/// Encodes data as an XML document under a synthetic `<root>`
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlResolver;

impl ResponseResolver for XmlResolver {
	fn name(&self) -> &'static str {
		"xml"
	}

	fn supports(&self, value: &ReturnValue, _request: &Request, metadata: &RouteMetadata) -> bool {
		metadata.response_type == ResponseType::Xml && value.as_value().is_some()
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		let ReturnValue::Value(data) = value else {
			return Err(unexpected("xml", &value));
		};
		Response::new(metadata.status).with_xml(&data)
	}
}

/// Uses strings verbatim as an HTML body; structured data is JSON-encoded first
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlResolver;

impl ResponseResolver for HtmlResolver {
	fn name(&self) -> &'static str {
		"html"
	}

	fn supports(&self, value: &ReturnValue, _request: &Request, metadata: &RouteMetadata) -> bool {
		metadata.response_type == ResponseType::Html && value.as_value().is_some()
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		let ReturnValue::Value(data) = value else {
			return Err(unexpected("html", &value));
		};
		Ok(Response::new(metadata.status).with_html(raw_text(&data)?))
	}
}

/// Sends a stream unchanged, without asserting a content type
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamResolver;

impl ResponseResolver for StreamResolver {
	fn name(&self) -> &'static str {
		"stream"
	}

	fn supports(&self, value: &ReturnValue, _request: &Request, metadata: &RouteMetadata) -> bool {
		value.is_stream() || (metadata.response_type == ResponseType::Stream && !value.is_response())
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		let response = Response::new(metadata.status);
		match value {
			ReturnValue::Stream(stream) => Ok(Response {
				body: Body::Stream(stream),
				..response
			}),
			// Plain data under STREAM metadata is sent as a single chunk
			ReturnValue::Value(data) => Ok(response.with_body(raw_text(&data)?)),
			other => Err(unexpected("stream", &other)),
		}
	}
}

/// Terminal fallback: renders anything as plain text
#[derive(Debug, Default, Clone, Copy)]
pub struct RawFallbackResolver;

impl ResponseResolver for RawFallbackResolver {
	fn name(&self) -> &'static str {
		"raw"
	}

	fn supports(&self, _value: &ReturnValue, _request: &Request, _metadata: &RouteMetadata) -> bool {
		true
	}

	fn resolve(
		&self,
		value: ReturnValue,
		_request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		match value {
			ReturnValue::Value(data) => Ok(Response::new(metadata.status).with_body(raw_text(&data)?)),
			ReturnValue::Response(response) => Ok(response),
			ReturnValue::Stream(stream) => Ok(Response {
				body: Body::Stream(stream),
				..Response::new(metadata.status)
			}),
		}
	}
}

/// Best-effort text: `null` is empty, booleans are `true`/`false`,
/// strings are verbatim and structures are JSON-encoded
fn raw_text(data: &Value) -> Result<String> {
	match data {
		Value::Null => Ok(String::new()),
		Value::Bool(flag) => Ok(flag.to_string()),
		Value::String(text) => Ok(text.clone()),
		Value::Number(number) => Ok(number.to_string()),
		Value::Array(_) | Value::Object(_) => {
			serde_json::to_string(data).map_err(|e| Error::Serialization(e.to_string()))
		}
	}
}

fn unexpected(resolver: &str, value: &ReturnValue) -> Error {
	Error::Server(format!("{} resolver cannot encode {:?}", resolver, value))
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use http::StatusCode;
	use rstest::rstest;
	use serde_json::json;
	use switchyard_http::BoxError;

	fn request() -> Request {
		Request::builder().build().unwrap()
	}

	fn body_text(response: &Response) -> String {
		String::from_utf8(response.body_bytes().unwrap().to_vec()).unwrap()
	}

	#[rstest]
	fn test_passthrough_fills_missing_content_type() {
		// Arrange
		let value = ReturnValue::from(Response::created().with_body("<p>hi</p>"));

		// Act
		let response = PassthroughResolver
			.resolve(value, &request(), &RouteMetadata::html())
			.unwrap();

		// Assert
		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(response.content_type(), Some("text/html"));
	}

	#[rstest]
	fn test_passthrough_keeps_existing_content_type() {
		let value = ReturnValue::from(Response::ok().with_content_type("text/csv"));

		let response = PassthroughResolver
			.resolve(value, &request(), &RouteMetadata::default())
			.unwrap();

		assert_eq!(response.content_type(), Some("text/csv"));
	}

	#[rstest]
	fn test_passthrough_under_raw_asserts_nothing() {
		let value = ReturnValue::from(Response::ok());

		let response = PassthroughResolver
			.resolve(value, &request(), &RouteMetadata::raw())
			.unwrap();

		assert!(response.content_type().is_none());
	}

	#[rstest]
	#[case(json!("pong"), "\"pong\"")]
	#[case(json!(42), "42")]
	#[case(json!(null), "null")]
	#[case(json!({"url": "https://example.com/a", "name": "Zoë"}), r#"{"url":"https://example.com/a","name":"Zoë"}"#)]
	fn test_json_encoding(#[case] data: Value, #[case] expected: &str) {
		let response = JsonResolver
			.resolve(data.into(), &request(), &RouteMetadata::default())
			.unwrap();

		assert_eq!(response.content_type(), Some("application/json"));
		assert_eq!(body_text(&response), expected);
	}

	#[rstest]
	fn test_json_only_supports_json_metadata() {
		let value = ReturnValue::from(json!({"a": 1}));

		assert!(JsonResolver.supports(&value, &request(), &RouteMetadata::default()));
		assert!(!JsonResolver.supports(&value, &request(), &RouteMetadata::xml()));
		assert!(!JsonResolver.supports(&ReturnValue::from(Response::ok()), &request(), &RouteMetadata::default()));
	}

	#[rstest]
	fn test_xml_uses_metadata_status() {
		let metadata = RouteMetadata::xml().with_status(StatusCode::CREATED);

		let response = XmlResolver
			.resolve(json!({"home": "Olá Mundo"}).into(), &request(), &metadata)
			.unwrap();

		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(response.content_type(), Some("application/xml"));
		assert!(body_text(&response).ends_with("<root><home>Olá Mundo</home></root>"));
	}

	#[rstest]
	#[case(json!("<h1>Hi</h1>"), "<h1>Hi</h1>")]
	#[case(json!(["a", "b"]), r#"["a","b"]"#)]
	fn test_html_body(#[case] data: Value, #[case] expected: &str) {
		let response = HtmlResolver
			.resolve(data.into(), &request(), &RouteMetadata::html())
			.unwrap();

		assert_eq!(response.content_type(), Some("text/html"));
		assert_eq!(body_text(&response), expected);
	}

	#[rstest]
	fn test_stream_supported_regardless_of_metadata() {
		let stream = futures::stream::iter(vec![Ok::<_, BoxError>(Bytes::from("chunk"))]);
		let value = ReturnValue::stream(stream);

		assert!(StreamResolver.supports(&value, &request(), &RouteMetadata::default()));

		let response = StreamResolver
			.resolve(value, &request(), &RouteMetadata::default())
			.unwrap();
		assert!(response.is_streaming());
		assert!(response.content_type().is_none());
	}

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!(true), "true")]
	#[case(json!(false), "false")]
	#[case(json!(3.5), "3.5")]
	#[case(json!("plain"), "plain")]
	#[case(json!({"k": [1]}), r#"{"k":[1]}"#)]
	fn test_raw_conversion(#[case] data: Value, #[case] expected: &str) {
		let response = RawFallbackResolver
			.resolve(data.into(), &request(), &RouteMetadata::raw())
			.unwrap();

		assert!(response.content_type().is_none());
		assert_eq!(body_text(&response), expected);
	}
}
