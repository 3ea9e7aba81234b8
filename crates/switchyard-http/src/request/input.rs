//! Convenience accessors over the body, query string, headers and cookies.

use super::Request;
use http::header::{CONTENT_TYPE, COOKIE};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use switchyard_exception::{Error, Result};

impl Request {
	/// First value of a header, looked up case-insensitively
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Value of a cookie from the `Cookie` header(s)
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Request;
	///
	/// let request = Request::builder()
	///     .header("cookie", "session=abc123; theme=dark")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.cookie("theme").as_deref(), Some("dark"));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|line| line.split(';'))
			.filter_map(|pair| {
				let (key, value) = pair.trim().split_once('=')?;
				(key == name).then(|| percent_decode_str(value).decode_utf8_lossy().into_owned())
			})
			.next()
	}

	/// The body as a field map.
	///
	/// JSON bodies must decode to an object; form-encoded bodies become
	/// string fields. Anything else yields an empty map.
	pub fn parsed_body(&self) -> Map<String, Value> {
		if self.body.is_empty() {
			return Map::new();
		}
		let is_form = self
			.header(CONTENT_TYPE.as_str())
			.is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
		if is_form {
			return serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body)
				.map(|pairs| {
					pairs
						.into_iter()
						.map(|(key, value)| (key, Value::String(value)))
						.collect()
				})
				.unwrap_or_default();
		}
		match serde_json::from_slice::<Value>(&self.body) {
			Ok(Value::Object(map)) => map,
			_ => Map::new(),
		}
	}

	/// A body field, falling back to the query string
	pub fn input(&self, key: &str) -> Option<Value> {
		self.post(key)
			.or_else(|| self.query(key).map(|v| Value::String(v.to_string())))
	}

	/// A body field only
	pub fn post(&self, key: &str) -> Option<Value> {
		self.parsed_body().remove(key)
	}

	/// Whether the body or the query string carries `key`
	pub fn has(&self, key: &str) -> bool {
		self.parsed_body().contains_key(key) || self.query_params.contains_key(key)
	}

	/// Query parameters merged with body fields; body fields win
	pub fn all(&self) -> Map<String, Value> {
		let mut merged: Map<String, Value> = self
			.query_params
			.iter()
			.map(|(k, v)| (k.clone(), Value::String(v.clone())))
			.collect();
		merged.extend(self.parsed_body());
		merged
	}

	/// Like [`Request::all`], restricted to the given keys
	pub fn only(&self, keys: &[&str]) -> Map<String, Value> {
		let mut all = self.all();
		keys.iter()
			.filter_map(|key| all.remove(*key).map(|value| (key.to_string(), value)))
			.collect()
	}

	/// Deserialize the JSON body
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::BadRequest(format!("invalid JSON body: {}", e)))
	}
}
