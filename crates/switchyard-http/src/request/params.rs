use super::Request;
use http::Uri;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;

impl Request {
	/// Parse and percent-decode the query string of `uri`
	pub(super) fn parse_query_params(uri: &Uri) -> IndexMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						Some((
							decode_component(parts.next()?),
							decode_component(parts.next().unwrap_or("")),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get the request path
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Request;
	///
	/// let request = Request::builder().uri("/api/users?page=2").build().unwrap();
	/// assert_eq!(request.path(), "/api/users");
	/// ```
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Set a request attribute (path parameters are stored here)
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_http::Request;
	///
	/// let mut request = Request::builder().uri("/users/123").build().unwrap();
	/// request.set_attribute("id", "123");
	///
	/// assert!(request.has_attribute("id"));
	/// assert_eq!(request.attribute("id"), Some("123"));
	/// ```
	pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.attributes.insert(key.into(), value.into());
	}

	pub fn attribute(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).map(String::as_str)
	}

	pub fn has_attribute(&self, key: &str) -> bool {
		self.attributes.contains_key(key)
	}

	/// All attributes, in insertion order
	pub fn attributes(&self) -> &IndexMap<String, String> {
		&self.attributes
	}

	/// A single decoded query parameter
	pub fn query(&self, key: &str) -> Option<&str> {
		self.query_params.get(key).map(String::as_str)
	}
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_query_params_multiple_equals_in_value() {
		// Arrange
		let uri: Uri = "/test?formula=a=b=c".parse().unwrap();

		// Act
		let params = Request::parse_query_params(&uri);

		// Assert
		assert_eq!(params.get("formula"), Some(&"a=b=c".to_string()));
	}

	#[rstest]
	fn test_parse_query_params_decodes_values() {
		let uri: Uri = "/test?name=John%20Doe&city=S%C3%A3o+Paulo".parse().unwrap();

		let params = Request::parse_query_params(&uri);

		assert_eq!(params.get("name"), Some(&"John Doe".to_string()));
		assert_eq!(params.get("city"), Some(&"São Paulo".to_string()));
	}

	#[rstest]
	fn test_parse_query_params_key_without_value() {
		let uri: Uri = "/test?flag&key=".parse().unwrap();

		let params = Request::parse_query_params(&uri);

		assert_eq!(params.get("flag"), Some(&"".to_string()));
		assert_eq!(params.get("key"), Some(&"".to_string()));
	}

	#[rstest]
	fn test_parse_query_params_no_query_string() {
		let uri: Uri = "/test".parse().unwrap();

		assert!(Request::parse_query_params(&uri).is_empty());
	}

	#[rstest]
	fn test_attributes_keep_insertion_order() {
		// Arrange
		let mut request = Request::builder().uri("/a/1/b/2").build().unwrap();

		// Act
		request.set_attribute("a", "1");
		request.set_attribute("b", "2");

		// Assert
		let keys: Vec<_> = request.attributes().keys().cloned().collect();
		assert_eq!(keys, vec!["a", "b"]);
	}
}
