use http::StatusCode;
use serde::{Deserialize, Serialize};
use switchyard_http::ResponseType;

/// Status and encoding hints declared for a route.
///
/// Routes registered without metadata use `200` and JSON.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use switchyard_http::ResponseType;
/// use switchyard_types::RouteMetadata;
///
/// let metadata = RouteMetadata::xml().with_status(StatusCode::CREATED);
/// assert_eq!(metadata.status, StatusCode::CREATED);
/// assert_eq!(metadata.response_type, ResponseType::Xml);
/// assert_eq!(RouteMetadata::default().status, StatusCode::OK);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
	#[serde(with = "status_code")]
	pub status: StatusCode,
	pub response_type: ResponseType,
}

impl Default for RouteMetadata {
	fn default() -> Self {
		Self::new(StatusCode::OK, ResponseType::Json)
	}
}

impl RouteMetadata {
	pub fn new(status: StatusCode, response_type: ResponseType) -> Self {
		Self {
			status,
			response_type,
		}
	}

	pub fn json() -> Self {
		Self::default()
	}

	pub fn xml() -> Self {
		Self::new(StatusCode::OK, ResponseType::Xml)
	}

	pub fn html() -> Self {
		Self::new(StatusCode::OK, ResponseType::Html)
	}

	pub fn stream() -> Self {
		Self::new(StatusCode::OK, ResponseType::Stream)
	}

	pub fn raw() -> Self {
		Self::new(StatusCode::OK, ResponseType::Raw)
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}
}

mod status_code {
	use http::StatusCode;
	use serde::{Deserialize, Deserializer, Serializer, de::Error};

	pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u16(status.as_u16())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
		let code = u16::deserialize(deserializer)?;
		StatusCode::from_u16(code).map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_metadata_serde() {
		// Arrange
		let metadata = RouteMetadata::html().with_status(StatusCode::ACCEPTED);

		// Act
		let json = serde_json::to_value(metadata).unwrap();
		let back: RouteMetadata = serde_json::from_value(json.clone()).unwrap();

		// Assert
		assert_eq!(json, serde_json::json!({"status": 202, "response_type": "html"}));
		assert_eq!(back, metadata);
	}

	#[rstest]
	fn test_metadata_rejects_invalid_status() {
		let result = serde_json::from_value::<RouteMetadata>(
			serde_json::json!({"status": 1000, "response_type": "json"}),
		);

		assert!(result.is_err());
	}
}
