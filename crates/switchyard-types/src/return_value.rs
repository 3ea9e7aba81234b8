use bytes::Bytes;
use futures::stream::{Stream, TryStreamExt};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use switchyard_exception::{Error, Result};
use switchyard_http::{BoxError, Response, StreamBody};

/// What a handler hands back to the response resolver chain
pub enum ReturnValue {
	/// Plain data: a mapping, sequence, scalar or null
	Value(Value),
	/// A response the handler built itself
	Response(Response),
	/// A byte stream to be sent unchanged
	Stream(StreamBody),
}

impl ReturnValue {
	/// Serialize any value into a [`ReturnValue::Value`]
	///
	/// # Examples
	///
	/// ```
	/// use serde::Serialize;
	/// use switchyard_types::ReturnValue;
	///
	/// #[derive(Serialize)]
	/// struct User { id: u32 }
	///
	/// let value = ReturnValue::json(&User { id: 7 }).unwrap();
	/// assert_eq!(value.as_value(), Some(&serde_json::json!({"id": 7})));
	/// ```
	pub fn json<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
		serde_json::to_value(data)
			.map(ReturnValue::Value)
			.map_err(|e| Error::Serialization(e.to_string()))
	}

	pub fn null() -> Self {
		ReturnValue::Value(Value::Null)
	}

	pub fn stream<S, E>(stream: S) -> Self
	where
		S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
		E: Into<BoxError>,
	{
		ReturnValue::Stream(Box::pin(stream.map_err(|e: E| -> BoxError { e.into() })))
	}

	pub fn as_value(&self) -> Option<&Value> {
		match self {
			ReturnValue::Value(value) => Some(value),
			_ => None,
		}
	}

	pub fn is_response(&self) -> bool {
		matches!(self, ReturnValue::Response(_))
	}

	pub fn is_stream(&self) -> bool {
		matches!(self, ReturnValue::Stream(_))
	}
}

impl fmt::Debug for ReturnValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReturnValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
			ReturnValue::Response(response) => f.debug_tuple("Response").field(response).finish(),
			ReturnValue::Stream(_) => f.write_str("Stream(..)"),
		}
	}
}

impl From<Value> for ReturnValue {
	fn from(value: Value) -> Self {
		ReturnValue::Value(value)
	}
}

impl From<Response> for ReturnValue {
	fn from(response: Response) -> Self {
		ReturnValue::Response(response)
	}
}

impl From<String> for ReturnValue {
	fn from(text: String) -> Self {
		ReturnValue::Value(Value::String(text))
	}
}

impl From<&str> for ReturnValue {
	fn from(text: &str) -> Self {
		ReturnValue::Value(Value::String(text.to_string()))
	}
}

impl From<bool> for ReturnValue {
	fn from(flag: bool) -> Self {
		ReturnValue::Value(Value::Bool(flag))
	}
}

impl From<()> for ReturnValue {
	fn from(_: ()) -> Self {
		ReturnValue::null()
	}
}

impl From<StreamBody> for ReturnValue {
	fn from(stream: StreamBody) -> Self {
		ReturnValue::Stream(stream)
	}
}
