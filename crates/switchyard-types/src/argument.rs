//! Resolved handler arguments.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use switchyard_di::{Payload, Service};
use switchyard_exception::{Error, Result};
use switchyard_http::{Request, Response};

/// A single resolved value
pub enum Argument {
	Request(Request),
	Response(Response),
	Text(String),
	Service(Service),
	Payload(Payload),
	Value(Value),
}

impl Argument {
	fn describe(&self) -> &'static str {
		match self {
			Argument::Request(_) => "request",
			Argument::Response(_) => "response",
			Argument::Text(_) => "text",
			Argument::Service(_) => "service",
			Argument::Payload(_) => "payload",
			Argument::Value(_) => "value",
		}
	}
}

impl fmt::Debug for Argument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Argument::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Argument::Request(request) => f
				.debug_tuple("Request")
				.field(&format_args!("{} {}", request.method, request.uri))
				.finish(),
			other => write!(f, "{}(..)", other.describe()),
		}
	}
}

/// Arguments in declaration order, addressed by parameter name.
///
/// Accessors fail with a server error when the name is unknown or bound to a
/// different kind of value, since both indicate a handler whose parameter
/// declarations do not match its body.
///
/// # Examples
///
/// ```
/// use switchyard_types::{Argument, Arguments};
///
/// let mut args = Arguments::new();
/// args.push("id", Argument::Text("42".into()));
///
/// assert_eq!(args.text("id").unwrap(), "42");
/// assert_eq!(args.parse::<u64>("id").unwrap(), 42);
/// assert!(args.text("missing").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Arguments {
	entries: Vec<(String, Argument)>,
}

impl Arguments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, name: impl Into<String>, argument: Argument) {
		self.entries.push((name.into(), argument));
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Parameter names, in declaration order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	pub fn get(&self, name: &str) -> Option<&Argument> {
		self.entries
			.iter()
			.find(|(entry, _)| entry == name)
			.map(|(_, argument)| argument)
	}

	fn require(&self, name: &str) -> Result<&Argument> {
		self.get(name)
			.ok_or_else(|| Error::Server(format!("no argument named `{}`", name)))
	}

	fn take(&mut self, name: &str) -> Result<Argument> {
		let index = self
			.entries
			.iter()
			.position(|(entry, _)| entry == name)
			.ok_or_else(|| Error::Server(format!("no argument named `{}`", name)))?;
		Ok(self.entries.remove(index).1)
	}

	/// A string argument; string defaults count too
	pub fn text(&self, name: &str) -> Result<&str> {
		match self.require(name)? {
			Argument::Text(text) => Ok(text.as_str()),
			Argument::Value(Value::String(text)) => Ok(text.as_str()),
			other => Err(mismatch(name, "text", other)),
		}
	}

	/// Parse a string argument, e.g. a numeric path parameter.
	///
	/// Parsing failures are the client's fault and map to `BadRequest`.
	pub fn parse<T>(&self, name: &str) -> Result<T>
	where
		T: FromStr,
		T::Err: fmt::Display,
	{
		let text = self.text(name)?;
		text.parse::<T>()
			.map_err(|e| Error::BadRequest(format!("invalid value for `{}`: {}", name, e)))
	}

	/// A JSON value argument (declared defaults); text is widened to a string
	pub fn value(&self, name: &str) -> Result<Value> {
		match self.require(name)? {
			Argument::Value(value) => Ok(value.clone()),
			Argument::Text(text) => Ok(Value::String(text.clone())),
			other => Err(mismatch(name, "value", other)),
		}
	}

	pub fn request(&self, name: &str) -> Result<&Request> {
		match self.require(name)? {
			Argument::Request(request) => Ok(request),
			other => Err(mismatch(name, "request", other)),
		}
	}

	/// A container service downcast to `T`
	pub fn service<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
		match self.require(name)? {
			Argument::Service(service) => Arc::clone(service).downcast::<T>().map_err(|_| {
				Error::Server(format!(
					"argument `{}` is not a `{}`",
					name,
					std::any::type_name::<T>()
				))
			}),
			other => Err(mismatch(name, "service", other)),
		}
	}

	/// Remove the request argument
	pub fn take_request(&mut self, name: &str) -> Result<Request> {
		match self.take(name)? {
			Argument::Request(request) => Ok(request),
			other => Err(mismatch(name, "request", &other)),
		}
	}

	/// Remove the prepared response argument
	pub fn take_response(&mut self, name: &str) -> Result<Response> {
		match self.take(name)? {
			Argument::Response(response) => Ok(response),
			other => Err(mismatch(name, "response", &other)),
		}
	}

	/// Remove a hydrated payload and downcast it to `T`
	pub fn take_payload<T: 'static>(&mut self, name: &str) -> Result<T> {
		match self.take(name)? {
			Argument::Payload(payload) => payload.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
				Error::Server(format!(
					"argument `{}` is not a `{}`",
					name,
					std::any::type_name::<T>()
				))
			}),
			other => Err(mismatch(name, "payload", &other)),
		}
	}
}

fn mismatch(name: &str, expected: &str, actual: &Argument) -> Error {
	Error::Server(format!(
		"argument `{}` is a {}, not a {}",
		name,
		actual.describe(),
		expected
	))
}
