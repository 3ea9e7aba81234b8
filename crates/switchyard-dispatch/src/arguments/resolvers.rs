//! Built-in argument resolvers.

use super::{ArgumentContext, ArgumentResolver};
use http::header::{CONTENT_TYPE, HeaderValue};
use serde_json::{Map, Value};
use std::sync::Arc;
use switchyard_di::{Container, HydrationError, Hydrator, Validator};
use switchyard_exception::{Error, Result};
use switchyard_http::Response;
use switchyard_types::{Argument, DeclaredKind, ParameterDescriptor};
use tracing::{debug, error};

/// Supplies the request itself
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestResolver;

impl ArgumentResolver for RequestResolver {
	fn name(&self) -> &'static str {
		"request"
	}

	fn supports(&self, _context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		parameter.kind() == DeclaredKind::Request
	}

	fn resolve(
		&self,
		context: &ArgumentContext<'_>,
		_parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		Ok(Argument::Request(context.request.clone()))
	}
}

/// Supplies a request attribute named like the parameter, unconverted.
///
/// Path parameters are copied into the attribute bag before resolution, so
/// this never touches the request body.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathParameterResolver;

impl ArgumentResolver for PathParameterResolver {
	fn name(&self) -> &'static str {
		"path"
	}

	fn supports(&self, context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		context.request.has_attribute(parameter.name())
	}

	fn resolve(
		&self,
		context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		context
			.request
			.attribute(parameter.name())
			.map(|value| Argument::Text(value.to_string()))
			.ok_or_else(|| Error::MissingArgument {
				parameter: parameter.name().to_string(),
				handler: context.handler.to_string(),
			})
	}
}

/// Decodes the JSON body, hydrates it into the declared type and validates it.
///
/// A body that is empty or decodes to something other than an object is
/// hydrated from an empty object.
pub struct PayloadResolver {
	hydrator: Arc<dyn Hydrator>,
	validator: Arc<dyn Validator>,
}

impl PayloadResolver {
	pub fn new(hydrator: Arc<dyn Hydrator>, validator: Arc<dyn Validator>) -> Self {
		Self {
			hydrator,
			validator,
		}
	}

	fn decode(body: &[u8]) -> Result<Value> {
		if body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Value::Object(Map::new()));
		}
		match serde_json::from_slice::<Value>(body) {
			Ok(Value::Object(map)) => Ok(Value::Object(map)),
			Ok(_) => Ok(Value::Object(Map::new())),
			Err(e) => Err(Error::BadRequest(format!("Invalid JSON payload: {}", e))),
		}
	}
}

impl ArgumentResolver for PayloadResolver {
	fn name(&self) -> &'static str {
		"payload"
	}

	fn supports(&self, _context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		parameter.binds_body() && parameter.type_key().is_some()
	}

	fn resolve(
		&self,
		context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		let Some(key) = parameter.type_key() else {
			return Err(Error::Server(format!(
				"payload parameter `{}` has no declared type",
				parameter.name()
			)));
		};

		let data = Self::decode(&context.request.body)?;
		let payload = self.hydrator.hydrate(&key, data).map_err(|e| match e {
			HydrationError::Mismatch { .. } => Error::BadRequest(e.to_string()),
			HydrationError::Unregistered(_) => {
				error!(handler = context.handler, parameter = parameter.name(), "{}", e);
				Error::Server(e.to_string())
			}
		})?;

		let errors = self.validator.validate(&key, payload.as_ref());
		if !errors.is_empty() {
			debug!(
				handler = context.handler,
				parameter = parameter.name(),
				fields = errors.len(),
				"payload failed validation"
			);
			return Err(Error::Validation { errors });
		}
		Ok(Argument::Payload(payload))
	}
}

/// Supplies a service from the container
pub struct ServiceResolver {
	container: Arc<dyn Container>,
}

impl ServiceResolver {
	pub fn new(container: Arc<dyn Container>) -> Self {
		Self { container }
	}
}

impl ArgumentResolver for ServiceResolver {
	fn name(&self) -> &'static str {
		"service"
	}

	fn supports(&self, _context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		!parameter.binds_body()
			&& parameter
				.type_key()
				.is_some_and(|key| self.container.has(&key))
	}

	fn resolve(
		&self,
		_context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		parameter
			.type_key()
			.and_then(|key| self.container.get(&key))
			.map(Argument::Service)
			.ok_or_else(|| {
				Error::Server(format!(
					"service for parameter `{}` disappeared from the container",
					parameter.name()
				))
			})
	}
}

/// Supplies an empty response seeded with the route's status and content type
#[derive(Debug, Default, Clone, Copy)]
pub struct PreparedResponseResolver;

impl ArgumentResolver for PreparedResponseResolver {
	fn name(&self) -> &'static str {
		"response"
	}

	fn supports(&self, _context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		parameter.kind() == DeclaredKind::Response
	}

	fn resolve(
		&self,
		context: &ArgumentContext<'_>,
		_parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		let mut response = Response::new(context.metadata.status);
		if let Some(mime) = context.metadata.response_type.mime() {
			response
				.headers
				.insert(CONTENT_TYPE, HeaderValue::from_static(mime));
		}
		Ok(Argument::Response(response))
	}
}

/// Supplies the parameter's declared default
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultValueResolver;

impl ArgumentResolver for DefaultValueResolver {
	fn name(&self) -> &'static str {
		"default"
	}

	fn supports(&self, _context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool {
		parameter.has_default()
	}

	fn resolve(
		&self,
		_context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		parameter
			.default_value()
			.cloned()
			.map(Argument::Value)
			.ok_or_else(|| Error::Server(format!("parameter `{}` has no default", parameter.name())))
	}
}
