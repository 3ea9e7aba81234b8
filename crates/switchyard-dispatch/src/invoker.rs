//! Handler invocation.

use crate::arguments::{ArgumentContext, ArgumentResolverChain};
use crate::responses::ResponseResolverChain;
use std::sync::Arc;
use switchyard_di::Container;
use switchyard_exception::{Error, Result};
use switchyard_http::{Request, Response};
use switchyard_routing::PathParams;
use switchyard_types::{BoundMethod, Controller, HandlerFn, HandlerRef, RouteMetadata};
use tracing::error;

/// Runs one matched handler: target lookup, argument binding, the call
/// itself and response encoding
#[derive(Clone)]
pub struct ControllerInvoker {
	container: Arc<dyn Container>,
	arguments: ArgumentResolverChain,
	responses: ResponseResolverChain,
}

impl ControllerInvoker {
	pub fn new(
		container: Arc<dyn Container>,
		arguments: ArgumentResolverChain,
		responses: ResponseResolverChain,
	) -> Self {
		Self {
			container,
			arguments,
			responses,
		}
	}

	pub fn arguments(&self) -> &ArgumentResolverChain {
		&self.arguments
	}

	pub fn responses(&self) -> &ResponseResolverChain {
		&self.responses
	}

	pub(crate) fn set_arguments(&mut self, chain: ArgumentResolverChain) {
		self.arguments = chain;
	}

	pub(crate) fn set_responses(&mut self, chain: ResponseResolverChain) {
		self.responses = chain;
	}

	/// Invoke `handler` for `request`.
	///
	/// Route metadata defaults to `200` / JSON when the route declared none.
	pub async fn invoke(
		&self,
		handler: &HandlerRef,
		metadata: Option<RouteMetadata>,
		params: &PathParams,
		mut request: Request,
	) -> Result<Response> {
		let name = handler.name();
		let target = match handler {
			HandlerRef::BoundMethod(bound) => {
				Target::Method(self.resolve_target(bound, &name)?, bound.method())
			}
			HandlerRef::Function(function) => Target::Function(function.callable()),
		};

		for (key, value) in params {
			request.set_attribute(key.as_str(), value.as_str());
		}

		let metadata = metadata.unwrap_or_default();
		let context = ArgumentContext {
			request: &request,
			metadata,
			handler: &name,
		};
		let arguments = self
			.arguments
			.resolve_arguments(&context, handler.parameters())?;

		let value = match target {
			Target::Method(controller, method) => controller.call(method, arguments).await?,
			Target::Function(callable) => callable.call(arguments).await?,
		};

		self.responses.resolve(value, &request, &metadata)
	}

	fn resolve_target(&self, bound: &BoundMethod, name: &str) -> Result<Arc<dyn Controller>> {
		let owner = bound.owner();
		let from_container = if self.container.has(&owner) {
			self.container
				.get(&owner)
				.and_then(|service| bound.binding().bind(service))
		} else {
			None
		};

		from_container
			.or_else(|| bound.binding().construct())
			.ok_or_else(|| {
				error!(handler = name, owner = %owner, "handler target not found");
				Error::Server(format!("handler target not found: {}", name))
			})
	}
}

enum Target<'h> {
	Method(Arc<dyn Controller>, &'h str),
	Function(&'h dyn HandlerFn),
}

impl std::fmt::Debug for ControllerInvoker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ControllerInvoker")
			.field("arguments", &self.arguments)
			.field("responses", &self.responses)
			.finish_non_exhaustive()
	}
}
