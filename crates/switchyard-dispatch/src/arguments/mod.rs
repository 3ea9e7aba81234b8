//! Binding declared handler parameters to values.

mod resolvers;

pub use resolvers::{
	DefaultValueResolver, PathParameterResolver, PayloadResolver, PreparedResponseResolver,
	RequestResolver, ServiceResolver,
};

use crate::ResolverDependencies;
use std::sync::Arc;
use switchyard_conf::ResolverSettings;
use switchyard_exception::{Error, Result};
use switchyard_http::Request;
use switchyard_types::{Argument, Arguments, ParameterDescriptor, RouteMetadata};
use tracing::{debug, error};

/// What an argument resolver can see while binding one handler's parameters
#[derive(Debug, Clone, Copy)]
pub struct ArgumentContext<'a> {
	pub request: &'a Request,
	pub metadata: RouteMetadata,
	/// Handler name, for diagnostics
	pub handler: &'a str,
}

/// One strategy in the argument chain
pub trait ArgumentResolver: Send + Sync {
	/// Short name used in logs and settings
	fn name(&self) -> &'static str;

	fn supports(&self, context: &ArgumentContext<'_>, parameter: &ParameterDescriptor) -> bool;

	fn resolve(
		&self,
		context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument>;
}

/// Ordered, immutable list of argument resolvers.
///
/// For each parameter the first resolver whose `supports` returns true
/// produces the value. A parameter no resolver claims falls back to its
/// declared default, and without one the chain fails with
/// [`Error::MissingArgument`].
///
/// # Examples
///
/// ```
/// use switchyard_dispatch::arguments::{
///     ArgumentContext, ArgumentResolverChain, DefaultValueResolver, PathParameterResolver,
/// };
/// use switchyard_http::Request;
/// use switchyard_types::{ParameterDescriptor, RouteMetadata};
///
/// let chain = ArgumentResolverChain::builder()
///     .push(PathParameterResolver)
///     .push(DefaultValueResolver)
///     .build();
///
/// let mut request = Request::builder().uri("/users/42").build().unwrap();
/// request.set_attribute("id", "42");
/// let context = ArgumentContext {
///     request: &request,
///     metadata: RouteMetadata::default(),
///     handler: "show",
/// };
///
/// let args = chain
///     .resolve_arguments(&context, &[ParameterDescriptor::scalar("id")])
///     .unwrap();
/// assert_eq!(args.text("id").unwrap(), "42");
/// ```
#[derive(Clone, Default)]
pub struct ArgumentResolverChain {
	resolvers: Arc<[Arc<dyn ArgumentResolver>]>,
}

impl ArgumentResolverChain {
	pub fn builder() -> ArgumentResolverChainBuilder {
		ArgumentResolverChainBuilder::default()
	}

	/// The recommended order: request, path, payload, service, response, default
	pub fn standard(deps: &ResolverDependencies) -> Self {
		Self::builder()
			.push(RequestResolver)
			.push(PathParameterResolver)
			.push(PayloadResolver::new(
				Arc::clone(&deps.hydrator),
				Arc::clone(&deps.validator),
			))
			.push(ServiceResolver::new(Arc::clone(&deps.container)))
			.push(PreparedResponseResolver)
			.push(DefaultValueResolver)
			.build()
	}

	/// Build a chain from built-in resolver names, in the given order
	pub fn from_names<S: AsRef<str>>(names: &[S], deps: &ResolverDependencies) -> Result<Self> {
		let mut builder = Self::builder();
		for name in names {
			builder = match name.as_ref() {
				"request" => builder.push(RequestResolver),
				"path" => builder.push(PathParameterResolver),
				"payload" => builder.push(PayloadResolver::new(
					Arc::clone(&deps.hydrator),
					Arc::clone(&deps.validator),
				)),
				"service" => builder.push(ServiceResolver::new(Arc::clone(&deps.container))),
				"response" => builder.push(PreparedResponseResolver),
				"default" => builder.push(DefaultValueResolver),
				other => {
					return Err(Error::Configuration(format!(
						"unknown argument resolver `{}` (expected one of: {})",
						other,
						ResolverSettings::KNOWN_ARGUMENTS.join(", ")
					)));
				}
			};
		}
		Ok(builder.build())
	}

	pub fn len(&self) -> usize {
		self.resolvers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resolvers.is_empty()
	}

	/// Resolver names, in order
	pub fn names(&self) -> Vec<&'static str> {
		self.resolvers.iter().map(|resolver| resolver.name()).collect()
	}

	/// Resolve every parameter, in declaration order
	pub fn resolve_arguments(
		&self,
		context: &ArgumentContext<'_>,
		parameters: &[ParameterDescriptor],
	) -> Result<Arguments> {
		let mut arguments = Arguments::new();
		for parameter in parameters {
			let argument = self.resolve_one(context, parameter)?;
			arguments.push(parameter.name(), argument);
		}
		Ok(arguments)
	}

	fn resolve_one(
		&self,
		context: &ArgumentContext<'_>,
		parameter: &ParameterDescriptor,
	) -> Result<Argument> {
		if let Some(resolver) = self
			.resolvers
			.iter()
			.find(|resolver| resolver.supports(context, parameter))
		{
			debug!(
				handler = context.handler,
				parameter = parameter.name(),
				resolver = resolver.name(),
				"resolving argument"
			);
			return resolver.resolve(context, parameter);
		}

		if let Some(default) = parameter.default_value() {
			return Ok(Argument::Value(default.clone()));
		}

		error!(
			handler = context.handler,
			parameter = parameter.name(),
			"no resolver supports parameter"
		);
		Err(Error::MissingArgument {
			parameter: parameter.name().to_string(),
			handler: context.handler.to_string(),
		})
	}
}

impl std::fmt::Debug for ArgumentResolverChain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}

/// Collects resolvers before freezing them into a chain
#[derive(Default)]
pub struct ArgumentResolverChainBuilder {
	resolvers: Vec<Arc<dyn ArgumentResolver>>,
}

impl ArgumentResolverChainBuilder {
	pub fn push<R: ArgumentResolver + 'static>(self, resolver: R) -> Self {
		self.push_arc(Arc::new(resolver))
	}

	pub fn push_arc(mut self, resolver: Arc<dyn ArgumentResolver>) -> Self {
		self.resolvers.push(resolver);
		self
	}

	pub fn build(self) -> ArgumentResolverChain {
		ArgumentResolverChain {
			resolvers: self.resolvers.into(),
		}
	}
}
