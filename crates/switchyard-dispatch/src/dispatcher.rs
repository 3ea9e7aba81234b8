//! The dispatcher façade.

use crate::arguments::ArgumentResolverChain;
use crate::invoker::ControllerInvoker;
use crate::responses::ResponseResolverChain;
use crate::ResolverDependencies;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use switchyard_conf::Settings;
use switchyard_di::{Container, Hydrator, Validator};
use switchyard_exception::{Error, Result};
use switchyard_http::{Request, Response};
use switchyard_routing::{RouteMatcher, RouteRegistry, RouteTable};
use switchyard_types::{HandlerRef, RouteMetadata};
use tracing::{debug, error, info};

/// Lifecycle of a [`Dispatcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
	/// Routes and resolver chains may still change
	Accepting,
	/// The route table is frozen; registration fails with a configuration error
	Compiled,
}

/// Matches requests to routes and runs their handlers.
///
/// Registration takes `&mut self` and happens during boot. The first
/// [`dispatch`](Self::dispatch) (or an explicit [`compile`](Self::compile))
/// freezes the routes into a [`RouteMatcher`]; after that the dispatcher is
/// read-only and can be shared behind an `Arc` across request tasks.
///
/// # Examples
///
/// ```
/// use switchyard_dispatch::{Dispatcher, DispatcherState};
/// use switchyard_exception::{Error, Result};
/// use switchyard_types::{Arguments, HandlerRef};
///
/// async fn ping(_args: Arguments) -> Result<&'static str> {
///     Ok("pong")
/// }
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.add_route("GET", "/ping", HandlerRef::function("ping", ping), None).unwrap();
/// dispatcher.compile();
/// assert_eq!(dispatcher.state(), DispatcherState::Compiled);
///
/// let err = dispatcher
///     .add_route("GET", "/late", HandlerRef::function("ping", ping), None)
///     .unwrap_err();
/// assert!(matches!(err, Error::Configuration(_)));
/// ```
pub struct Dispatcher {
	registry: RouteRegistry,
	matcher: OnceCell<RouteMatcher>,
	invoker: ControllerInvoker,
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::new()
	}
}

impl Dispatcher {
	/// A dispatcher with an empty container and the standard resolver chains
	pub fn new() -> Self {
		let deps = ResolverDependencies::default();
		Self::from_parts(
			RouteRegistry::new(),
			ControllerInvoker::new(
				Arc::clone(&deps.container),
				ArgumentResolverChain::standard(&deps),
				ResponseResolverChain::standard(),
			),
		)
	}

	pub fn builder() -> DispatcherBuilder {
		DispatcherBuilder::default()
	}

	fn from_parts(registry: RouteRegistry, invoker: ControllerInvoker) -> Self {
		Self {
			registry,
			matcher: OnceCell::new(),
			invoker,
		}
	}

	/// Register a route; see [`RouteRegistry::add_route`]
	pub fn add_route(
		&mut self,
		method: &str,
		path: &str,
		handler: HandlerRef,
		metadata: Option<RouteMetadata>,
	) -> Result<()> {
		self.ensure_accepting("add route")?;
		self.registry.add_route(method, path, handler, metadata)
	}

	/// Replace the argument resolver chain
	pub fn set_argument_resolver_chain(&mut self, chain: ArgumentResolverChain) -> Result<()> {
		self.ensure_accepting("replace the argument resolver chain")?;
		self.invoker.set_arguments(chain);
		Ok(())
	}

	/// Replace the response resolver chain
	pub fn set_response_resolver_chain(&mut self, chain: ResponseResolverChain) -> Result<()> {
		self.ensure_accepting("replace the response resolver chain")?;
		self.invoker.set_responses(chain);
		Ok(())
	}

	fn ensure_accepting(&self, action: &str) -> Result<()> {
		match self.state() {
			DispatcherState::Accepting => Ok(()),
			DispatcherState::Compiled => Err(Error::Configuration(format!(
				"cannot {} after the route table has been compiled",
				action
			))),
		}
	}

	/// Freeze the registered routes. Idempotent.
	pub fn compile(&self) -> &RouteMatcher {
		self.matcher.get_or_init(|| {
			let matcher = RouteMatcher::compile(&self.registry);
			info!(
				static_routes = matcher.static_count(),
				dynamic_routes = matcher.dynamic_count(),
				"route table compiled"
			);
			matcher
		})
	}

	pub fn is_compiled(&self) -> bool {
		self.matcher.get().is_some()
	}

	pub fn state(&self) -> DispatcherState {
		if self.is_compiled() {
			DispatcherState::Compiled
		} else {
			DispatcherState::Accepting
		}
	}

	pub fn registry(&self) -> &RouteRegistry {
		&self.registry
	}

	pub fn invoker(&self) -> &ControllerInvoker {
		&self.invoker
	}

	/// Snapshot of the registered routes for listing
	pub fn route_table(&self) -> RouteTable {
		RouteTable::from_registry(&self.registry)
	}

	/// Dispatch `request` to its route.
	///
	/// Errors are returned as-is for the caller to map onto the wire:
	/// routing failures as [`Error::RouteNotFound`] /
	/// [`Error::MethodNotAllowed`], binding failures as
	/// [`Error::BadRequest`] / [`Error::Validation`], defects as 500-class
	/// errors.
	pub async fn dispatch(&self, request: Request) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();

		let result = match self.compile().match_route(&method, &path) {
			Ok(found) => {
				self.invoker
					.invoke(found.handler(), found.metadata(), &found.params, request)
					.await
			}
			Err(e) => Err(e),
		};

		if let Err(e) = &result {
			if e.status_code() >= 500 {
				error!(method = %method, path = %path, error = %e, "dispatch failed");
			} else {
				debug!(
					method = %method,
					path = %path,
					status = e.status_code(),
					error = %e,
					"dispatch rejected request"
				);
			}
		}
		result
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("routes", &self.registry.len())
			.field("state", &self.state())
			.field("invoker", &self.invoker)
			.finish()
	}
}

/// Assembles a [`Dispatcher`] from its collaborators.
///
/// Without explicit chains the builder uses the resolver names from
/// [`Settings`] (the recommended order by default).
///
/// # Examples
///
/// ```
/// use switchyard_conf::Settings;
/// use switchyard_di::{SerdeHydrator, ServiceContainer};
/// use switchyard_dispatch::Dispatcher;
///
/// #[derive(serde::Deserialize)]
/// struct NewUser {
///     name: String,
/// }
///
/// let settings = Settings::from_toml_str(
///     r#"
///     [resolvers]
///     responses = ["passthrough", "raw"]
///     "#,
/// )
/// .unwrap();
///
/// let dispatcher = Dispatcher::builder()
///     .container(ServiceContainer::new())
///     .hydrator(SerdeHydrator::new().with::<NewUser>())
///     .settings(&settings)
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.invoker().responses().names(), vec!["passthrough", "raw"]);
/// ```
#[derive(Default)]
pub struct DispatcherBuilder {
	deps: ResolverDependencies,
	settings: Settings,
	arguments: Option<ArgumentResolverChain>,
	responses: Option<ResponseResolverChain>,
}

impl DispatcherBuilder {
	pub fn container<C: Container + 'static>(self, container: C) -> Self {
		self.container_arc(Arc::new(container))
	}

	pub fn container_arc(mut self, container: Arc<dyn Container>) -> Self {
		self.deps.container = container;
		self
	}

	pub fn hydrator<H: Hydrator + 'static>(mut self, hydrator: H) -> Self {
		self.deps.hydrator = Arc::new(hydrator);
		self
	}

	pub fn validator<V: Validator + 'static>(mut self, validator: V) -> Self {
		self.deps.validator = Arc::new(validator);
		self
	}

	pub fn settings(mut self, settings: &Settings) -> Self {
		self.settings = settings.clone();
		self
	}

	/// Use `chain` instead of building one from settings
	pub fn argument_chain(mut self, chain: ArgumentResolverChain) -> Self {
		self.arguments = Some(chain);
		self
	}

	/// Use `chain` instead of building one from settings
	pub fn response_chain(mut self, chain: ResponseResolverChain) -> Self {
		self.responses = Some(chain);
		self
	}

	pub fn build(self) -> Result<Dispatcher> {
		self.settings.validate()?;

		let arguments = match self.arguments {
			Some(chain) => chain,
			None => ArgumentResolverChain::from_names(&self.settings.resolvers.arguments, &self.deps)?,
		};
		let responses = match self.responses {
			Some(chain) => chain,
			None => ResponseResolverChain::from_names(&self.settings.resolvers.responses)?,
		};

		let registry = RouteRegistry::new()
			.with_trailing_slash_normalization(self.settings.router.normalize_trailing_slash);
		let invoker = ControllerInvoker::new(self.deps.container, arguments, responses);

		debug!(
			arguments = ?invoker.arguments(),
			responses = ?invoker.responses(),
			"dispatcher built"
		);
		Ok(Dispatcher::from_parts(registry, invoker))
	}
}
