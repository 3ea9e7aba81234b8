//! # Switchyard
//!
//! The request-dispatch core of an HTTP micro-framework: route registration
//! and matching, argument binding, handler invocation and response encoding.
//!
//! ## Core Principles
//!
//! - **Boot, then serve**: routes and resolver chains are configured once;
//!   the compiled route table is read concurrently without locks.
//! - **Typed failures**: routing and binding problems come back as
//!   [`Error`] variants; turning them into wire responses is the adapter's job.
//! - **Explicit handlers**: a handler is a controller method or a plain async
//!   function, with its parameters declared up front.
//!
//! ## Crates
//!
//! - [`exception`]: the error taxonomy
//! - [`http`]: `Request`, `Response` and response encodings
//! - [`di`]: container, hydrator and validator boundaries
//! - [`types`]: handler references, parameters and return values
//! - [`routing`]: the route registry and matcher
//! - [`dispatch`]: resolver chains, the invoker and the dispatcher
//! - [`conf`]: settings and logging setup
//!
//! ## Quick Example
//!
//! ```rust
//! use switchyard::prelude::*;
//! use serde_json::{Value, json};
//!
//! async fn show(args: Arguments) -> Result<Value> {
//!     Ok(json!({"id": args.text("id")?}))
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .add_route(
//!         "GET",
//!         "/users/{id}",
//!         HandlerRef::function("show", show).with_parameters([ParameterDescriptor::scalar("id")]),
//!         None,
//!     )
//!     .unwrap();
//!
//! let request = Request::builder().uri("/users/42").build().unwrap();
//! let response = match dispatcher.dispatch(request).await {
//!     Ok(response) => response,
//!     Err(error) => Response::from(error),
//! };
//! assert_eq!(response.content_type(), Some("application/json"));
//! # });
//! ```

pub use switchyard_conf as conf;
pub use switchyard_di as di;
pub use switchyard_dispatch as dispatch;
pub use switchyard_exception as exception;
pub use switchyard_http as http;
pub use switchyard_routing as routing;
pub use switchyard_types as types;

pub use switchyard_dispatch::{Dispatcher, DispatcherBuilder};
pub use switchyard_exception::{Error, Result};

/// Prelude module for convenient imports
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
	pub use switchyard_conf::{Settings, init_logging};
	pub use switchyard_di::{
		Container, Hydrator, NoopValidator, RuleValidator, SerdeHydrator, ServiceContainer,
		Validate, Validator,
	};
	pub use switchyard_dispatch::{
		ArgumentResolver, ArgumentResolverChain, ControllerInvoker, Dispatcher, DispatcherBuilder,
		ResponseResolver, ResponseResolverChain,
	};
	pub use switchyard_exception::{Error, FieldErrors, Result};
	pub use switchyard_http::{Request, Response, ResponseType};
	pub use switchyard_routing::{RouteRegistry, RouteTable};
	pub use switchyard_types::{
		Arguments, Controller, HandlerRef, ParameterDescriptor, ReturnValue, RouteMetadata,
	};
}
