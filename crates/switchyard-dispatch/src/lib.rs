//! # Switchyard Dispatch
//!
//! Turns a request into a response for a registered route.
//!
//! ## Architecture
//!
//! ```text
//! Request → RouteMatcher → ControllerInvoker → ArgumentResolverChain → handler
//!                                                                         ↓
//!                                    Response ← ResponseResolverChain ← return value
//! ```
//!
//! Routes are added during boot. The first [`Dispatcher::dispatch`] call
//! compiles them into a matcher that is shared by every later request
//! without locking. Errors are returned as typed [`Error`] values; mapping
//! them onto the wire is the caller's job (see
//! `Response::from(Error)` in `switchyard-http`).
//!
//! ## Examples
//!
//! ```rust
//! use serde_json::{Value, json};
//! use switchyard_dispatch::Dispatcher;
//! use switchyard_exception::Result;
//! use switchyard_http::Request;
//! use switchyard_types::{Arguments, HandlerRef, ParameterDescriptor};
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
//! let response = dispatcher.dispatch(request).await.unwrap();
//! assert_eq!(response.body_bytes().unwrap().as_ref(), br#"{"id":"42"}"#);
//! # });
//! ```

pub mod arguments;
pub mod dispatcher;
pub mod invoker;
pub mod responses;

pub use arguments::{ArgumentContext, ArgumentResolver, ArgumentResolverChain};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherState};
pub use invoker::ControllerInvoker;
pub use responses::{ResponseResolver, ResponseResolverChain};
pub use switchyard_exception::{Error, Result};

use std::sync::Arc;
use switchyard_di::{Container, Hydrator, NoopValidator, SerdeHydrator, ServiceContainer, Validator};

/// Collaborators shared by the built-in argument resolvers
#[derive(Clone)]
pub struct ResolverDependencies {
	pub container: Arc<dyn Container>,
	pub hydrator: Arc<dyn Hydrator>,
	pub validator: Arc<dyn Validator>,
}

impl Default for ResolverDependencies {
	fn default() -> Self {
		Self {
			container: Arc::new(ServiceContainer::new()),
			hydrator: Arc::new(SerdeHydrator::new()),
			validator: Arc::new(NoopValidator),
		}
	}
}

impl std::fmt::Debug for ResolverDependencies {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolverDependencies").finish_non_exhaustive()
	}
}
