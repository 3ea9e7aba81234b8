//! # Switchyard Routing
//!
//! Route registration and matching.
//!
//! Routes are collected in a [`RouteRegistry`] during boot. Once
//! registration is over the registry is compiled into a [`RouteMatcher`],
//! which is immutable and can be shared across threads without locking.
//!
//! ## Matching
//!
//! - Static templates (no `{placeholder}`) are looked up exactly, per method.
//! - Dynamic templates are tried in registration order; the first match wins.
//!   There is no specificity ranking, so `/a/{x}` registered before
//!   `/a/{y}` shadows it.
//! - When nothing matches for the requested method, the path is checked
//!   against every other method. A hit there yields
//!   [`Error::MethodNotAllowed`](switchyard_exception::Error::MethodNotAllowed),
//!   otherwise the outcome is
//!   [`Error::RouteNotFound`](switchyard_exception::Error::RouteNotFound).
//!
//! ## Examples
//!
//! ```
//! use http::Method;
//! use switchyard_exception::Result;
//! use switchyard_routing::{RouteMatcher, RouteRegistry};
//! use switchyard_types::{Arguments, HandlerRef};
//!
//! async fn show(_args: Arguments) -> Result<()> {
//!     Ok(())
//! }
//!
//! let mut registry = RouteRegistry::new();
//! registry.add_route("get", "/users/{id}", HandlerRef::function("show", show), None).unwrap();
//!
//! let matcher = RouteMatcher::compile(&registry);
//! let matched = matcher.match_route(&Method::GET, "/users/42").unwrap();
//! assert_eq!(matched.params["id"], "42");
//!
//! let err = matcher.match_route(&Method::DELETE, "/users/42").unwrap_err();
//! assert_eq!(err.status_code(), 405);
//! ```

pub mod listing;
pub mod matcher;
pub mod registry;
pub mod route;
pub mod template;

pub use listing::{RouteInfo, RouteKind, RouteTable};
pub use matcher::{RouteMatch, RouteMatcher};
pub use registry::RouteRegistry;
pub use route::Route;
pub use template::{PathParams, PathTemplate, normalize_path};
