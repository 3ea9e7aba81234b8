use crate::{PathTemplate, Route, normalize_path};
use http::Method;
use indexmap::IndexMap;
use indexmap::map::Entry;
use switchyard_exception::{Error, Result};
use switchyard_types::{HandlerRef, RouteMetadata};
use tracing::debug;

/// Append-only table of routes, grouped by method in registration order.
///
/// Registration happens during boot from a single thread. The registry is
/// then compiled into a [`RouteMatcher`](crate::RouteMatcher).
///
/// # Examples
///
/// ```
/// use switchyard_exception::{Error, Result};
/// use switchyard_routing::RouteRegistry;
/// use switchyard_types::{Arguments, HandlerRef};
///
/// async fn list(_args: Arguments) -> Result<()> {
///     Ok(())
/// }
///
/// let mut registry = RouteRegistry::new();
/// registry.add_route("get", "/users/", HandlerRef::function("list", list), None).unwrap();
///
/// let err = registry
///     .add_route("GET", "/users", HandlerRef::function("other", list), None)
///     .unwrap_err();
/// assert!(matches!(err, Error::DuplicateRoute { .. }));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RouteRegistry {
	routes: IndexMap<Method, IndexMap<String, Route>>,
	normalize_trailing_slash: bool,
}

impl Default for RouteRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl RouteRegistry {
	pub fn new() -> Self {
		Self {
			routes: IndexMap::new(),
			normalize_trailing_slash: true,
		}
	}

	/// Toggle trailing-slash normalization of registered templates
	pub fn with_trailing_slash_normalization(mut self, enabled: bool) -> Self {
		self.normalize_trailing_slash = enabled;
		self
	}

	pub fn normalizes_trailing_slash(&self) -> bool {
		self.normalize_trailing_slash
	}

	/// Register a route.
	///
	/// The method is uppercased. A second registration of the same method
	/// and path fails with [`Error::DuplicateRoute`] and leaves the first in
	/// place.
	pub fn add_route(
		&mut self,
		method: &str,
		path: &str,
		handler: HandlerRef,
		metadata: Option<RouteMetadata>,
	) -> Result<()> {
		let method = parse_method(method)?;
		let path = if self.normalize_trailing_slash {
			normalize_path(path).into_owned()
		} else {
			path.to_string()
		};
		let template = PathTemplate::parse(&path)?;

		let by_method = self.routes.entry(method.clone()).or_default();
		match by_method.entry(path) {
			Entry::Occupied(entry) => Err(Error::DuplicateRoute {
				method: method.to_string(),
				path: entry.key().clone(),
			}),
			Entry::Vacant(entry) => {
				debug!(
					method = %method,
					path = %entry.key(),
					handler = %handler.name(),
					"route registered"
				);
				entry.insert(Route::new(method, template, handler, metadata));
				Ok(())
			}
		}
	}

	/// Routes grouped by method
	pub fn routes(&self) -> &IndexMap<Method, IndexMap<String, Route>> {
		&self.routes
	}

	/// All routes, method groups in first-registration order
	pub fn iter(&self) -> impl Iterator<Item = &Route> {
		self.routes.values().flat_map(|by_path| by_path.values())
	}

	pub fn get(&self, method: &Method, path: &str) -> Option<&Route> {
		self.routes.get(method)?.get(path)
	}

	pub fn len(&self) -> usize {
		self.routes.values().map(IndexMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn parse_method(method: &str) -> Result<Method> {
	let upper = method.trim().to_ascii_uppercase();
	if upper.is_empty() {
		return Err(Error::Configuration("route method must not be empty".to_string()));
	}
	Method::from_bytes(upper.as_bytes())
		.map_err(|_| Error::Configuration(format!("invalid route method `{}`", method)))
}
