use crate::{PathParams, Route, RouteRegistry, normalize_path};
use http::Method;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use switchyard_exception::{Error, Result};
use switchyard_types::{HandlerRef, RouteMetadata};
use tracing::debug;

/// Outcome of a successful match, alive for one dispatch
#[derive(Debug, Clone)]
pub struct RouteMatch {
	pub route: Arc<Route>,
	pub params: PathParams,
}

impl RouteMatch {
	pub fn handler(&self) -> &HandlerRef {
		&self.route.handler
	}

	pub fn metadata(&self) -> Option<RouteMetadata> {
		self.route.metadata
	}
}

/// Compiled, read-only view of a [`RouteRegistry`].
///
/// Static routes live in a per-method exact-match map. Dynamic routes keep
/// their registration order and are tried one by one.
#[derive(Debug, Default)]
pub struct RouteMatcher {
	static_routes: HashMap<Method, HashMap<String, Arc<Route>>>,
	dynamic_routes: HashMap<Method, Vec<Arc<Route>>>,
	normalize_trailing_slash: bool,
}

impl RouteMatcher {
	/// Freeze the registry's current contents
	pub fn compile(registry: &RouteRegistry) -> Self {
		let mut matcher = Self {
			normalize_trailing_slash: registry.normalizes_trailing_slash(),
			..Self::default()
		};
		for route in registry.iter() {
			let route = Arc::new(route.clone());
			if route.is_static() {
				matcher
					.static_routes
					.entry(route.method.clone())
					.or_default()
					.insert(route.path().to_string(), route);
			} else {
				matcher
					.dynamic_routes
					.entry(route.method.clone())
					.or_default()
					.push(route);
			}
		}
		matcher
	}

	pub fn static_count(&self) -> usize {
		self.static_routes.values().map(HashMap::len).sum()
	}

	pub fn dynamic_count(&self) -> usize {
		self.dynamic_routes.values().map(Vec::len).sum()
	}

	/// Match `(method, path)` to a route.
	///
	/// Fails with [`Error::MethodNotAllowed`] when the path is served under
	/// other methods only, and with [`Error::RouteNotFound`] otherwise.
	pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch> {
		let path = self.prepare(path);

		if let Some(found) = self.find(method, &path) {
			debug!(
				method = %method,
				path = %path,
				route = %found.route.path(),
				"route matched"
			);
			return Ok(found);
		}

		let allowed = self.allowed_methods(&path);
		if allowed.is_empty() {
			debug!(method = %method, path = %path, "route not found");
			Err(Error::RouteNotFound {
				method: method.to_string(),
				path: path.into_owned(),
			})
		} else {
			debug!(method = %method, path = %path, allowed = ?allowed, "method not allowed");
			Err(Error::MethodNotAllowed {
				method: method.to_string(),
				path: path.into_owned(),
				allowed,
			})
		}
	}

	/// Sorted, de-duplicated methods whose routes match `path`
	pub fn allowed_methods(&self, path: &str) -> Vec<String> {
		let path = self.prepare(path);
		let methods: BTreeSet<String> = self
			.static_routes
			.iter()
			.filter(|(_, by_path)| by_path.contains_key(path.as_ref()))
			.map(|(method, _)| method.to_string())
			.chain(
				self.dynamic_routes
					.iter()
					.filter(|(_, routes)| routes.iter().any(|route| route.template.is_match(&path)))
					.map(|(method, _)| method.to_string()),
			)
			.collect();
		methods.into_iter().collect()
	}

	fn find(&self, method: &Method, path: &str) -> Option<RouteMatch> {
		if let Some(route) = self.static_routes.get(method).and_then(|by_path| by_path.get(path)) {
			return Some(RouteMatch {
				route: Arc::clone(route),
				params: PathParams::new(),
			});
		}
		self.dynamic_routes.get(method)?.iter().find_map(|route| {
			route.template.captures(path).map(|params| RouteMatch {
				route: Arc::clone(route),
				params,
			})
		})
	}

	fn prepare<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
		if self.normalize_trailing_slash {
			normalize_path(path)
		} else {
			std::borrow::Cow::Borrowed(path)
		}
	}
}
