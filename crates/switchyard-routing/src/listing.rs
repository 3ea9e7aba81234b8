//! Tabular view of registered routes.

use crate::RouteRegistry;
use std::fmt;

/// Whether a route is matched exactly or through its pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
	Static,
	Dynamic,
}

impl fmt::Display for RouteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RouteKind::Static => f.write_str("static"),
			RouteKind::Dynamic => f.write_str("dynamic"),
		}
	}
}

/// One row of a [`RouteTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
	pub method: String,
	pub path: String,
	pub kind: RouteKind,
	pub handler: String,
	pub response_type: String,
	pub status: u16,
}

/// Registered routes sorted by path, then method.
///
/// # Examples
///
/// ```
/// use switchyard_exception::Result;
/// use switchyard_routing::{RouteRegistry, RouteTable};
/// use switchyard_types::{Arguments, HandlerRef};
///
/// async fn ping(_args: Arguments) -> Result<&'static str> {
///     Ok("pong")
/// }
///
/// let mut registry = RouteRegistry::new();
/// registry.add_route("GET", "/ping", HandlerRef::function("ping", ping), None).unwrap();
///
/// let table = RouteTable::from_registry(&registry);
/// let rendered = table.to_string();
/// assert!(rendered.lines().next().unwrap().starts_with("METHOD"));
/// assert!(rendered.contains("/ping"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	rows: Vec<RouteInfo>,
}

const HEADERS: [&str; 6] = ["METHOD", "PATH", "KIND", "HANDLER", "TYPE", "STATUS"];

impl RouteTable {
	pub fn from_registry(registry: &RouteRegistry) -> Self {
		let mut rows: Vec<RouteInfo> = registry
			.iter()
			.map(|route| {
				let metadata = route.metadata_or_default();
				RouteInfo {
					method: route.method.to_string(),
					path: route.path().to_string(),
					kind: if route.is_static() {
						RouteKind::Static
					} else {
						RouteKind::Dynamic
					},
					handler: route.handler.name(),
					response_type: metadata.response_type.to_string(),
					status: metadata.status.as_u16(),
				}
			})
			.collect();
		rows.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
		Self { rows }
	}

	pub fn rows(&self) -> &[RouteInfo] {
		&self.rows
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	fn cells(row: &RouteInfo) -> [String; 6] {
		[
			row.method.clone(),
			row.path.clone(),
			row.kind.to_string(),
			row.handler.clone(),
			row.response_type.clone(),
			row.status.to_string(),
		]
	}
}

impl fmt::Display for RouteTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.rows.is_empty() {
			return writeln!(f, "No routes registered.");
		}

		let cells: Vec<[String; 6]> = self.rows.iter().map(Self::cells).collect();
		let mut widths = HEADERS.map(str::len);
		for row in &cells {
			for (width, cell) in widths.iter_mut().zip(row) {
				*width = (*width).max(cell.chars().count());
			}
		}

		let header = HEADERS.map(str::to_string);
		for row in std::iter::once(&header).chain(cells.iter()) {
			let line = row
				.iter()
				.zip(widths)
				.map(|(cell, width)| format!("{:<width$}", cell, width = width))
				.collect::<Vec<_>>()
				.join("  ");
			writeln!(f, "{}", line.trim_end())?;
		}
		Ok(())
	}
}
