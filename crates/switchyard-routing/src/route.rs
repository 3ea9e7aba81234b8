use crate::PathTemplate;
use http::Method;
use switchyard_types::{HandlerRef, RouteMetadata};

/// A registered `(method, path template, handler, metadata)` entry
#[derive(Debug, Clone)]
pub struct Route {
	pub method: Method,
	pub template: PathTemplate,
	pub handler: HandlerRef,
	/// Declared metadata; `None` for bare registrations
	pub metadata: Option<RouteMetadata>,
}

impl Route {
	pub fn new(
		method: Method,
		template: PathTemplate,
		handler: HandlerRef,
		metadata: Option<RouteMetadata>,
	) -> Self {
		Self {
			method,
			template,
			handler,
			metadata,
		}
	}

	pub fn path(&self) -> &str {
		self.template.as_str()
	}

	pub fn is_static(&self) -> bool {
		self.template.is_static()
	}

	/// Declared metadata, or `200` with JSON when none was given
	pub fn metadata_or_default(&self) -> RouteMetadata {
		self.metadata.unwrap_or_default()
	}
}
