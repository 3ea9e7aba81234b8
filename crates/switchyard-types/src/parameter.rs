use serde_json::Value;
use switchyard_di::ServiceKey;

/// The semantic kind of a declared handler parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
	/// The incoming request itself
	Request,
	/// A response pre-seeded from route metadata
	Response,
	/// A plain string value, typically a path parameter
	Scalar,
	/// A concrete type: a container service or a hydrated payload
	Type(ServiceKey),
}

/// Where a parameter's value is expected to come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingSource {
	/// Let the resolver chain decide
	#[default]
	Auto,
	/// Decode and hydrate the request body
	Body,
}

/// Description of one handler parameter.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use switchyard_types::{DeclaredKind, ParameterDescriptor};
///
/// struct CreateUser;
///
/// let page = ParameterDescriptor::scalar("page").with_default(json!("1"));
/// assert!(page.has_default());
/// assert_eq!(page.kind(), DeclaredKind::Scalar);
///
/// let body = ParameterDescriptor::payload::<CreateUser>("input");
/// assert!(body.binds_body());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
	name: String,
	kind: DeclaredKind,
	source: BindingSource,
	default: Option<Value>,
}

impl ParameterDescriptor {
	pub fn new(name: impl Into<String>, kind: DeclaredKind) -> Self {
		Self {
			name: name.into(),
			kind,
			source: BindingSource::Auto,
			default: None,
		}
	}

	pub fn request(name: impl Into<String>) -> Self {
		Self::new(name, DeclaredKind::Request)
	}

	pub fn response(name: impl Into<String>) -> Self {
		Self::new(name, DeclaredKind::Response)
	}

	pub fn scalar(name: impl Into<String>) -> Self {
		Self::new(name, DeclaredKind::Scalar)
	}

	/// A parameter resolved from the container by type
	pub fn service<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
		Self::new(name, DeclaredKind::Type(ServiceKey::of::<T>()))
	}

	/// A parameter hydrated from the request body
	pub fn payload<T: 'static>(name: impl Into<String>) -> Self {
		Self::new(name, DeclaredKind::Type(ServiceKey::of::<T>())).with_source(BindingSource::Body)
	}

	pub fn with_source(mut self, source: BindingSource) -> Self {
		self.source = source;
		self
	}

	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> DeclaredKind {
		self.kind
	}

	pub fn source(&self) -> BindingSource {
		self.source
	}

	pub fn binds_body(&self) -> bool {
		self.source == BindingSource::Body
	}

	/// The container key for a typed parameter
	pub fn type_key(&self) -> Option<ServiceKey> {
		match self.kind {
			DeclaredKind::Type(key) => Some(key),
			_ => None,
		}
	}

	pub fn has_default(&self) -> bool {
		self.default.is_some()
	}

	pub fn default_value(&self) -> Option<&Value> {
		self.default.as_ref()
	}
}
