//! Handler references.
//!
//! A route points at either a method on a controller or a plain async
//! function. Controllers are looked up in the container by type when a
//! request arrives; the type-erased [`ControllerBinding`] recovers the
//! concrete controller from the container's `Any` service.

use crate::{Arguments, ParameterDescriptor, ReturnValue};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use switchyard_di::{Service, ServiceKey};
use switchyard_exception::Result;

/// An object whose methods are route handlers.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::json;
/// use switchyard_exception::{Error, Result};
/// use switchyard_types::{Arguments, Controller, ReturnValue};
///
/// struct UserController;
///
/// #[async_trait]
/// impl Controller for UserController {
///     async fn call(&self, method: &str, args: Arguments) -> Result<ReturnValue> {
///         match method {
///             "show" => Ok(json!({"id": args.text("id")?}).into()),
///             other => Err(Error::Server(format!("unknown method `{}`", other))),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Controller: Send + Sync + 'static {
	async fn call(&self, method: &str, args: Arguments) -> Result<ReturnValue>;
}

/// A plain async handler function
#[async_trait]
pub trait HandlerFn: Send + Sync {
	async fn call(&self, args: Arguments) -> Result<ReturnValue>;
}

#[async_trait]
impl<F, Fut, R> HandlerFn for F
where
	F: Fn(Arguments) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<R>> + Send + 'static,
	R: Into<ReturnValue> + Send + 'static,
{
	async fn call(&self, args: Arguments) -> Result<ReturnValue> {
		(self)(args).await.map(Into::into)
	}
}

/// Recovers a concrete controller from a container service
pub trait ControllerBinding: Send + Sync {
	/// Downcast a service obtained from the container
	fn bind(&self, service: Service) -> Option<Arc<dyn Controller>>;

	/// Build the controller without the container, when it allows that
	fn construct(&self) -> Option<Arc<dyn Controller>>;
}

struct TypedBinding<C> {
	constructor: Option<fn() -> C>,
}

impl<C: Controller> ControllerBinding for TypedBinding<C> {
	fn bind(&self, service: Service) -> Option<Arc<dyn Controller>> {
		service
			.downcast::<C>()
			.ok()
			.map(|controller| controller as Arc<dyn Controller>)
	}

	fn construct(&self) -> Option<Arc<dyn Controller>> {
		self.constructor
			.map(|constructor| Arc::new(constructor()) as Arc<dyn Controller>)
	}
}

/// A method on a controller type
#[derive(Clone)]
pub struct BoundMethod {
	owner: ServiceKey,
	method: String,
	binding: Arc<dyn ControllerBinding>,
	parameters: Arc<[ParameterDescriptor]>,
}

impl BoundMethod {
	pub fn owner(&self) -> ServiceKey {
		self.owner
	}

	pub fn method(&self) -> &str {
		&self.method
	}

	pub fn binding(&self) -> &dyn ControllerBinding {
		self.binding.as_ref()
	}
}

/// A plain async function
#[derive(Clone)]
pub struct FunctionHandler {
	name: String,
	callable: Arc<dyn HandlerFn>,
	parameters: Arc<[ParameterDescriptor]>,
}

impl FunctionHandler {
	pub fn callable(&self) -> &dyn HandlerFn {
		self.callable.as_ref()
	}
}

/// What a route invokes.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use switchyard_exception::Result;
/// use switchyard_types::{Arguments, HandlerRef, ParameterDescriptor};
///
/// async fn ping(_args: Arguments) -> Result<&'static str> {
///     Ok("pong")
/// }
///
/// async fn show(args: Arguments) -> Result<Value> {
///     Ok(json!({"id": args.text("id")?}))
/// }
///
/// let handler = HandlerRef::function("ping", ping);
/// assert_eq!(handler.name(), "ping");
///
/// let show = HandlerRef::function("show", show).with_parameters([ParameterDescriptor::scalar("id")]);
/// assert_eq!(show.parameters().len(), 1);
/// ```
#[derive(Clone)]
pub enum HandlerRef {
	BoundMethod(BoundMethod),
	Function(FunctionHandler),
}

impl HandlerRef {
	/// A method on `C`, which must be registered in the container
	pub fn method<C: Controller>(method: impl Into<String>) -> Self {
		Self::bound::<C>(method.into(), None)
	}

	/// A method on `C`, built with `C::default()` when the container lacks it
	pub fn method_or_default<C: Controller + Default>(method: impl Into<String>) -> Self {
		Self::bound::<C>(method.into(), Some(C::default))
	}

	fn bound<C: Controller>(method: String, constructor: Option<fn() -> C>) -> Self {
		HandlerRef::BoundMethod(BoundMethod {
			owner: ServiceKey::of::<C>(),
			method,
			binding: Arc::new(TypedBinding { constructor }),
			parameters: Arc::from(Vec::new()),
		})
	}

	/// A plain async function
	pub fn function<F: HandlerFn + 'static>(name: impl Into<String>, callable: F) -> Self {
		HandlerRef::Function(FunctionHandler {
			name: name.into(),
			callable: Arc::new(callable),
			parameters: Arc::from(Vec::new()),
		})
	}

	/// Declare the handler's parameters, in call order
	pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
		let parameters: Arc<[ParameterDescriptor]> = parameters.into_iter().collect();
		match &mut self {
			HandlerRef::BoundMethod(bound) => bound.parameters = parameters,
			HandlerRef::Function(function) => function.parameters = parameters,
		}
		self
	}

	pub fn parameters(&self) -> &[ParameterDescriptor] {
		match self {
			HandlerRef::BoundMethod(bound) => &bound.parameters,
			HandlerRef::Function(function) => &function.parameters,
		}
	}

	/// Name used in diagnostics and route listings
	pub fn name(&self) -> String {
		match self {
			HandlerRef::BoundMethod(bound) => {
				format!("{}::{}", bound.owner.short_name(), bound.method)
			}
			HandlerRef::Function(function) => function.name.clone(),
		}
	}
}

impl fmt::Debug for HandlerRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let variant = match self {
			HandlerRef::BoundMethod(_) => "BoundMethod",
			HandlerRef::Function(_) => "Function",
		};
		f.debug_struct(variant)
			.field("name", &self.name())
			.field("parameters", &self.parameters())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Argument;
	use rstest::rstest;
	use serde_json::json;
	use switchyard_exception::Error;

	#[derive(Default)]
	struct Greeter {
		greeting: String,
	}

	#[async_trait]
	impl Controller for Greeter {
		async fn call(&self, method: &str, args: Arguments) -> Result<ReturnValue> {
			match method {
				"greet" => Ok(format!("{}, {}", self.greeting, args.text("name")?).into()),
				other => Err(Error::Server(format!("no method {}", other))),
			}
		}
	}

	#[rstest]
	fn test_bound_method_name() {
		let handler = HandlerRef::method::<Greeter>("greet");

		assert_eq!(handler.name(), "Greeter::greet");
	}

	#[rstest]
	fn test_method_without_default_cannot_construct() {
		let HandlerRef::BoundMethod(bound) = HandlerRef::method::<Greeter>("greet") else {
			panic!("expected a bound method");
		};

		assert!(bound.binding().construct().is_none());
	}

	#[tokio::test]
	async fn test_binding_downcasts_container_service() {
		// Arrange
		let HandlerRef::BoundMethod(bound) = HandlerRef::method::<Greeter>("greet") else {
			panic!("expected a bound method");
		};
		let service: Service = Arc::new(Greeter {
			greeting: "Hello".into(),
		});
		let mut args = Arguments::new();
		args.push("name", Argument::Text("ada".into()));

		// Act
		let controller = bound.binding().bind(service).unwrap();
		let result = controller.call(bound.method(), args).await.unwrap();

		// Assert
		assert_eq!(result.as_value(), Some(&json!("Hello, ada")));
	}

	#[rstest]
	fn test_binding_rejects_other_types() {
		let HandlerRef::BoundMethod(bound) = HandlerRef::method_or_default::<Greeter>("greet") else {
			panic!("expected a bound method");
		};
		let service: Service = Arc::new(5u8);

		assert!(bound.binding().bind(service).is_none());
		assert!(bound.binding().construct().is_some());
	}

	#[tokio::test]
	async fn test_function_handler_converts_return() {
		let handler = HandlerRef::function("flag", |_args: Arguments| async { Ok::<_, Error>(true) });
		let HandlerRef::Function(function) = handler else {
			panic!("expected a function");
		};

		let result = function.callable().call(Arguments::new()).await.unwrap();

		assert_eq!(result.as_value(), Some(&json!(true)));
	}
}
