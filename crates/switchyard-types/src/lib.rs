//! # Switchyard Types
//!
//! Types shared between route registration and handler invocation:
//!
//! - [`HandlerRef`]: what a route invokes, either a method on a controller
//!   resolved through the container or a plain async function.
//! - [`ParameterDescriptor`]: what a handler declares it needs, computed once
//!   when the handler reference is built.
//! - [`Arguments`]: the resolved values handed to the handler.
//! - [`ReturnValue`]: what the handler hands back for encoding.
//! - [`RouteMetadata`]: status and encoding hints attached to a route.

pub mod argument;
pub mod handler;
pub mod metadata;
pub mod parameter;
pub mod return_value;

pub use argument::{Argument, Arguments};
pub use handler::{BoundMethod, Controller, ControllerBinding, FunctionHandler, HandlerFn, HandlerRef};
pub use metadata::RouteMetadata;
pub use parameter::{BindingSource, DeclaredKind, ParameterDescriptor};
pub use return_value::ReturnValue;
