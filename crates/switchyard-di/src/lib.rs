//! # Switchyard DI
//!
//! The collaborators the dispatcher consumes but does not own:
//!
//! - [`Container`]: looks up services by type so handlers and bound
//!   controllers can be resolved.
//! - [`Hydrator`]: maps a decoded JSON payload onto a concrete type.
//! - [`Validator`]: reports per-field violations for a hydrated payload.
//!
//! Each trait ships with a small in-memory implementation that is good
//! enough for applications that wire their services by hand.
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use switchyard_di::{Container, ServiceContainer, ServiceKey};
//!
//! struct Mailer;
//!
//! let container = ServiceContainer::new().with(Mailer);
//! assert!(container.has(&ServiceKey::of::<Mailer>()));
//! let mailer: Option<Arc<Mailer>> = container.resolve::<Mailer>();
//! assert!(mailer.is_some());
//! ```

pub mod container;
pub mod hydrator;
pub mod key;
pub mod validator;

pub use container::{Container, Service, ServiceContainer};
pub use hydrator::{HydrationError, Hydrator, Payload, SerdeHydrator};
pub use key::ServiceKey;
pub use validator::{NoopValidator, RuleValidator, Validate, Validator};
