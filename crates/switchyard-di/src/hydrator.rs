//! Mapping decoded payloads onto concrete types.

use crate::ServiceKey;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A hydrated payload, downcast by the handler that declared its type
pub type Payload = Box<dyn Any + Send>;

type Decoder = Arc<dyn Fn(Value) -> Result<Payload, serde_json::Error> + Send + Sync>;

#[derive(Debug, Error)]
pub enum HydrationError {
	/// The hydrator does not know how to build this type
	#[error("no hydration registered for `{0}`")]
	Unregistered(&'static str),

	/// The payload could not be mapped onto the type
	#[error("cannot hydrate `{target}`: {message}")]
	Mismatch {
		target: &'static str,
		message: String,
	},
}

/// Builds an instance of the requested type from decoded JSON
pub trait Hydrator: Send + Sync {
	fn hydrate(&self, key: &ServiceKey, data: Value) -> Result<Payload, HydrationError>;
}

/// Hydrator backed by `serde` deserialization.
///
/// Mapping is loose in the serde sense: unknown input fields are ignored,
/// and types that want missing fields to fall back to their own defaults
/// opt in with `#[serde(default)]`.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use switchyard_di::{Hydrator, SerdeHydrator, ServiceKey};
///
/// #[derive(Deserialize, Default)]
/// #[serde(default)]
/// struct CreateUser {
///     name: String,
///     admin: bool,
/// }
///
/// let hydrator = SerdeHydrator::new().with::<CreateUser>();
/// let payload = hydrator
///     .hydrate(&ServiceKey::of::<CreateUser>(), json!({"name": "ada", "extra": 1}))
///     .unwrap();
/// let user = payload.downcast::<CreateUser>().unwrap();
/// assert_eq!(user.name, "ada");
/// assert!(!user.admin);
/// ```
#[derive(Default, Clone)]
pub struct SerdeHydrator {
	decoders: HashMap<ServiceKey, Decoder>,
}

impl SerdeHydrator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allow hydration of `T`
	pub fn register<T: DeserializeOwned + Send + 'static>(&mut self) {
		let decoder: Decoder =
			Arc::new(|data| serde_json::from_value::<T>(data).map(|value| Box::new(value) as Payload));
		self.decoders.insert(ServiceKey::of::<T>(), decoder);
	}

	pub fn with<T: DeserializeOwned + Send + 'static>(mut self) -> Self {
		self.register::<T>();
		self
	}
}

impl Hydrator for SerdeHydrator {
	fn hydrate(&self, key: &ServiceKey, data: Value) -> Result<Payload, HydrationError> {
		let decoder = self
			.decoders
			.get(key)
			.ok_or(HydrationError::Unregistered(key.name()))?;
		decoder(data).map_err(|e| HydrationError::Mismatch {
			target: key.name(),
			message: e.to_string(),
		})
	}
}

impl std::fmt::Debug for SerdeHydrator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_set().entries(self.decoders.keys()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, Deserialize)]
	struct Order {
		quantity: u32,
	}

	#[rstest]
	fn test_type_mismatch() {
		// Arrange
		let hydrator = SerdeHydrator::new().with::<Order>();

		// Act
		let result = hydrator.hydrate(&ServiceKey::of::<Order>(), json!({"quantity": "many"}));

		// Assert
		assert!(matches!(result, Err(HydrationError::Mismatch { .. })));
	}

	#[rstest]
	fn test_unregistered_type() {
		let hydrator = SerdeHydrator::new();

		let result = hydrator.hydrate(&ServiceKey::of::<Order>(), json!({}));

		assert!(matches!(result, Err(HydrationError::Unregistered(_))));
	}

	#[rstest]
	fn test_hydrates_registered_type() {
		let hydrator = SerdeHydrator::new().with::<Order>();

		let payload = hydrator
			.hydrate(&ServiceKey::of::<Order>(), json!({"quantity": 3}))
			.unwrap();

		assert_eq!(payload.downcast::<Order>().unwrap().quantity, 3);
	}
}
