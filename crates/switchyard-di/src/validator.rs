//! Validation of hydrated payloads.

use crate::ServiceKey;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use switchyard_exception::FieldErrors;

type Rule = Arc<dyn Fn(&(dyn Any + Send)) -> FieldErrors + Send + Sync>;

/// Reports violations for a hydrated value; an empty map means valid
pub trait Validator: Send + Sync {
	fn validate(&self, key: &ServiceKey, value: &(dyn Any + Send)) -> FieldErrors;
}

/// Accepts everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopValidator;

impl Validator for NoopValidator {
	fn validate(&self, _key: &ServiceKey, _value: &(dyn Any + Send)) -> FieldErrors {
		FieldErrors::new()
	}
}

/// Self-validation implemented by payload types
pub trait Validate {
	fn validate(&self) -> FieldErrors;
}

/// Validator that dispatches to per-type rules.
///
/// Types without a rule are considered valid.
///
/// # Examples
///
/// ```
/// use switchyard_di::{RuleValidator, ServiceKey, Validator};
/// use switchyard_exception::FieldErrors;
///
/// struct Signup { email: String }
///
/// let validator = RuleValidator::new().with_rule(|signup: &Signup| {
///     let mut errors = FieldErrors::new();
///     if !signup.email.contains('@') {
///         errors.entry("email".into()).or_default().push("must be an email address".into());
///     }
///     errors
/// });
///
/// let bad = Signup { email: "nope".into() };
/// let errors = validator.validate(&ServiceKey::of::<Signup>(), &bad);
/// assert_eq!(errors["email"], vec!["must be an email address".to_string()]);
/// ```
#[derive(Default, Clone)]
pub struct RuleValidator {
	rules: HashMap<ServiceKey, Rule>,
}

impl RuleValidator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Validate `T` through its [`Validate`] implementation
	pub fn register<T: Validate + 'static>(&mut self) {
		self.register_rule(|value: &T| value.validate());
	}

	/// Validate `T` with a closure
	pub fn register_rule<T, F>(&mut self, rule: F)
	where
		T: 'static,
		F: Fn(&T) -> FieldErrors + Send + Sync + 'static,
	{
		let rule: Rule = Arc::new(move |value: &(dyn Any + Send)| match value.downcast_ref::<T>() {
			Some(typed) => rule(typed),
			None => FieldErrors::new(),
		});
		self.rules.insert(ServiceKey::of::<T>(), rule);
	}

	pub fn with<T: Validate + 'static>(mut self) -> Self {
		self.register::<T>();
		self
	}

	pub fn with_rule<T, F>(mut self, rule: F) -> Self
	where
		T: 'static,
		F: Fn(&T) -> FieldErrors + Send + Sync + 'static,
	{
		self.register_rule(rule);
		self
	}
}

impl Validator for RuleValidator {
	fn validate(&self, key: &ServiceKey, value: &(dyn Any + Send)) -> FieldErrors {
		self.rules
			.get(key)
			.map(|rule| rule(value))
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Comment {
		body: String,
	}

	impl Validate for Comment {
		fn validate(&self) -> FieldErrors {
			let mut errors = FieldErrors::new();
			if self.body.trim().is_empty() {
				errors.insert("body".into(), vec!["must not be blank".into()]);
			}
			errors
		}
	}

	#[rstest]
	fn test_registered_type_is_checked() {
		// Arrange
		let validator = RuleValidator::new().with::<Comment>();
		let comment = Comment { body: "  ".into() };

		// Act
		let errors = validator.validate(&ServiceKey::of::<Comment>(), &comment);

		// Assert
		assert_eq!(errors.len(), 1);
		assert!(errors.contains_key("body"));
	}

	#[rstest]
	fn test_valid_value_has_no_errors() {
		let validator = RuleValidator::new().with::<Comment>();
		let comment = Comment { body: "hi".into() };

		assert!(validator.validate(&ServiceKey::of::<Comment>(), &comment).is_empty());
	}

	#[rstest]
	fn test_unregistered_type_is_valid() {
		let validator = RuleValidator::new();

		assert!(validator.validate(&ServiceKey::of::<u8>(), &7u8).is_empty());
		assert!(NoopValidator.validate(&ServiceKey::of::<u8>(), &7u8).is_empty());
	}
}
