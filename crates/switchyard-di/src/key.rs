use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a type as seen by the container, hydrator and validator.
///
/// Equality and hashing use only the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct ServiceKey {
	id: TypeId,
	name: &'static str,
}

impl ServiceKey {
	/// Key for the type `T`
	///
	/// # Examples
	///
	/// ```
	/// use switchyard_di::ServiceKey;
	///
	/// assert_eq!(ServiceKey::of::<String>(), ServiceKey::of::<String>());
	/// assert_ne!(ServiceKey::of::<String>(), ServiceKey::of::<u8>());
	/// assert_eq!(ServiceKey::of::<String>().short_name(), "String");
	/// ```
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Fully qualified type name
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type name without its module path
	pub fn short_name(&self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		match base.rfind("::") {
			Some(index) => &self.name[index + 2..],
			None => self.name,
		}
	}
}

impl PartialEq for ServiceKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ServiceKey({})", self.name)
	}
}

impl fmt::Display for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	mod billing {
		pub struct Invoice;
	}

	#[rstest]
	fn test_short_name_strips_module_path() {
		let key = ServiceKey::of::<billing::Invoice>();

		assert_eq!(key.short_name(), "Invoice");
		assert!(key.name().ends_with("billing::Invoice"));
	}

	#[rstest]
	fn test_short_name_keeps_generics() {
		let key = ServiceKey::of::<Vec<String>>();

		assert_eq!(key.short_name(), "Vec<alloc::string::String>");
	}
}
