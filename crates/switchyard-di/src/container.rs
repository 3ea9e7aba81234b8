//! Service lookup by type.

use crate::ServiceKey;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resolved service instance
pub type Service = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn() -> Service + Send + Sync>;

/// Read side of a dependency-injection container.
///
/// Implementations must be safe for concurrent `get` calls; the dispatcher
/// shares one container across every in-flight request.
pub trait Container: Send + Sync {
	fn has(&self, key: &ServiceKey) -> bool;

	fn get(&self, key: &ServiceKey) -> Option<Service>;
}

impl dyn Container {
	/// Typed lookup over [`Container::get`]
	pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
		self.get(&ServiceKey::of::<T>())
			.and_then(|service| service.downcast::<T>().ok())
	}
}

enum Binding {
	Singleton(Service),
	Transient(Factory),
}

/// In-memory container filled during boot.
///
/// Singletons are shared as the same `Arc`; transient bindings call their
/// factory on every lookup.
#[derive(Default)]
pub struct ServiceContainer {
	bindings: HashMap<ServiceKey, Binding>,
}

impl ServiceContainer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a shared instance
	pub fn insert<T: Send + Sync + 'static>(&mut self, service: T) {
		self.insert_arc(Arc::new(service));
	}

	/// Register an already shared instance
	pub fn insert_arc<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
		self.bindings
			.insert(ServiceKey::of::<T>(), Binding::Singleton(service));
	}

	/// Register a factory invoked on each lookup
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::atomic::{AtomicUsize, Ordering};
	/// use switchyard_di::ServiceContainer;
	///
	/// static BUILT: AtomicUsize = AtomicUsize::new(0);
	/// struct Connection;
	///
	/// let mut container = ServiceContainer::new();
	/// container.insert_factory(|| {
	///     BUILT.fetch_add(1, Ordering::SeqCst);
	///     Connection
	/// });
	///
	/// container.resolve::<Connection>();
	/// container.resolve::<Connection>();
	/// assert_eq!(BUILT.load(Ordering::SeqCst), 2);
	/// ```
	pub fn insert_factory<T, F>(&mut self, factory: F)
	where
		T: Send + Sync + 'static,
		F: Fn() -> T + Send + Sync + 'static,
	{
		let factory: Factory = Arc::new(move || Arc::new(factory()) as Service);
		self.bindings
			.insert(ServiceKey::of::<T>(), Binding::Transient(factory));
	}

	/// Builder-style [`ServiceContainer::insert`]
	pub fn with<T: Send + Sync + 'static>(mut self, service: T) -> Self {
		self.insert(service);
		self
	}

	/// Typed lookup
	pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
		self.get(&ServiceKey::of::<T>())
			.and_then(|service| service.downcast::<T>().ok())
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

impl Container for ServiceContainer {
	fn has(&self, key: &ServiceKey) -> bool {
		self.bindings.contains_key(key)
	}

	fn get(&self, key: &ServiceKey) -> Option<Service> {
		match self.bindings.get(key)? {
			Binding::Singleton(service) => Some(Arc::clone(service)),
			Binding::Transient(factory) => Some(factory()),
		}
	}
}

impl fmt::Debug for ServiceContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.bindings.keys()).finish()
	}
}
