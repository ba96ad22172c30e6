//! Attribute key registry.
//!
//! # Role
//!
//! A [`Registry`] hands out [`Attr`] handles and guarantees that each key is
//! claimed at most once for the registry's lifetime. Handles are normally
//! created once at startup and reused for every unit of work.
//!
//! # Lifecycle
//!
//! [`Registry::global`] is created lazily on first use and lives for the rest of
//! the process. It is never reset. Tests that need fresh key space construct
//! their own instance with [`Registry::new`].
//!
//! # Concurrency
//!
//! The claimed-key set sits behind a single mutex. It is only contended while
//! attributes are being registered.

use std::any::type_name;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::attr::{Attr, AttrOptions, AttrValue};
use crate::error::RegistryError;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Set of claimed attribute keys.
#[derive(Debug, Default)]
pub struct Registry {
	keys: Mutex<FxHashSet<Arc<str>>>,
}

impl Registry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the process-wide default registry.
	pub fn global() -> &'static Registry {
		&GLOBAL
	}

	/// Claims `key` and returns a handle with default options.
	///
	/// # Panics
	///
	/// Panics if `key` is already registered.
	#[track_caller]
	pub fn register<T: AttrValue>(&self, key: impl Into<Arc<str>>) -> Attr<T> {
		self.register_with(key, AttrOptions::new())
	}

	/// Claims `key` and returns a handle configured by `options`.
	///
	/// # Panics
	///
	/// Panics if `key` is already registered.
	#[track_caller]
	pub fn register_with<T: AttrValue>(
		&self,
		key: impl Into<Arc<str>>,
		options: AttrOptions<T>,
	) -> Attr<T> {
		match self.try_register_with(key, options) {
			Ok(attr) => attr,
			Err(err) => panic!("canonlog: {err}"),
		}
	}

	/// Like [`Registry::register`], but reports duplicates as an error.
	pub fn try_register<T: AttrValue>(
		&self,
		key: impl Into<Arc<str>>,
	) -> Result<Attr<T>, RegistryError> {
		self.try_register_with(key, AttrOptions::new())
	}

	/// Like [`Registry::register_with`], but reports duplicates as an error.
	pub fn try_register_with<T: AttrValue>(
		&self,
		key: impl Into<Arc<str>>,
		options: AttrOptions<T>,
	) -> Result<Attr<T>, RegistryError> {
		let key: Arc<str> = key.into();
		{
			let mut keys = self.keys.lock();
			if keys.contains(&key) {
				return Err(RegistryError::DuplicateKey {
					key: key.to_string(),
				});
			}
			keys.insert(Arc::clone(&key));
		}

		tracing::debug!(target: "canonlog", key = &*key, ty = type_name::<T>(), "registered attribute");
		Ok(Attr::new(key, options))
	}

	/// Returns true if `key` has been claimed.
	pub fn contains(&self, key: &str) -> bool {
		self.keys.lock().contains(key)
	}

	pub fn len(&self) -> usize {
		self.keys.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.lock().is_empty()
	}

	/// Returns the claimed keys, sorted.
	pub fn keys(&self) -> Vec<Arc<str>> {
		let mut keys: Vec<_> = self.keys.lock().iter().cloned().collect();
		keys.sort();
		keys
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Barrier;
	use std::thread;

	use super::*;

	#[test]
	fn register_returns_handle_for_key() {
		let registry = Registry::new();
		let attr = registry.register::<String>("test_key");
		assert_eq!(attr.key(), "test_key");
		assert!(registry.contains("test_key"));
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn duplicate_key_is_an_error() {
		let registry = Registry::new();
		registry.register::<String>("duplicate_key");

		let err = registry.try_register::<i64>("duplicate_key").unwrap_err();
		assert_eq!(
			err,
			RegistryError::DuplicateKey {
				key: "duplicate_key".into()
			}
		);
		assert_eq!(err.to_string(), "duplicate attribute key: duplicate_key");
		assert_eq!(registry.len(), 1);
	}

	#[test]
	#[should_panic(expected = "canonlog: duplicate attribute key: duplicate_key")]
	fn register_panics_on_duplicate() {
		let registry = Registry::new();
		registry.register::<String>("duplicate_key");
		registry.register::<i64>("duplicate_key");
	}

	#[test]
	fn independent_registries_do_not_conflict() {
		let a = Registry::new();
		let b = Registry::new();
		a.register::<u64>("status");
		b.register::<String>("status");
		assert!(a.contains("status") && b.contains("status"));
	}

	#[test]
	fn keys_are_sorted() {
		let registry = Registry::new();
		for key in ["zeta", "alpha", "mid"] {
			registry.register::<bool>(key);
		}
		let keys: Vec<_> = registry.keys().iter().map(|k| k.to_string()).collect();
		assert_eq!(keys, ["alpha", "mid", "zeta"]);
	}

	#[test]
	fn global_registry_is_shared() {
		let attr = Registry::global().register::<u8>("registry_tests_global_key");
		assert!(Registry::global().contains(attr.key()));
		assert!(std::ptr::eq(Registry::global(), Registry::global()));
	}

	#[test]
	fn concurrent_registration_claims_each_key_once() {
		let registry = Registry::new();
		let barrier = Barrier::new(16);
		let wins: usize = thread::scope(|s| {
			let handles: Vec<_> = (0..16)
				.map(|_| {
					s.spawn(|| {
						barrier.wait();
						registry.try_register::<u64>("contended").is_ok() as usize
					})
				})
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).sum()
		});
		assert_eq!(wins, 1);
		assert_eq!(registry.len(), 1);
	}
}
