//! Per-unit-of-work attribute accumulator.
//!
//! # Role
//!
//! A [`Line`] collects the values written through [`Attr`] handles while one
//! unit of work runs, and yields them as a [`Record`] once it ends.
//!
//! # Invariants
//!
//! - Each key appears at most once; its position is the position of the first write.
//!   Overwrites and merges never move a key.
//! - Writes to one key are serialized. With a merge function installed the stored
//!   value is the left fold of every write in lock acquisition order.
//! - Draining is non-destructive. Reading twice without intervening writes
//!   yields equal records. Float values follow IEEE comparison, so a stored
//!   `NaN` makes two otherwise identical records compare unequal.
//!
//! # Type mismatches
//!
//! Entries are type-erased. If a merge-enabled handle finds a value of another
//! type under its key (two registries handing out the same key with different
//! types, both writing to one line), the write overwrites the stored value
//! instead of merging and a `warn` event is emitted on the `canonlog` target.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::attr::{Attr, AttrValue};
use crate::record::{Attribute, Record};
use crate::value::Value;

/// A stored value together with the handle that knows its concrete type.
trait StoredValue: Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn to_value(&self) -> Value;
	fn type_name(&self) -> &'static str;
}

struct Entry<T: AttrValue> {
	value: T,
	attr: Attr<T>,
}

impl<T: AttrValue> StoredValue for Entry<T> {
	fn as_any(&self) -> &dyn Any {
		&self.value
	}

	fn to_value(&self) -> Value {
		self.attr.to_value(&self.value)
	}

	fn type_name(&self) -> &'static str {
		type_name::<T>()
	}
}

type Entries = IndexMap<Arc<str>, Box<dyn StoredValue>, FxBuildHasher>;

/// Accumulator for one canonical log line. Safe for concurrent use.
#[derive(Default)]
pub struct Line {
	entries: Mutex<Entries>,
}

impl fmt::Debug for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let entries = self.entries.lock();
		f.debug_struct("Line")
			.field("keys", &entries.keys().map(|k| &**k).collect::<Vec<_>>())
			.finish()
	}
}

impl Line {
	/// Creates an empty line.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `attr`'s key.
	///
	/// The first write for a key fixes its position in the output. Later writes
	/// overwrite, or merge when the handle carries a merge function. The merge
	/// function runs under the line's lock and must not write to the same line.
	pub fn set<T: AttrValue>(&self, attr: &Attr<T>, value: T) {
		let mut entries = self.entries.lock();

		let value = match entries.get(attr.key()) {
			Some(existing) if attr.has_merge() => match existing.as_any().downcast_ref::<T>() {
				Some(old) => attr.merge(old.clone(), value),
				None => {
					tracing::warn!(
						target: "canonlog",
						key = attr.key(),
						stored = existing.type_name(),
						incoming = type_name::<T>(),
						"stored value has a different type; overwriting instead of merging"
					);
					value
				}
			},
			_ => value,
		};

		let entry = Entry {
			value,
			attr: attr.clone(),
		};
		entries.insert(Arc::clone(attr.shared_key()), Box::new(entry));
	}

	/// Returns a copy of the value stored for `attr`, if it has the handle's type.
	pub fn get<T: AttrValue>(&self, attr: &Attr<T>) -> Option<T> {
		let entries = self.entries.lock();
		entries
			.get(attr.key())
			.and_then(|entry| entry.as_any().downcast_ref::<T>())
			.cloned()
	}

	/// Returns true if any value was set for `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.lock().contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	/// Returns every attribute in first-set order, or `None` when nothing was set.
	pub fn attrs(&self) -> Option<Record> {
		let entries = self.entries.lock();
		if entries.is_empty() {
			return None;
		}

		let attrs: Vec<Attribute> = entries
			.iter()
			.map(|(key, entry)| Attribute::new(Arc::clone(key), entry.to_value()))
			.collect();
		tracing::trace!(target: "canonlog", attrs = attrs.len(), "drained line");
		Some(Record::from(attrs))
	}

	/// Like [`Line::attrs`], but returns an empty record instead of `None`.
	pub fn record(&self) -> Record {
		self.attrs().unwrap_or_default()
	}
}
