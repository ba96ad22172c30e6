//! Typed attribute handles and their registration options.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Bound for values that can be stored on a [`crate::Line`].
///
/// Blanket-implemented; never implement it by hand.
pub trait AttrValue: Clone + fmt::Debug + Send + Sync + 'static {}
impl<T> AttrValue for T where T: Clone + fmt::Debug + Send + Sync + 'static {}

type MergeFn<T> = dyn Fn(T, T) -> T + Send + Sync;
type ConvertFn<T> = dyn Fn(&T) -> Value + Send + Sync;

/// Typed handle to a registered attribute key.
///
/// Handles are only produced by [`crate::Registry`] and are cheap to clone. They
/// carry the key together with the merge and conversion behavior chosen at
/// registration time.
pub struct Attr<T: AttrValue> {
	inner: Arc<AttrInner<T>>,
}

struct AttrInner<T> {
	key: Arc<str>,
	merge: Option<Box<MergeFn<T>>>,
	to_value: Option<Box<ConvertFn<T>>>,
}

impl<T: AttrValue> Clone for Attr<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T: AttrValue> fmt::Debug for Attr<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Attr")
			.field("key", &&*self.inner.key)
			.field("type", &type_name::<T>())
			.field("merge", &self.has_merge())
			.field("convert", &self.has_conversion())
			.finish()
	}
}

impl<T: AttrValue> Attr<T> {
	pub(crate) fn new(key: Arc<str>, options: AttrOptions<T>) -> Self {
		Self {
			inner: Arc::new(AttrInner {
				key,
				merge: options.merge,
				to_value: options.to_value,
			}),
		}
	}

	/// Returns the attribute's key name.
	pub fn key(&self) -> &str {
		&self.inner.key
	}

	pub(crate) fn shared_key(&self) -> &Arc<str> {
		&self.inner.key
	}

	/// Returns true when a merge function was installed.
	pub fn has_merge(&self) -> bool {
		self.inner.merge.is_some()
	}

	/// Returns true when a custom value conversion was installed.
	pub fn has_conversion(&self) -> bool {
		self.inner.to_value.is_some()
	}

	/// Combines a stored value with an incoming one, or returns `new` when no
	/// merge function is installed.
	pub(crate) fn merge(&self, old: T, new: T) -> T {
		match &self.inner.merge {
			Some(merge) => merge(old, new),
			None => new,
		}
	}

	/// Converts a value for the sink, falling back to [`Value::from_any`].
	pub fn to_value(&self, value: &T) -> Value {
		match &self.inner.to_value {
			Some(convert) => convert(value),
			None => Value::from_any(value),
		}
	}
}

/// Registration-time configuration for an [`Attr`].
pub struct AttrOptions<T> {
	merge: Option<Box<MergeFn<T>>>,
	to_value: Option<Box<ConvertFn<T>>>,
}

impl<T> Default for AttrOptions<T> {
	fn default() -> Self {
		Self {
			merge: None,
			to_value: None,
		}
	}
}

impl<T> fmt::Debug for AttrOptions<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttrOptions")
			.field("merge", &self.merge.is_some())
			.field("convert", &self.to_value.is_some())
			.finish()
	}
}

impl<T> AttrOptions<T> {
	/// Options with last-write-wins semantics and the default value conversion.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs a function combining the existing value with each later write.
	///
	/// Without a merge function the newest value overwrites the stored one.
	pub fn merge<F>(mut self, f: F) -> Self
	where
		F: Fn(T, T) -> T + Send + Sync + 'static,
	{
		self.merge = Some(Box::new(f));
		self
	}

	/// Installs a conversion from the typed value to the sink's [`Value`].
	///
	/// Without one, [`Value::from_any`] is used.
	pub fn value<F>(mut self, f: F) -> Self
	where
		F: Fn(&T) -> Value + Send + Sync + 'static,
	{
		self.to_value = Some(Box::new(f));
		self
	}
}

/// Shorthand for `AttrOptions::new().merge(f)`.
pub fn with_merge<T, F>(f: F) -> AttrOptions<T>
where
	F: Fn(T, T) -> T + Send + Sync + 'static,
{
	AttrOptions::new().merge(f)
}

/// Shorthand for `AttrOptions::new().value(f)`.
///
/// ```
/// use std::time::Duration;
///
/// use canonlog::{Registry, Value, with_value};
///
/// let registry = Registry::new();
/// let duration = registry.register_with::<Duration>(
/// 	"duration_sec",
/// 	with_value(|d: &Duration| Value::Float(d.as_secs_f64())),
/// );
/// assert!(duration.has_conversion());
/// ```
pub fn with_value<T, F>(f: F) -> AttrOptions<T>
where
	F: Fn(&T) -> Value + Send + Sync + 'static,
{
	AttrOptions::new().value(f)
}

/// Ready-made merge functions.
pub mod merge {
	use std::ops::Add;

	/// Adds the new value to the stored one.
	pub fn sum<T: Add<Output = T>>(old: T, new: T) -> T {
		old + new
	}

	pub fn max<T: Ord>(old: T, new: T) -> T {
		std::cmp::max(old, new)
	}

	pub fn min<T: Ord>(old: T, new: T) -> T {
		std::cmp::min(old, new)
	}

	/// Keeps the first value ever written.
	pub fn keep_first<T>(old: T, _new: T) -> T {
		old
	}

	/// Extends the stored vector with the new elements.
	pub fn append<U>(mut old: Vec<U>, new: Vec<U>) -> Vec<U> {
		old.extend(new);
		old
	}

	/// Joins strings with `sep`, skipping the separator around empty sides.
	pub fn concat_with(sep: &'static str) -> impl Fn(String, String) -> String + Send + Sync + 'static {
		move |mut old, new| {
			if !old.is_empty() && !new.is_empty() {
				old.push_str(sep);
			}
			old.push_str(&new);
			old
		}
	}
}
