//! Canonical log lines.
//!
//! Many independent pieces of code running inside one unit of work (usually a
//! request) contribute typed attributes to a single [`Line`]. When the unit of
//! work ends the line is drained into an ordered [`Record`] and handed to a
//! [`Sink`], producing one structured log record instead of many scattered ones.
//!
//! # Usage
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use canonlog::{Attr, Context, Value, merge, with_merge};
//!
//! static STATUS: LazyLock<Attr<i64>> = LazyLock::new(|| canonlog::register("doc_status"));
//! static USER_ID: LazyLock<Attr<String>> = LazyLock::new(|| canonlog::register("doc_user_id"));
//! static ERRORS: LazyLock<Attr<u32>> =
//! 	LazyLock::new(|| canonlog::register_with("doc_error_count", with_merge(merge::sum)));
//!
//! let ctx = canonlog::new(&Context::background());
//! canonlog::set(&ctx, &*STATUS, 200);
//! canonlog::set(&ctx, &*USER_ID, "usr_123".to_string());
//! canonlog::set(&ctx, &*ERRORS, 1);
//! canonlog::set(&ctx, &*ERRORS, 1);
//!
//! let record = canonlog::attrs(&ctx).unwrap();
//! assert_eq!(record.logfmt().to_string(), "doc_status=200 doc_user_id=usr_123 doc_error_count=2");
//! assert_eq!(record.get("doc_error_count"), Some(&Value::Uint(2)));
//! ```
//!
//! # Components
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | Claims attribute keys; each key at most once per registry. |
//! | [`Attr`] | Typed handle carrying a key plus merge/conversion behavior. |
//! | [`Line`] | Per-unit-of-work accumulator, ordered by first write. |
//! | [`Context`] | Optional binding of a line, explicit or task-local. |
//! | [`Record`] | Drained output: ordered key/[`Value`] pairs. |
//! | [`Sink`] | Consumer of drained records. |

mod attr;
mod context;
mod error;
mod line;
mod record;
mod registry;
mod sink;
mod value;

pub use attr::{Attr, AttrOptions, AttrValue, merge, with_merge, with_value};
pub use context::{Context, attrs_current, scope, set_current, sync_scope};
pub use error::RegistryError;
pub use line::Line;
pub use record::{Attribute, Logfmt, Record};
pub use registry::Registry;
pub use sink::{MemorySink, Sink, emit};
pub use value::{OpaqueValue, Value, ValueKind};

use std::sync::Arc;

/// Registers `key` in the global registry.
///
/// # Panics
///
/// Panics if `key` is already registered.
#[track_caller]
pub fn register<T: AttrValue>(key: impl Into<Arc<str>>) -> Attr<T> {
	Registry::global().register(key)
}

/// Registers `key` in the global registry with `options`.
///
/// # Panics
///
/// Panics if `key` is already registered.
#[track_caller]
pub fn register_with<T: AttrValue>(key: impl Into<Arc<str>>, options: AttrOptions<T>) -> Attr<T> {
	Registry::global().register_with(key, options)
}

/// Registers `key` in the global registry, reporting duplicates as an error.
pub fn try_register<T: AttrValue>(key: impl Into<Arc<str>>) -> Result<Attr<T>, RegistryError> {
	Registry::global().try_register(key)
}

/// Returns a new context derived from `ctx` with a fresh line bound.
pub fn new(ctx: &Context) -> Context {
	ctx.with_line()
}

/// Returns the line bound to `ctx`, if any.
pub fn from_context(ctx: &Context) -> Option<&Arc<Line>> {
	ctx.line()
}

/// Sets `value` for `attr` on the line bound to `ctx`. No-op when unbound.
pub fn set<T: AttrValue>(ctx: &Context, attr: &Attr<T>, value: T) {
	ctx.set(attr, value);
}

/// Drains the line bound to `ctx` in first-set order.
///
/// Returns `None` when no line is bound or nothing was set.
pub fn attrs(ctx: &Context) -> Option<Record> {
	ctx.attrs()
}
