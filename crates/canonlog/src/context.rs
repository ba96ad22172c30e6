//! Binding a [`Line`] to the current unit of work.
//!
//! A [`Context`] either carries a line or it does not. Code that sets attributes
//! never needs to know which: writes against an unbound context are no-ops, so
//! shared library code can instrument unconditionally.
//!
//! Contexts can be passed explicitly, or installed as the ambient context of a
//! task with [`scope`] / [`sync_scope`] and recovered anywhere below it with
//! [`Context::current`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::attr::{Attr, AttrValue};
use crate::line::Line;
use crate::record::Record;

tokio::task_local! {
	static CURRENT: Context;
}

/// Handle to the (optional) line of one unit of work.
#[derive(Clone, Default)]
pub struct Context {
	line: Option<Arc<Line>>,
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("line", &self.line)
			.finish()
	}
}

impl Context {
	/// A context with no line bound. Writes are ignored and drains return `None`.
	pub const fn background() -> Self {
		Self { line: None }
	}

	/// Returns a new context bound to a fresh, empty line.
	///
	/// `self` is left untouched; any line it carried stays with it.
	pub fn with_line(&self) -> Self {
		Self::from_line(Arc::new(Line::new()))
	}

	/// Returns a context bound to an existing line.
	pub fn from_line(line: Arc<Line>) -> Self {
		Self { line: Some(line) }
	}

	/// Returns the bound line, if any.
	pub fn line(&self) -> Option<&Arc<Line>> {
		self.line.as_ref()
	}

	pub fn is_bound(&self) -> bool {
		self.line.is_some()
	}

	/// Sets `value` on the bound line; does nothing when unbound.
	pub fn set<T: AttrValue>(&self, attr: &Attr<T>, value: T) {
		if let Some(line) = &self.line {
			line.set(attr, value);
		}
	}

	/// Drains the bound line. Unbound and empty contexts both return `None`.
	pub fn attrs(&self) -> Option<Record> {
		self.line.as_ref()?.attrs()
	}

	/// Returns the ambient context installed by [`scope`] or [`sync_scope`], or a
	/// background context outside of any scope.
	pub fn current() -> Self {
		CURRENT.try_with(Context::clone).unwrap_or_default()
	}
}

/// Runs `fut` with `ctx` as the ambient context.
pub async fn scope<F: Future>(ctx: Context, fut: F) -> F::Output {
	CURRENT.scope(ctx, fut).await
}

/// Runs `f` with `ctx` as the ambient context.
pub fn sync_scope<R>(ctx: Context, f: impl FnOnce() -> R) -> R {
	CURRENT.sync_scope(ctx, f)
}

/// Sets `value` on the ambient line, if one is installed.
pub fn set_current<T: AttrValue>(attr: &Attr<T>, value: T) {
	let _ = CURRENT.try_with(|ctx| ctx.set(attr, value));
}

/// Drains the ambient line.
pub fn attrs_current() -> Option<Record> {
	CURRENT.try_with(Context::attrs).ok().flatten()
}
