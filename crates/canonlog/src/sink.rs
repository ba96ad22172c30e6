//! Boundary to whatever writes canonical log lines out.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::Context;
use crate::record::Record;

/// Receives one drained record per unit of work.
pub trait Sink {
	fn emit(&self, record: &Record);
}

impl<S: Sink + ?Sized> Sink for &S {
	fn emit(&self, record: &Record) {
		(**self).emit(record);
	}
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
	fn emit(&self, record: &Record) {
		(**self).emit(record);
	}
}

impl<S: Sink + ?Sized> Sink for Box<S> {
	fn emit(&self, record: &Record) {
		(**self).emit(record);
	}
}

/// Drains `ctx` into `sink`.
///
/// Returns false, without calling the sink, when the context is unbound or
/// nothing was set.
pub fn emit(ctx: &Context, sink: &impl Sink) -> bool {
	match ctx.attrs() {
		Some(record) => {
			sink.emit(&record);
			true
		}
		None => false,
	}
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
	records: Mutex<Vec<Record>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of the records emitted so far.
	pub fn records(&self) -> Vec<Record> {
		self.records.lock().clone()
	}

	/// Removes and returns the records emitted so far.
	pub fn take(&self) -> Vec<Record> {
		std::mem::take(&mut *self.records.lock())
	}
}

impl Sink for MemorySink {
	fn emit(&self, record: &Record) {
		self.records.lock().push(record.clone());
	}
}
