//! Sink-facing attribute values.
//!
//! [`Value`] is what a drained [`crate::Record`] carries for every key. It covers
//! the scalar shapes structured loggers understand natively and falls back to an
//! opaque, `Debug`-rendered wrapper for everything else.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Object-safe bound for values wrapped by [`Value::Any`].
pub trait OpaqueValue: fmt::Debug + Send + Sync + 'static {
	fn as_any(&self) -> &dyn Any;
}

impl<T> OpaqueValue for T
where
	T: fmt::Debug + Send + Sync + 'static,
{
	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Generic attribute value handed to a sink.
#[derive(Clone)]
pub enum Value {
	/// String value.
	Str(Arc<str>),
	/// Signed integer value.
	Int(i64),
	/// Unsigned integer value.
	Uint(u64),
	/// Floating point value.
	Float(f64),
	/// Boolean value.
	Bool(bool),
	/// Elapsed time.
	Duration(Duration),
	/// Any other type, rendered through its `Debug` implementation.
	Any(Arc<dyn OpaqueValue>),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Str,
	Int,
	Uint,
	Float,
	Bool,
	Duration,
	Any,
}

impl ValueKind {
	/// Returns the lowercase name of this kind.
	pub const fn name(self) -> &'static str {
		match self {
			ValueKind::Str => "string",
			ValueKind::Int => "int",
			ValueKind::Uint => "uint",
			ValueKind::Float => "float",
			ValueKind::Bool => "bool",
			ValueKind::Duration => "duration",
			ValueKind::Any => "any",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

macro_rules! downcast_into {
	($any:ident; $($ty:ty => |$v:ident| $wrap:expr),+ $(,)?) => {
		$(
			if let Some($v) = $any.downcast_ref::<$ty>() {
				return $wrap;
			}
		)+
	};
}

impl Value {
	/// Best-effort conversion of an arbitrary value.
	///
	/// Primitive integers, floats, booleans, strings and [`Duration`] map to their
	/// dedicated variants. Anything else is cloned into [`Value::Any`].
	pub fn from_any<T>(value: &T) -> Value
	where
		T: Clone + fmt::Debug + Send + Sync + 'static,
	{
		let any: &dyn Any = value;
		downcast_into!(any;
			Value => |v| v.clone(),
			i64 => |v| Value::Int(*v),
			i32 => |v| Value::Int(i64::from(*v)),
			i16 => |v| Value::Int(i64::from(*v)),
			i8 => |v| Value::Int(i64::from(*v)),
			isize => |v| Value::Int(*v as i64),
			u64 => |v| Value::Uint(*v),
			u32 => |v| Value::Uint(u64::from(*v)),
			u16 => |v| Value::Uint(u64::from(*v)),
			u8 => |v| Value::Uint(u64::from(*v)),
			usize => |v| Value::Uint(*v as u64),
			f64 => |v| Value::Float(*v),
			f32 => |v| Value::Float(f64::from(*v)),
			bool => |v| Value::Bool(*v),
			String => |v| Value::Str(Arc::from(v.as_str())),
			&'static str => |v| Value::Str(Arc::from(*v)),
			Arc<str> => |v| Value::Str(Arc::clone(v)),
			Box<str> => |v| Value::Str(Arc::from(&**v)),
			Duration => |v| Value::Duration(*v),
		);
		Value::Any(Arc::new(value.clone()))
	}

	/// Wraps a value opaquely without attempting primitive detection.
	pub fn opaque<T: OpaqueValue>(value: T) -> Value {
		Value::Any(Arc::new(value))
	}

	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Str(_) => ValueKind::Str,
			Value::Int(_) => ValueKind::Int,
			Value::Uint(_) => ValueKind::Uint,
			Value::Float(_) => ValueKind::Float,
			Value::Bool(_) => ValueKind::Bool,
			Value::Duration(_) => ValueKind::Duration,
			Value::Any(_) => ValueKind::Any,
		}
	}

	/// Returns the string if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the integer if this is an `Int`, or a `Uint` that fits in `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			Value::Uint(v) => i64::try_from(*v).ok(),
			_ => None,
		}
	}

	/// Returns the integer if this is a `Uint`, or a non-negative `Int`.
	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Value::Uint(v) => Some(*v),
			Value::Int(v) => u64::try_from(*v).ok(),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_duration(&self) -> Option<Duration> {
		match self {
			Value::Duration(v) => Some(*v),
			_ => None,
		}
	}

	/// Downcasts an opaque value to its concrete type.
	pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
		match self {
			Value::Any(v) => {
				let inner: &dyn OpaqueValue = &**v;
				inner.as_any().downcast_ref::<T>()
			}
			_ => None,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
			Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Value::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
			Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Value::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
			Value::Any(v) => f.debug_tuple("Any").field(v).finish(),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(v) => f.write_str(v),
			Value::Int(v) => write!(f, "{v}"),
			Value::Uint(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Duration(v) => write_duration(f, *v),
			Value::Any(v) => write!(f, "{v:?}"),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Uint(a), Value::Uint(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Duration(a), Value::Duration(b)) => a == b,
			(Value::Any(a), Value::Any(b)) => Arc::ptr_eq(a, b) || opaque_eq(&**a, &**b),
			_ => false,
		}
	}
}

/// Opaque values of the same type are equal when their `Debug` output is.
fn opaque_eq(a: &dyn OpaqueValue, b: &dyn OpaqueValue) -> bool {
	a.as_any().type_id() == b.as_any().type_id() && format!("{a:?}") == format!("{b:?}")
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Str(v) => serializer.serialize_str(v),
			Value::Int(v) => serializer.serialize_i64(*v),
			Value::Uint(v) => serializer.serialize_u64(*v),
			Value::Float(v) => serializer.serialize_f64(*v),
			Value::Bool(v) => serializer.serialize_bool(*v),
			Value::Duration(v) => serializer.serialize_f64(v.as_secs_f64()),
			Value::Any(v) => serializer.collect_str(&format_args!("{v:?}")),
		}
	}
}

/// Writes `d` in compact unit form: `0s`, `850ns`, `1.5µs`, `150ms`, `2.25s`, `1m30s`, `2h0m5s`.
fn write_duration(f: &mut fmt::Formatter<'_>, d: Duration) -> fmt::Result {
	let nanos = d.as_nanos();
	if nanos == 0 {
		return f.write_str("0s");
	}
	if nanos < 1_000 {
		return write!(f, "{nanos}ns");
	}
	if nanos < 1_000_000 {
		write_fraction(f, nanos / 1_000, nanos % 1_000, 3)?;
		return f.write_str("µs");
	}
	if nanos < 1_000_000_000 {
		write_fraction(f, nanos / 1_000_000, nanos % 1_000_000, 6)?;
		return f.write_str("ms");
	}

	let secs = d.as_secs();
	let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
	if hours > 0 {
		write!(f, "{hours}h{minutes}m")?;
	} else if minutes > 0 {
		write!(f, "{minutes}m")?;
	}
	write_fraction(f, u128::from(seconds), u128::from(d.subsec_nanos()), 9)?;
	f.write_str("s")
}

fn write_fraction(f: &mut fmt::Formatter<'_>, whole: u128, frac: u128, digits: usize) -> fmt::Result {
	write!(f, "{whole}")?;
	if frac == 0 {
		return Ok(());
	}
	let padded = format!("{frac:0digits$}");
	write!(f, ".{}", padded.trim_end_matches('0'))
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(Arc::from(v))
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(Arc::from(v))
	}
}

impl From<Arc<str>> for Value {
	fn from(v: Arc<str>) -> Self {
		Value::Str(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(i64::from(v))
	}
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		Value::Uint(v)
	}
}

impl From<u32> for Value {
	fn from(v: u32) -> Self {
		Value::Uint(u64::from(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<Duration> for Value {
	fn from(v: Duration) -> Self {
		Value::Duration(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, PartialEq)]
	struct Point {
		x: i32,
		y: i32,
	}

	#[test]
	fn from_any_detects_primitives() {
		assert_eq!(Value::from_any(&200i32), Value::Int(200));
		assert_eq!(Value::from_any(&7u8), Value::Uint(7));
		assert_eq!(Value::from_any(&3.5f32), Value::Float(3.5));
		assert_eq!(Value::from_any(&true), Value::Bool(true));
		assert_eq!(Value::from_any(&String::from("usr_123")), Value::from("usr_123"));
		assert_eq!(Value::from_any(&"static"), Value::from("static"));
		assert_eq!(
			Value::from_any(&Duration::from_millis(150)),
			Value::Duration(Duration::from_millis(150))
		);
	}

	#[test]
	fn from_any_passes_values_through() {
		let v = Value::from(42i64);
		assert_eq!(Value::from_any(&v), v);
	}

	#[test]
	fn from_any_wraps_unknown_types() {
		let v = Value::from_any(&Point { x: 1, y: 2 });
		assert_eq!(v.kind(), ValueKind::Any);
		assert_eq!(v.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
		assert_eq!(v.to_string(), "Point { x: 1, y: 2 }");
	}

	#[test]
	fn opaque_values_compare_by_type_and_debug_output() {
		let a = Value::from_any(&Point { x: 1, y: 2 });
		let b = Value::from_any(&Point { x: 1, y: 2 });
		assert_eq!(a, b);
		assert_ne!(a, Value::from_any(&Point { x: 2, y: 1 }));

		// Same Debug output from different types is not equal.
		assert_ne!(Value::opaque(String::from("a")), Value::opaque("a"));
	}

	#[test]
	fn integer_accessors_cross_signedness() {
		assert_eq!(Value::Uint(5).as_i64(), Some(5));
		assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
		assert_eq!(Value::Int(-1).as_u64(), None);
		assert_eq!(Value::Int(9).as_u64(), Some(9));
		assert_eq!(Value::Bool(true).as_i64(), None);
	}

	#[test]
	fn duration_display() {
		let cases = [
			(Duration::ZERO, "0s"),
			(Duration::from_nanos(850), "850ns"),
			(Duration::from_nanos(1_500), "1.5µs"),
			(Duration::from_millis(150), "150ms"),
			(Duration::from_micros(1_250), "1.25ms"),
			(Duration::from_millis(2_250), "2.25s"),
			(Duration::from_secs(90), "1m30s"),
			(Duration::from_secs(7_205), "2h0m5s"),
		];
		for (d, want) in cases {
			assert_eq!(Value::Duration(d).to_string(), want, "{d:?}");
		}
	}

	#[test]
	fn serializes_to_json_scalars() {
		let json = serde_json::to_string(&Value::Duration(Duration::from_millis(1_500))).unwrap();
		assert_eq!(json, "1.5");
		let json = serde_json::to_string(&Value::opaque(Point { x: 0, y: 1 })).unwrap();
		assert_eq!(json, "\"Point { x: 0, y: 1 }\"");
	}
}
