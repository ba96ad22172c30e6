//! Ordered key/value output of a drained [`crate::Line`].

use std::fmt::{self, Write as _};
use std::slice;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// One key/value pair of a canonical log line.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	pub key: Arc<str>,
	pub value: Value,
}

impl Attribute {
	pub fn new(key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// Renders as a single logfmt pair, quoting where required.
impl fmt::Display for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_logfmt_token(f, &self.key)?;
		f.write_char('=')?;
		match &self.value {
			Value::Str(s) => write_logfmt_token(f, s),
			other => write_logfmt_token(f, &other.to_string()),
		}
	}
}

/// Attributes in the order their keys were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
	attrs: Vec<Attribute>,
}

impl Record {
	pub fn len(&self) -> usize {
		self.attrs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attrs.is_empty()
	}

	pub fn iter(&self) -> slice::Iter<'_, Attribute> {
		self.attrs.iter()
	}

	pub fn as_slice(&self) -> &[Attribute] {
		&self.attrs
	}

	pub fn into_vec(self) -> Vec<Attribute> {
		self.attrs
	}

	/// Looks up a value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.attrs
			.iter()
			.find(|attr| &*attr.key == key)
			.map(|attr| &attr.value)
	}

	/// Keys in output order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.attrs.iter().map(|attr| &*attr.key)
	}

	/// Display adapter producing `key=value key2=value2`.
	pub fn logfmt(&self) -> Logfmt<'_> {
		Logfmt(&self.attrs)
	}

	/// Serializes the record as a JSON object, preserving key order.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

impl From<Vec<Attribute>> for Record {
	fn from(attrs: Vec<Attribute>) -> Self {
		Self { attrs }
	}
}

impl FromIterator<Attribute> for Record {
	fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
		Self {
			attrs: iter.into_iter().collect(),
		}
	}
}

impl IntoIterator for Record {
	type Item = Attribute;
	type IntoIter = std::vec::IntoIter<Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.attrs.into_iter()
	}
}

impl<'a> IntoIterator for &'a Record {
	type Item = &'a Attribute;
	type IntoIter = slice::Iter<'a, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.attrs.iter()
	}
}

impl Serialize for Record {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.attrs.len()))?;
		for attr in &self.attrs {
			map.serialize_entry(&*attr.key, &attr.value)?;
		}
		map.end()
	}
}

/// Space-separated logfmt rendering of a record.
#[derive(Clone, Copy)]
pub struct Logfmt<'a>(&'a [Attribute]);

impl fmt::Display for Logfmt<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, attr) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_char(' ')?;
			}
			write!(f, "{attr}")?;
		}
		Ok(())
	}
}

fn needs_quoting(s: &str) -> bool {
	s.is_empty()
		|| s.chars()
			.any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}

fn write_logfmt_token(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
	if !needs_quoting(s) {
		return f.write_str(s);
	}
	f.write_char('"')?;
	for c in s.chars() {
		match c {
			'"' => f.write_str("\\\"")?,
			'\\' => f.write_str("\\\\")?,
			'\n' => f.write_str("\\n")?,
			'\r' => f.write_str("\\r")?,
			'\t' => f.write_str("\\t")?,
			c if c.is_control() => write!(f, "\\u{{{:x}}}", c as u32)?,
			c => f.write_char(c)?,
		}
	}
	f.write_char('"')
}
