use std::collections::HashSet;

use canonlog::{Attr, Line, Registry, RegistryError, Value, merge, with_merge};
use proptest::prelude::*;

const KEYS: usize = 8;

/// Stored opaquely on drain; fields are only observed through `Debug`.
#[allow(dead_code)]
#[derive(Debug, Clone)]
struct Tag {
	id: i64,
	parts: Vec<String>,
}

fn overwrite_handles(registry: &Registry) -> Vec<Attr<i64>> {
	(0..KEYS).map(|i| registry.register(format!("k{i}"))).collect()
}

proptest! {
	#[test]
	fn keys_come_out_in_first_set_order(writes in prop::collection::vec((0..KEYS, any::<i64>()), 1..64)) {
		let registry = Registry::new();
		let handles = overwrite_handles(&registry);
		let line = Line::new();
		for &(idx, v) in &writes {
			line.set(&handles[idx], v);
		}

		let mut seen = HashSet::new();
		let expected: Vec<String> = writes
			.iter()
			.filter(|(idx, _)| seen.insert(*idx))
			.map(|(idx, _)| format!("k{idx}"))
			.collect();

		let record = line.attrs().unwrap();
		let keys: Vec<&str> = record.keys().collect();
		prop_assert_eq!(keys, expected.iter().map(String::as_str).collect::<Vec<_>>());
	}

	#[test]
	fn without_merge_last_write_wins(writes in prop::collection::vec((0..KEYS, any::<i64>()), 1..64)) {
		let registry = Registry::new();
		let handles = overwrite_handles(&registry);
		let line = Line::new();
		for &(idx, v) in &writes {
			line.set(&handles[idx], v);
		}

		for (idx, handle) in handles.iter().enumerate() {
			let last = writes.iter().rev().find(|(i, _)| *i == idx).map(|&(_, v)| v);
			prop_assert_eq!(line.get(handle), last);
		}
	}

	#[test]
	fn merge_is_a_left_fold(parts in prop::collection::vec("[a-z]{1,4}", 1..20)) {
		let registry = Registry::new();
		let joined = registry.register_with::<String>("joined", with_merge(merge::concat_with(",")));
		let line = Line::new();
		for part in &parts {
			line.set(&joined, part.clone());
		}
		prop_assert_eq!(line.get(&joined), Some(parts.join(",")));
	}

	#[test]
	fn additive_merge_sums(values in prop::collection::vec(-1_000i64..1_000, 1..50)) {
		let registry = Registry::new();
		let total = registry.register_with::<i64>("total", with_merge(merge::sum));
		let line = Line::new();
		for &v in &values {
			line.set(&total, v);
		}
		let record = line.attrs().unwrap();
		prop_assert_eq!(record.get("total"), Some(&Value::Int(values.iter().sum())));
	}

	#[test]
	fn each_key_is_claimed_once(keys in prop::collection::vec("[a-c]{1,2}", 1..30)) {
		let registry = Registry::new();
		let mut claimed = HashSet::new();
		for key in &keys {
			let result = registry.try_register::<bool>(key.as_str());
			if claimed.insert(key.clone()) {
				prop_assert!(result.is_ok());
			} else {
				prop_assert_eq!(result.unwrap_err(), RegistryError::DuplicateKey { key: key.clone() });
			}
		}
		prop_assert_eq!(registry.len(), claimed.len());

		// A fresh registry accepts every key again.
		let other = Registry::new();
		for key in &claimed {
			prop_assert!(other.try_register::<bool>(key.as_str()).is_ok());
		}
	}

	#[test]
	fn draining_is_idempotent(writes in prop::collection::vec((0..KEYS, any::<i64>()), 0..32)) {
		let registry = Registry::new();
		let ints = overwrite_handles(&registry);
		let tags: Vec<Attr<Tag>> = (0..KEYS).map(|i| registry.register(format!("tag{i}"))).collect();
		let ratios: Vec<Attr<f64>> = (0..KEYS).map(|i| registry.register(format!("ratio{i}"))).collect();
		let labels: Vec<Attr<String>> = (0..KEYS).map(|i| registry.register(format!("label{i}"))).collect();

		let line = Line::new();
		for &(idx, v) in &writes {
			match v.rem_euclid(4) {
				0 => line.set(&ints[idx], v),
				1 => line.set(&tags[idx], Tag { id: v, parts: vec![v.to_string()] }),
				2 => line.set(&ratios[idx], v as f64 / 7.0),
				_ => line.set(&labels[idx], format!("l{v}")),
			}
		}
		prop_assert_eq!(line.attrs(), line.attrs());
		prop_assert_eq!(line.attrs().is_none(), writes.is_empty());
	}
}
