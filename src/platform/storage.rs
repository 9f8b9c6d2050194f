//! Key-value storage backends.
//!
//! [`KeyValueStorage`] mirrors the synchronous Web Storage API
//! (`localStorage` / `sessionStorage`). Hooks only ever see the trait, so the
//! browser implementation and [`MemoryStorage`] are interchangeable.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::error::StorageError;

/// Which storage area a persisted hook is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
	/// Durable storage (`localStorage`)
	Local,
	/// Storage scoped to the browsing session (`sessionStorage`)
	Session,
}

impl StorageArea {
	/// Name of the matching Web Storage object, used in diagnostics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Local => "localStorage",
			Self::Session => "sessionStorage",
		}
	}
}

impl fmt::Display for StorageArea {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Synchronous string-to-string storage.
pub trait KeyValueStorage {
	/// Reads the entry for `key`. A missing key is `Ok(None)`.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes `value` under `key`, replacing any previous entry.
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Deletes the entry for `key`. Removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`KeyValueStorage`].
///
/// Used for tests, server-side rendering and any host without a storage API.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns `true` when no entries are stored.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.entries.borrow_mut().clear();
	}
}

impl KeyValueStorage for MemoryStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.entries.borrow_mut().remove(key);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_memory_storage_roundtrip() {
		let storage = MemoryStorage::new();
		assert_eq!(storage.get("theme").unwrap(), None);

		storage.set("theme", "\"dark\"").unwrap();
		assert_eq!(storage.get("theme").unwrap().as_deref(), Some("\"dark\""));
		assert_eq!(storage.len(), 1);

		storage.remove("theme").unwrap();
		assert!(storage.is_empty());
		storage.remove("theme").unwrap();
	}

	#[rstest]
	#[case(StorageArea::Local, "localStorage")]
	#[case(StorageArea::Session, "sessionStorage")]
	fn test_storage_area_names(#[case] area: StorageArea, #[case] expected: &str) {
		assert_eq!(area.to_string(), expected);
	}
}
