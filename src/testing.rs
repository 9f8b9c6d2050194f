//! Test fixtures for hook code.
//!
//! [`TestEnvironment`] wires a [`HookEnvironment`] to deterministic
//! collaborators: a virtual clock, a local executor that only runs when asked,
//! a scripted transport, recording diagnostics and storages that can be told
//! to fail.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use reinhardt_hooks::{HookRoot, hooks::use_debounce_with, testing::TestEnvironment};
//!
//! let env = TestEnvironment::new();
//! let root = HookRoot::mount(env.env(), "initial", |cx, value: &&str| {
//!     use_debounce_with(cx, value.to_string(), Duration::from_millis(500))
//! });
//!
//! root.rerender("updated");
//! root.act(|| env.advance_ms(500));
//! assert_eq!(root.result(), "updated");
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::executor::LocalPool;

use crate::config::HooksConfig;
use crate::diagnostics::RecordingDiagnostics;
use crate::environment::HookEnvironment;
use crate::error::StorageError;
use crate::platform::{KeyValueStorage, ManualTimers, MemoryStorage, MockTransport};

/// In-memory storage with switchable read/write failures.
#[derive(Debug, Default)]
pub struct FaultyStorage {
	inner: MemoryStorage,
	read_failure: RefCell<Option<String>>,
	write_failure: RefCell<Option<String>>,
}

impl FaultyStorage {
	/// Creates a healthy, empty storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every `get` fail with `message`.
	pub fn fail_reads(&self, message: impl Into<String>) {
		*self.read_failure.borrow_mut() = Some(message.into());
	}

	/// Makes every `set` and `remove` fail with `message`.
	pub fn fail_writes(&self, message: impl Into<String>) {
		*self.write_failure.borrow_mut() = Some(message.into());
	}

	/// Clears both failure modes.
	pub fn heal(&self) {
		self.read_failure.borrow_mut().take();
		self.write_failure.borrow_mut().take();
	}

	/// Writes `value` as JSON, bypassing failure injection.
	pub fn seed_json(&self, key: &str, value: &serde_json::Value) {
		let _ = self.inner.set(key, &value.to_string());
	}

	/// Writes a raw string, bypassing failure injection.
	pub fn seed_raw(&self, key: &str, raw: &str) {
		let _ = self.inner.set(key, raw);
	}

	/// Reads the raw entry, bypassing failure injection.
	pub fn raw(&self, key: &str) -> Option<String> {
		self.inner.get(key).ok().flatten()
	}
}

impl KeyValueStorage for FaultyStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		if let Some(message) = self.read_failure.borrow().clone() {
			return Err(StorageError::Read {
				key: key.to_string(),
				message,
			});
		}
		self.inner.get(key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		if let Some(message) = self.write_failure.borrow().clone() {
			return Err(StorageError::Write {
				key: key.to_string(),
				message,
			});
		}
		self.inner.set(key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		if let Some(message) = self.write_failure.borrow().clone() {
			return Err(StorageError::Write {
				key: key.to_string(),
				message,
			});
		}
		self.inner.remove(key)
	}
}

/// Deterministic environment for rendering hooks in tests.
pub struct TestEnvironment {
	timers: Rc<ManualTimers>,
	pool: RefCell<LocalPool>,
	transport: Rc<MockTransport>,
	diagnostics: Rc<RecordingDiagnostics>,
	local_storage: Rc<FaultyStorage>,
	session_storage: Rc<FaultyStorage>,
	env: HookEnvironment,
}

impl TestEnvironment {
	/// Environment with the default configuration.
	pub fn new() -> Self {
		Self::with_config(HooksConfig::default())
	}

	/// Environment with a custom configuration.
	pub fn with_config(config: HooksConfig) -> Self {
		let timers = Rc::new(ManualTimers::new());
		let pool = LocalPool::new();
		let transport = Rc::new(MockTransport::new());
		let diagnostics = Rc::new(RecordingDiagnostics::new());
		let local_storage = Rc::new(FaultyStorage::new());
		let session_storage = Rc::new(FaultyStorage::new());

		let env = HookEnvironment::builder()
			.config(config)
			.timers(timers.clone())
			.spawner(Rc::new(pool.spawner()))
			.transport(transport.clone())
			.diagnostics(diagnostics.clone())
			.local_storage(local_storage.clone())
			.session_storage(session_storage.clone())
			.build();
		let env = match env {
			Ok(env) => env,
			Err(error) => unreachable!("all collaborators are supplied: {error}"),
		};

		Self {
			timers,
			pool: RefCell::new(pool),
			transport,
			diagnostics,
			local_storage,
			session_storage,
			env,
		}
	}

	/// The environment to mount roots with.
	pub fn env(&self) -> HookEnvironment {
		self.env.clone()
	}

	/// Virtual clock.
	pub fn timers(&self) -> &ManualTimers {
		&self.timers
	}

	/// Advances the virtual clock.
	pub fn advance(&self, by: Duration) {
		self.timers.advance(by);
	}

	/// Advances the virtual clock by `ms` milliseconds.
	pub fn advance_ms(&self, ms: u64) {
		self.advance(Duration::from_millis(ms));
	}

	/// Polls spawned tasks until none can make progress.
	pub fn run_until_stalled(&self) {
		self.pool.borrow_mut().run_until_stalled();
	}

	/// Scripted transport.
	pub fn transport(&self) -> &MockTransport {
		&self.transport
	}

	/// Recorded diagnostics.
	pub fn diagnostics(&self) -> &RecordingDiagnostics {
		&self.diagnostics
	}

	/// Durable storage backend.
	pub fn local_storage(&self) -> &FaultyStorage {
		&self.local_storage
	}

	/// Session storage backend.
	pub fn session_storage(&self) -> &FaultyStorage {
		&self.session_storage
	}
}

impl Default for TestEnvironment {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_faulty_storage_modes() {
		let storage = FaultyStorage::new();
		storage.seed_json("theme", &json!("dark"));
		assert_eq!(storage.get("theme").unwrap().as_deref(), Some("\"dark\""));

		storage.fail_reads("denied");
		assert!(matches!(storage.get("theme"), Err(StorageError::Read { .. })));

		storage.fail_writes("quota");
		assert!(matches!(storage.set("theme", "1"), Err(StorageError::Write { .. })));
		assert_eq!(storage.raw("theme").as_deref(), Some("\"dark\""));

		storage.heal();
		storage.set("theme", "1").unwrap();
		assert_eq!(storage.raw("theme").as_deref(), Some("1"));
	}
}
