//! Persisted state hooks: use_local_storage, use_session_storage
//!
//! Values are stored as JSON under a caller-chosen key in one of the two
//! [`StorageArea`]s of the [`HookEnvironment`](crate::HookEnvironment).
//!
//! ## Failure handling
//!
//! Storage failures never reach the caller. A failed read falls back to the
//! initial value, a failed write keeps the in-memory value unchanged. Either
//! way the failure is reported once to the environment's
//! [`DiagnosticSink`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_hooks::{HookRoot, hooks::use_local_storage, testing::TestEnvironment};
//!
//! let env = TestEnvironment::new();
//! let root = HookRoot::mount(env.env(), (), |cx, _| {
//!     use_local_storage(cx, "theme", "light".to_string())
//! });
//!
//! let set_theme = root.result().set_value;
//! root.act(|| set_theme.call("dark".to_string()));
//!
//! assert_eq!(root.result().value, "dark");
//! assert_eq!(env.local_storage().raw("theme").as_deref(), Some("\"dark\""));
//! ```

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::callback::Callback;
use crate::diagnostics::DiagnosticSink;
use crate::error::StorageError;
use crate::platform::{KeyValueStorage, StorageArea};
use crate::reactive::{RenderContext, SetState, use_callback, use_state};

/// Value and controls returned by the persisted state hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState<T> {
	/// Current value
	pub value: T,
	/// Persists a new value, then updates `value`
	pub set_value: Callback<T>,
	/// Persists the initial value, then updates `value`
	pub reset_value: Callback<()>,
}

/// State persisted in durable storage (`localStorage`).
pub fn use_local_storage<T>(cx: &mut RenderContext<'_>, key: &str, initial: T) -> PersistedState<T>
where
	T: Serialize + DeserializeOwned + Clone + PartialEq + 'static,
{
	use_storage(cx, StorageArea::Local, key, initial)
}

/// State persisted in session storage (`sessionStorage`).
pub fn use_session_storage<T>(
	cx: &mut RenderContext<'_>,
	key: &str,
	initial: T,
) -> PersistedState<T>
where
	T: Serialize + DeserializeOwned + Clone + PartialEq + 'static,
{
	use_storage(cx, StorageArea::Session, key, initial)
}

/// State persisted as JSON under `key` in `area`.
///
/// The entry is read on mount and again whenever `key` changes. `set_value`
/// and `reset_value` keep their identity until `key` (or, for
/// `reset_value`, `initial`) changes. A callback obtained for a previous key
/// still writes to that key but no longer touches the returned value.
pub fn use_storage<T>(
	cx: &mut RenderContext<'_>,
	area: StorageArea,
	key: &str,
	initial: T,
) -> PersistedState<T>
where
	T: Serialize + DeserializeOwned + Clone + PartialEq + 'static,
{
	let backend = Backend {
		area,
		storage: cx.env().storage(area),
		diagnostics: cx.env().diagnostics(),
	};

	let (stored, set) = use_state(cx, || (key.to_string(), backend.load(key, &initial)));
	let value = if stored.0 == key {
		stored.1
	} else {
		tracing::debug!(area = %area, from = %stored.0, to = %key, "storage key changed");
		let value = backend.load(key, &initial);
		set.replace((key.to_string(), value.clone()));
		value
	};

	let set_value = use_callback(cx, key.to_string(), {
		let backend = backend.clone();
		let set = set.clone();
		let key = key.to_string();
		move |value: T| backend.write(&set, &key, value, "setting")
	});
	let reset_value = use_callback(cx, (key.to_string(), initial.clone()), {
		let key = key.to_string();
		move |()| backend.write(&set, &key, initial.clone(), "resetting")
	});

	PersistedState {
		value,
		set_value,
		reset_value,
	}
}

#[derive(Clone)]
struct Backend {
	area: StorageArea,
	storage: Rc<dyn KeyValueStorage>,
	diagnostics: Rc<dyn DiagnosticSink>,
}

impl Backend {
	fn load<T: DeserializeOwned + Clone>(&self, key: &str, initial: &T) -> T {
		match self.read(key) {
			Ok(Some(value)) => value,
			Ok(None) => initial.clone(),
			Err(error) => {
				self.diagnostics
					.report(&format!("Error reading from {}", self.area), &error);
				initial.clone()
			}
		}
	}

	fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
		let raw = match self.storage.get(key)? {
			Some(raw) if !raw.is_empty() => raw,
			_ => return Ok(None),
		};
		serde_json::from_str(&raw)
			.map(Some)
			.map_err(|source| StorageError::Deserialize {
				key: key.to_string(),
				source,
			})
	}

	fn write<T: Serialize + 'static>(
		&self,
		set: &SetState<(String, T)>,
		key: &str,
		value: T,
		action: &str,
	) {
		let persisted = serde_json::to_string(&value)
			.map_err(|source| StorageError::Serialize {
				key: key.to_string(),
				source,
			})
			.and_then(|raw| self.storage.set(key, &raw));

		if let Err(error) = persisted {
			self.diagnostics
				.report(&format!("Error {action} {} value", self.area), &error);
			return;
		}

		if set.peek(|(current_key, _)| current_key != key) {
			tracing::debug!(area = %self.area, key, "write for a stale key; value not applied");
			return;
		}
		set.set((key.to_string(), value));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::HookRoot;
	use crate::testing::TestEnvironment;
	use rstest::rstest;
	use serde_json::json;

	type Root = HookRoot<&'static str, PersistedState<String>>;

	fn mount_local(env: &TestEnvironment, key: &'static str) -> Root {
		HookRoot::mount(env.env(), key, |cx, key: &&'static str| {
			use_local_storage(cx, key, "light".to_string())
		})
	}

	#[rstest]
	fn test_absent_entry_yields_initial() {
		let env = TestEnvironment::new();
		let root = mount_local(&env, "theme");

		assert_eq!(root.result().value, "light");
		assert!(env.diagnostics().is_empty());
		assert_eq!(env.local_storage().raw("theme"), None);
	}

	#[rstest]
	#[case("\"dark\"", "dark")]
	#[case("", "light")]
	fn test_existing_entry_is_loaded(#[case] raw: &str, #[case] expected: &str) {
		let env = TestEnvironment::new();
		env.local_storage().seed_raw("theme", raw);

		let root = mount_local(&env, "theme");
		assert_eq!(root.result().value, expected);
		assert!(env.diagnostics().is_empty());
	}

	#[rstest]
	fn test_unparseable_entry_falls_back_with_diagnostic() {
		let env = TestEnvironment::new();
		env.local_storage().seed_raw("theme", "{not json");

		let root = mount_local(&env, "theme");
		assert_eq!(root.result().value, "light");
		assert_eq!(env.diagnostics().count_containing("Error reading from localStorage"), 1);
	}

	#[rstest]
	fn test_read_failure_falls_back_with_diagnostic() {
		let env = TestEnvironment::new();
		env.session_storage().fail_reads("access denied");

		let root = HookRoot::mount(env.env(), (), |cx, _| use_session_storage(cx, "draft", 0_u32));
		assert_eq!(root.result().value, 0);
		assert_eq!(env.diagnostics().count_containing("Error reading from sessionStorage"), 1);
	}

	#[rstest]
	fn test_set_value_persists_then_updates() {
		let env = TestEnvironment::new();
		let root = mount_local(&env, "theme");
		let set_value = root.result().set_value;

		root.act(|| set_value.call("dark".to_string()));

		assert_eq!(root.result().value, "dark");
		assert_eq!(env.local_storage().raw("theme").as_deref(), Some("\"dark\""));
	}

	#[rstest]
	fn test_write_failure_keeps_value_and_reports_once() {
		let env = TestEnvironment::new();
		let root = mount_local(&env, "theme");
		let set_value = root.result().set_value;

		env.local_storage().fail_writes("quota exceeded");
		root.act(|| set_value.call("dark".to_string()));

		assert_eq!(root.result().value, "light");
		assert_eq!(env.diagnostics().len(), 1);
		assert_eq!(env.diagnostics().count_containing("Error setting localStorage value"), 1);
	}

	#[rstest]
	fn test_reset_value_restores_initial() {
		let env = TestEnvironment::new();
		env.local_storage().seed_json("theme", &json!("dark"));
		let root = mount_local(&env, "theme");
		assert_eq!(root.result().value, "dark");

		let reset_value = root.result().reset_value;
		root.act(|| reset_value.emit());

		assert_eq!(root.result().value, "light");
		assert_eq!(env.local_storage().raw("theme").as_deref(), Some("\"light\""));
	}

	#[rstest]
	fn test_reset_failure_reports_resetting() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), (), |cx, _| use_session_storage(cx, "step", 1_i32));
		let PersistedState { set_value, reset_value, .. } = root.result();
		root.act(|| set_value.call(4));

		env.session_storage().fail_writes("quota exceeded");
		root.act(|| reset_value.emit());

		assert_eq!(root.result().value, 4);
		assert_eq!(env.diagnostics().count_containing("Error resetting sessionStorage value"), 1);
	}

	#[rstest]
	fn test_areas_are_independent() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), (), |cx, _| {
			(
				use_local_storage(cx, "shared", 0_i32),
				use_session_storage(cx, "shared", 0_i32),
			)
		});
		let set_local = root.result().0.set_value;

		root.act(|| set_local.call(9));

		let (local, session) = root.result();
		assert_eq!(local.value, 9);
		assert_eq!(session.value, 0);
		assert_eq!(env.session_storage().raw("shared"), None);
	}

	#[rstest]
	fn test_callbacks_stable_for_same_key() {
		let env = TestEnvironment::new();
		let root = mount_local(&env, "theme");
		let first = root.result();

		root.rerender("theme");
		let second = root.result();

		assert!(first.set_value.ptr_eq(&second.set_value));
		assert!(first.reset_value.ptr_eq(&second.reset_value));
	}

	#[rstest]
	fn test_key_change_reloads_and_renews_callbacks() {
		let env = TestEnvironment::new();
		env.local_storage().seed_json("theme:b", &json!("sepia"));
		let root = mount_local(&env, "theme:a");
		let first = root.result();

		root.rerender("theme:b");
		let second = root.result();

		assert_eq!(second.value, "sepia");
		assert!(!first.set_value.ptr_eq(&second.set_value));
		assert!(!first.reset_value.ptr_eq(&second.reset_value));
	}

	#[rstest]
	fn test_stale_callback_writes_old_key_only() {
		let env = TestEnvironment::new();
		let root = mount_local(&env, "theme:a");
		let stale_set = root.result().set_value;

		root.rerender("theme:b");
		root.act(|| stale_set.call("dark".to_string()));

		assert_eq!(env.local_storage().raw("theme:a").as_deref(), Some("\"dark\""));
		assert_eq!(env.local_storage().raw("theme:b"), None);
		assert_eq!(root.result().value, "light");
	}
}
