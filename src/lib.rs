//! Reinhardt Hooks - reusable state hooks with an explicit render/commit runtime
//!
//! A small collection of component state utilities: boolean toggles,
//! previous-value tracking, counters, debounced and throttled values,
//! persisted key-value state, data fetching and query string handling.
//!
//! ## Features
//!
//! - **Explicit two-phase updates**: renders compute state, effects (timers,
//!   storage writes, requests) run strictly after the render is committed
//! - **Stable callbacks**: setters are memoized on their dependencies and
//!   compare by identity with [`Callback::ptr_eq`]
//! - **Injected collaborators**: storage, timers, transport, task spawning and
//!   diagnostics come from a [`HookEnvironment`], never from globals
//! - **Deterministic tests**: [`testing::TestEnvironment`] drives time and
//!   network by hand
//!
//! ## Architecture
//!
//! - [`reactive`]: hook runtime (scopes, primitive hooks, [`HookRoot`])
//! - [`hooks`]: the public hooks
//! - [`platform`]: collaborator traits and their built-in implementations
//! - [`environment`]: [`HookEnvironment`] and its builder
//! - [`config`]: [`HooksConfig`]
//! - [`diagnostics`]: sink for recovered failures
//! - [`testing`]: fixtures for hook tests
//!
//! ## Feature Flags
//!
//! - `tokio` - `TokioTimers` and `TokioSpawner` (run inside a `LocalSet`)
//! - `http` - `HttpTransport` backed by `reqwest` (implies `tokio`)
//!
//! ## Example
//!
//! ```
//! use reinhardt_hooks::{HookRoot, hooks::use_counter, testing::TestEnvironment};
//!
//! let env = TestEnvironment::new();
//! let root = HookRoot::mount(env.env(), (), |cx, _| use_counter(cx, 10, 2));
//!
//! let increment = root.result().increment;
//! root.act(|| increment.emit());
//! assert_eq!(root.result().count, 12);
//! ```

#![warn(missing_docs)]

pub mod callback;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod hooks;
pub mod platform;
pub mod reactive;
pub mod testing;

pub use callback::Callback;
pub use config::HooksConfig;
pub use diagnostics::{DiagnosticSink, RecordingDiagnostics, TracingDiagnostics};
pub use environment::{HookEnvironment, HookEnvironmentBuilder};
pub use error::{ConfigError, EnvironmentError, RequestError, StorageError, TransportError};
pub use reactive::{Cleanup, HookRoot, RenderContext, SetState};
