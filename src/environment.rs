//! Injected collaborators shared by every hook in a tree.

use std::fmt;
use std::rc::Rc;

use crate::config::HooksConfig;
use crate::diagnostics::{DiagnosticSink, TracingDiagnostics};
use crate::error::EnvironmentError;
use crate::platform::{
	KeyValueStorage, MemoryStorage, Spawner, StorageArea, TimerFacility, Transport,
};

/// Capabilities and configuration available to hooks during render.
///
/// Cloning is cheap: every collaborator is reference counted.
#[derive(Clone)]
pub struct HookEnvironment {
	config: HooksConfig,
	local_storage: Rc<dyn KeyValueStorage>,
	session_storage: Rc<dyn KeyValueStorage>,
	timers: Rc<dyn TimerFacility>,
	spawner: Rc<dyn Spawner>,
	transport: Rc<dyn Transport>,
	diagnostics: Rc<dyn DiagnosticSink>,
}

impl HookEnvironment {
	/// Starts a builder.
	pub fn builder() -> HookEnvironmentBuilder {
		HookEnvironmentBuilder::default()
	}

	/// Environment driven by a tokio `LocalSet` and `reqwest`.
	#[cfg(feature = "http")]
	pub fn tokio_http() -> Self {
		Self {
			config: HooksConfig::default(),
			local_storage: Rc::new(MemoryStorage::new()),
			session_storage: Rc::new(MemoryStorage::new()),
			timers: Rc::new(crate::platform::TokioTimers::new()),
			spawner: Rc::new(crate::platform::TokioSpawner),
			transport: Rc::new(crate::platform::HttpTransport::new()),
			diagnostics: Rc::new(TracingDiagnostics),
		}
	}

	/// Active configuration.
	pub fn config(&self) -> &HooksConfig {
		&self.config
	}

	/// Storage backend for `area`.
	pub fn storage(&self, area: StorageArea) -> Rc<dyn KeyValueStorage> {
		match area {
			StorageArea::Local => Rc::clone(&self.local_storage),
			StorageArea::Session => Rc::clone(&self.session_storage),
		}
	}

	/// Timer facility.
	pub fn timers(&self) -> Rc<dyn TimerFacility> {
		Rc::clone(&self.timers)
	}

	/// Task spawner.
	pub fn spawner(&self) -> Rc<dyn Spawner> {
		Rc::clone(&self.spawner)
	}

	/// Network transport.
	pub fn transport(&self) -> Rc<dyn Transport> {
		Rc::clone(&self.transport)
	}

	/// Diagnostic sink.
	pub fn diagnostics(&self) -> Rc<dyn DiagnosticSink> {
		Rc::clone(&self.diagnostics)
	}
}

impl fmt::Debug for HookEnvironment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookEnvironment")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

/// Builder for [`HookEnvironment`].
///
/// Storage areas default to fresh [`MemoryStorage`] instances and diagnostics
/// to [`TracingDiagnostics`]. Timers, spawner and transport have no sensible
/// default and must be provided.
#[derive(Default)]
pub struct HookEnvironmentBuilder {
	config: Option<HooksConfig>,
	local_storage: Option<Rc<dyn KeyValueStorage>>,
	session_storage: Option<Rc<dyn KeyValueStorage>>,
	timers: Option<Rc<dyn TimerFacility>>,
	spawner: Option<Rc<dyn Spawner>>,
	transport: Option<Rc<dyn Transport>>,
	diagnostics: Option<Rc<dyn DiagnosticSink>>,
}

impl HookEnvironmentBuilder {
	/// Sets the configuration.
	pub fn config(mut self, config: HooksConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// Sets the durable storage backend.
	pub fn local_storage(mut self, storage: Rc<dyn KeyValueStorage>) -> Self {
		self.local_storage = Some(storage);
		self
	}

	/// Sets the session storage backend.
	pub fn session_storage(mut self, storage: Rc<dyn KeyValueStorage>) -> Self {
		self.session_storage = Some(storage);
		self
	}

	/// Sets the timer facility.
	pub fn timers(mut self, timers: Rc<dyn TimerFacility>) -> Self {
		self.timers = Some(timers);
		self
	}

	/// Sets the task spawner.
	pub fn spawner(mut self, spawner: Rc<dyn Spawner>) -> Self {
		self.spawner = Some(spawner);
		self
	}

	/// Sets the network transport.
	pub fn transport(mut self, transport: Rc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Sets the diagnostic sink.
	pub fn diagnostics(mut self, diagnostics: Rc<dyn DiagnosticSink>) -> Self {
		self.diagnostics = Some(diagnostics);
		self
	}

	/// Builds the environment.
	pub fn build(self) -> Result<HookEnvironment, EnvironmentError> {
		Ok(HookEnvironment {
			config: self.config.unwrap_or_default(),
			local_storage: self
				.local_storage
				.unwrap_or_else(|| Rc::new(MemoryStorage::new())),
			session_storage: self
				.session_storage
				.unwrap_or_else(|| Rc::new(MemoryStorage::new())),
			timers: self.timers.ok_or(EnvironmentError::Missing("timer"))?,
			spawner: self.spawner.ok_or(EnvironmentError::Missing("spawner"))?,
			transport: self
				.transport
				.ok_or(EnvironmentError::Missing("transport"))?,
			diagnostics: self
				.diagnostics
				.unwrap_or_else(|| Rc::new(TracingDiagnostics)),
		})
	}
}
