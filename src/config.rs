//! Runtime configuration for hooks.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Delay used by [`use_debounce`](crate::hooks::use_debounce) and
/// [`use_throttle`](crate::hooks::use_throttle) when none is given.
pub const DEFAULT_DELAY_MS: u64 = 300;

/// Upper bound on consecutive renders performed by a single flush.
pub const DEFAULT_MAX_RENDER_PASSES: usize = 32;

/// Tunables shared by every hook rendered in a [`HookEnvironment`](crate::HookEnvironment).
///
/// ## Example
///
/// ```
/// use reinhardt_hooks::HooksConfig;
///
/// let config = HooksConfig::from_json(r#"{ "default_delay_ms": 150 }"#).unwrap();
/// assert_eq!(config.default_delay().as_millis(), 150);
/// assert_eq!(config.max_render_passes, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HooksConfig {
	/// Default debounce/throttle delay in milliseconds
	pub default_delay_ms: u64,
	/// Maximum renders per [`HookRoot::flush`](crate::HookRoot::flush)
	pub max_render_passes: usize,
}

impl Default for HooksConfig {
	fn default() -> Self {
		Self {
			default_delay_ms: DEFAULT_DELAY_MS,
			max_render_passes: DEFAULT_MAX_RENDER_PASSES,
		}
	}
}

impl HooksConfig {
	/// Parses a JSON document. Missing fields take their defaults.
	pub fn from_json(source: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Sets the default debounce/throttle delay.
	pub fn with_default_delay(mut self, delay: Duration) -> Self {
		self.default_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
		self
	}

	/// Sets the flush bound.
	pub fn with_max_render_passes(mut self, passes: usize) -> Self {
		self.max_render_passes = passes;
		self
	}

	/// Default delay as a [`Duration`].
	pub fn default_delay(&self) -> Duration {
		Duration::from_millis(self.default_delay_ms)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.max_render_passes == 0 {
			return Err(ConfigError::Invalid {
				field: "max_render_passes",
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}
