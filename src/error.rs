//! Error types for hook collaborators.
//!
//! None of these errors escape a hook: storage failures are reported to the
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) and request
//! failures surface through [`FetchState::error`](crate::hooks::FetchState).

use thiserror::Error;

/// Message used when a request fails without a usable description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Failure of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
	/// The backend rejected or failed a read.
	#[error("failed to read key `{key}`: {message}")]
	Read {
		/// Storage key
		key: String,
		/// Backend-provided description
		message: String,
	},

	/// The backend rejected or failed a write (quota exceeded, private mode, ...).
	#[error("failed to write key `{key}`: {message}")]
	Write {
		/// Storage key
		key: String,
		/// Backend-provided description
		message: String,
	},

	/// The stored entry is not valid JSON for the requested type.
	#[error("failed to deserialize value for key `{key}`: {source}")]
	Deserialize {
		/// Storage key
		key: String,
		/// Underlying JSON error
		#[source]
		source: serde_json::Error,
	},

	/// The value could not be encoded as JSON.
	#[error("failed to serialize value for key `{key}`: {source}")]
	Serialize {
		/// Storage key
		key: String,
		/// Underlying JSON error
		#[source]
		source: serde_json::Error,
	},
}

/// Transport-level failure raised by a [`Transport`](crate::platform::Transport).
///
/// The message is optional because some transports fail without a
/// description; such errors display as [`UNKNOWN_ERROR_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
pub struct TransportError {
	message: Option<String>,
}

impl TransportError {
	/// Creates a transport error with a description.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
		}
	}

	/// Creates a transport error without a description.
	pub fn unknown() -> Self {
		Self { message: None }
	}

	/// Returns the description, if any.
	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}
}

/// Failure of a fetch as seen by [`use_fetch`](crate::hooks::use_fetch).
#[derive(Debug, Error)]
pub enum RequestError {
	/// The request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The response status indicates failure.
	#[error("Error: {status_text}")]
	Status {
		/// Numeric status code
		status: u16,
		/// Reason phrase reported by the transport
		status_text: String,
	},

	/// The response body is not valid JSON for the requested type.
	#[error("{0}")]
	Decode(#[from] serde_json::Error),
}

/// Failure while assembling a [`HookEnvironment`](crate::HookEnvironment).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
	/// A required collaborator was not supplied to the builder.
	#[error("hook environment is missing a {0} collaborator")]
	Missing(&'static str),
}

/// Failure while loading [`HooksConfig`](crate::HooksConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The configuration document could not be parsed.
	#[error("invalid hooks configuration: {0}")]
	Parse(#[from] serde_json::Error),

	/// A value is outside its allowed range.
	#[error("invalid value for `{field}`: {reason}")]
	Invalid {
		/// Offending field
		field: &'static str,
		/// Why it was rejected
		reason: String,
	},
}
