//! Diagnostic sink for recoverable hook failures.
//!
//! Storage hooks never return errors to their consumer. Instead every
//! recovered failure is handed to a [`DiagnosticSink`], which by default
//! forwards it to `tracing` at error level.

use std::cell::RefCell;
use std::error::Error;

/// Fire-and-forget receiver for recovered failures.
///
/// Implementations must not panic.
pub trait DiagnosticSink {
	/// Reports a failure with a human-readable message and its cause.
	fn report(&self, message: &str, detail: &(dyn Error + 'static));
}

/// Forwards reports to `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
	fn report(&self, message: &str, detail: &(dyn Error + 'static)) {
		tracing::error!(target: "reinhardt_hooks::diagnostics", detail = %detail, "{message}");
	}
}

/// A single captured report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Message passed to [`DiagnosticSink::report`]
	pub message: String,
	/// `Display` rendering of the detail
	pub detail: String,
}

/// Keeps every report in memory. Useful in tests and for surfacing failures in
/// a debug overlay.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
	entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a snapshot of all reports so far.
	pub fn entries(&self) -> Vec<Diagnostic> {
		self.entries.borrow().clone()
	}

	/// Number of reports whose message contains `needle`.
	pub fn count_containing(&self, needle: &str) -> usize {
		self.entries
			.borrow()
			.iter()
			.filter(|entry| entry.message.contains(needle))
			.count()
	}

	/// Number of reports so far.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns `true` when nothing has been reported.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Drops all captured reports.
	pub fn clear(&self) {
		self.entries.borrow_mut().clear();
	}
}

impl DiagnosticSink for RecordingDiagnostics {
	fn report(&self, message: &str, detail: &(dyn Error + 'static)) {
		self.entries.borrow_mut().push(Diagnostic {
			message: message.to_string(),
			detail: detail.to_string(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::StorageError;
	use rstest::rstest;

	#[rstest]
	fn test_recording_diagnostics_captures_reports() {
		let sink = RecordingDiagnostics::new();
		let error = StorageError::Read {
			key: "theme".to_string(),
			message: "private mode".to_string(),
		};

		sink.report("Error reading from localStorage", &error);

		assert_eq!(sink.len(), 1);
		assert_eq!(sink.count_containing("Error reading"), 1);
		assert_eq!(
			sink.entries()[0].detail,
			"failed to read key `theme`: private mode"
		);

		sink.clear();
		assert!(sink.is_empty());
	}

	#[rstest]
	fn test_tracing_diagnostics_does_not_panic() {
		let error = StorageError::Write {
			key: "theme".to_string(),
			message: "QuotaExceededError".to_string(),
		};
		TracingDiagnostics.report("Error setting sessionStorage value", &error);
	}
}
