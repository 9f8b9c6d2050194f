//! Data fetching hook: use_fetch
//!
//! ## Architecture
//!
//! The request runs as a spawned task (see [`Spawner`](crate::platform::Spawner))
//! owned by an effect keyed on `(url, options)`. Each run captures its own
//! cancellation flag and abort handle. The effect cleanup, which runs when the
//! key changes or the component unmounts, sets the flag and aborts the task,
//! so a superseded response can never reach the state.
//!
//! ## Example
//!
//! ```
//! use reinhardt_hooks::{HookRoot, hooks::{FetchStatus, use_fetch}, testing::TestEnvironment};
//! use serde_json::{Value, json};
//!
//! let env = TestEnvironment::new();
//! env.transport().respond_json("/api/greeting", json!({ "message": "Hello, World!" }));
//!
//! let root = HookRoot::mount(env.env(), (), |cx, _| use_fetch::<Value>(cx, "/api/greeting", None));
//! assert_eq!(root.result().status(), FetchStatus::Loading);
//!
//! root.act(|| env.run_until_stalled());
//! assert_eq!(root.result().data, Some(json!({ "message": "Hello, World!" })));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{AbortHandle, Abortable};
use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::platform::{RequestOptions, Transport};
use crate::reactive::{Cleanup, RenderContext, use_effect_with, use_state};

/// Phase of a [`FetchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
	/// A request is in flight
	Loading,
	/// The last request succeeded
	Done,
	/// The last request failed
	Failed,
}

/// Snapshot returned by [`use_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
	/// Payload of the last successful request. Kept while a later request is
	/// loading or after it fails.
	pub data: Option<T>,
	/// `true` from mount (or a change of url/options) until the request settles
	pub is_loading: bool,
	/// Message of the last failure, cleared when a new request starts
	pub error: Option<String>,
}

impl<T> FetchState<T> {
	fn loading() -> Self {
		Self {
			data: None,
			is_loading: true,
			error: None,
		}
	}

	/// Current phase.
	pub fn status(&self) -> FetchStatus {
		if self.is_loading {
			FetchStatus::Loading
		} else if self.error.is_some() {
			FetchStatus::Failed
		} else {
			FetchStatus::Done
		}
	}
}

/// Fetches `url` and decodes the JSON body as `T`.
///
/// A new request is issued whenever `url` or `options` change; the previous
/// one is abandoned. Failures are reported through [`FetchState::error`]:
///
/// - non-2xx status: `"Error: <status text>"`
/// - transport failure: its message, or
///   [`UNKNOWN_ERROR_MESSAGE`](crate::error::UNKNOWN_ERROR_MESSAGE)
/// - undecodable body: the JSON error message
pub fn use_fetch<T>(
	cx: &mut RenderContext<'_>,
	url: &str,
	options: Option<RequestOptions>,
) -> FetchState<T>
where
	T: DeserializeOwned + Clone + 'static,
{
	let (state, set) = use_state(cx, FetchState::loading);
	let env = cx.env().clone();

	use_effect_with(cx, (url.to_string(), options), move |(url, options)| {
		set.update(|state| {
			state.is_loading = true;
			state.error = None;
		});

		let cancelled = Rc::new(Cell::new(false));
		let (abort_handle, registration) = AbortHandle::new_pair();

		let task = {
			let cancelled = Rc::clone(&cancelled);
			let transport = env.transport();
			let url = url.clone();
			let options = options.clone().unwrap_or_default();
			async move {
				tracing::debug!(%url, method = %options.method, "request started");
				let outcome = request_json::<T>(transport.as_ref(), &url, &options).await;
				if cancelled.get() {
					tracing::trace!(%url, "discarding result of cancelled request");
					return;
				}
				tracing::debug!(%url, ok = outcome.is_ok(), "request finished");
				set.update(move |state| {
					match outcome {
						Ok(data) => state.data = Some(data),
						Err(error) => state.error = Some(error.to_string()),
					}
					state.is_loading = false;
				});
			}
		};
		env.spawner()
			.spawn_local(Abortable::new(task, registration).map(drop).boxed_local());

		Cleanup::new(move || {
			cancelled.set(true);
			abort_handle.abort();
		})
	});

	state
}

async fn request_json<T: DeserializeOwned>(
	transport: &dyn Transport,
	url: &str,
	options: &RequestOptions,
) -> Result<T, RequestError> {
	let response = transport.request(url, options).await?.error_for_status()?;
	response.json()
}
