//! Local task spawning.
//!
//! Requests issued by [`use_fetch`](crate::hooks::use_fetch) are driven by a
//! [`Spawner`]. In the browser this would be `wasm_bindgen_futures::spawn_local`;
//! natively either a `futures` [`LocalSpawner`] or `TokioSpawner` (feature
//! `tokio`) is used.

use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

/// Runs `!Send` futures on the current thread.
pub trait Spawner {
	/// Spawns `future`; it runs to completion unless aborted by its owner.
	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);
}

impl Spawner for LocalSpawner {
	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
		if let Err(error) = LocalSpawnExt::spawn_local(self, future) {
			tracing::warn!(%error, "failed to spawn local task");
		}
	}
}

/// [`Spawner`] backed by `tokio::task::spawn_local`.
///
/// Must be used from inside a `tokio::task::LocalSet`.
#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSpawner;

#[cfg(feature = "tokio")]
impl Spawner for TokioSpawner {
	fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
		drop(tokio::task::spawn_local(future));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::FutureExt;
	use futures::executor::LocalPool;
	use rstest::rstest;
	use std::cell::Cell;
	use std::rc::Rc;

	#[rstest]
	fn test_local_spawner_runs_future() {
		let mut pool = LocalPool::new();
		let spawner = pool.spawner();
		let done = Rc::new(Cell::new(false));

		Spawner::spawn_local(
			&spawner,
			{
				let done = Rc::clone(&done);
				async move { done.set(true) }
			}
			.boxed_local(),
		);
		assert!(!done.get());

		pool.run_until_stalled();
		assert!(done.get());
	}
}
