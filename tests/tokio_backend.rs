//! Hooks driven by the tokio timer and spawner backends on paused time.

#![cfg(feature = "tokio")]

use std::rc::Rc;
use std::time::Duration;

use reinhardt_hooks::hooks::{FetchStatus, use_debounce_with, use_fetch, use_throttle_with};
use reinhardt_hooks::platform::{MockTransport, TokioSpawner, TokioTimers};
use reinhardt_hooks::{HookEnvironment, HookRoot};
use rstest::rstest;
use serde_json::{Value, json};
use tokio::task::LocalSet;

fn tokio_env(transport: Rc<MockTransport>) -> HookEnvironment {
	HookEnvironment::builder()
		.timers(Rc::new(TokioTimers::new()))
		.spawner(Rc::new(TokioSpawner))
		.transport(transport)
		.build()
		.unwrap()
}

async fn settle() {
	for _ in 0..8 {
		tokio::task::yield_now().await;
	}
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_debounce_on_tokio_timers() {
	LocalSet::new()
		.run_until(async {
			let env = tokio_env(Rc::new(MockTransport::new()));
			let root = HookRoot::mount(env, "initial", |cx, value: &&'static str| {
				use_debounce_with(cx, *value, Duration::from_millis(500))
			});

			root.rerender("updated");
			tokio::time::sleep(Duration::from_millis(250)).await;
			settle().await;
			root.flush();
			assert_eq!(root.result(), "initial");

			tokio::time::sleep(Duration::from_millis(300)).await;
			settle().await;
			root.flush();
			assert_eq!(root.result(), "updated");
		})
		.await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_throttle_on_tokio_timers() {
	LocalSet::new()
		.run_until(async {
			let env = tokio_env(Rc::new(MockTransport::new()));
			let root = HookRoot::mount(env, 1, |cx, value: &i32| {
				use_throttle_with(cx, *value, Duration::from_millis(400))
			});

			root.rerender(2);
			assert_eq!(root.result(), 1);

			tokio::time::sleep(Duration::from_millis(450)).await;
			settle().await;
			root.flush();
			assert_eq!(root.result(), 2);
		})
		.await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_unmount_aborts_tokio_timer() {
	LocalSet::new()
		.run_until(async {
			let env = tokio_env(Rc::new(MockTransport::new()));
			let root = HookRoot::mount(env, "initial", |cx, value: &&'static str| {
				use_debounce_with(cx, *value, Duration::from_millis(100))
			});

			root.rerender("updated");
			root.unmount();
			tokio::time::sleep(Duration::from_millis(200)).await;
			settle().await;

			assert_eq!(root.result(), "initial");
			assert_eq!(root.flush(), 0);
		})
		.await;
}

#[rstest]
#[tokio::test]
async fn test_fetch_on_tokio_spawner() {
	LocalSet::new()
		.run_until(async {
			let transport = Rc::new(MockTransport::new());
			transport.respond_json("/status", json!({ "healthy": true }));
			let root = HookRoot::mount(tokio_env(Rc::clone(&transport)), (), |cx, _| {
				use_fetch::<Value>(cx, "/status", None)
			});
			assert_eq!(root.result().status(), FetchStatus::Loading);

			settle().await;
			root.flush();

			assert_eq!(root.result().status(), FetchStatus::Done);
			assert_eq!(root.result().data, Some(json!({ "healthy": true })));
		})
		.await;
}
