//! Throttled value hook: use_throttle

use std::time::Duration;

use crate::platform::TimerSlot;
use crate::reactive::{Cleanup, RenderContext, use_effect_with, use_ref, use_state};

/// [`use_throttle_with`] using [`HooksConfig::default_delay`](crate::HooksConfig::default_delay).
pub fn use_throttle<T>(cx: &mut RenderContext<'_>, value: T) -> T
where
	T: Clone + PartialEq + 'static,
{
	let delay = cx.env().config().default_delay();
	use_throttle_with(cx, value, delay)
}

/// Returns `value`, updated at most once per `delay`.
///
/// The window starts at mount. A change arriving after the window has passed
/// is published immediately; an earlier one is published when the window
/// ends, replacing any change already waiting. A change back to the value
/// already published is deferred like any other, so the window still restarts
/// when its timer fires.
pub fn use_throttle_with<T>(cx: &mut RenderContext<'_>, value: T, delay: Duration) -> T
where
	T: Clone + PartialEq + 'static,
{
	let timers = cx.env().timers();
	let (throttled, set) = use_state(cx, || value.clone());
	let last_executed = use_ref(cx, || timers.now());
	let mounted = use_ref(cx, || false);
	let slot = cx.slot(TimerSlot::new);

	use_effect_with(cx, (value, delay), move |(value, delay)| {
		// the mount value is already published
		if !mounted.replace(true) {
			return Cleanup::none();
		}

		let elapsed = timers.now().saturating_sub(*last_executed.borrow());
		if elapsed >= *delay {
			*last_executed.borrow_mut() = timers.now();
			set.set(value.clone());
			return Cleanup::none();
		}

		let pending = value.clone();
		let clock = timers.clone();
		slot.arm(timers, *delay - elapsed, move || {
			*last_executed.borrow_mut() = clock.now();
			if set.peek(|current| *current != pending) {
				set.set(pending);
			}
		});
		Cleanup::new(move || slot.disarm())
	});

	throttled
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::HookRoot;
	use crate::testing::TestEnvironment;
	use rstest::rstest;

	fn mount(env: &TestEnvironment, value: &'static str) -> HookRoot<&'static str, &'static str> {
		HookRoot::mount(env.env(), value, |cx, value: &&'static str| {
			use_throttle_with(cx, *value, Duration::from_millis(500))
		})
	}

	#[rstest]
	fn test_change_inside_window_is_deferred() {
		let env = TestEnvironment::new();
		let root = mount(&env, "first");

		root.rerender("second update");
		assert_eq!(root.result(), "first");

		root.act(|| env.advance_ms(499));
		assert_eq!(root.result(), "first");

		root.act(|| env.advance_ms(1));
		assert_eq!(root.result(), "second update");
	}

	#[rstest]
	fn test_change_after_window_is_immediate() {
		let env = TestEnvironment::new();
		let root = mount(&env, "first");

		root.act(|| env.advance_ms(600));
		root.rerender("second");
		assert_eq!(root.result(), "second");
		assert_eq!(env.timers().pending(), 0);
	}

	#[rstest]
	fn test_pending_change_is_replaced() {
		let env = TestEnvironment::new();
		let root = mount(&env, "a");

		root.act(|| env.advance_ms(100));
		root.rerender("b");
		root.act(|| env.advance_ms(100));
		root.rerender("c");
		assert_eq!(env.timers().pending(), 1);

		// remaining window: 500 - 200
		root.act(|| env.advance_ms(300));
		assert_eq!(root.result(), "c");
	}

	#[rstest]
	fn test_window_restarts_after_deferred_publish() {
		let env = TestEnvironment::new();
		let root = mount(&env, "a");

		root.rerender("b");
		root.act(|| env.advance_ms(500));
		assert_eq!(root.result(), "b");

		root.act(|| env.advance_ms(200));
		root.rerender("c");
		assert_eq!(root.result(), "b");

		root.act(|| env.advance_ms(300));
		assert_eq!(root.result(), "c");
	}

	#[rstest]
	fn test_returning_to_published_value_restarts_window() {
		let env = TestEnvironment::new();
		let root = mount(&env, "a");
		assert_eq!(env.timers().pending(), 0);

		root.act(|| env.advance_ms(100));
		root.rerender("b");
		root.act(|| env.advance_ms(100));
		root.rerender("a");
		assert_eq!(env.timers().pending(), 1);

		// fires at t=500 without a render, but stamps the window
		let renders = root.render_count();
		root.act(|| env.advance_ms(300));
		assert_eq!(root.result(), "a");
		assert_eq!(root.render_count(), renders);

		// t=600: still inside the window that started at t=500
		root.act(|| env.advance_ms(100));
		root.rerender("c");
		assert_eq!(root.result(), "a");

		root.act(|| env.advance_ms(399));
		assert_eq!(root.result(), "a");
		root.act(|| env.advance_ms(1));
		assert_eq!(root.result(), "c");
	}

	#[rstest]
	fn test_unmount_cancels_timer() {
		let env = TestEnvironment::new();
		let root = mount(&env, "first");

		root.rerender("second");
		root.unmount();

		assert_eq!(env.timers().pending(), 0);
	}
}
