//! Debounced value hook: use_debounce

use std::time::Duration;

use crate::platform::TimerSlot;
use crate::reactive::{Cleanup, RenderContext, use_effect_with, use_state};

/// [`use_debounce_with`] using [`HooksConfig::default_delay`](crate::HooksConfig::default_delay).
pub fn use_debounce<T>(cx: &mut RenderContext<'_>, value: T) -> T
where
	T: Clone + PartialEq + 'static,
{
	let delay = cx.env().config().default_delay();
	use_debounce_with(cx, value, delay)
}

/// Returns `value` once it has stopped changing for `delay`.
///
/// Every change of `value` (or `delay`) re-arms a single timer; only the
/// last input of a burst is published. The timer is cancelled on unmount.
///
/// # Example
///
/// ```ignore
/// let query = use_debounce_with(cx, input.clone(), Duration::from_millis(500));
/// // `query` lags `input` until typing pauses for 500ms
/// ```
pub fn use_debounce_with<T>(cx: &mut RenderContext<'_>, value: T, delay: Duration) -> T
where
	T: Clone + PartialEq + 'static,
{
	let (debounced, set) = use_state(cx, || value.clone());
	let slot = cx.slot(TimerSlot::new);
	let timers = cx.env().timers();

	use_effect_with(cx, (value, delay), move |(value, delay)| {
		let pending = value.clone();
		slot.arm(timers, *delay, move || {
			if set.peek(|current| *current != pending) {
				set.set(pending);
			}
		});
		Cleanup::new(move || slot.disarm())
	});

	debounced
}
