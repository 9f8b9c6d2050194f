//! Counter hook: use_counter

use crate::callback::Callback;
use crate::reactive::{RenderContext, use_callback, use_state};

/// Value and controls returned by [`use_counter`].
#[derive(Debug, Clone, PartialEq)]
pub struct UseCounter {
	/// Current count
	pub count: i64,
	/// Adds `step`
	pub increment: Callback<()>,
	/// Subtracts `step`
	pub decrement: Callback<()>,
	/// Restores the initial value
	pub reset: Callback<()>,
}

/// Starting value and step for [`use_counter_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOptions {
	/// Value on mount and after `reset`
	pub initial: i64,
	/// Amount added or subtracted per call
	pub step: i64,
}

impl Default for CounterOptions {
	fn default() -> Self {
		Self { initial: 0, step: 1 }
	}
}

/// Integer counter with step-based increment/decrement and reset.
///
/// `increment`/`decrement` keep their identity until `step` changes, `reset`
/// until `initial` changes. Arithmetic wraps on overflow. Changing `initial`
/// does not touch the current count; it only changes what `reset` restores.
///
/// # Example
///
/// ```ignore
/// let counter = use_counter(cx, 10, 2);
/// counter.increment.emit(); // 12
/// counter.decrement.emit(); // 10
/// counter.reset.emit();     // 10
/// ```
pub fn use_counter(cx: &mut RenderContext<'_>, initial: i64, step: i64) -> UseCounter {
	let (count, set) = use_state(cx, || initial);

	let increment = use_callback(cx, step, {
		let set = set.clone();
		move |()| set.update(|count| *count = count.wrapping_add(step))
	});
	let decrement = use_callback(cx, step, {
		let set = set.clone();
		move |()| set.update(|count| *count = count.wrapping_sub(step))
	});
	let reset = use_callback(cx, initial, move |()| set.set(initial));

	UseCounter {
		count,
		increment,
		decrement,
		reset,
	}
}

/// [`use_counter`] configured by [`CounterOptions`].
pub fn use_counter_with(cx: &mut RenderContext<'_>, options: CounterOptions) -> UseCounter {
	use_counter(cx, options.initial, options.step)
}

/// [`use_counter`] starting at 0 with a step of 1.
pub fn use_counter_default(cx: &mut RenderContext<'_>) -> UseCounter {
	use_counter_with(cx, CounterOptions::default())
}
