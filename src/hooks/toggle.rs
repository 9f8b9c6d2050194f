//! Toggle hook: use_toggle

use crate::callback::Callback;
use crate::reactive::{RenderContext, use_callback, use_state};

/// Boolean state with a flip callback and an explicit setter.
///
/// Returns `(value, toggle, set_value)`. Both callbacks keep their identity
/// for the lifetime of the component, so they are safe to use as
/// dependencies. `set_value` always requests a re-render, even when the value
/// does not change.
///
/// # Example
///
/// ```ignore
/// let (open, toggle_open, set_open) = use_toggle(cx, false);
///
/// toggle_open.emit(); // open becomes true on the next render
/// set_open.call(false);
/// ```
pub fn use_toggle(
	cx: &mut RenderContext<'_>,
	initial: bool,
) -> (bool, Callback<()>, Callback<bool>) {
	let (value, set) = use_state(cx, || initial);

	let toggle = use_callback(cx, (), {
		let set = set.clone();
		move |()| set.update(|value| *value = !*value)
	});
	let set_value = use_callback(cx, (), move |value: bool| set.set(value));

	(value, toggle, set_value)
}

/// [`use_toggle`] starting from `false`.
pub fn use_toggle_default(cx: &mut RenderContext<'_>) -> (bool, Callback<()>, Callback<bool>) {
	use_toggle(cx, false)
}
