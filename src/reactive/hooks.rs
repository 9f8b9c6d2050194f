//! Primitive hooks: state, refs, memoization and effects.
//!
//! These are the building blocks the public hooks in [`crate::hooks`] are
//! written with. Unlike signal-based reactivity, dependencies are explicit:
//! memoized values, callbacks and effects are keyed on a `deps` value that is
//! compared with `PartialEq` against the one from the previous render.

use std::cell::RefCell;
use std::rc::Rc;

use crate::callback::Callback;

use super::scope::{Cleanup, EffectCell, RenderContext};
use super::state::SetState;

struct StateSlot<T> {
	value: Rc<RefCell<T>>,
	setter: SetState<T>,
}

/// Declares a piece of state.
///
/// `init` runs on the first render only. Returns the current value and a
/// setter whose identity is stable for the lifetime of the scope.
///
/// # Example
///
/// ```ignore
/// let (count, set_count) = use_state(cx, || 0);
/// set_count.update(|n| *n += 1);
/// ```
pub fn use_state<T, F>(cx: &mut RenderContext<'_>, init: F) -> (T, SetState<T>)
where
	T: Clone + 'static,
	F: FnOnce() -> T,
{
	let scope = cx.weak_scope();
	let slot = cx.slot(move || {
		let value = Rc::new(RefCell::new(init()));
		StateSlot {
			setter: SetState::new(Rc::clone(&value), scope),
			value,
		}
	});
	let current = slot.value.borrow().clone();
	(current, slot.setter.clone())
}

/// Declares a mutable cell that survives re-renders without triggering them.
///
/// This is the equivalent of `useRef`.
pub fn use_ref<T, F>(cx: &mut RenderContext<'_>, init: F) -> Rc<RefCell<T>>
where
	T: 'static,
	F: FnOnce() -> T,
{
	cx.slot(move || RefCell::new(init()))
}

/// Memoizes `f(&deps)` until `deps` changes.
pub fn use_memo<D, T, F>(cx: &mut RenderContext<'_>, deps: D, f: F) -> T
where
	D: PartialEq + 'static,
	T: Clone + 'static,
	F: FnOnce(&D) -> T,
{
	let slot = cx.slot(|| RefCell::new(None::<(D, T)>));

	let cached = match &*slot.borrow() {
		Some((previous, value)) if *previous == deps => Some(value.clone()),
		_ => None,
	};
	if let Some(value) = cached {
		return value;
	}

	let value = f(&deps);
	*slot.borrow_mut() = Some((deps, value.clone()));
	value
}

/// Returns the same [`Callback`] for as long as `deps` stays equal.
///
/// A new callback is created from `f` whenever `deps` changes; otherwise `f`
/// is dropped and the cached callback returned.
///
/// # Example
///
/// ```ignore
/// let increment = use_callback(cx, step, {
///     let set_count = set_count.clone();
///     move |()| set_count.update(|n| *n += step)
/// });
/// ```
pub fn use_callback<D, A, R, F>(cx: &mut RenderContext<'_>, deps: D, f: F) -> Callback<A, R>
where
	D: PartialEq + 'static,
	A: 'static,
	R: 'static,
	F: Fn(A) -> R + 'static,
{
	use_memo(cx, deps, move |_| Callback::new(f))
}

/// Runs `f` after every commit of the scope.
///
/// The cleanup returned by the previous run executes first.
pub fn use_effect<F>(cx: &mut RenderContext<'_>, f: F)
where
	F: FnOnce() -> Cleanup + 'static,
{
	let cell = cx.slot(EffectCell::default);
	cx.queue_effect(move || {
		cell.run_cleanup();
		let cleanup = f();
		*cell.cleanup.borrow_mut() = Some(cleanup);
	});
}

/// Runs `f(&deps)` after the first commit and after every commit where `deps`
/// differs from the value it last ran with.
///
/// # Example
///
/// ```ignore
/// use_effect_with(cx, (value.clone(), delay), move |(value, delay)| {
///     let timer = ScheduledTimer::new(timers, *delay, { ... });
///     Cleanup::new(move || drop(timer))
/// });
/// ```
pub fn use_effect_with<D, F>(cx: &mut RenderContext<'_>, deps: D, f: F)
where
	D: PartialEq + 'static,
	F: FnOnce(&D) -> Cleanup + 'static,
{
	let cell = cx.slot(EffectCell::default);

	let changed = cell
		.deps
		.borrow()
		.as_ref()
		.and_then(|previous| previous.downcast_ref::<D>())
		.is_none_or(|previous| *previous != deps);
	if !changed {
		return;
	}

	cx.queue_effect(move || {
		cell.run_cleanup();
		let cleanup = f(&deps);
		*cell.deps.borrow_mut() = Some(Box::new(deps));
		*cell.cleanup.borrow_mut() = Some(cleanup);
	});
}
