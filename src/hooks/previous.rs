//! Previous-value hook: use_previous

use crate::reactive::{Cleanup, RenderContext, use_effect, use_ref};

/// Returns the value passed on the previous render, or `None` on the first.
///
/// The new value is recorded in the commit phase, after the render that
/// returned the old one. Equal consecutive values are recorded as well.
///
/// # Example
///
/// ```ignore
/// let (count, set_count) = use_state(cx, || 0);
/// let previous = use_previous(cx, count);
/// // previous is None on mount, then the count of the render before
/// ```
pub fn use_previous<T>(cx: &mut RenderContext<'_>, value: T) -> Option<T>
where
	T: Clone + 'static,
{
	let recorded = use_ref(cx, || None::<T>);
	let previous = recorded.borrow().clone();

	use_effect(cx, move || {
		*recorded.borrow_mut() = Some(value);
		Cleanup::none()
	});

	previous
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::HookRoot;
	use crate::testing::TestEnvironment;
	use rstest::rstest;

	#[rstest]
	fn test_use_previous_first_render_is_none() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), 0, |cx, value: &i32| use_previous(cx, *value));
		assert_eq!(root.result(), None);
	}

	#[rstest]
	fn test_use_previous_tracks_updates() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), "v1", |cx, value: &&str| use_previous(cx, *value));
		assert_eq!(root.result(), None);

		root.rerender("v2");
		assert_eq!(root.result(), Some("v1"));

		root.rerender("v3");
		assert_eq!(root.result(), Some("v2"));
	}

	#[rstest]
	fn test_use_previous_with_equal_values() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), 1, |cx, value: &i32| use_previous(cx, *value));

		root.rerender(1);
		assert_eq!(root.result(), Some(1));

		root.rerender(1);
		assert_eq!(root.result(), Some(1));

		root.rerender(2);
		assert_eq!(root.result(), Some(1));
	}

	#[rstest]
	fn test_use_previous_with_owned_values() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), vec![1], |cx, value: &Vec<i32>| {
			use_previous(cx, value.clone())
		});

		root.rerender(vec![1, 2]);
		assert_eq!(root.result(), Some(vec![1]));
	}
}
