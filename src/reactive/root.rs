//! Host-side driver for a single component scope.

use std::cell::RefCell;
use std::fmt;

use crate::environment::HookEnvironment;

use super::scope::{RenderContext, Scope};

type RenderFn<P, R> = Box<dyn Fn(&mut RenderContext<'_>, &P) -> R + 'static>;

/// Mounts a render function and drives its renders.
///
/// `HookRoot` plays the part of the host framework: it re-renders when props
/// change, flushes renders requested by state updates (from effects, timers
/// or completed requests) and tears the scope down on unmount or drop.
///
/// ## Example
///
/// ```
/// use reinhardt_hooks::{HookRoot, hooks::use_toggle, testing::TestEnvironment};
///
/// let env = TestEnvironment::new();
/// let root = HookRoot::mount(env.env(), false, |cx, initial: &bool| use_toggle(cx, *initial));
///
/// let (value, toggle, _) = root.result();
/// assert!(!value);
///
/// root.act(|| toggle.emit());
/// assert!(root.result().0);
/// ```
pub struct HookRoot<P, R> {
	scope: Scope,
	props: RefCell<P>,
	render: RenderFn<P, R>,
	output: RefCell<Option<R>>,
}

impl<P: 'static, R: 'static> HookRoot<P, R> {
	/// Renders `render` with `props`, commits, and flushes any follow-up renders.
	pub fn mount<F>(env: HookEnvironment, props: P, render: F) -> Self
	where
		F: Fn(&mut RenderContext<'_>, &P) -> R + 'static,
	{
		let root = Self {
			scope: Scope::new(env),
			props: RefCell::new(props),
			render: Box::new(render),
			output: RefCell::new(None),
		};
		tracing::debug!(scope = %root.scope.id(), "mounting hook root");
		root.render_once();
		root.flush();
		root
	}

	/// Output of the most recent render.
	pub fn result(&self) -> R
	where
		R: Clone,
	{
		match &*self.output.borrow() {
			Some(output) => output.clone(),
			None => unreachable!("HookRoot renders on mount"),
		}
	}

	/// Applies `f` to the output of the most recent render.
	pub fn with_result<T>(&self, f: impl FnOnce(&R) -> T) -> T {
		match &*self.output.borrow() {
			Some(output) => f(output),
			None => unreachable!("HookRoot renders on mount"),
		}
	}

	/// Replaces the props, re-renders and flushes.
	///
	/// Does nothing once the root is unmounted.
	pub fn rerender(&self, props: P) {
		if self.scope.is_torn_down() {
			tracing::trace!(scope = %self.scope.id(), "ignoring rerender after unmount");
			return;
		}
		*self.props.borrow_mut() = props;
		self.render_once();
		self.flush();
	}

	/// Re-renders while state updates are pending.
	///
	/// Stops after [`HooksConfig::max_render_passes`](crate::HooksConfig)
	/// consecutive renders. Returns the number of renders performed.
	pub fn flush(&self) -> usize {
		let limit = self.scope.env().config().max_render_passes;
		let mut passes = 0;
		while self.scope.is_dirty() && !self.scope.is_torn_down() {
			if passes == limit {
				tracing::warn!(
					scope = %self.scope.id(),
					limit,
					"render loop did not settle; giving up until the next flush"
				);
				break;
			}
			self.render_once();
			passes += 1;
		}
		passes
	}

	/// Runs `f` and then flushes, like `act` in component test utilities.
	pub fn act<T>(&self, f: impl FnOnce() -> T) -> T {
		let value = f();
		self.flush();
		value
	}

	/// Tears the scope down. Later state updates are ignored and renders are
	/// no longer possible.
	pub fn unmount(&self) {
		tracing::debug!(scope = %self.scope.id(), "unmounting hook root");
		self.scope.teardown();
	}

	/// Returns `true` until [`unmount`](Self::unmount) is called.
	pub fn is_mounted(&self) -> bool {
		!self.scope.is_torn_down()
	}

	/// Number of renders performed so far.
	pub fn render_count(&self) -> u64 {
		self.scope.render_count()
	}

	/// The underlying scope.
	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	fn render_once(&self) {
		let props = self.props.borrow();
		let output = self.scope.render(|cx| (self.render)(cx, &props));
		*self.output.borrow_mut() = Some(output);
	}
}

impl<P, R> fmt::Debug for HookRoot<P, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookRoot")
			.field("scope", &self.scope)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::HooksConfig;
	use crate::reactive::{Cleanup, use_effect, use_state};
	use crate::testing::TestEnvironment;
	use rstest::rstest;

	#[rstest]
	fn test_mount_flushes_effect_updates() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), (), |cx, _| {
			let (value, set) = use_state(cx, || 0);
			crate::reactive::use_effect_with(cx, (), move |_| {
				set.set(42);
				Cleanup::none()
			});
			value
		});

		assert_eq!(root.result(), 42);
		assert_eq!(root.render_count(), 2);
	}

	#[rstest]
	fn test_rerender_passes_new_props() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), 1, |_, props: &i32| props * 10);
		root.rerender(2);
		assert_eq!(root.result(), 20);
	}

	#[rstest]
	fn test_rerender_after_unmount_is_ignored() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), 1, |_, props: &i32| props * 10);
		root.unmount();

		root.rerender(2);

		assert_eq!(root.result(), 10);
		assert_eq!(root.render_count(), 1);
		assert!(!root.is_mounted());
	}

	#[rstest]
	fn test_flush_is_bounded() {
		let env = TestEnvironment::with_config(HooksConfig::default().with_max_render_passes(3));
		let root = HookRoot::mount(env.env(), (), |cx, _| {
			let (value, set) = use_state(cx, || 0_u32);
			use_effect(cx, move || {
				set.update(|n| *n += 1);
				Cleanup::none()
			});
			value
		});

		// one mount render plus three bounded flush passes
		assert_eq!(root.render_count(), 4);
		assert!(root.scope().is_dirty());
	}

	#[rstest]
	fn test_unmount_stops_updates() {
		let env = TestEnvironment::new();
		let root = HookRoot::mount(env.env(), (), |cx, _| use_state(cx, || 0));
		let (_, set) = root.result();

		root.unmount();
		set.set(5);

		assert!(!root.is_mounted());
		assert_eq!(root.act(|| root.flush()), 0);
		assert_eq!(root.result().0, 0);
	}
}
