//! Component scope and the two-phase render/commit cycle.
//!
//! ## Architecture
//!
//! A [`Scope`] is one mounted component instance. It owns:
//!
//! 1. **Hook slots**: one per hook call, claimed in call order on every render
//! 2. **Dirty flag**: raised by [`SetState`](super::SetState) to request a re-render
//! 3. **Update scheduler**: optional host callback notified when the flag is raised
//!
//! [`Scope::render`] runs in two phases. The render phase executes the render
//! function with a [`RenderContext`]; hooks read state and queue effects but
//! perform no side effects. The commit phase then runs the queued effects in
//! call order, each after the cleanup of its previous run.
//!
//! [`Scope::teardown`] (or dropping the last handle) runs every outstanding
//! cleanup once and turns later state updates into no-ops.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::environment::HookEnvironment;

/// Unique identifier of a scope, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
	fn next() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scope#{}", self.0)
	}
}

/// Work returned by an effect, run before the effect re-runs and on teardown.
#[derive(Default)]
pub struct Cleanup(Option<Box<dyn FnOnce() + 'static>>);

impl Cleanup {
	/// No cleanup.
	pub fn none() -> Self {
		Self(None)
	}

	/// Runs `f` on cleanup.
	pub fn new<F>(f: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self(Some(Box::new(f)))
	}

	pub(crate) fn run(self) {
		if let Some(f) = self.0 {
			f();
		}
	}
}

impl fmt::Debug for Cleanup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Cleanup")
			.field(&self.0.as_ref().map(|_| "<function>"))
			.finish()
	}
}

/// Slot state of an effect hook.
#[derive(Default)]
pub(crate) struct EffectCell {
	pub(crate) deps: RefCell<Option<Box<dyn Any>>>,
	pub(crate) cleanup: RefCell<Option<Cleanup>>,
}

impl EffectCell {
	pub(crate) fn run_cleanup(&self) {
		let cleanup = self.cleanup.borrow_mut().take();
		if let Some(cleanup) = cleanup {
			cleanup.run();
		}
	}
}

type QueuedEffect = Box<dyn FnOnce() + 'static>;

pub(crate) struct ScopeInner {
	id: ScopeId,
	env: HookEnvironment,
	slots: RefCell<Vec<Rc<dyn Any>>>,
	dirty: Cell<bool>,
	torn_down: Cell<bool>,
	rendering: Cell<bool>,
	render_count: Cell<u64>,
	scheduler: RefCell<Option<Rc<dyn Fn()>>>,
}

impl ScopeInner {
	fn teardown(&self) {
		if self.torn_down.replace(true) {
			return;
		}
		tracing::trace!(scope = %self.id, "tearing down scope");

		let slots: Vec<Rc<dyn Any>> = self.slots.borrow().clone();
		for slot in &slots {
			if let Some(effect) = slot.downcast_ref::<EffectCell>() {
				effect.run_cleanup();
			}
		}
	}
}

impl Drop for ScopeInner {
	fn drop(&mut self) {
		self.teardown();
	}
}

/// A mounted component instance.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct Scope {
	inner: Rc<ScopeInner>,
}

impl Scope {
	/// Creates an unmounted scope bound to `env`.
	pub fn new(env: HookEnvironment) -> Self {
		Self {
			inner: Rc::new(ScopeInner {
				id: ScopeId::next(),
				env,
				slots: RefCell::new(Vec::new()),
				dirty: Cell::new(false),
				torn_down: Cell::new(false),
				rendering: Cell::new(false),
				render_count: Cell::new(0),
				scheduler: RefCell::new(None),
			}),
		}
	}

	/// Identifier of this scope.
	pub fn id(&self) -> ScopeId {
		self.inner.id
	}

	/// Environment this scope renders in.
	pub fn env(&self) -> &HookEnvironment {
		&self.inner.env
	}

	/// Number of completed renders.
	pub fn render_count(&self) -> u64 {
		self.inner.render_count.get()
	}

	/// Returns `true` when a state update is waiting for a re-render.
	pub fn is_dirty(&self) -> bool {
		self.inner.dirty.get()
	}

	/// Returns `true` once [`teardown`](Self::teardown) has run.
	pub fn is_torn_down(&self) -> bool {
		self.inner.torn_down.get()
	}

	/// Registers a host callback invoked whenever an update is requested.
	pub fn set_update_scheduler<F>(&self, scheduler: F)
	where
		F: Fn() + 'static,
	{
		*self.inner.scheduler.borrow_mut() = Some(Rc::new(scheduler));
	}

	/// Runs one render followed by its commit phase.
	///
	/// # Panics
	///
	/// Panics if the scope has been torn down, if called re-entrantly, or if
	/// the render function calls a different sequence of hooks than on the
	/// previous render.
	pub fn render<R, F>(&self, f: F) -> R
	where
		F: FnOnce(&mut RenderContext<'_>) -> R,
	{
		assert!(
			!self.is_torn_down(),
			"{} cannot render after teardown",
			self.inner.id
		);
		assert!(
			!self.inner.rendering.replace(true),
			"{} is already rendering",
			self.inner.id
		);
		self.inner.dirty.set(false);

		let mut cx = RenderContext {
			scope: self,
			cursor: 0,
			queued: Vec::new(),
		};
		let output = f(&mut cx);
		let effects = cx.finish();

		self.inner.rendering.set(false);
		let count = self.inner.render_count.get() + 1;
		self.inner.render_count.set(count);
		tracing::trace!(scope = %self.inner.id, render = count, effects = effects.len(), "commit");

		for effect in effects {
			effect();
		}
		output
	}

	/// Runs every outstanding effect cleanup and disables further updates.
	///
	/// Idempotent.
	pub fn teardown(&self) {
		self.inner.teardown();
	}

	pub(crate) fn downgrade(&self) -> WeakScope {
		WeakScope {
			inner: Rc::downgrade(&self.inner),
		}
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("id", &self.inner.id)
			.field("render_count", &self.render_count())
			.field("dirty", &self.is_dirty())
			.field("torn_down", &self.is_torn_down())
			.finish()
	}
}

/// Non-owning scope handle held by state setters.
#[derive(Clone)]
pub(crate) struct WeakScope {
	inner: Weak<ScopeInner>,
}

impl WeakScope {
	/// Returns `true` while the scope exists and has not been torn down.
	pub(crate) fn is_live(&self) -> bool {
		self.inner
			.upgrade()
			.is_some_and(|inner| !inner.torn_down.get())
	}

	/// Marks the scope dirty and notifies the host scheduler.
	pub(crate) fn request_update(&self) {
		let Some(inner) = self.inner.upgrade() else {
			return;
		};
		if inner.torn_down.get() {
			return;
		}
		inner.dirty.set(true);

		let scheduler = inner.scheduler.borrow().clone();
		if let Some(scheduler) = scheduler {
			scheduler();
		}
	}
}

/// Handle passed to render functions.
///
/// Every hook takes `&mut RenderContext` as its first argument and claims the
/// next slot of the scope.
pub struct RenderContext<'a> {
	scope: &'a Scope,
	cursor: usize,
	queued: Vec<QueuedEffect>,
}

impl RenderContext<'_> {
	/// Environment of the rendering scope.
	pub fn env(&self) -> &HookEnvironment {
		self.scope.env()
	}

	/// Identifier of the rendering scope.
	pub fn scope_id(&self) -> ScopeId {
		self.scope.id()
	}

	/// Returns `true` during the first render of the scope.
	pub fn is_first_render(&self) -> bool {
		self.scope.render_count() == 0
	}

	pub(crate) fn weak_scope(&self) -> WeakScope {
		self.scope.downgrade()
	}

	/// Claims the next slot, creating it with `init` on the first render.
	pub(crate) fn slot<S, F>(&mut self, init: F) -> Rc<S>
	where
		S: 'static,
		F: FnOnce() -> S,
	{
		let index = self.cursor;
		self.cursor += 1;

		let existing = self.scope.inner.slots.borrow().get(index).cloned();
		let slot = match existing {
			Some(slot) => slot,
			None => {
				assert!(
					self.is_first_render(),
					"{} rendered more hooks than during its first render (slot {index})",
					self.scope.id()
				);
				let slot: Rc<dyn Any> = Rc::new(init());
				self.scope.inner.slots.borrow_mut().push(Rc::clone(&slot));
				slot
			}
		};

		match slot.downcast::<S>() {
			Ok(slot) => slot,
			Err(_) => panic!(
				"{} called hooks in a different order than on its first render (slot {index} is not a {})",
				self.scope.id(),
				std::any::type_name::<S>()
			),
		}
	}

	/// Queues `effect` for the commit phase.
	pub(crate) fn queue_effect<F>(&mut self, effect: F)
	where
		F: FnOnce() + 'static,
	{
		self.queued.push(Box::new(effect));
	}

	fn finish(self) -> Vec<QueuedEffect> {
		let claimed = self.scope.inner.slots.borrow().len();
		assert!(
			self.cursor == claimed,
			"{} rendered {} hooks but {} were registered on its first render",
			self.scope.id(),
			self.cursor,
			claimed
		);
		self.queued
	}
}
