//! State setter handed out by [`use_state`](super::use_state).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::scope::WeakScope;

/// Setter for a piece of component state.
///
/// The same `SetState` is returned on every render of a scope, so it can be
/// captured by memoized callbacks. Updates request a re-render of the owning
/// scope; once the scope is torn down they are ignored.
pub struct SetState<T> {
	value: Rc<RefCell<T>>,
	scope: WeakScope,
}

impl<T: 'static> SetState<T> {
	pub(crate) fn new(value: Rc<RefCell<T>>, scope: WeakScope) -> Self {
		Self { value, scope }
	}

	/// Replaces the value.
	pub fn set(&self, value: T) {
		self.update(move |current| *current = value);
	}

	/// Mutates the value in place.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		if !self.scope.is_live() {
			tracing::trace!("state update after teardown ignored");
			return;
		}
		f(&mut *self.value.borrow_mut());
		self.scope.request_update();
	}

	/// Replaces the value without requesting a render.
	///
	/// Only for state derived while rendering, where the caller already uses
	/// the new value for the current output.
	pub(crate) fn replace(&self, value: T) {
		*self.value.borrow_mut() = value;
	}

	/// Inspects the latest value without cloning it.
	pub(crate) fn peek<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Latest value, including updates not yet rendered.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Returns `true` when both setters control the same state.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.value, &other.value)
	}
}

impl<T> Clone for SetState<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			scope: self.scope.clone(),
		}
	}
}

impl<T> PartialEq for SetState<T> {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.value, &other.value)
	}
}

impl<T> fmt::Debug for SetState<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SetState").finish_non_exhaustive()
	}
}
