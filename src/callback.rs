//! Callback type with identity semantics.
//!
//! Hooks hand out [`Callback`] values instead of bare closures so that
//! consumers can tell whether a handler changed between renders. Two
//! callbacks compare equal only when they share the same underlying
//! allocation, which makes them usable as dependencies of
//! [`use_memo`](crate::reactive::use_memo),
//! [`use_callback`](crate::reactive::use_callback) and
//! [`use_effect_with`](crate::reactive::use_effect_with).
//!
//! ## Example
//!
//! ```
//! use reinhardt_hooks::Callback;
//!
//! let add_one = Callback::new(|x: i32| x + 1);
//! let same = add_one.clone();
//!
//! assert_eq!(add_one.call(5), 6);
//! assert!(add_one.ptr_eq(&same));
//! assert!(!add_one.ptr_eq(&Callback::new(|x: i32| x + 1)));
//! ```

use std::fmt;
use std::rc::Rc;

/// A cloneable, reference-counted callable.
///
/// The runtime is single-threaded, so the closure is stored in an `Rc` and
/// carries no `Send`/`Sync` bounds.
///
/// ## Type Parameters
///
/// - `Args`: The argument type the callback receives (defaults to `()`)
/// - `Ret`: The return type of the callback (defaults to `()`)
pub struct Callback<Args = (), Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}

	/// Returns `true` when both callbacks point at the same closure.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<Ret> Callback<(), Ret> {
	/// Shorthand for `call(())`.
	pub fn emit(&self) -> Ret {
		self.call(())
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> PartialEq for Callback<Args, Ret> {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl<Args, Ret> fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

impl<Args, Ret, F> From<F> for Callback<Args, Ret>
where
	F: Fn(Args) -> Ret + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}
