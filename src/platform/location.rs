//! In-memory location for [`use_query_params`](crate::hooks::use_query_params).
//!
//! The hook itself only needs the current search string and a setter
//! [`Callback`]. [`MemoryLocation`] provides both for hosts without a router,
//! and records every navigation so tests can assert on them.

use std::cell::RefCell;
use std::rc::Rc;

use crate::callback::Callback;

/// Search string plus navigation history.
#[derive(Debug, Default)]
pub struct MemoryLocation {
	search: RefCell<String>,
	history: RefCell<Vec<String>>,
}

impl MemoryLocation {
	/// Starts at `search` (with or without the leading `?`).
	pub fn new(search: impl Into<String>) -> Rc<Self> {
		Rc::new(Self {
			search: RefCell::new(search.into()),
			history: RefCell::new(Vec::new()),
		})
	}

	/// Current search string.
	pub fn search(&self) -> String {
		self.search.borrow().clone()
	}

	/// Navigates to `search`.
	pub fn set_location(&self, search: impl Into<String>) {
		let search = search.into();
		tracing::debug!(%search, "location changed");
		self.history.borrow_mut().push(search.clone());
		*self.search.borrow_mut() = search;
	}

	/// Every search string passed to [`set_location`](Self::set_location), in order.
	pub fn history(&self) -> Vec<String> {
		self.history.borrow().clone()
	}

	/// Most recent navigation, if any.
	pub fn last_navigation(&self) -> Option<String> {
		self.history.borrow().last().cloned()
	}

	/// A setter callback suitable for `use_query_params`.
	///
	/// Each call creates a new callback identity; create it once per mount.
	pub fn setter(self: &Rc<Self>) -> Callback<String> {
		let location = Rc::clone(self);
		Callback::new(move |search: String| location.set_location(search))
	}
}
