//! Query string hook: use_query_params
//!
//! [`QueryParams`] is an ordered multimap with `URLSearchParams` semantics,
//! parsed and serialized as `application/x-www-form-urlencoded` through the
//! `url` crate.

use std::fmt;
use std::rc::Rc;

use url::form_urlencoded;

use crate::callback::Callback;
use crate::reactive::{RenderContext, use_callback, use_memo};

/// Ordered query string parameters.
///
/// Names may repeat. Lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	/// Empty parameter list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a search string. A leading `?` is ignored.
	pub fn parse(search: &str) -> Self {
		let query = search.strip_prefix('?').unwrap_or(search);
		form_urlencoded::parse(query.as_bytes()).into_owned().collect()
	}

	/// First value for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.pairs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Every value for `name`, in order.
	pub fn get_all(&self, name: &str) -> Vec<&str> {
		self.pairs
			.iter()
			.filter(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
			.collect()
	}

	/// Returns `true` if `name` occurs at least once.
	pub fn contains_key(&self, name: &str) -> bool {
		self.pairs.iter().any(|(key, _)| key == name)
	}

	/// Sets `name` to `value`.
	///
	/// The first occurrence keeps its position and later duplicates are
	/// dropped; a new name is appended.
	pub fn set(&mut self, name: &str, value: &str) {
		let mut seen = false;
		self.pairs.retain_mut(|(key, current)| {
			if key != name {
				return true;
			}
			if seen {
				return false;
			}
			seen = true;
			*current = value.to_string();
			true
		});
		if !seen {
			self.pairs.push((name.to_string(), value.to_string()));
		}
	}

	/// Removes every occurrence of `name`.
	pub fn delete(&mut self, name: &str) {
		self.pairs.retain(|(key, _)| key != name);
	}

	/// Name/value pairs in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.pairs
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Number of pairs, counting repeated names.
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	/// Returns `true` when there are no pairs.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Applies `patch`: empty or absent values delete, others set.
	pub fn apply(&mut self, patch: &QueryPatch) {
		for (name, value) in &patch.entries {
			match value.as_deref() {
				Some(value) if !value.is_empty() => self.set(name, value),
				_ => self.delete(name),
			}
		}
	}
}

/// Serializes without the leading `?`.
impl fmt::Display for QueryParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let encoded = form_urlencoded::Serializer::new(String::new())
			.extend_pairs(&self.pairs)
			.finish();
		f.write_str(&encoded)
	}
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			pairs: iter
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		}
	}
}

/// Changes passed to `set_query_params`, applied in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
	entries: Vec<(String, Option<String>)>,
}

impl QueryPatch {
	/// Empty patch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name`. An empty `value` removes it instead.
	pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.entries.push((name.into(), Some(value.into())));
		self
	}

	/// Removes `name`.
	pub fn remove(mut self, name: impl Into<String>) -> Self {
		self.entries.push((name.into(), None));
		self
	}
}

impl<K, V> FromIterator<(K, Option<V>)> for QueryPatch
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(key, value)| (key.into(), value.map(Into::into)))
				.collect(),
		}
	}
}

/// Value and setter returned by [`use_query_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct UseQueryParams {
	/// Parameters parsed from the current search string
	pub params: Rc<QueryParams>,
	/// Applies a patch and navigates to the resulting search string
	pub set_query_params: Callback<QueryPatch>,
}

/// Reads and updates the query string of the current location.
///
/// `params` is parsed once per distinct `search` string. `set_query_params`
/// never mutates `params`: it hands `"?" + serialized` to `set_location`, and
/// the new parameters appear once the host renders with the new search
/// string.
///
/// # Example
///
/// ```
/// use reinhardt_hooks::{HookRoot, hooks::{QueryPatch, use_query_params}};
/// use reinhardt_hooks::platform::MemoryLocation;
/// use reinhardt_hooks::testing::TestEnvironment;
///
/// let env = TestEnvironment::new();
/// let location = MemoryLocation::new("?search=react&page=1");
/// let root = HookRoot::mount(env.env(), location.clone(), |cx, location| {
///     use_query_params(cx, &location.search(), location.setter())
/// });
/// assert_eq!(root.result().params.get("search"), Some("react"));
///
/// let set_query_params = root.result().set_query_params;
/// set_query_params.call(QueryPatch::new().set("search", "hooks").remove("page"));
/// assert_eq!(location.last_navigation().as_deref(), Some("?search=hooks"));
/// ```
pub fn use_query_params(
	cx: &mut RenderContext<'_>,
	search: &str,
	set_location: Callback<String>,
) -> UseQueryParams {
	let params = use_memo(cx, search.to_string(), |search| Rc::new(QueryParams::parse(search)));

	let set_query_params = use_callback(cx, (Rc::clone(&params), set_location.clone()), {
		let params = Rc::clone(&params);
		move |patch: QueryPatch| {
			let mut updated = QueryParams::clone(&params);
			updated.apply(&patch);
			let search = format!("?{updated}");
			tracing::debug!(%search, "updating query string");
			set_location.call(search);
		}
	});

	UseQueryParams {
		params,
		set_query_params,
	}
}
