//! Reusable state hooks.
//!
//! Every hook takes the [`RenderContext`](crate::reactive::RenderContext) of
//! the rendering component as its first argument and must be called in the
//! same order on every render.
//!
//! | Hook | Returns |
//! |------|---------|
//! | [`use_toggle`] | `(bool, toggle, set_value)` |
//! | [`use_previous`] | value of the previous render |
//! | [`use_counter`] | [`UseCounter`] |
//! | [`use_local_storage`], [`use_session_storage`] | [`PersistedState`] |
//! | [`use_debounce`], [`use_throttle`] | delayed projection of a value |
//! | [`use_fetch`] | [`FetchState`] |
//! | [`use_query_params`] | [`UseQueryParams`] |

pub mod counter;
pub mod debounce;
pub mod fetch;
pub mod previous;
pub mod query_params;
pub mod storage;
pub mod throttle;
pub mod toggle;

pub use counter::{CounterOptions, UseCounter, use_counter, use_counter_default, use_counter_with};
pub use debounce::{use_debounce, use_debounce_with};
pub use fetch::{FetchState, FetchStatus, use_fetch};
pub use previous::use_previous;
pub use query_params::{QueryParams, QueryPatch, UseQueryParams, use_query_params};
pub use storage::{PersistedState, use_local_storage, use_session_storage, use_storage};
pub use throttle::{use_throttle, use_throttle_with};
pub use toggle::{use_toggle, use_toggle_default};
