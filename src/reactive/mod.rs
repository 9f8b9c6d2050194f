//! Hook runtime: scopes, primitive hooks and the host driver.
//!
//! - [`Scope`] / [`RenderContext`]: slot storage and the render/commit cycle
//! - [`use_state`], [`use_ref`], [`use_memo`], [`use_callback`],
//!   [`use_effect`], [`use_effect_with`]: primitive hooks
//! - [`HookRoot`]: mounts a render function and flushes updates

pub mod hooks;
pub mod root;
pub mod scope;
pub mod state;

pub use hooks::{use_callback, use_effect, use_effect_with, use_memo, use_ref, use_state};
pub use root::HookRoot;
pub use scope::{Cleanup, RenderContext, Scope, ScopeId};
pub use state::SetState;
