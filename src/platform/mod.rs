//! Host collaborators.
//!
//! Everything a hook needs from the outside world is behind one of these
//! traits and reaches the hook through the
//! [`HookEnvironment`](crate::HookEnvironment), never through a global.
//!
//! | Concern | Trait | Built-in implementations |
//! |---------|-------|--------------------------|
//! | Storage | [`KeyValueStorage`] | [`MemoryStorage`] |
//! | Timers | [`TimerFacility`] | [`ManualTimers`], `TokioTimers` |
//! | Network | [`Transport`] | [`MockTransport`], `HttpTransport` |
//! | Tasks | [`Spawner`] | `LocalSpawner`, `TokioSpawner` |
//! | Location | callback | [`MemoryLocation`] |

pub mod location;
pub mod spawn;
pub mod storage;
pub mod timer;
pub mod transport;

pub use location::MemoryLocation;
#[cfg(feature = "tokio")]
pub use spawn::TokioSpawner;
pub use spawn::Spawner;
pub use storage::{KeyValueStorage, MemoryStorage, StorageArea};
#[cfg(feature = "tokio")]
pub use timer::TokioTimers;
pub use timer::{ManualTimers, ScheduledTimer, TimerCallback, TimerFacility, TimerId, TimerSlot};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{Method, MockTransport, RequestOptions, Response, Transport};
