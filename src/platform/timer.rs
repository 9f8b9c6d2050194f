//! Timer facility used by the debounce and throttle hooks.
//!
//! ## Architecture
//!
//! - [`TimerFacility`]: `schedule` / `cancel` / `now`, supplied by the host
//! - [`ScheduledTimer`]: owns one armed timer and cancels it on drop
//! - [`TimerSlot`]: holds at most one [`ScheduledTimer`]; arming a new timer
//!   releases the previous one
//!
//! Two facilities ship with the crate: [`ManualTimers`], a virtual clock that
//! only moves when told to, and `TokioTimers` (feature `tokio`), which
//! spawns onto the current `LocalSet`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Opaque identifier of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
	/// Wraps a raw id. Facilities allocate these; ids are never reused by the
	/// built-in implementations.
	pub fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// Raw numeric id.
	pub fn as_raw(&self) -> u64 {
		self.0
	}
}

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + 'static>;

/// Host timer facility (`setTimeout` / `clearTimeout` / `Date.now`).
pub trait TimerFacility {
	/// Monotonic time elapsed since the facility was created.
	fn now(&self) -> Duration;

	/// Runs `callback` once after `delay`.
	fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

	/// Cancels a pending timer. Cancelling a fired or unknown timer is a no-op.
	fn cancel(&self, id: TimerId);
}

/// An armed timer that is cancelled when dropped.
pub struct ScheduledTimer {
	timers: Rc<dyn TimerFacility>,
	id: TimerId,
}

impl ScheduledTimer {
	/// Schedules `callback` on `timers` and takes ownership of the handle.
	pub fn new<F>(timers: Rc<dyn TimerFacility>, delay: Duration, callback: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		let id = timers.schedule(delay, Box::new(callback));
		Self { timers, id }
	}

	/// Id assigned by the facility.
	pub fn id(&self) -> TimerId {
		self.id
	}
}

impl Drop for ScheduledTimer {
	fn drop(&mut self) {
		self.timers.cancel(self.id);
	}
}

impl fmt::Debug for ScheduledTimer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScheduledTimer")
			.field("id", &self.id)
			.finish()
	}
}

/// Holder for a single armed timer.
#[derive(Debug, Default)]
pub struct TimerSlot {
	current: RefCell<Option<ScheduledTimer>>,
}

impl TimerSlot {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Arms a new timer, cancelling whatever was armed before.
	pub fn arm<F>(&self, timers: Rc<dyn TimerFacility>, delay: Duration, callback: F)
	where
		F: FnOnce() + 'static,
	{
		let timer = ScheduledTimer::new(timers, delay, callback);
		tracing::debug!(timer = timer.id().as_raw(), ?delay, "timer armed");
		let previous = self.current.replace(Some(timer));
		drop(previous);
	}

	/// Cancels the armed timer, if any.
	pub fn disarm(&self) {
		let previous = self.current.take();
		if let Some(timer) = previous {
			tracing::debug!(timer = timer.id().as_raw(), "timer disarmed");
		}
	}

	/// Returns `true` when a timer is held (it may already have fired).
	pub fn is_armed(&self) -> bool {
		self.current.borrow().is_some()
	}
}

struct PendingTimer {
	id: TimerId,
	due: Duration,
	callback: TimerCallback,
}

/// Virtual-clock [`TimerFacility`].
///
/// Time only moves through [`advance`](Self::advance). Callbacks fire in due
/// order, and the clock reads each callback's due time while it runs.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use reinhardt_hooks::platform::{ManualTimers, TimerFacility};
///
/// let timers = ManualTimers::new();
/// let fired = Rc::new(Cell::new(false));
/// timers.schedule(Duration::from_millis(500), Box::new({
///     let fired = Rc::clone(&fired);
///     move || fired.set(true)
/// }));
///
/// timers.advance(Duration::from_millis(499));
/// assert!(!fired.get());
/// timers.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct ManualTimers {
	now: Cell<Duration>,
	next_id: Cell<u64>,
	pending: RefCell<Vec<PendingTimer>>,
}

impl ManualTimers {
	/// Creates a clock at time zero with no pending timers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward, firing every timer that becomes due.
	///
	/// Timers scheduled by a firing callback are honoured if they fall within
	/// the advanced window.
	pub fn advance(&self, by: Duration) {
		let target = self.now.get() + by;
		while let Some(timer) = self.take_next_due(target) {
			self.now.set(timer.due);
			tracing::trace!(timer = timer.id.as_raw(), due = ?timer.due, "manual timer fired");
			(timer.callback)();
		}
		self.now.set(target);
	}

	/// Fires every pending timer, moving the clock to the last due time.
	pub fn run_all(&self) {
		while let Some(due) = self.next_due() {
			let now = self.now.get();
			self.advance(due.saturating_sub(now));
		}
	}

	/// Number of timers that have not fired or been cancelled.
	pub fn pending(&self) -> usize {
		self.pending.borrow().len()
	}

	/// Due time of the earliest pending timer.
	pub fn next_due(&self) -> Option<Duration> {
		self.pending.borrow().iter().map(|timer| timer.due).min()
	}

	fn take_next_due(&self, target: Duration) -> Option<PendingTimer> {
		let mut pending = self.pending.borrow_mut();
		let index = pending
			.iter()
			.enumerate()
			.filter(|(_, timer)| timer.due <= target)
			.min_by_key(|(_, timer)| (timer.due, timer.id))
			.map(|(index, _)| index)?;
		Some(pending.remove(index))
	}
}

impl TimerFacility for ManualTimers {
	fn now(&self) -> Duration {
		self.now.get()
	}

	fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
		let id = TimerId(self.next_id.get());
		self.next_id.set(id.0 + 1);
		self.pending.borrow_mut().push(PendingTimer {
			id,
			due: self.now.get() + delay,
			callback,
		});
		id
	}

	fn cancel(&self, id: TimerId) {
		self.pending.borrow_mut().retain(|timer| timer.id != id);
	}
}

impl fmt::Debug for ManualTimers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ManualTimers")
			.field("now", &self.now.get())
			.field("pending", &self.pending())
			.finish()
	}
}

#[cfg(feature = "tokio")]
pub use self::tokio_backend::TokioTimers;

#[cfg(feature = "tokio")]
mod tokio_backend {
	use std::cell::{Cell, RefCell};
	use std::collections::HashMap;
	use std::rc::Rc;
	use std::time::Duration;

	use tokio::task::AbortHandle;
	use tokio::time::Instant;

	use super::{TimerCallback, TimerFacility, TimerId};

	/// [`TimerFacility`] backed by `tokio::time`.
	///
	/// Callbacks are spawned with `tokio::task::spawn_local`, so scheduling
	/// must happen inside a `tokio::task::LocalSet`.
	#[derive(Debug)]
	pub struct TokioTimers {
		start: Instant,
		next_id: Cell<u64>,
		tasks: Rc<RefCell<HashMap<TimerId, AbortHandle>>>,
	}

	impl TokioTimers {
		/// Creates a facility whose clock starts now.
		pub fn new() -> Self {
			Self {
				start: Instant::now(),
				next_id: Cell::new(0),
				tasks: Rc::new(RefCell::new(HashMap::new())),
			}
		}
	}

	impl Default for TokioTimers {
		fn default() -> Self {
			Self::new()
		}
	}

	impl TimerFacility for TokioTimers {
		fn now(&self) -> Duration {
			Instant::now().duration_since(self.start)
		}

		fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
			let id = TimerId::from_raw(self.next_id.get());
			self.next_id.set(id.as_raw() + 1);

			let tasks = Rc::clone(&self.tasks);
			let handle = tokio::task::spawn_local(async move {
				tokio::time::sleep(delay).await;
				tasks.borrow_mut().remove(&id);
				callback();
			});
			self.tasks.borrow_mut().insert(id, handle.abort_handle());
			id
		}

		fn cancel(&self, id: TimerId) {
			let handle = self.tasks.borrow_mut().remove(&id);
			if let Some(handle) = handle {
				handle.abort();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
		let log = Rc::new(RefCell::new(Vec::new()));
		let make = {
			let log = Rc::clone(&log);
			move |label: &'static str| -> TimerCallback {
				let log = Rc::clone(&log);
				Box::new(move || log.borrow_mut().push(label))
			}
		};
		(log, make)
	}

	#[rstest]
	fn test_manual_timers_fire_in_due_order() {
		let timers = ManualTimers::new();
		let (log, make) = recorder();

		timers.schedule(Duration::from_millis(300), make("late"));
		timers.schedule(Duration::from_millis(100), make("early"));
		timers.schedule(Duration::from_millis(100), make("early-second"));

		timers.advance(Duration::from_millis(1000));

		assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
		assert_eq!(timers.now(), Duration::from_millis(1000));
		assert_eq!(timers.pending(), 0);
	}

	#[rstest]
	fn test_manual_timers_cancel() {
		let timers = ManualTimers::new();
		let (log, make) = recorder();

		let id = timers.schedule(Duration::from_millis(10), make("cancelled"));
		timers.cancel(id);
		timers.advance(Duration::from_millis(20));

		assert!(log.borrow().is_empty());
		timers.cancel(id);
	}

	#[rstest]
	fn test_manual_timers_nested_schedule_within_window() {
		let timers = Rc::new(ManualTimers::new());
		let (log, make) = recorder();

		let inner = make("inner");
		timers.schedule(
			Duration::from_millis(100),
			Box::new({
				let timers = Rc::clone(&timers);
				move || {
					timers.schedule(Duration::from_millis(50), inner);
				}
			}),
		);

		timers.advance(Duration::from_millis(149));
		assert!(log.borrow().is_empty());
		timers.advance(Duration::from_millis(1));
		assert_eq!(*log.borrow(), vec!["inner"]);
	}

	#[rstest]
	fn test_timer_slot_replaces_previous() {
		let manual = Rc::new(ManualTimers::new());
		let facility: Rc<dyn TimerFacility> = manual.clone();
		let (log, _) = recorder();
		let slot = TimerSlot::new();

		slot.arm(Rc::clone(&facility), Duration::from_millis(100), {
			let log = Rc::clone(&log);
			move || log.borrow_mut().push("first")
		});
		slot.arm(Rc::clone(&facility), Duration::from_millis(100), {
			let log = Rc::clone(&log);
			move || log.borrow_mut().push("second")
		});
		assert_eq!(manual.pending(), 1);

		manual.advance(Duration::from_millis(100));
		assert_eq!(*log.borrow(), vec!["second"]);

		slot.arm(facility, Duration::from_millis(100), || {});
		slot.disarm();
		assert!(!slot.is_armed());
		assert_eq!(manual.pending(), 0);
	}

	#[rstest]
	fn test_scheduled_timer_cancels_on_drop() {
		let manual = Rc::new(ManualTimers::new());
		let timer = ScheduledTimer::new(manual.clone(), Duration::from_millis(5), || {});
		assert_eq!(manual.pending(), 1);
		drop(timer);
		assert_eq!(manual.pending(), 0);
	}
}
