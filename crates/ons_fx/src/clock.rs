//! Millisecond time source for frame pacing.

use std::{
	cell::Cell,
	time::{Duration, Instant},
};

/// Monotonic millisecond clock with a blocking sleep.
pub trait Clock {
	/// Milliseconds since an arbitrary fixed origin.
	fn ticks(&self) -> u64;

	/// Blocks for `ms` milliseconds.
	fn sleep(&self, ms: u64);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
	origin: Instant,
}

impl SystemClock {
	/// Creates a clock whose origin is now.
	pub fn new() -> Self {
		Self {
			origin: Instant::now(),
		}
	}
}

impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for SystemClock {
	fn ticks(&self) -> u64 {
		self.origin.elapsed().as_millis() as u64
	}

	fn sleep(&self, ms: u64) {
		std::thread::sleep(Duration::from_millis(ms));
	}
}

/// Hand-driven clock; `sleep` advances time instead of blocking.
#[derive(Debug, Default)]
pub struct ManualClock {
	now: Cell<u64>,
}

impl ManualClock {
	/// Creates a clock reading `start`.
	pub fn new(start: u64) -> Self {
		Self {
			now: Cell::new(start),
		}
	}

	/// Moves time forward by `ms`.
	pub fn advance(&self, ms: u64) {
		self.now.set(self.now.get() + ms);
	}
}

impl Clock for ManualClock {
	fn ticks(&self) -> u64 {
		self.now.get()
	}

	fn sleep(&self, ms: u64) {
		self.advance(ms);
	}
}

impl<C: Clock + ?Sized> Clock for &C {
	fn ticks(&self) -> u64 {
		(**self).ticks()
	}

	fn sleep(&self, ms: u64) {
		(**self).sleep(ms);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_manual_clock() {
		let clock = ManualClock::new(100);
		assert_eq!(clock.ticks(), 100);
		clock.sleep(17);
		assert_eq!(clock.ticks(), 117);
		clock.advance(3);
		assert_eq!((&clock).ticks(), 120);
	}

	#[test]
	fn test_system_clock_is_monotonic() {
		let clock = SystemClock::new();
		let a = clock.ticks();
		clock.sleep(2);
		assert!(clock.ticks() >= a + 1);
	}
}
