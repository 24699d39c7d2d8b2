//! Recurring task timing on a single cooperative thread.
//!
//! The animation-frame callback is the only pump. Recurring tasks with their
//! own period (the re-energize pulse) are polled from it against the same
//! millisecond clock, so no task ever runs concurrently with another.

/// Shortest period accepted, in milliseconds.
const MIN_PERIOD_MS: f64 = 1.0;

/// Tracks when a recurring task is next due.
#[derive(Clone, Debug)]
pub struct Cadence {
	period_ms: f64,
	next_due_ms: f64,
}

impl Cadence {
	/// A task first due one period after `start_ms`.
	pub fn new(period_ms: f64, start_ms: f64) -> Self {
		let period_ms = period_ms.max(MIN_PERIOD_MS);
		Self {
			period_ms,
			next_due_ms: start_ms + period_ms,
		}
	}

	/// Period in milliseconds.
	pub fn period_ms(&self) -> f64 {
		self.period_ms
	}

	/// When the task is next due.
	pub fn next_due_ms(&self) -> f64 {
		self.next_due_ms
	}

	/// Returns true if the task is due at `now_ms`, and schedules the next run.
	///
	/// A late poll fires once and skips the missed periods, keeping the
	/// original phase.
	pub fn poll(&mut self, now_ms: f64) -> bool {
		if now_ms < self.next_due_ms {
			return false;
		}
		let missed = ((now_ms - self.next_due_ms) / self.period_ms).floor();
		self.next_due_ms += (missed + 1.0) * self.period_ms;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fires_once_per_period() {
		let mut cadence = Cadence::new(2800.0, 0.0);
		assert!(!cadence.poll(0.0));
		assert!(!cadence.poll(2799.0));
		assert!(cadence.poll(2800.0));
		assert!(!cadence.poll(2801.0));
		assert!(cadence.poll(5600.0));
	}

	#[test]
	fn late_poll_fires_once_and_keeps_phase() {
		let mut cadence = Cadence::new(1000.0, 500.0);
		assert!(cadence.poll(4700.0));
		assert_eq!(cadence.next_due_ms(), 5500.0);
		assert!(!cadence.poll(5000.0));
	}

	#[test]
	fn frame_rate_polling_counts_pulses() {
		let mut cadence = Cadence::new(2800.0, 0.0);
		let fired = (0..=600)
			.map(|frame| frame as f64 * 1000.0 / 60.0)
			.filter(|&now| cadence.poll(now))
			.count();
		// Ten seconds of frames.
		assert_eq!(fired, 3);
	}

	#[test]
	fn period_is_clamped() {
		let cadence = Cadence::new(0.0, 0.0);
		assert_eq!(cadence.period_ms(), MIN_PERIOD_MS);
	}
}
