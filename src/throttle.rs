//! Minimum-interval pacing for outbound API requests.

// crates.io
use tokio::time::{Instant, sleep_until};
// self
use crate::_prelude::*;

/// Enforces a minimum spacing between dispatches sharing one instance.
///
/// The last-dispatch timestamp is guarded by an async mutex, so the check-and-update
/// cannot race across worker threads and waiters drain in FIFO order. The timestamp is
/// stamped when the dispatch is released, not when the request completes, which keeps
/// spacing correct while a request is still in flight.
#[derive(Debug)]
pub struct Throttle {
	min_interval: Duration,
	last_dispatch: AsyncMutex<Option<Instant>>,
}
impl Throttle {
	/// Default spacing between requests; the upstream API rejects tighter pacing.
	pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1_100);

	/// Creates a throttle with the provided minimum interval.
	pub fn new(min_interval: Duration) -> Self {
		Self { min_interval, last_dispatch: AsyncMutex::new(None) }
	}

	/// Returns the configured minimum interval.
	pub fn min_interval(&self) -> Duration {
		self.min_interval
	}

	/// Waits until the minimum interval since the previous dispatch has elapsed, then
	/// records this dispatch.
	pub async fn pace(&self) {
		let mut last = self.last_dispatch.lock().await;

		if let Some(previous) = *last {
			let due = previous + self.min_interval;

			if due > Instant::now() {
				sleep_until(due).await;
			}
		}

		*last = Some(Instant::now());
	}
}
impl Default for Throttle {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MIN_INTERVAL)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn consecutive_dispatches_are_spaced_by_the_interval() {
		let throttle = Throttle::new(Duration::from_millis(1_100));
		let start = Instant::now();

		throttle.pace().await;

		let first = Instant::now() - start;

		throttle.pace().await;

		let second = Instant::now() - start;

		assert!(first < Duration::from_millis(10));
		assert!(second >= Duration::from_millis(1_100));
	}

	#[tokio::test(start_paused = true)]
	async fn spacing_applies_across_concurrent_callers() {
		let throttle = Arc::new(Throttle::new(Duration::from_millis(100)));
		let start = Instant::now();
		let tasks = (0..3)
			.map(|_| {
				let throttle = throttle.clone();

				tokio::spawn(async move {
					throttle.pace().await;

					Instant::now() - start
				})
			})
			.collect::<Vec<_>>();
		let mut stamps = Vec::new();

		for task in tasks {
			stamps.push(task.await.expect("Pacing task should not panic."));
		}

		stamps.sort();

		for pair in stamps.windows(2) {
			assert!(pair[1] - pair[0] >= Duration::from_millis(100));
		}
	}

	#[tokio::test(start_paused = true)]
	async fn elapsed_interval_dispatches_immediately() {
		let throttle = Throttle::new(Duration::from_millis(100));

		throttle.pace().await;
		tokio::time::sleep(Duration::from_millis(150)).await;

		let before = Instant::now();

		throttle.pace().await;

		assert!(Instant::now() - before < Duration::from_millis(10));
	}
}
