//! Ephemeral counting-store contract and the in-process implementation.

// self
use crate::{_prelude::*, store::StoreError};

/// Boxed future returned by [`CounterStore`] operations.
pub type CounterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Ephemeral counting backend keyed by client identity strings.
///
/// [`increment`](Self::increment) must be atomic across concurrent callers of one key.
/// [`expire`](Self::expire) is only called right after a fresh counter was observed
/// (count == 1); once the deadline elapses the counter ceases to exist and the next
/// increment recreates it.
pub trait CounterStore
where
	Self: Send + Sync,
{
	/// Atomically increments the counter under the key and returns the post-increment count.
	fn increment<'a>(&'a self, key: &'a str) -> CounterFuture<'a, u64>;

	/// Schedules the counter under the key to vanish after the window elapses.
	fn expire<'a>(&'a self, key: &'a str, window: Duration) -> CounterFuture<'a, ()>;
}

#[derive(Clone, Copy, Debug)]
struct CounterSlot {
	count: u64,
	deadline: Option<OffsetDateTime>,
}

type CounterMap = Arc<RwLock<HashMap<String, CounterSlot>>>;

/// Thread-safe counting backend that keeps windows in-process for tests and demos.
///
/// Expiry is evaluated lazily on access, which matches the contract: an elapsed counter is
/// indistinguishable from an absent one.
#[derive(Clone, Debug, Default)]
pub struct MemoryCounterStore(CounterMap);
impl MemoryCounterStore {
	fn increment_now(map: CounterMap, key: String, now: OffsetDateTime) -> u64 {
		let mut guard = map.write();
		let slot = guard
			.entry(key)
			.and_modify(|slot| {
				if slot.deadline.is_some_and(|deadline| deadline <= now) {
					*slot = CounterSlot { count: 0, deadline: None };
				}
			})
			.or_insert(CounterSlot { count: 0, deadline: None });

		slot.count += 1;

		slot.count
	}

	fn expire_now(map: CounterMap, key: String, deadline: OffsetDateTime) {
		if let Some(slot) = map.write().get_mut(&key) {
			slot.deadline = Some(deadline);
		}
	}
}
impl CounterStore for MemoryCounterStore {
	fn increment<'a>(&'a self, key: &'a str) -> CounterFuture<'a, u64> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::increment_now(map, key, OffsetDateTime::now_utc())) })
	}

	fn expire<'a>(&'a self, key: &'a str, window: Duration) -> CounterFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move {
			Self::expire_now(map, key, OffsetDateTime::now_utc() + window);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn increments_are_sequential_per_key() {
		let store = MemoryCounterStore::default();

		assert_eq!(store.increment("rate_limit:a").await.expect("Increment should succeed."), 1);
		assert_eq!(store.increment("rate_limit:a").await.expect("Increment should succeed."), 2);
		assert_eq!(store.increment("rate_limit:b").await.expect("Increment should succeed."), 1);
	}

	#[tokio::test]
	async fn elapsed_counters_are_recreated() {
		let store = MemoryCounterStore::default();

		assert_eq!(store.increment("rate_limit:a").await.expect("Increment should succeed."), 1);

		store
			.expire("rate_limit:a", Duration::milliseconds(-1))
			.await
			.expect("Setting an already-elapsed deadline should succeed.");

		assert_eq!(store.increment("rate_limit:a").await.expect("Increment should succeed."), 1);
	}

	#[tokio::test]
	async fn concurrent_increments_never_share_a_count() {
		let store = Arc::new(MemoryCounterStore::default());
		let tasks: Vec<_> = (0..16)
			.map(|_| {
				let store = store.clone();

				tokio::spawn(async move { store.increment("rate_limit:shared").await })
			})
			.collect();
		let mut counts = Vec::new();

		for task in tasks {
			counts.push(
				task.await
					.expect("Increment task should not panic.")
					.expect("Increment should succeed."),
			);
		}

		counts.sort_unstable();

		assert_eq!(counts, (1..=16).collect::<Vec<_>>());
	}
}
