//! Fixed-window rate limiting over an ephemeral counting store.

pub mod counter;

pub use counter::{CounterFuture, CounterStore, MemoryCounterStore};

// self
use crate::{_prelude::*, auth::ClientKey};

/// Counter key prefix shared with the ephemeral store (`rate_limit:{client key}`).
const KEY_PREFIX: &str = "rate_limit:";

/// Decision emitted for each request against a client key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitDecision {
	/// The request may proceed.
	Allow,
	/// The window budget is exhausted; reject with a "too many requests" outcome.
	Deny,
}
impl LimitDecision {
	/// Returns `true` when the request may proceed.
	pub fn is_allow(self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Fixed-window request counter gating authentication endpoints.
///
/// Counting is a single atomic increment per request, so the cost stays O(1); the trade-off
/// is that a burst straddling a window boundary can momentarily admit up to twice the budget.
/// That is a documented property of fixed windows, not a defect.
#[derive(Clone)]
pub struct RateLimiter {
	counters: Arc<dyn CounterStore>,
	max_requests: u64,
	window: Duration,
}
impl RateLimiter {
	const DEFAULT_MAX_REQUESTS: u64 = 100;
	const DEFAULT_WINDOW: Duration = Duration::seconds(60);

	/// Creates a limiter over the provided counting store with default budget and window.
	pub fn new(counters: Arc<dyn CounterStore>) -> Self {
		Self {
			counters,
			max_requests: Self::DEFAULT_MAX_REQUESTS,
			window: Self::DEFAULT_WINDOW,
		}
	}

	/// Overrides the per-window request budget (defaults to 100).
	pub fn with_max_requests(mut self, max_requests: u64) -> Self {
		self.max_requests = max_requests;

		self
	}

	/// Overrides the window duration (defaults to 60 seconds).
	pub fn with_window(mut self, window: Duration) -> Self {
		self.window = window;

		self
	}

	/// Counts the request against the client key and decides whether to admit it.
	///
	/// The first request in a window creates the counter and stamps its expiry; concurrent
	/// callers sharing a key are serialized by the store's atomic increment, so no two of
	/// them can observe the same pre-increment count.
	pub async fn check(&self, key: &ClientKey) -> Result<LimitDecision> {
		let storage_key = format!("{KEY_PREFIX}{key}");
		let count = self.counters.increment(&storage_key).await?;

		if count == 1 {
			self.counters.expire(&storage_key, self.window).await?;
		}

		if count <= self.max_requests { Ok(LimitDecision::Allow) } else { Ok(LimitDecision::Deny) }
	}

	/// Convenience gate that maps a denial to [`Error::RateLimited`].
	pub async fn ensure_allowed(&self, key: &ClientKey) -> Result<()> {
		match self.check(key).await? {
			LimitDecision::Allow => Ok(()),
			LimitDecision::Deny => Err(Error::RateLimited),
		}
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("max_requests", &self.max_requests)
			.field("window", &self.window)
			.finish()
	}
}

/// Derives the rate-limit client key for a request.
///
/// Prefers the first address of a forwarded-for header chain and falls back to the direct
/// peer address when the header is absent or unusable.
pub fn derive_client_key(
	forwarded_for: Option<&str>,
	peer_addr: &str,
) -> Result<ClientKey, crate::auth::IdentifierError> {
	if let Some(chain) = forwarded_for
		&& let Some(first) = chain.split(',').next()
		&& let Ok(key) = ClientKey::new(first.trim())
	{
		return Ok(key);
	}

	ClientKey::new(peer_addr)
}
