// std
use std::sync::Arc;
// crates.io
use time::Duration;
// self
use session_broker::{
	auth::ClientKey,
	error::Error,
	limit::{LimitDecision, MemoryCounterStore, RateLimiter, derive_client_key},
};

fn build_limiter(max_requests: u64, window: Duration) -> RateLimiter {
	RateLimiter::new(Arc::new(MemoryCounterStore::default()))
		.with_max_requests(max_requests)
		.with_window(window)
}

#[tokio::test]
async fn default_style_budget_admits_exactly_the_configured_count() {
	let limiter = build_limiter(100, Duration::seconds(60));
	let key = ClientKey::new("203.0.113.9").expect("Client key fixture should be valid.");

	for attempt in 0..100 {
		assert_eq!(
			limiter.check(&key).await.expect("Counting should succeed."),
			LimitDecision::Allow,
			"Request {attempt} should be admitted.",
		);
	}

	assert_eq!(
		limiter.check(&key).await.expect("Counting should succeed."),
		LimitDecision::Deny
	);
}

#[tokio::test]
async fn window_expiry_restores_the_budget() {
	let limiter = build_limiter(2, Duration::milliseconds(40));
	let key = ClientKey::new("203.0.113.9").expect("Client key fixture should be valid.");

	assert!(limiter.check(&key).await.expect("Counting should succeed.").is_allow());
	assert!(limiter.check(&key).await.expect("Counting should succeed.").is_allow());
	assert!(!limiter.check(&key).await.expect("Counting should succeed.").is_allow());

	tokio::time::sleep(std::time::Duration::from_millis(60)).await;

	assert!(limiter.check(&key).await.expect("Counting should succeed.").is_allow());
}

#[tokio::test]
async fn concurrent_requests_cannot_overrun_the_budget() {
	let limiter = Arc::new(build_limiter(10, Duration::seconds(60)));
	let key = ClientKey::new("203.0.113.9").expect("Client key fixture should be valid.");
	let tasks: Vec<_> = (0..32)
		.map(|_| {
			let limiter = limiter.clone();
			let key = key.clone();

			tokio::spawn(async move { limiter.check(&key).await })
		})
		.collect();
	let mut admitted = 0;

	for task in tasks {
		if task
			.await
			.expect("Rate limit task should not panic.")
			.expect("Counting should succeed.")
			.is_allow()
		{
			admitted += 1;
		}
	}

	assert_eq!(admitted, 10);
}

#[tokio::test]
async fn gate_maps_denials_to_rate_limited() {
	let limiter = build_limiter(1, Duration::seconds(60));
	let key = ClientKey::new("203.0.113.9").expect("Client key fixture should be valid.");

	limiter.ensure_allowed(&key).await.expect("First request should pass the gate.");

	match limiter.ensure_allowed(&key).await {
		Err(Error::RateLimited) => {},
		other => panic!("Denial should map to Error::RateLimited, got {other:?}."),
	}
}

#[test]
fn client_keys_follow_the_forwarded_chain_first() {
	let from_header = derive_client_key(Some("198.51.100.7, 10.0.0.2, 10.0.0.1"), "192.0.2.1")
		.expect("Forwarded chain should yield a client key.");

	assert_eq!(from_header.as_ref(), "198.51.100.7");

	let from_peer = derive_client_key(None, "192.0.2.1")
		.expect("Peer address should yield a client key.");

	assert_eq!(from_peer.as_ref(), "192.0.2.1");
}
