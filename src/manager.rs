//! Refresh-token issuance, rotation, reuse detection, and session capping.

// self
use crate::{
	_prelude::*,
	auth::{RefreshRecord, RefreshSecret, SubjectId},
	store::{RefreshTokenStore, RevocationOutcome},
};

/// Raw secret and expiry handed back to the caller when a refresh token is minted.
///
/// The raw value inside exists nowhere else; the store only holds its fingerprint.
#[derive(Clone, Debug)]
pub struct IssuedRefresh {
	/// Raw refresh secret; returned to the caller exactly once.
	pub secret: RefreshSecret,
	/// Expiry instant of the stored record.
	pub expires_at: OffsetDateTime,
}

/// Result of a successful rotation.
#[derive(Clone, Debug)]
pub struct RotatedRefresh {
	/// Subject that owns the rotated session.
	pub subject: SubjectId,
	/// Replacement raw secret.
	pub secret: RefreshSecret,
	/// Expiry instant of the replacement record.
	pub expires_at: OffsetDateTime,
}

/// Orchestrates the refresh-token lifecycle against a [`RefreshTokenStore`].
///
/// The manager holds no locks of its own; rotation races are resolved by the store's
/// per-fingerprint revocation compare-and-swap.
#[derive(Clone)]
pub struct RefreshTokenManager {
	store: Arc<dyn RefreshTokenStore>,
	refresh_ttl: Duration,
	max_active: usize,
}
impl RefreshTokenManager {
	const DEFAULT_MAX_ACTIVE: usize = 5;
	const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);

	/// Creates a manager over the provided store with default lifetime and session cap.
	pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
		Self {
			store,
			refresh_ttl: Self::DEFAULT_REFRESH_TTL,
			max_active: Self::DEFAULT_MAX_ACTIVE,
		}
	}

	/// Overrides the refresh-token lifetime (defaults to 7 days).
	pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
		self.refresh_ttl = ttl;

		self
	}

	/// Overrides the per-subject session cap (defaults to 5).
	pub fn with_max_active(mut self, max_active: usize) -> Self {
		self.max_active = max_active;

		self
	}

	/// Returns the configured per-subject session cap.
	pub fn max_active(&self) -> usize {
		self.max_active
	}

	/// Mints a refresh token for the subject and returns the raw secret.
	pub async fn issue(&self, subject: &SubjectId) -> Result<IssuedRefresh> {
		self.issue_at(subject, OffsetDateTime::now_utc()).await
	}

	async fn issue_at(&self, subject: &SubjectId, now: OffsetDateTime) -> Result<IssuedRefresh> {
		let secret = RefreshSecret::generate();
		let expires_at = now + self.refresh_ttl;
		let record =
			RefreshRecord::new(secret.fingerprint(), subject.clone(), now, expires_at);

		self.store.insert(record).await?;

		Ok(IssuedRefresh { secret, expires_at })
	}

	/// Exchanges a presented raw secret for a replacement, enforcing single use.
	///
	/// A revoked record is a reuse signal: the whole session family for the owning subject is
	/// revoked and [`Error::ReuseDetected`] is returned. An expired-but-unrevoked record being
	/// presented is suspicious too and triggers the same family-wide revocation with
	/// [`Error::ExpiredRefreshToken`]. On the happy path the replacement record is written
	/// before the presented one is revoked, so a crash in between never leaves the subject
	/// without a usable refresh token.
	pub async fn rotate(&self, presented: &RefreshSecret) -> Result<RotatedRefresh> {
		let now = OffsetDateTime::now_utc();
		let fingerprint = presented.fingerprint();
		let record =
			self.store.find(&fingerprint).await?.ok_or(Error::UnknownRefreshToken)?;

		if record.is_revoked() {
			self.revoke_all(&record.subject).await?;

			return Err(Error::ReuseDetected);
		}
		if record.is_expired_at(now) {
			self.revoke_all(&record.subject).await?;

			return Err(Error::ExpiredRefreshToken);
		}

		let issued = self.issue_at(&record.subject, now).await?;

		match self.store.revoke(&fingerprint, now).await? {
			RevocationOutcome::Revoked => {},
			RevocationOutcome::AlreadyRevoked => {
				// Lost the rotation race; a concurrent caller presented the same secret.
				self.revoke_all(&record.subject).await?;

				return Err(Error::ReuseDetected);
			},
			RevocationOutcome::Missing => {
				// The record vanished between lookup and revoke (logout or prune); drop the
				// replacement so the family stays gone.
				self.store.delete_many(&[issued.secret.fingerprint()]).await?;

				return Err(Error::UnknownRefreshToken);
			},
		}

		self.prune(&record.subject, self.max_active).await?;

		Ok(RotatedRefresh {
			subject: record.subject,
			secret: issued.secret,
			expires_at: issued.expires_at,
		})
	}

	/// Deletes oldest-by-expiry records for the subject until at most `max_active` remain.
	///
	/// Revoked leftovers count toward the cap and sort oldest, so repeated rotations sweep
	/// them out first. Returns the number of deleted records.
	pub async fn prune(&self, subject: &SubjectId, max_active: usize) -> Result<usize> {
		let mut records = self.store.find_all(subject).await?;

		if records.len() <= max_active {
			return Ok(0);
		}

		records.sort_by_key(|record| record.expires_at);

		let excess: Vec<_> = records
			.iter()
			.take(records.len() - max_active)
			.map(|record| record.fingerprint.clone())
			.collect();

		Ok(self.store.delete_many(&excess).await?)
	}

	/// Revokes every non-revoked record for the subject; idempotent.
	pub async fn revoke_all(&self, subject: &SubjectId) -> Result<()> {
		let now = OffsetDateTime::now_utc();

		for record in self.store.find_all(subject).await? {
			if !record.is_revoked() {
				// AlreadyRevoked/Missing are fine here; another caller got there first.
				self.store.revoke(&record.fingerprint, now).await?;
			}
		}

		Ok(())
	}

	/// Deletes every refresh record for the subject outright (logout).
	pub async fn delete_all(&self, subject: &SubjectId) -> Result<usize> {
		let fingerprints: Vec<_> = self
			.store
			.find_all(subject)
			.await?
			.into_iter()
			.map(|record| record.fingerprint)
			.collect();

		Ok(self.store.delete_many(&fingerprints).await?)
	}
}
impl Debug for RefreshTokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTokenManager")
			.field("refresh_ttl", &self.refresh_ttl)
			.field("max_active", &self.max_active)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	fn subject() -> SubjectId {
		SubjectId::new("subject-1").expect("Subject fixture should be valid.")
	}

	fn build_manager() -> (RefreshTokenManager, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::default());

		(RefreshTokenManager::new(store.clone()), store)
	}

	#[tokio::test]
	async fn issue_returns_raw_secret_and_stores_only_the_fingerprint() {
		let (manager, store) = build_manager();
		let issued = manager.issue(&subject()).await.expect("Issuance should succeed.");
		let records =
			store.find_all(&subject()).await.expect("Listing records should succeed.");

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].fingerprint, issued.secret.fingerprint());
		assert_ne!(records[0].fingerprint.as_str(), issued.secret.expose());
		assert!(!records[0].is_revoked());
	}

	#[tokio::test]
	async fn rotation_is_single_use_and_replay_revokes_the_family() {
		let (manager, store) = build_manager();
		let issued = manager.issue(&subject()).await.expect("Issuance should succeed.");
		let rotated =
			manager.rotate(&issued.secret).await.expect("First rotation should succeed.");

		assert_eq!(rotated.subject, subject());

		// Replay of the consumed secret.
		assert!(matches!(manager.rotate(&issued.secret).await, Err(Error::ReuseDetected)));

		// The replacement from the successful rotation is dead too.
		assert!(matches!(manager.rotate(&rotated.secret).await, Err(Error::ReuseDetected)));

		let records =
			store.find_all(&subject()).await.expect("Listing records should succeed.");

		assert!(records.iter().all(RefreshRecord::is_revoked));
	}

	#[tokio::test]
	async fn unknown_secrets_are_rejected_without_side_effects() {
		let (manager, store) = build_manager();

		manager.issue(&subject()).await.expect("Issuance should succeed.");

		assert!(matches!(
			manager.rotate(&RefreshSecret::generate()).await,
			Err(Error::UnknownRefreshToken)
		));

		let records =
			store.find_all(&subject()).await.expect("Listing records should succeed.");

		assert!(records.iter().all(|record| !record.is_revoked()));
	}

	#[tokio::test]
	async fn expired_presentation_revokes_the_family() {
		let (manager, _) = build_manager();
		let manager = manager.with_refresh_ttl(Duration::seconds(-1));
		let issued = manager.issue(&subject()).await.expect("Issuance should succeed.");
		let fresh_manager = manager.clone().with_refresh_ttl(Duration::days(7));
		let survivor =
			fresh_manager.issue(&subject()).await.expect("Second issuance should succeed.");

		assert!(matches!(
			manager.rotate(&issued.secret).await,
			Err(Error::ExpiredRefreshToken)
		));
		// Family-wide revocation caught the still-live sibling as well.
		assert!(matches!(
			fresh_manager.rotate(&survivor.secret).await,
			Err(Error::ReuseDetected)
		));
	}

	#[tokio::test]
	async fn session_cap_prunes_oldest_by_expiry() {
		let (manager, store) = build_manager();
		let manager = manager.with_max_active(3);
		let mut secrets = Vec::new();

		for _ in 0..3 {
			secrets.push(
				manager.issue(&subject()).await.expect("Issuance should succeed.").secret,
			);
		}

		// Rotating grows the family past the cap (replacement + revoked leftover); prune must
		// bring it back down by discarding the oldest expiries.
		let newest = secrets.pop().expect("Secret fixture should exist.");
		let rotated = manager.rotate(&newest).await.expect("Rotation should succeed.");
		let records =
			store.find_all(&subject()).await.expect("Listing records should succeed.");

		assert_eq!(records.len(), 3);
		assert!(records.iter().any(|record| record.fingerprint == rotated.secret.fingerprint()));
	}

	#[tokio::test]
	async fn revoke_all_is_idempotent() {
		let (manager, store) = build_manager();

		manager.issue(&subject()).await.expect("Issuance should succeed.");
		manager.issue(&subject()).await.expect("Issuance should succeed.");
		manager.revoke_all(&subject()).await.expect("First revocation pass should succeed.");

		let after_first =
			store.find_all(&subject()).await.expect("Listing records should succeed.");

		manager.revoke_all(&subject()).await.expect("Second revocation pass should succeed.");

		let after_second =
			store.find_all(&subject()).await.expect("Listing records should succeed.");
		let mut first_sorted = after_first.clone();
		let mut second_sorted = after_second.clone();

		first_sorted.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
		second_sorted.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));

		assert!(after_first.iter().all(RefreshRecord::is_revoked));
		assert_eq!(first_sorted, second_sorted);
	}

	#[tokio::test]
	async fn delete_all_empties_the_family() {
		let (manager, store) = build_manager();

		manager.issue(&subject()).await.expect("Issuance should succeed.");
		manager.issue(&subject()).await.expect("Issuance should succeed.");

		let removed =
			manager.delete_all(&subject()).await.expect("Logout deletion should succeed.");

		assert_eq!(removed, 2);
		assert!(store.find_all(&subject()).await.expect("Listing should succeed.").is_empty());
	}

	#[tokio::test]
	async fn concurrent_rotations_of_one_secret_yield_one_success() {
		let (manager, _) = build_manager();
		let issued = manager.issue(&subject()).await.expect("Issuance should succeed.");
		let tasks: Vec<_> = (0..4)
			.map(|_| {
				let manager = manager.clone();
				let secret = issued.secret.clone();

				tokio::spawn(async move { manager.rotate(&secret).await })
			})
			.collect();
		let mut successes = 0;
		let mut reuse_failures = 0;

		for task in tasks {
			match task.await.expect("Rotation task should not panic.") {
				Ok(_) => successes += 1,
				Err(Error::ReuseDetected) => reuse_failures += 1,
				Err(other) => panic!("Unexpected rotation failure: {other}."),
			}
		}

		assert_eq!(successes, 1);
		assert_eq!(reuse_failures, 3);
	}
}
