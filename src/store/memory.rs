//! Thread-safe in-memory [`RefreshTokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Fingerprint, RefreshRecord, SubjectId},
	store::{RefreshTokenStore, RevocationOutcome, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<Fingerprint, RefreshRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
///
/// All mutations run under a single write lock, which also provides the per-fingerprint
/// compare-and-swap semantics the [`RefreshTokenStore`] contract requires.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn insert_now(map: StoreMap, record: RefreshRecord) -> Result<(), StoreError> {
		let mut guard = map.write();

		if guard.contains_key(&record.fingerprint) {
			return Err(StoreError::Backend {
				message: "fingerprint already exists".into(),
			});
		}

		guard.insert(record.fingerprint.clone(), record);

		Ok(())
	}

	fn find_now(map: StoreMap, fingerprint: Fingerprint) -> Option<RefreshRecord> {
		map.read().get(&fingerprint).cloned()
	}

	fn find_all_now(map: StoreMap, subject: SubjectId) -> Vec<RefreshRecord> {
		map.read().values().filter(|record| record.subject == subject).cloned().collect()
	}

	fn revoke_now(
		map: StoreMap,
		fingerprint: Fingerprint,
		instant: OffsetDateTime,
	) -> RevocationOutcome {
		let mut guard = map.write();

		match guard.get_mut(&fingerprint) {
			Some(record) if record.is_revoked() => RevocationOutcome::AlreadyRevoked,
			Some(record) => {
				record.revoke(instant);

				RevocationOutcome::Revoked
			},
			None => RevocationOutcome::Missing,
		}
	}

	fn delete_many_now(map: StoreMap, fingerprints: Vec<Fingerprint>) -> usize {
		let mut guard = map.write();

		fingerprints.into_iter().filter(|fingerprint| guard.remove(fingerprint).is_some()).count()
	}
}
impl RefreshTokenStore for MemoryStore {
	fn insert(&self, record: RefreshRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::insert_now(map, record) })
	}

	fn find<'a>(&'a self, fingerprint: &'a Fingerprint) -> StoreFuture<'a, Option<RefreshRecord>> {
		let map = self.0.clone();
		let fingerprint = fingerprint.to_owned();

		Box::pin(async move { Ok(Self::find_now(map, fingerprint)) })
	}

	fn find_all<'a>(&'a self, subject: &'a SubjectId) -> StoreFuture<'a, Vec<RefreshRecord>> {
		let map = self.0.clone();
		let subject = subject.to_owned();

		Box::pin(async move { Ok(Self::find_all_now(map, subject)) })
	}

	fn revoke<'a>(
		&'a self,
		fingerprint: &'a Fingerprint,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, RevocationOutcome> {
		let map = self.0.clone();
		let fingerprint = fingerprint.to_owned();

		Box::pin(async move { Ok(Self::revoke_now(map, fingerprint, instant)) })
	}

	fn delete_many<'a>(&'a self, fingerprints: &'a [Fingerprint]) -> StoreFuture<'a, usize> {
		let map = self.0.clone();
		let fingerprints = fingerprints.to_vec();

		Box::pin(async move { Ok(Self::delete_many_now(map, fingerprints)) })
	}
}
