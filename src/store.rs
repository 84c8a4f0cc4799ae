//! Storage contracts and the built-in store implementation for refresh-token records.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Fingerprint, RefreshRecord, SubjectId},
};

/// Boxed future returned by [`RefreshTokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for refresh-token records.
///
/// Implementations must serialize mutations per fingerprint: [`revoke`](Self::revoke) is a
/// compare-and-swap on the revocation flag, and exactly one of any number of concurrent
/// callers observes [`RevocationOutcome::Revoked`]. Every operation should carry a bounded
/// deadline and surface overruns as [`StoreError::Timeout`], never as an absent record.
pub trait RefreshTokenStore
where
	Self: Send + Sync,
{
	/// Persists a new record; the fingerprint must not already exist.
	fn insert(&self, record: RefreshRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record stored under the fingerprint, if present.
	fn find<'a>(&'a self, fingerprint: &'a Fingerprint) -> StoreFuture<'a, Option<RefreshRecord>>;

	/// Fetches every record owned by the subject, revoked and expired ones included.
	fn find_all<'a>(&'a self, subject: &'a SubjectId) -> StoreFuture<'a, Vec<RefreshRecord>>;

	/// Atomically flips the revocation flag of the record stored under the fingerprint.
	fn revoke<'a>(
		&'a self,
		fingerprint: &'a Fingerprint,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, RevocationOutcome>;

	/// Deletes the records stored under the provided fingerprints, returning how many existed.
	fn delete_many<'a>(&'a self, fingerprints: &'a [Fingerprint]) -> StoreFuture<'a, usize>;
}

/// Result of a revocation compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevocationOutcome {
	/// This call flipped the flag from unrevoked to revoked.
	Revoked,
	/// The record was already revoked by an earlier call.
	AlreadyRevoked,
	/// No record matched the provided fingerprint.
	Missing,
}

/// Error type produced by [`RefreshTokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A store operation exceeded its deadline; retryable, not a verdict on the record.
	#[error("Store operation `{operation}` timed out.")]
	Timeout {
		/// Logical operation name (insert, find, revoke, ...).
		operation: String,
	},
}
impl From<serde_json::Error> for StoreError {
	fn from(source: serde_json::Error) -> Self {
		Self::Serialization { message: source.to_string() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_failures_surface_as_serialization_errors() {
		let source = serde_json::from_str::<RefreshRecord>("{")
			.expect_err("Truncated JSON should fail to parse.");
		let store_error: StoreError = source.into();

		assert!(matches!(store_error, StoreError::Serialization { .. }));
	}

	#[test]
	fn timeouts_are_not_conflated_with_missing_records() {
		let timeout: Error = StoreError::Timeout { operation: "find".into() }.into();

		assert!(timeout.is_transient());
		assert!(!matches!(timeout, Error::UnknownRefreshToken));
	}
}
