//! Persisted refresh-token record and its lifecycle helpers.

// self
use crate::{
	_prelude::*,
	auth::{id::SubjectId, token::secret::Fingerprint},
};

/// Current lifecycle status for a refresh record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
	/// Record is currently valid.
	Active,
	/// Record exceeded its expiry instant.
	Expired,
	/// Record has been revoked by rotation, reuse detection, or an explicit revoke.
	Revoked,
}

/// Persisted refresh-token record.
///
/// Only the one-way fingerprint of the raw secret is stored; the record is mutated exactly
/// once, to flip [`revoked_at`](Self::revoked_at), and never reverses that transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
	/// One-way fingerprint of the raw secret; unique across all records.
	pub fingerprint: Fingerprint,
	/// Subject that exclusively owns this record.
	pub subject: SubjectId,
	/// Instant the record was created.
	pub created_at: OffsetDateTime,
	/// Expiry instant after which the record is no longer rotatable.
	pub expires_at: OffsetDateTime,
	/// Revocation instant if the record has been revoked.
	pub revoked_at: Option<OffsetDateTime>,
}
impl RefreshRecord {
	/// Creates an unrevoked record for the provided owner and lifetime bounds.
	pub fn new(
		fingerprint: Fingerprint,
		subject: SubjectId,
		created_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		Self { fingerprint, subject, created_at, expires_at, revoked_at: None }
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> RecordStatus {
		if self.revoked_at.is_some() {
			return RecordStatus::Revoked;
		}
		if instant >= self.expires_at {
			return RecordStatus::Expired;
		}

		RecordStatus::Active
	}

	/// Returns `true` if the record has been revoked.
	pub fn is_revoked(&self) -> bool {
		self.revoked_at.is_some()
	}

	/// Returns `true` if the record has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), RecordStatus::Expired)
	}

	/// Marks the record as revoked; repeat calls keep the original revocation instant.
	pub fn revoke(&mut self, instant: OffsetDateTime) {
		if self.revoked_at.is_none() {
			self.revoked_at = Some(instant);
		}
	}
}
