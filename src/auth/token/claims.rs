//! Fixed, explicitly-typed claim structure carried by access tokens.

// self
use crate::{
	_prelude::*,
	auth::{id::SubjectId, role::Role},
};

/// Claims embedded in every signed access token.
///
/// The structure is closed; verification deserializes into these exact fields and rejects
/// payloads that do not fit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Owning subject identifier.
	pub sub: SubjectId,
	/// Role classification granted at issuance.
	pub role: Role,
	/// Issued-at instant as a Unix timestamp.
	pub iat: i64,
	/// Expiry instant as a Unix timestamp.
	pub exp: i64,
}
impl AccessClaims {
	/// Builds claims for the provided subject/role at the given instant plus lifetime.
	pub fn new(sub: SubjectId, role: Role, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		let iat = issued_at.unix_timestamp();

		Self { sub, role, iat, exp: iat + ttl.whole_seconds() }
	}

	/// Expiry instant reconstructed from the `exp` claim.
	pub fn expires_at(&self) -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}
}
