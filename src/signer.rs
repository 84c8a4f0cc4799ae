//! Stateless access-token signing and verification.

// crates.io
use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind as JwtErrorKind,
};
// self
use crate::{
	_prelude::*,
	auth::{AccessClaims, Role, SubjectId},
};

/// Minimum signing-secret length in bytes for HS256.
const MIN_KEY_LEN: usize = 32;

/// Errors produced by [`AccessTokenSigner`].
#[derive(Debug, ThisError)]
pub enum SignerError {
	/// The configured signing secret is too short; raised once at construction, never
	/// per-request.
	#[error("Signing secret must be at least {min} bytes.")]
	WeakKey {
		/// Minimum permitted secret length.
		min: usize,
	},
	/// Token claims could not be encoded and signed.
	#[error("Access token could not be signed.")]
	Sign {
		/// Underlying JWT encoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The token signature does not match the configured key.
	#[error("Access token signature is invalid.")]
	InvalidSignature,
	/// The token is past its expiry instant.
	#[error("Access token has expired.")]
	Expired,
	/// The token is structurally invalid or carries claims that do not fit the schema.
	#[error("Access token is malformed.")]
	Malformed {
		/// Underlying JWT decoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Signs and verifies self-contained access tokens (HS256 JWTs).
///
/// The signing key is derived once from the configured secret and is immutable afterwards,
/// so a single signer can be shared across request workers without synchronization. The
/// signer performs no I/O; both operations are pure transforms over the claim set.
pub struct AccessTokenSigner {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
	access_ttl: Duration,
}
impl AccessTokenSigner {
	const DEFAULT_ACCESS_TTL: Duration = Duration::minutes(15);

	/// Creates a signer from the configured secret, rejecting secrets shorter than 32 bytes.
	pub fn new(secret: &[u8]) -> Result<Self, SignerError> {
		if secret.len() < MIN_KEY_LEN {
			return Err(SignerError::WeakKey { min: MIN_KEY_LEN });
		}

		let mut validation = Validation::new(Algorithm::HS256);

		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp"]);

		Ok(Self {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
			validation,
			access_ttl: Self::DEFAULT_ACCESS_TTL,
		})
	}

	/// Overrides the access-token lifetime (defaults to 15 minutes).
	pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
		self.access_ttl = ttl;

		self
	}

	/// Returns the configured access-token lifetime.
	pub fn access_ttl(&self) -> Duration {
		self.access_ttl
	}

	/// Issues a signed access token for the subject/role pair, valid from now.
	pub fn issue(&self, subject: SubjectId, role: Role) -> Result<String, SignerError> {
		self.issue_at(subject, role, OffsetDateTime::now_utc())
	}

	/// Issues a signed access token whose validity window starts at the provided instant.
	pub fn issue_at(
		&self,
		subject: SubjectId,
		role: Role,
		issued_at: OffsetDateTime,
	) -> Result<String, SignerError> {
		let claims = AccessClaims::new(subject, role, issued_at, self.access_ttl);

		jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
			.map_err(|source| SignerError::Sign { source })
	}

	/// Verifies a signed access token and returns its claims.
	///
	/// Signature integrity is checked before expiry, so a forged-but-expired token reports
	/// [`SignerError::InvalidSignature`] rather than [`SignerError::Expired`]. Both map to the
	/// same outward auth-denied outcome; callers distinguish them for logging only.
	pub fn verify(&self, token: &str) -> Result<AccessClaims, SignerError> {
		jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &self.validation)
			.map(|data| data.claims)
			.map_err(|source| match source.kind() {
				JwtErrorKind::ExpiredSignature => SignerError::Expired,
				JwtErrorKind::InvalidSignature => SignerError::InvalidSignature,
				_ => SignerError::Malformed { source },
			})
	}
}
impl Debug for AccessTokenSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenSigner")
			.field("key", &"<redacted>")
			.field("access_ttl", &self.access_ttl)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SECRET: &[u8] = b"an-hs256-secret-that-is-long-enough-0001";

	fn subject() -> SubjectId {
		SubjectId::new("subject-1").expect("Subject fixture should be valid.")
	}

	#[test]
	fn short_secrets_are_rejected_at_construction() {
		assert!(matches!(
			AccessTokenSigner::new(b"too-short"),
			Err(SignerError::WeakKey { min: MIN_KEY_LEN })
		));
	}

	#[test]
	fn issue_verify_round_trip_preserves_claims() {
		let signer = AccessTokenSigner::new(SECRET).expect("Signer fixture should build.");
		let token = signer.issue(subject(), Role::Admin).expect("Issuance should succeed.");
		let claims = signer.verify(&token).expect("Verification should succeed before expiry.");

		assert_eq!(claims.sub, subject());
		assert_eq!(claims.role, Role::Admin);
		assert_eq!(claims.exp - claims.iat, signer.access_ttl().whole_seconds());
	}

	#[test]
	fn expired_tokens_are_reported_distinctly() {
		let signer = AccessTokenSigner::new(SECRET)
			.expect("Signer fixture should build.")
			.with_access_ttl(Duration::minutes(15));
		let stale_issue = OffsetDateTime::now_utc() - Duration::hours(1);
		let token = signer
			.issue_at(subject(), Role::User, stale_issue)
			.expect("Issuance with a past instant should succeed.");

		assert!(matches!(signer.verify(&token), Err(SignerError::Expired)));
	}

	#[test]
	fn foreign_signatures_are_rejected_before_expiry_checks() {
		let signer = AccessTokenSigner::new(SECRET).expect("Signer fixture should build.");
		let forger = AccessTokenSigner::new(b"a-different-secret-that-is-long-enough-2")
			.expect("Forger fixture should build.")
			.with_access_ttl(Duration::minutes(-5));
		let forged = forger
			.issue(subject(), Role::Admin)
			.expect("Forged issuance should succeed locally.");

		// Forged and already expired; the signature verdict must win.
		assert!(matches!(signer.verify(&forged), Err(SignerError::InvalidSignature)));
	}

	#[test]
	fn garbage_tokens_are_malformed() {
		let signer = AccessTokenSigner::new(SECRET).expect("Signer fixture should build.");

		assert!(matches!(
			signer.verify("not-a-token"),
			Err(SignerError::Malformed { .. })
		));
	}

	#[test]
	fn debug_redacts_key_material() {
		let signer = AccessTokenSigner::new(SECRET).expect("Signer fixture should build.");

		assert!(format!("{signer:?}").contains("<redacted>"));
	}
}
