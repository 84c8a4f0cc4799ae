//! Broker-level error types shared across flows, the signer, and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure; transient and retryable, never a verdict on the token itself.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Access-token signing or verification failure.
	#[error(transparent)]
	Signer(#[from] crate::signer::SignerError),

	/// Presented credentials were rejected by the verification collaborator.
	#[error("Credentials were rejected.")]
	InvalidCredentials,
	/// The client key exhausted its fixed-window request budget.
	#[error("Too many requests for this client key.")]
	RateLimited,
	/// No stored record matches the presented refresh secret.
	#[error("Refresh token is not recognized.")]
	UnknownRefreshToken,
	/// An already-rotated refresh secret was presented again; every session for the owning
	/// subject has been revoked.
	#[error("Refresh token reuse detected; all sessions for the subject were revoked.")]
	ReuseDetected,
	/// The presented refresh secret matched a record past its expiry instant.
	#[error("Refresh token has expired.")]
	ExpiredRefreshToken,
	/// The owning subject is no longer present in the subject directory.
	#[error("Subject is no longer known to the directory.")]
	UnknownSubject,
}
impl Error {
	/// Returns `true` when the caller must send the user back through a full login.
	///
	/// Every refresh-path rejection maps to this outcome; [`Error::ReuseDetected`] additionally
	/// deserves security alerting before the re-login is forced.
	pub fn requires_login(&self) -> bool {
		matches!(
			self,
			Self::InvalidCredentials
				| Self::UnknownRefreshToken
				| Self::ReuseDetected
				| Self::ExpiredRefreshToken
				| Self::UnknownSubject
		)
	}

	/// Returns `true` when the failure is transient and the caller may retry with backoff.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Storage(_))
	}
}
