//! High-level session use cases composed from the signer and the refresh-token manager.

pub mod login;
pub mod logout;
pub mod refresh;

pub use refresh::RotationMetrics;

// self
use crate::{
	_prelude::*,
	auth::RefreshSecret,
	ext::SubjectDirectory,
	manager::RefreshTokenManager,
	signer::AccessTokenSigner,
};

/// Coordinates the login/refresh/logout use cases.
///
/// The broker owns the signer, the refresh-token manager, and a read-only view over the
/// subject directory so individual flow implementations can focus on use-case logic.
/// Credential verification stays outside; callers hand the broker an already-verified
/// subject identity.
#[derive(Clone)]
pub struct SessionBroker {
	/// Signer used for every issued access token.
	pub signer: Arc<AccessTokenSigner>,
	/// Manager that drives refresh-token issuance, rotation, and revocation.
	pub manager: RefreshTokenManager,
	/// Directory used to resolve the owning subject's role during refresh.
	pub directory: Arc<dyn SubjectDirectory>,
	/// Shared metrics recorder for rotation outcomes.
	pub rotation_metrics: Arc<RotationMetrics>,
}
impl SessionBroker {
	/// Creates a broker from its three collaborators.
	pub fn new(
		signer: impl Into<Arc<AccessTokenSigner>>,
		manager: RefreshTokenManager,
		directory: Arc<dyn SubjectDirectory>,
	) -> Self {
		Self {
			signer: signer.into(),
			manager,
			directory,
			rotation_metrics: Default::default(),
		}
	}
}
impl Debug for SessionBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionBroker")
			.field("signer", &self.signer)
			.field("manager", &self.manager)
			.finish()
	}
}

/// Externally consumable result of a successful login or refresh.
#[derive(Clone)]
pub struct SessionTokens {
	/// Signed access token; self-contained and never persisted.
	pub access_token: String,
	/// Raw refresh secret; handed to the caller exactly once.
	pub refresh_secret: RefreshSecret,
	/// Expiry instant of the stored refresh record.
	pub refresh_expires_at: OffsetDateTime,
}
impl Debug for SessionTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionTokens")
			.field("access_token", &"<redacted>")
			.field("refresh_secret", &self.refresh_secret)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.finish()
	}
}
