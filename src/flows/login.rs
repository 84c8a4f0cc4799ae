//! Login use case: mint one access token and one refresh token for a verified subject.

// self
use crate::{
	_prelude::*,
	auth::{Role, SubjectId},
	ext::CredentialVerifier,
	flows::{SessionBroker, SessionTokens},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl SessionBroker {
	/// Issues a session for a subject whose credentials were already verified externally.
	///
	/// The session cap is enforced here as well as on rotation, so a subject stuck in a
	/// login loop without ever logging out cannot grow an unbounded family.
	pub async fn login(&self, subject: SubjectId, role: Role) -> Result<SessionTokens> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let access_token = self.signer.issue(subject.clone(), role)?;
				let issued = self.manager.issue(&subject).await?;

				self.manager.prune(&subject, self.manager.max_active()).await?;

				Ok(SessionTokens {
					access_token,
					refresh_secret: issued.secret,
					refresh_expires_at: issued.expires_at,
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Convenience entry point that runs the credential check before [`Self::login`].
	///
	/// Fails with [`Error::InvalidCredentials`] when the verifier rejects the pair; the
	/// rejection is never folded into any refresh-path failure kind.
	pub async fn login_with(
		&self,
		verifier: &dyn CredentialVerifier<Error>,
		identifier: &str,
		secret: &str,
	) -> Result<SessionTokens> {
		let verified =
			verifier.verify(identifier, secret).await?.ok_or(Error::InvalidCredentials)?;

		self.login(verified.subject, verified.role).await
	}
}
