//! Refresh use case: rotate the presented secret and mint a fresh access token.
//!
//! Rotation is delegated to [`RefreshTokenManager`](crate::manager::RefreshTokenManager),
//! which enforces single use, reuse detection with family-wide revocation, and the session
//! cap. This flow resolves the owning subject's current role from the directory and signs
//! the replacement access token; every rotation failure is propagated unchanged so the
//! caller can force a fresh login (and alert on [`Error::ReuseDetected`]).

mod metrics;

pub use metrics::RotationMetrics;

// self
use crate::{
	_prelude::*,
	auth::RefreshSecret,
	flows::{SessionBroker, SessionTokens},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl SessionBroker {
	/// Exchanges a presented refresh secret for a new session.
	pub async fn refresh(&self, presented: &RefreshSecret) -> Result<SessionTokens> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.rotation_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let rotated = self.manager.rotate(presented).await?;
				let role = self
					.directory
					.role_of(&rotated.subject)
					.await?
					.ok_or(Error::UnknownSubject)?;
				let access_token = self.signer.issue(rotated.subject, role)?;

				Ok(SessionTokens {
					access_token,
					refresh_secret: rotated.secret,
					refresh_expires_at: rotated.expires_at,
				})
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.rotation_metrics.record_success();
			},
			Err(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.rotation_metrics.record_failure();
			},
		}

		result
	}
}
