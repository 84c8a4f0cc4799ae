//! Logout use case: delete every refresh record the subject owns.

// self
use crate::{
	_prelude::*,
	auth::SubjectId,
	flows::SessionBroker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl SessionBroker {
	/// Removes the subject's whole session family and returns how many records existed.
	///
	/// Access tokens already in the wild stay valid until their own expiry; only the refresh
	/// path is cut off.
	pub async fn logout(&self, subject: &SubjectId) -> Result<usize> {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.manager.delete_all(subject)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
