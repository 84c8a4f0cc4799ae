//! Credential-verification contract consumed ahead of the login flow.

// self
use crate::{
	_prelude::*,
	auth::{Role, SubjectId},
};

/// Boxed future returned by [`CredentialVerifier::verify`].
pub type VerifyFuture<'a, Error> =
	Pin<Box<dyn Future<Output = Result<Option<VerifiedSubject>, Error>> + 'a + Send>>;

/// Collaborator that checks an identifier/secret pair against its own credential storage.
///
/// The broker only consumes the pass/fail outcome plus the verified identity; hashing
/// mechanics stay entirely on the implementor's side. `None` means the credentials were
/// rejected and the caller should surface an invalid-credentials outcome.
pub trait CredentialVerifier<Error>
where
	Self: Send + Sync,
{
	/// Verifies the identifier/secret pair and resolves the subject it belongs to.
	fn verify<'a>(&'a self, identifier: &'a str, secret: &'a str) -> VerifyFuture<'a, Error>;
}

/// Identity attested by a successful credential check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedSubject {
	/// Stable subject identifier.
	pub subject: SubjectId,
	/// Role classification read from the user-management collaborator.
	pub role: Role,
}
impl VerifiedSubject {
	/// Creates a verified identity for the provided subject/role pair.
	pub fn new(subject: SubjectId, role: Role) -> Self {
		Self { subject, role }
	}
}
