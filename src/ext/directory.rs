//! Subject-directory contract used to resolve roles during refresh.

// self
use crate::{
	_prelude::*,
	auth::{Role, SubjectId},
	store::StoreError,
};

/// Boxed future returned by [`SubjectDirectory::role_of`].
pub type DirectoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Read-only view over the external user-management collaborator.
///
/// The broker only ever reads the role classification; profile attributes and their CRUD
/// surface stay out of scope. `None` means the subject no longer exists.
pub trait SubjectDirectory
where
	Self: Send + Sync,
{
	/// Resolves the current role of the subject, if the subject still exists.
	fn role_of<'a>(&'a self, subject: &'a SubjectId) -> DirectoryFuture<'a, Option<Role>>;
}

type DirectoryMap = Arc<RwLock<HashMap<SubjectId, Role>>>;

/// Thread-safe in-process directory for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory(DirectoryMap);
impl StaticDirectory {
	/// Inserts or replaces a subject/role pair.
	pub fn upsert(&self, subject: SubjectId, role: Role) {
		self.0.write().insert(subject, role);
	}

	/// Removes a subject, simulating account deletion.
	pub fn remove(&self, subject: &SubjectId) {
		self.0.write().remove(subject);
	}
}
impl FromIterator<(SubjectId, Role)> for StaticDirectory {
	fn from_iter<I: IntoIterator<Item = (SubjectId, Role)>>(iter: I) -> Self {
		Self(Arc::new(RwLock::new(iter.into_iter().collect())))
	}
}
impl SubjectDirectory for StaticDirectory {
	fn role_of<'a>(&'a self, subject: &'a SubjectId) -> DirectoryFuture<'a, Option<Role>> {
		let map = self.0.clone();
		let subject = subject.to_owned();

		Box::pin(async move { Ok(map.read().get(&subject).copied()) })
	}
}
