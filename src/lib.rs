//! Credential/session lifecycle broker: signed access tokens, rotating refresh tokens with
//! reuse detection, and fixed-window rate limiting in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod flows;
pub mod limit;
pub mod manager;
pub mod obs;
pub mod signer;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Role, SubjectId},
		ext::StaticDirectory,
		flows::SessionBroker,
		manager::RefreshTokenManager,
		signer::AccessTokenSigner,
		store::{MemoryStore, RefreshTokenStore},
	};

	/// Signing secret shared by test fixtures; long enough to satisfy the weak-key check.
	pub const TEST_SIGNING_SECRET: &[u8] = b"session-broker-test-secret-0123456789abcdef";

	/// Builds a broker backed by an in-memory store and a static subject directory containing
	/// the provided subject/role pairs.
	pub fn build_memory_broker(
		subjects: impl IntoIterator<Item = (SubjectId, Role)>,
	) -> (SessionBroker, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn RefreshTokenStore> = store_backend.clone();
		let signer = AccessTokenSigner::new(TEST_SIGNING_SECRET)
			.expect("Test signing secret should satisfy the minimum key length.");
		let directory = Arc::new(StaticDirectory::from_iter(subjects));
		let broker = SessionBroker::new(signer, RefreshTokenManager::new(store), directory);

		(broker, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}
