//! Refresh-secret wrapper that redacts sensitive material, plus its one-way fingerprint.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Number of random bytes backing a generated refresh secret (256 bits of entropy).
const SECRET_LEN: usize = 32;

/// Redacted refresh-secret wrapper keeping sensitive material out of logs.
///
/// The raw value exists outside the issuing call exactly once; stores only ever see the
/// [`Fingerprint`] derived from it.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshSecret(String);
impl RefreshSecret {
	/// Wraps an externally presented secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Generates a fresh secret from 32 random bytes, base64url-encoded without padding.
	pub fn generate() -> Self {
		let bytes: [u8; SECRET_LEN] = rand::random();

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Computes the one-way fingerprint under which this secret is stored.
	pub fn fingerprint(&self) -> Fingerprint {
		Fingerprint::of(&self.0)
	}
}
impl AsRef<str> for RefreshSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for RefreshSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("RefreshSecret").field(&"<redacted>").finish()
	}
}
impl Display for RefreshSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Hex-encoded SHA-256 digest of a refresh secret; the durable lookup key for stored records.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);
impl Fingerprint {
	/// Derives the fingerprint of the provided raw secret value.
	pub fn of(raw: &str) -> Self {
		let digest = Sha256::digest(raw.as_bytes());

		Self(hex::encode(digest))
	}

	/// Returns the hex digest string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for Fingerprint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
