//! Access-token claims plus refresh-token secret and record models.

pub mod claims;
pub mod record;
pub mod secret;
