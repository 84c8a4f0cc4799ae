//! Auth-domain identifiers, roles, claims, and refresh-token models.

pub mod id;
pub mod role;
pub mod token;

pub use id::*;
pub use role::*;
pub use token::{claims::*, record::*, secret::*};
