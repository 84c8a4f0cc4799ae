//! Boundary contracts for external collaborators (credential verification, subject lookup).
//!
//! Password hashing, user management, and the relational engine behind them live outside
//! this crate; these traits pin down the interface shapes the broker consumes without
//! shipping opinionated implementations. [`StaticDirectory`] is the one concrete type here,
//! kept in-process for tests and demos.

pub mod credential;
pub mod directory;

pub use credential::*;
pub use directory::*;
