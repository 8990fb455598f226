//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! the parameter structs the querier binds, and the HTTP request bodies.

/// Bank account model
pub mod account;
/// Append-only ledger entry model
pub mod entry;
pub mod session;
/// Transfer model
pub mod transfer;
/// User model
pub mod user;
pub mod verify_email;
