//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL users and sessions via Diesel.
//! - **hashing**: Argon2id password hashing.
//!
//! Adapters translate between domain types and infrastructure formats. They
//! contain no business logic.

pub mod hashing;
pub mod persistence;
