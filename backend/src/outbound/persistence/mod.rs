//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain's driven ports on top of
//! `diesel-async` with `bb8` pooling. They translate between Diesel rows and
//! domain records and contain no business logic. Row structs and table
//! definitions stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use signup::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/signup")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_session_issuer;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_session_issuer::{DieselSessionIssuer, session_expiry};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
