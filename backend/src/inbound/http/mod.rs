//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod session_config;
pub mod sign_up;
pub mod state;

pub use error::json_error_handler;
