//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! port, so they can be exercised with a mock.

use std::sync::Arc;

use crate::domain::ports::SignUpCommand;

#[derive(Clone)]
pub struct HttpState {
    pub sign_up: Arc<dyn SignUpCommand>,
}

impl HttpState {
    pub fn new(sign_up: Arc<dyn SignUpCommand>) -> Self {
        Self { sign_up }
    }
}
