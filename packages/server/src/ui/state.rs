//! Server state.

use std::sync::Arc;

use crate::hub::Hub;

/// Shared application state
pub struct AppState {
    /// Session manager shared by every connection
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new(hub: Arc<Hub>) -> Arc<Self> {
        Arc::new(Self { hub })
    }
}
