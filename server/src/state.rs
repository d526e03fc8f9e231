use std::sync::Arc;

use crate::hub::Hub;

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Hub::default()),
        }
    }
}
