use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::StoreHandle;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the config sits behind an `Arc` and the store handle
/// holds its backend behind one.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: StoreHandle,
}

impl AppState {
    pub fn new(config: AppConfig, store: StoreHandle) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
