// Application state shared across handlers
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    db::DieselPool,
    services::{DeviceAccessService, LocationVerificationService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub device_access: Arc<DeviceAccessService>,
    pub location_verification: Arc<LocationVerificationService>,
    pub max_connections: u32,
}
