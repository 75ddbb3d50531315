//! Shared application state.

use std::sync::Arc;

use arcana_astro::ChartEngine;
use arcana_oracle::TextGenerator;
use arcana_payments::CheckoutGateway;

use crate::config::ServerConfig;
use crate::store::SessionStore;

/// State shared by every handler. External collaborators sit behind trait
/// objects so integration tests can swap them for mocks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: SessionStore,
    pub gateway: Arc<dyn CheckoutGateway>,
    pub oracle: Arc<dyn TextGenerator>,
    pub charts: Arc<ChartEngine>,
}
