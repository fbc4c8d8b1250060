use std::sync::Arc;

use crate::assistant::AssistantClient;
use crate::catalog::PositionCatalog;
use crate::errors::AppError;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the position workbook failed to load at startup; every
    /// catalog-dependent route then answers with a blocking notice.
    pub catalog: Option<Arc<PositionCatalog>>,
    /// In-memory session registry. Sessions exist nowhere else.
    pub sessions: SessionStore,
    pub assistant: AssistantClient,
}

impl AppState {
    /// The catalog, or the blocking "position data unavailable" error.
    pub fn catalog(&self) -> Result<&PositionCatalog, AppError> {
        self.catalog.as_deref().ok_or(AppError::CatalogUnavailable)
    }
}
