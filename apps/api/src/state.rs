use std::sync::Arc;

use crate::llm_client::Generator;
use crate::screening::scoring::RelevanceScorer;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Jobs and candidates. `PgStore` in production.
    pub store: Arc<dyn Store>,
    /// Chat-completion adapter; owns the process-wide cooldown gate.
    pub generator: Generator,
    pub scorer: RelevanceScorer,
}
