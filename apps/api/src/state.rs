use std::sync::Arc;

use crate::analysis::scorer::MatchScorer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only immutable values; the role table is static data and lives outside it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
}
