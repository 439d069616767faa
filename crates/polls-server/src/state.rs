use polls_core::clock::{Clock, SystemClock};
use polls_core::config::Config;
use polls_core::store::{QuestionDb, QuestionStore};
use std::path::Path;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub clock: Arc<dyn Clock>,
    pub site_title: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        clock: Arc<dyn Clock>,
        site_title: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            site_title: site_title.into(),
        }
    }

    /// Open the database configured for `root` and use the wall clock.
    pub fn open(root: &Path, config: &Config) -> polls_core::Result<Self> {
        let db = QuestionDb::open(&config.database_path(root))?;
        Ok(Self::new(
            Arc::new(db),
            Arc::new(SystemClock),
            config.site.title.clone(),
        ))
    }
}
