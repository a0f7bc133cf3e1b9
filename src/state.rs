use std::path::PathBuf;
use std::sync::Arc;

use silent_struggle::config::DashboardConfig;
use silent_struggle::dashboard::Dashboard;
use silent_struggle::data::SurveyTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the page shows, independent of rendering.
pub struct AppState {
    /// The loaded survey, shared read-only.
    pub table: Arc<SurveyTable>,

    /// Where the table came from.
    pub dataset_path: PathBuf,

    /// Summaries for every chart, computed once.
    pub dashboard: Dashboard,

    /// Status / error message shown under the hero.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<SurveyTable>, config: &DashboardConfig) -> Self {
        let dashboard = Dashboard::compute(&table, config);
        let failures = dashboard.failures();
        let status_message = (failures > 0).then(|| {
            format!(
                "{failures} chart(s) could not be computed from {}",
                config.dataset_path.display()
            )
        });
        Self {
            table,
            dataset_path: config.dataset_path.clone(),
            dashboard,
            status_message,
        }
    }
}
