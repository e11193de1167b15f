//! Record fetcher and the dashboard state it feeds.

use chrono::{DateTime, Utc};
use tracing::{error, info};
use vitals_core::{empty_summary, DailySummary, VitalsConfig};
use vitals_records::document::DATE_KEY;
use vitals_records::reconcile_documents;

use crate::store::{health_records_path, Direction, DocumentStore, Query, StoreError};

/// Fetch a user's most recent raw records and reconcile them.
///
/// Reads at most `config.fetch_limit` documents ordered by date descending.
pub async fn fetch_daily_summary(
    store: &dyn DocumentStore,
    user_id: &str,
    config: &VitalsConfig,
) -> Result<DailySummary, StoreError> {
    let path = health_records_path(user_id);
    let query = Query::new()
        .order_by(DATE_KEY, Direction::Descending)
        .limit(config.fetch_limit);

    let documents = store.query(&path, &query).await?;
    let summary = reconcile_documents(&documents, config.window_days);

    info!(
        user_id,
        documents = documents.len(),
        days = summary.days.len(),
        skipped = summary.skipped,
        "fetched daily summary"
    );
    Ok(summary)
}

/// What the dashboard shows: the last good summary plus fetch status.
#[derive(Debug, Clone)]
pub struct DashboardState {
    summary: DailySummary,
    loading: bool,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            summary: empty_summary(),
            loading: false,
            last_error: None,
            refreshed_at: None,
        }
    }

    pub fn summary(&self) -> &DailySummary {
        &self.summary
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Time of the last successful refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Refetch and replace the summary.
    ///
    /// A store failure is logged and kept in [`last_error`](Self::last_error);
    /// the previous summary stays in place.
    pub async fn refresh(
        &mut self,
        store: &dyn DocumentStore,
        user_id: &str,
        config: &VitalsConfig,
    ) -> &DailySummary {
        self.loading = true;

        match fetch_daily_summary(store, user_id, config).await {
            Ok(summary) => {
                self.refreshed_at = Some(summary.generated_at);
                self.summary = summary;
                self.last_error = None;
            }
            Err(err) => {
                error!(user_id, error = %err, "failed to fetch health records");
                self.last_error = Some(err.to_string());
            }
        }

        self.loading = false;
        &self.summary
    }
}
