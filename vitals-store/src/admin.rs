//! Admin reads across every user.

use serde::Serialize;
use tracing::{info, warn};
use vitals_core::{
    AdminHealthRecord, AuthorizationPolicy, Identity, UserOverview, VitalsConfig, VitalsError,
};
use vitals_records::document::DATE_KEY;
use vitals_records::overview::AdminOverview;
use vitals_records::{admin_record, user_profile};

use crate::store::{
    health_records_path, Direction, DocumentStore, Query, StoreError, USERS_COLLECTION,
};

/// Every user profile with its full health history, newest first.
///
/// A user whose records cannot be read is kept with an empty history.
pub async fn fetch_all_users(store: &dyn DocumentStore) -> Result<Vec<UserOverview>, StoreError> {
    let profiles = store.query(USERS_COLLECTION, &Query::new()).await?;
    let history_query = Query::new().order_by(DATE_KEY, Direction::Descending);

    let mut users = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        let records: Vec<AdminHealthRecord> = match store
            .query(&health_records_path(&profile.id), &history_query)
            .await
        {
            Ok(documents) => documents
                .iter()
                .map(|document| admin_record(&document.data))
                .collect(),
            Err(err) => {
                warn!(user_id = %profile.id, error = %err, "failed to load health records");
                Vec::new()
            }
        };

        users.push(UserOverview {
            profile: user_profile(&profile.id, &profile.data),
            last_health_record: records.first().cloned(),
            all_health_records: records,
        });
    }

    info!(users = users.len(), "loaded users for admin overview");
    Ok(users)
}

/// Users plus the roll-ups computed over them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminDashboard {
    pub users: Vec<UserOverview>,
    pub overview: AdminOverview,
}

/// Load the admin overview for `identity`, refusing anyone `policy` rejects.
pub async fn load_admin_overview(
    store: &dyn DocumentStore,
    identity: &Identity,
    policy: &dyn AuthorizationPolicy,
    config: &VitalsConfig,
) -> Result<AdminDashboard, VitalsError> {
    if !policy.is_authorized(identity) {
        warn!(user_id = %identity.user_id, "admin overview denied");
        return Err(VitalsError::Unauthorized(
            identity
                .email
                .clone()
                .unwrap_or_else(|| identity.user_id.clone()),
        ));
    }

    let users = fetch_all_users(store).await?;
    let overview = AdminOverview::build(&users, config.window_days);
    Ok(AdminDashboard { users, overview })
}
