//! Document store access for the vitals dashboard: the store trait, an
//! in-memory/JSON implementation, the record fetcher, the uploader and the
//! admin reads.

pub mod admin;
pub mod dashboard;
pub mod memory;
pub mod store;
pub mod upload;

pub use admin::{fetch_all_users, load_admin_overview, AdminDashboard};
pub use dashboard::{fetch_daily_summary, DashboardState};
pub use memory::MemoryStore;
pub use store::{
    health_records_path, Direction, DocumentStore, OrderBy, Query, StoreError, USERS_COLLECTION,
};
pub use upload::{upload_events, UploadReport, UploadStatus, MAX_WRITE_FAILURES};
