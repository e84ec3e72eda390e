//! Local-first record keeping for two screens, a diary and an emergency log.
//!
//! Each screen owns a SQLite table of [`Record`]s and a [`RecordSynchronizer`]
//! that keeps the on-screen list (newest first) consistent with it.

pub mod capture;
pub mod config;
pub mod db;
pub mod error;
pub mod id;
pub mod logging;
pub mod record;
pub mod schema;
pub mod state;
pub mod store;
pub mod sync;
pub mod time;

pub use capture::{CaptureFlow, CaptureOutcome, MediaService, Permission, PickResult, PresetMedia};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use id::{IdClock, RecordId};
pub use logging::{flush_file_logs, init_logging};
pub use record::{Draft, DraftField, Record};
pub use schema::{EntitySchema, DIARY, EMERGENCY};
pub use state::AppState;
pub use store::{LocalStore, SqliteStore, StorageFault};
pub use sync::{AddOutcome, RecordSynchronizer};
