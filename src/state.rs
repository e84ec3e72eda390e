use std::sync::Arc;

use tracing::warn;

use crate::config::AppConfig;
use crate::schema::{EntitySchema, DIARY, EMERGENCY};
use crate::store::SqliteStore;
use crate::sync::RecordSynchronizer;
use crate::AppResult;

/// Both screens, each with its own database file and synchronizer.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diary: Arc<RecordSynchronizer>,
    pub emergency: Arc<RecordSynchronizer>,
}

impl AppState {
    /// Opens both stores and loads their records. A screen whose initial load
    /// fails still opens, with an empty list.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let diary = open_screen(config, DIARY).await?;
        let emergency = open_screen(config, EMERGENCY).await?;
        Ok(Self {
            config: Arc::new(config.clone()),
            diary,
            emergency,
        })
    }

    pub fn screen(&self, schema: &EntitySchema) -> Option<&Arc<RecordSynchronizer>> {
        if schema == &DIARY {
            Some(&self.diary)
        } else if schema == &EMERGENCY {
            Some(&self.emergency)
        } else {
            None
        }
    }

    pub async fn close(&self) {
        self.diary.close().await;
        self.emergency.close().await;
    }
}

/// Opens one screen's store and runs its first load.
pub async fn open_screen(
    config: &AppConfig,
    schema: EntitySchema,
) -> AppResult<Arc<RecordSynchronizer>> {
    let store = SqliteStore::open(&config.db_path(&schema), schema).await?;
    let sync = RecordSynchronizer::new(Arc::new(store));
    if let Err(fault) = sync.initialize().await {
        warn!(
            target: "keepsake",
            event = "screen_opened_empty",
            screen = schema.label,
            error = %fault
        );
    }
    Ok(Arc::new(sync))
}
