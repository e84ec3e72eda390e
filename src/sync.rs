use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::id::{IdClock, RecordId};
use crate::record::{Draft, DraftField, Record};
use crate::schema::EntitySchema;
use crate::store::{LocalStore, StorageFault};
use crate::time;

/// Result of a save attempt that reached the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Saved(Record),
    /// The draft was incomplete; nothing was written and nothing changed.
    Incomplete { missing: Vec<DraftField> },
}

impl AddOutcome {
    pub fn saved(&self) -> Option<&Record> {
        match self {
            AddOutcome::Saved(record) => Some(record),
            AddOutcome::Incomplete { .. } => None,
        }
    }
}

#[derive(Default)]
struct ScreenState {
    /// Newest first.
    view: Vec<Record>,
    draft: Draft,
    ids: IdClock,
}

/// Keeps one screen's in-memory list in step with its [`LocalStore`].
///
/// Every operation holds the screen lock across its storage call, so
/// overlapping taps run one at a time in the order they were made.
pub struct RecordSynchronizer {
    store: Arc<dyn LocalStore>,
    state: Mutex<ScreenState>,
}

impl RecordSynchronizer {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            state: Mutex::new(ScreenState::default()),
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        self.store.schema()
    }

    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    /// Loads the table into the view, newest first. On failure the view is
    /// emptied and the fault returned.
    pub async fn initialize(&self) -> Result<usize, StorageFault> {
        let mut state = self.state.lock().await;
        let table = self.schema().table;

        let loaded = match self.store.ensure_schema().await {
            Ok(()) => self.store.select_all().await,
            Err(fault) => Err(fault),
        };

        match loaded {
            Ok(mut records) => {
                if let Some(newest) = records.iter().map(|r| r.id).max() {
                    state.ids.observe(newest);
                }
                records.reverse();
                let count = records.len();
                state.view = records;
                info!(target: "keepsake", event = "records_loaded", table, count);
                Ok(count)
            }
            Err(fault) => {
                state.view.clear();
                warn!(
                    target: "keepsake",
                    event = "records_load_failed",
                    table,
                    operation = fault.operation(),
                    error = %fault
                );
                Err(fault)
            }
        }
    }

    /// Replaces the screen's draft with `draft` and saves it.
    pub async fn add(&self, draft: Draft) -> Result<AddOutcome, StorageFault> {
        let mut state = self.state.lock().await;
        state.draft = draft;
        self.commit_draft(&mut state).await
    }

    /// Saves whatever is currently in the draft.
    pub async fn save(&self) -> Result<AddOutcome, StorageFault> {
        let mut state = self.state.lock().await;
        self.commit_draft(&mut state).await
    }

    async fn commit_draft(&self, state: &mut ScreenState) -> Result<AddOutcome, StorageFault> {
        let table = self.schema().table;
        let mut ids = state.ids.clone();
        let record = match state.draft.compose(ids.next(time::now_ms()), time::iso_now()) {
            Ok(record) => record,
            Err(missing) => {
                tracing::debug!(target: "keepsake", event = "draft_incomplete", table, ?missing);
                return Ok(AddOutcome::Incomplete { missing });
            }
        };

        if let Err(fault) = self.store.insert(&record).await {
            warn!(
                target: "keepsake",
                event = "record_save_failed",
                table,
                id = %record.id,
                error = %fault
            );
            return Err(fault);
        }

        state.ids = ids;
        state.view.insert(0, record.clone());
        state.draft = Draft::default();
        info!(target: "keepsake", event = "record_saved", table, id = %record.id);
        Ok(AddOutcome::Saved(record))
    }

    /// Deletes every record, then empties the view. Returns the number of rows removed.
    pub async fn clear_all(&self) -> Result<u64, StorageFault> {
        let mut state = self.state.lock().await;
        let table = self.schema().table;
        match self.store.delete_all().await {
            Ok(removed) => {
                state.view.clear();
                info!(target: "keepsake", event = "records_cleared", table, removed);
                Ok(removed)
            }
            Err(fault) => {
                warn!(
                    target: "keepsake",
                    event = "records_clear_failed",
                    table,
                    error = %fault
                );
                Err(fault)
            }
        }
    }

    pub async fn view(&self) -> Vec<Record> {
        self.state.lock().await.view.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.view.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.view.is_empty()
    }

    /// Detail lookup for a record already in the view.
    pub async fn get(&self, id: RecordId) -> Option<Record> {
        self.state
            .lock()
            .await
            .view
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub async fn draft(&self) -> Draft {
        self.state.lock().await.draft.clone()
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.state.lock().await.draft.title = title.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.state.lock().await.draft.description = description.into();
    }

    pub async fn attach_media(&self, uri: impl Into<String>) {
        self.state.lock().await.draft.media_uri = Some(uri.into());
    }

    /// Drops the draft without saving (the Cancel button).
    pub async fn discard_draft(&self) {
        self.state.lock().await.draft = Draft::default();
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
