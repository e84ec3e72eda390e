#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keepsake_lib::{
    EntitySchema, LocalStore, MediaService, Permission, PickResult, Record, RecordSynchronizer,
    SqliteStore, StorageFault,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub async fn temp_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite::memory:")
}

pub async fn memory_store(schema: EntitySchema) -> SqliteStore {
    SqliteStore::from_pool(temp_pool().await, schema)
}

/// Wraps a real store and fails selected operations on demand.
pub struct FlakyStore {
    inner: SqliteStore,
    pub fail_schema: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_select: AtomicBool,
    pub fail_delete: AtomicBool,
    pub inserts: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            fail_schema: AtomicBool::new(false),
            fail_insert: AtomicBool::new(false),
            fail_select: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            inserts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    fn injected() -> sqlx::Error {
        sqlx::Error::Protocol("injected failure".into())
    }
}

#[async_trait]
impl LocalStore for FlakyStore {
    fn schema(&self) -> &EntitySchema {
        self.inner.schema()
    }

    async fn ensure_schema(&self) -> Result<(), StorageFault> {
        if self.fail_schema.load(Ordering::SeqCst) {
            return Err(StorageFault::Schema {
                table: self.schema().table,
                source: Self::injected(),
            });
        }
        self.inner.ensure_schema().await
    }

    async fn insert(&self, record: &Record) -> Result<(), StorageFault> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StorageFault::Insert {
                table: self.schema().table,
                source: Self::injected(),
            });
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(record).await
    }

    async fn select_all(&self) -> Result<Vec<Record>, StorageFault> {
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(StorageFault::Select {
                table: self.schema().table,
                source: Self::injected(),
            });
        }
        self.inner.select_all().await
    }

    async fn delete_all(&self) -> Result<u64, StorageFault> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageFault::Delete {
                table: self.schema().table,
                source: Self::injected(),
            });
        }
        self.inner.delete_all().await
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}

pub async fn flaky_synchronizer(schema: EntitySchema) -> (Arc<FlakyStore>, RecordSynchronizer) {
    let store = Arc::new(FlakyStore::new(memory_store(schema).await));
    let sync = RecordSynchronizer::new(store.clone());
    sync.initialize().await.expect("initialize");
    (store, sync)
}

/// Media service that replays scripted answers and counts the calls it saw.
#[derive(Default)]
pub struct ScriptedMedia {
    permissions: Mutex<VecDeque<Permission>>,
    picks: Mutex<VecDeque<PickResult>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl ScriptedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(self, answer: Permission) -> Self {
        self.permissions.lock().unwrap().push_back(answer);
        self
    }

    pub fn pick(self, answer: PickResult) -> Self {
        self.picks.lock().unwrap().push_back(answer);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaService for ScriptedMedia {
    async fn request_media_access(&self) -> Permission {
        self.calls.lock().unwrap().push("request_media_access");
        self.permissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Permission::Denied)
    }

    async fn pick_image(&self) -> PickResult {
        self.calls.lock().unwrap().push("pick_image");
        self.picks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PickResult::Cancelled)
    }

    async fn capture_image(&self) -> PickResult {
        self.calls.lock().unwrap().push("capture_image");
        self.picks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PickResult::Cancelled)
    }
}
