//! Thread-safe wrapper for sharing a store.
//!
//! The message and time types do no locking of their own. `SyncStore` wraps
//! a [`MessageStore`] in `Arc<RwLock<_>>` so a recorder thread can keep
//! inserting while player threads run queries.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! transport-log = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use transport_log::{AllTopics, Message, SyncStore};
//! use std::thread;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SyncStore::new();
//! let recorder = store.clone();
//!
//! let handle = thread::spawn(move || {
//!     for t in 0..10 {
//!         let msg = Message::new(Duration::from_millis(t), b"tick", "pkg.Tick", "/clock");
//!         recorder.insert(msg).unwrap();
//!     }
//! });
//! handle.join().unwrap();
//!
//! assert_eq!(store.query(&AllTopics::default())?.len(), 10);
//! # Ok(())
//! # }
//! ```

use crate::batch::Batch;
use crate::config::Config;
use crate::error::Result;
use crate::query::QueryOptions;
use crate::store::{MessageStore, TopicDescriptor};
use parking_lot::RwLock;
use std::sync::Arc;
use transport_log_types::{Message, QualifiedTime, Time};

/// Thread-safe wrapper around `MessageStore` using `Arc<RwLock<MessageStore>>`.
///
/// Queries and lookups take the read lock and may run concurrently; inserts
/// take the write lock. Cloning shares the same underlying store.
#[derive(Clone, Default)]
pub struct SyncStore {
    inner: Arc<RwLock<MessageStore>>,
}

impl SyncStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(MessageStore::with_config(config)?)),
        })
    }

    pub fn insert(&self, message: Message) -> Result<()> {
        self.inner.write().insert(message)
    }

    pub fn extend<I>(&self, messages: I) -> Result<usize>
    where
        I: IntoIterator<Item = Message>,
    {
        self.inner.write().extend(messages)
    }

    pub fn query(&self, options: &(impl QueryOptions + ?Sized)) -> Result<Batch> {
        self.inner.read().query(options)
    }

    /// Like `MessageStore::lookup`, but returns an owned copy since the lock
    /// is released before returning.
    pub fn lookup_cloned(&self, time: &QualifiedTime, topic: Option<&str>) -> Option<Message> {
        self.inner.read().lookup(time, topic).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn start_time(&self) -> Option<Time> {
        self.inner.read().start_time()
    }

    pub fn end_time(&self) -> Option<Time> {
        self.inner.read().end_time()
    }

    pub fn topics(&self) -> Vec<TopicDescriptor> {
        self.inner.read().topics()
    }

    /// Run `f` with shared access to the wrapped store.
    pub fn read<R>(&self, f: impl FnOnce(&MessageStore) -> R) -> R {
        f(&self.inner.read())
    }
}
