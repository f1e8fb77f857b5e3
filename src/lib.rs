//! Time-qualified queries over recorded publish/subscribe messages.
//!
//! ## Features
//! - **Qualified times**: a stamp plus a rule for matching samples that do not
//!   land exactly on it (exact-or-closest / strictly closest, before / after)
//! - **Open-ended ranges**: either edge may be indeterminate; setters always
//!   apply and report whether the range is still valid
//! - **Topic selection**: all topics, an explicit list, or a regex pattern
//! - **In-memory store**: time-ordered messages answering queries with batches
//! - **C handles**: the value types are usable from a `cdylib` build
//!
//! ```rust
//! use transport_log::{AllTopics, Message, MessageStore, QualifiedTime, QualifiedTimeRange, Qualifier};
//! use std::time::Duration;
//!
//! let mut store = MessageStore::new();
//! for t in [10, 20, 30] {
//!     store.insert(Message::new(Duration::from_nanos(t), b"payload", "pkg.Msg", "/chatter"))?;
//! }
//!
//! // Everything up to, but not including, the sample at 20ns.
//! let range = QualifiedTimeRange::until(QualifiedTime::new(
//!     Duration::from_nanos(20),
//!     Qualifier::ClosestBefore,
//! ));
//! let batch = store.query(&AllTopics::new(range))?;
//! assert_eq!(batch.len(), 1);
//! # Ok::<(), transport_log::LogError>(())
//! ```

pub mod batch;
pub mod compute;
pub mod config;
pub mod error;
pub mod ffi;
pub mod query;
pub mod store;

#[cfg(feature = "sync")]
pub mod sync;

pub use batch::Batch;
pub use config::{Config, InvalidRangePolicy, TieBreak};
pub use error::{LogError, Result};
pub use query::{AllTopics, QueryOptions, TopicList, TopicPattern};
pub use store::{MessageStore, TopicDescriptor};

#[cfg(feature = "sync")]
pub use sync::SyncStore;

pub use transport_log_types::{Message, QualifiedTime, QualifiedTimeRange, Qualifier, Time};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, LogError, MessageStore, Result};

    pub use crate::{Message, QualifiedTime, QualifiedTimeRange, Qualifier, Time};

    pub use crate::{AllTopics, QueryOptions, TopicList, TopicPattern};

    #[cfg(feature = "sync")]
    pub use crate::SyncStore;

    pub use std::time::Duration;
}
