//! # transport-log-types
//!
//! Core value types for querying recorded publish/subscribe traffic.
//!
//! - **Message**: `Message`, one recorded publication (receive time, payload,
//!   type name, topic name)
//! - **Time types**: `QualifiedTime`, `QualifiedTimeRange`, `Qualifier`
//!
//! All types are plain values: no locking, no I/O, and copies never share
//! mutable state. They are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use transport_log_types::time::{QualifiedTime, QualifiedTimeRange, Qualifier};
//! use std::time::Duration;
//!
//! let mut range = QualifiedTimeRange::from_start(QualifiedTime::new(
//!     Duration::from_nanos(100),
//!     Qualifier::OrClosestAfter,
//! ));
//! assert!(range.is_valid());
//!
//! // Setters always apply, and report whether the range is still coherent.
//! assert!(!range.set_finish(QualifiedTime::at(Duration::from_nanos(50))));
//! assert_eq!(range.finish().time(), Some(Duration::from_nanos(50)));
//! ```

pub mod message;
pub mod time;

pub use message::Message;
pub use time::{QualifiedTime, QualifiedTimeRange, Qualifier, Time};
