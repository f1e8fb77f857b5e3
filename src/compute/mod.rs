//! Compute layer for query processing.
//!
//! This module keeps the matching rules apart from storage. It provides:
//! - Temporal matching of qualified times and ranges
//! - Validation of topic and type names
//!
//! Nothing here owns messages; functions work on slices handed in by a store.

pub mod temporal;
pub mod validation;
