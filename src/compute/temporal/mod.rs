//! Temporal matching of qualified times against recorded samples.
//!
//! - `queries`: qualifier matching, single-sample selection and window resolution

pub mod queries;

pub use queries::{Timestamped, resolve_window, select_sample, select_window};
