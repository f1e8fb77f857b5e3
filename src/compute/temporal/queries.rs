//! Qualifier matching over time-ordered samples.
//!
//! Every function here expects `samples` sorted by ascending time stamp, the
//! order a log reader produces them in. Lookups are binary searches.

use crate::config::TieBreak;
use std::ops::Range;
use transport_log_types::{Message, QualifiedTime, QualifiedTimeRange, Qualifier, Time};

/// Anything that carries the time stamp used for matching.
pub trait Timestamped {
    fn timestamp(&self) -> Time;
}

impl Timestamped for Time {
    fn timestamp(&self) -> Time {
        *self
    }
}

impl Timestamped for Message {
    fn timestamp(&self) -> Time {
        self.time_received()
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> Time {
        (**self).timestamp()
    }
}

/// Index of the nearest sample the qualifier admits.
///
/// "Before" qualifiers admit a prefix of the samples and the nearest one is
/// its last element; "after" qualifiers admit a suffix and the nearest one is
/// its first.
fn nearest_admitted<S: Timestamped>(
    samples: &[S],
    boundary: Time,
    qualifier: Qualifier,
) -> Option<usize> {
    if qualifier.is_before() {
        samples
            .partition_point(|s| qualifier.admits(boundary, s.timestamp()))
            .checked_sub(1)
    } else {
        let first = samples.partition_point(|s| !qualifier.admits(boundary, s.timestamp()));
        (first < samples.len()).then_some(first)
    }
}

/// Select the single sample a qualified time refers to.
///
/// Returns `None` when the time is indeterminate or no sample satisfies the
/// qualifier. When several samples share the selected time stamp,
/// `tie_break` decides which of them is returned.
///
/// # Examples
///
/// ```
/// use transport_log::compute::temporal::select_sample;
/// use transport_log::{QualifiedTime, Qualifier, TieBreak};
/// use std::time::Duration;
///
/// let samples: Vec<Duration> = [10, 20, 30].into_iter().map(Duration::from_nanos).collect();
/// let strict = QualifiedTime::new(Duration::from_nanos(20), Qualifier::ClosestBefore);
/// let loose = QualifiedTime::new(Duration::from_nanos(20), Qualifier::OrClosestBefore);
///
/// assert_eq!(select_sample(&samples, &strict, TieBreak::Earliest), Some(0));
/// assert_eq!(select_sample(&samples, &loose, TieBreak::Earliest), Some(1));
/// ```
pub fn select_sample<S: Timestamped>(
    samples: &[S],
    boundary: &QualifiedTime,
    tie_break: TieBreak,
) -> Option<usize> {
    let (time, qualifier) = (boundary.time()?, boundary.qualifier()?);
    let nearest = nearest_admitted(samples, time, qualifier)?;
    let stamp = samples[nearest].timestamp();

    let index = match tie_break {
        TieBreak::Earliest => samples.partition_point(|s| s.timestamp() < stamp),
        TieBreak::Latest => samples.partition_point(|s| s.timestamp() <= stamp) - 1,
    };
    Some(index)
}

enum Edge {
    Open,
    At(Time),
    Unmatched(Qualifier),
}

fn resolve_edge<S: Timestamped>(samples: &[S], edge: &QualifiedTime) -> Edge {
    match (edge.time(), edge.qualifier()) {
        (Some(time), Some(qualifier)) => match nearest_admitted(samples, time, qualifier) {
            Some(index) => Edge::At(samples[index].timestamp()),
            None => Edge::Unmatched(qualifier),
        },
        _ => Edge::Open,
    }
}

/// Resolve a range to the half-open index range of samples it selects.
///
/// Each pinned edge is matched to a sample time stamp with its qualifier and
/// every sample recorded at that stamp is included. An edge with no matching
/// sample either leaves that side unbounded (a "before" start or an "after"
/// finish, since every sample already lies on the right side) or empties the
/// window. Returns `None` for an invalid range.
///
/// # Examples
///
/// ```
/// use transport_log::compute::temporal::resolve_window;
/// use transport_log::{QualifiedTime, QualifiedTimeRange, Qualifier};
/// use std::time::Duration;
///
/// let samples: Vec<Duration> = [10, 20, 30].into_iter().map(Duration::from_nanos).collect();
/// let range = QualifiedTimeRange::from_start(QualifiedTime::new(
///     Duration::from_nanos(15),
///     Qualifier::OrClosestAfter,
/// ));
/// assert_eq!(resolve_window(&samples, &range), Some(1..3));
/// ```
pub fn resolve_window<S: Timestamped>(
    samples: &[S],
    range: &QualifiedTimeRange,
) -> Option<Range<usize>> {
    if !range.is_valid() {
        return None;
    }

    let len = samples.len();
    let lower = match resolve_edge(samples, range.start()) {
        Edge::Open => 0,
        Edge::At(stamp) => samples.partition_point(|s| s.timestamp() < stamp),
        Edge::Unmatched(q) if q.is_before() => 0,
        Edge::Unmatched(_) => len,
    };
    let upper = match resolve_edge(samples, range.finish()) {
        Edge::Open => len,
        Edge::At(stamp) => samples.partition_point(|s| s.timestamp() <= stamp),
        Edge::Unmatched(q) if q.is_before() => 0,
        Edge::Unmatched(_) => len,
    };

    Some(lower..upper.max(lower))
}

/// Slice of `samples` selected by `range`, or `None` for an invalid range.
pub fn select_window<'a, S: Timestamped>(
    samples: &'a [S],
    range: &QualifiedTimeRange,
) -> Option<&'a [S]> {
    resolve_window(samples, range).map(|window| &samples[window])
}
