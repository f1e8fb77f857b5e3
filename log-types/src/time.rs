//! Qualified time points and ranges used to select recorded messages.
//!
//! Time is continuous, so the exact stamp of a desired message is rarely known
//! in advance. A [`QualifiedTime`] pairs a stamp with a [`Qualifier`] that tells
//! the matcher how to treat samples that do not land exactly on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Nanosecond-resolution time stamp.
///
/// Depending on context this is an absolute stamp measured from the log's
/// epoch or a relative offset. Any `Duration` constructor works
/// (`Duration::from_secs`, `Duration::from_millis`, ...).
///
/// Serialized forms carry the stamp as `u64` nanoseconds, so only times
/// up to `u64::MAX` nanoseconds (about 584 years) can be written out.
/// Serializing a larger value fails with an error.
pub type Time = Duration;

/// Determines how a pinned time stamp selects a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Exact match, or the closest sample before the stamp.
    #[default]
    OrClosestBefore,
    /// Closest sample strictly before the stamp.
    ClosestBefore,
    /// Exact match, or the closest sample after the stamp.
    OrClosestAfter,
    /// Closest sample strictly after the stamp.
    ClosestAfter,
}

impl Qualifier {
    /// All qualifiers in declaration order.
    pub const ALL: [Qualifier; 4] = [
        Qualifier::OrClosestBefore,
        Qualifier::ClosestBefore,
        Qualifier::OrClosestAfter,
        Qualifier::ClosestAfter,
    ];

    /// Whether this qualifier looks backwards in time from the stamp.
    pub const fn is_before(self) -> bool {
        match self {
            Qualifier::OrClosestBefore | Qualifier::ClosestBefore => true,
            Qualifier::OrClosestAfter | Qualifier::ClosestAfter => false,
        }
    }

    /// Whether a sample exactly on the stamp is acceptable.
    pub const fn is_inclusive(self) -> bool {
        match self {
            Qualifier::OrClosestBefore | Qualifier::OrClosestAfter => true,
            Qualifier::ClosestBefore | Qualifier::ClosestAfter => false,
        }
    }

    /// Whether `sample` lies on the admissible side of `boundary`.
    ///
    /// The matcher picks the nearest admissible sample; this only tells it
    /// which samples are candidates.
    ///
    /// # Examples
    ///
    /// ```
    /// use transport_log_types::time::Qualifier;
    /// use std::time::Duration;
    ///
    /// let b = Duration::from_nanos(20);
    /// assert!(Qualifier::OrClosestBefore.admits(b, b));
    /// assert!(!Qualifier::ClosestBefore.admits(b, b));
    /// assert!(Qualifier::ClosestAfter.admits(b, Duration::from_nanos(30)));
    /// ```
    pub fn admits(self, boundary: Time, sample: Time) -> bool {
        match self {
            Qualifier::OrClosestBefore => sample <= boundary,
            Qualifier::ClosestBefore => sample < boundary,
            Qualifier::OrClosestAfter => sample >= boundary,
            Qualifier::ClosestAfter => sample > boundary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Qualifier::OrClosestBefore => "or_closest_before",
            Qualifier::ClosestBefore => "closest_before",
            Qualifier::OrClosestAfter => "or_closest_after",
            Qualifier::ClosestAfter => "closest_after",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct Pinned {
    #[serde(rename = "time_ns", with = "nanos")]
    time: Time,
    #[serde(default)]
    qualifier: Qualifier,
}

/// A time stamp with a matching qualifier, or no time at all.
///
/// An indeterminate value means "no time specified". Used as the start of a
/// range it extends the range as far into the past as the log goes; used as
/// the finish it lets the range run to the end of the log.
///
/// # Examples
///
/// ```
/// use transport_log_types::time::{QualifiedTime, Qualifier};
/// use std::time::Duration;
///
/// let mut t = QualifiedTime::at(Duration::from_millis(5));
/// assert_eq!(t.qualifier(), Some(Qualifier::OrClosestBefore));
///
/// t.clear();
/// assert!(t.is_indeterminate());
/// assert_eq!(t.time(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedTime {
    pinned: Option<Pinned>,
}

impl QualifiedTime {
    /// Create a pinned time with an explicit qualifier.
    pub const fn new(time: Time, qualifier: Qualifier) -> Self {
        Self {
            pinned: Some(Pinned { time, qualifier }),
        }
    }

    /// Create a pinned time with the default `OrClosestBefore` qualifier.
    pub const fn at(time: Time) -> Self {
        Self::new(time, Qualifier::OrClosestBefore)
    }

    /// Create a time that specifies nothing.
    pub const fn indeterminate() -> Self {
        Self { pinned: None }
    }

    pub const fn is_indeterminate(&self) -> bool {
        self.pinned.is_none()
    }

    /// The pinned stamp, or `None` if indeterminate.
    pub fn time(&self) -> Option<Time> {
        self.pinned.map(|p| p.time)
    }

    /// The qualifier, or `None` if indeterminate.
    pub fn qualifier(&self) -> Option<Qualifier> {
        self.pinned.map(|p| p.qualifier)
    }

    /// Pin this value to `time` with `qualifier`, replacing any previous state.
    pub fn set_time(&mut self, time: Time, qualifier: Qualifier) {
        self.pinned = Some(Pinned { time, qualifier });
    }

    /// Make this value indeterminate.
    pub fn clear(&mut self) {
        self.pinned = None;
    }
}

impl From<Time> for QualifiedTime {
    fn from(time: Time) -> Self {
        Self::at(time)
    }
}

impl fmt::Display for QualifiedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pinned {
            Some(Pinned { time, qualifier }) => {
                write!(f, "{}ns ({})", time.as_nanos(), qualifier)
            }
            None => f.write_str("indeterminate"),
        }
    }
}

/// A pair of qualified times describing a selection window.
///
/// Either edge may be indeterminate. Setters never reject a value: they
/// apply it and return [`is_valid`](Self::is_valid), so a caller can move
/// through an invalid intermediate state while editing both edges.
///
/// # Examples
///
/// ```
/// use transport_log_types::time::{QualifiedTime, QualifiedTimeRange};
/// use std::time::Duration;
///
/// let mut range = QualifiedTimeRange::all_time();
/// assert!(range.set_finish(QualifiedTime::at(Duration::from_secs(1))));
///
/// // Start moves past finish: applied, but reported invalid.
/// assert!(!range.set_start(QualifiedTime::at(Duration::from_secs(5))));
/// assert!(range.set_finish(QualifiedTime::at(Duration::from_secs(9))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedTimeRange {
    #[serde(default)]
    start: QualifiedTime,
    #[serde(default)]
    finish: QualifiedTime,
}

impl QualifiedTimeRange {
    pub const fn new(start: QualifiedTime, finish: QualifiedTime) -> Self {
        Self { start, finish }
    }

    /// A range that begins at `start` and never ends.
    pub const fn from_start(start: QualifiedTime) -> Self {
        Self::new(start, QualifiedTime::indeterminate())
    }

    /// A range that ends at `finish` and has no beginning.
    pub const fn until(finish: QualifiedTime) -> Self {
        Self::new(QualifiedTime::indeterminate(), finish)
    }

    /// A range with no beginning and no end.
    pub const fn all_time() -> Self {
        Self::new(QualifiedTime::indeterminate(), QualifiedTime::indeterminate())
    }

    pub fn start(&self) -> &QualifiedTime {
        &self.start
    }

    pub fn finish(&self) -> &QualifiedTime {
        &self.finish
    }

    /// Replace the start. Returns whether the resulting range is valid.
    pub fn set_start(&mut self, start: QualifiedTime) -> bool {
        self.start = start;
        self.is_valid()
    }

    /// Replace the finish. Returns whether the resulting range is valid.
    pub fn set_finish(&mut self, finish: QualifiedTime) -> bool {
        self.finish = finish;
        self.is_valid()
    }

    /// Replace both edges. Returns whether the resulting range is valid.
    pub fn set_range(&mut self, start: QualifiedTime, finish: QualifiedTime) -> bool {
        self.start = start;
        self.finish = finish;
        self.is_valid()
    }

    /// A range is valid when either edge is indeterminate or the finish stamp
    /// is not earlier than the start stamp. Qualifiers are not consulted.
    pub fn is_valid(&self) -> bool {
        match (self.start.time(), self.finish.time()) {
            (Some(start), Some(finish)) => finish >= start,
            _ => true,
        }
    }
}

impl fmt::Display for QualifiedTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.finish)
    }
}

pub(crate) mod nanos {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(time: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(time.as_nanos())
            .map_err(|_| S::Error::custom("time does not fit in u64 nanoseconds"))?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
