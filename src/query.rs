//! Query options: which topics to read and over which time range.
//!
//! A query pairs a [`QualifiedTimeRange`] with a topic selector. The store
//! filters messages by topic first, then resolves the range against the
//! remaining messages, so qualifiers like "closest before" look only at
//! samples from the selected topics.

use crate::error::Result;
use regex::Regex;
use rustc_hash::FxHashSet;
use transport_log_types::QualifiedTimeRange;

/// Selection criteria consumed by `MessageStore::query`.
pub trait QueryOptions {
    /// Time window to read.
    fn time_range(&self) -> &QualifiedTimeRange;

    /// Whether messages published on `topic` are wanted.
    fn accepts_topic(&self, topic: &str) -> bool;
}

/// Every topic in the log.
#[derive(Debug, Clone, Default)]
pub struct AllTopics {
    range: QualifiedTimeRange,
}

impl AllTopics {
    pub fn new(range: QualifiedTimeRange) -> Self {
        Self { range }
    }

    pub fn time_range_mut(&mut self) -> &mut QualifiedTimeRange {
        &mut self.range
    }
}

impl QueryOptions for AllTopics {
    fn time_range(&self) -> &QualifiedTimeRange {
        &self.range
    }

    fn accepts_topic(&self, _topic: &str) -> bool {
        true
    }
}

/// An explicit set of topic names.
///
/// # Examples
///
/// ```
/// use transport_log::query::{QueryOptions, TopicList};
/// use transport_log::QualifiedTimeRange;
///
/// let options = TopicList::from_topics(["/imu", "/gps"], QualifiedTimeRange::all_time());
/// assert!(options.accepts_topic("/imu"));
/// assert!(!options.accepts_topic("/camera"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TopicList {
    topics: FxHashSet<String>,
    range: QualifiedTimeRange,
}

impl TopicList {
    pub fn new(range: QualifiedTimeRange) -> Self {
        Self {
            topics: FxHashSet::default(),
            range,
        }
    }

    pub fn from_topics<I, T>(topics: I, range: QualifiedTimeRange) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
            range,
        }
    }

    /// Add a topic. Returns false if it was already present.
    pub fn add(&mut self, topic: impl Into<String>) -> bool {
        self.topics.insert(topic.into())
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn time_range_mut(&mut self) -> &mut QualifiedTimeRange {
        &mut self.range
    }
}

impl QueryOptions for TopicList {
    fn time_range(&self) -> &QualifiedTimeRange {
        &self.range
    }

    fn accepts_topic(&self, topic: &str) -> bool {
        self.contains(topic)
    }
}

/// Topics whose full name matches a regular expression.
#[derive(Debug, Clone)]
pub struct TopicPattern {
    source: String,
    pattern: Regex,
    range: QualifiedTimeRange,
}

impl TopicPattern {
    /// Compile `pattern`. It must match the whole topic name, not a substring.
    pub fn new(pattern: &str, range: QualifiedTimeRange) -> Result<Self> {
        Ok(Self {
            source: pattern.to_owned(),
            pattern: Self::anchored(pattern)?,
            range,
        })
    }

    fn anchored(pattern: &str) -> Result<Regex> {
        Ok(Regex::new(&format!("^(?:{pattern})$"))?)
    }

    /// The pattern as given by the caller.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Replace the pattern. On error the previous pattern is kept.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        self.pattern = Self::anchored(pattern)?;
        self.source = pattern.to_owned();
        Ok(())
    }

    pub fn time_range_mut(&mut self) -> &mut QualifiedTimeRange {
        &mut self.range
    }
}

impl QueryOptions for TopicPattern {
    fn time_range(&self) -> &QualifiedTimeRange {
        &self.range
    }

    fn accepts_topic(&self, topic: &str) -> bool {
        self.pattern.is_match(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use std::time::Duration;
    use transport_log_types::QualifiedTime;

    #[test]
    fn test_all_topics() {
        let options = AllTopics::default();
        assert!(options.accepts_topic("/anything"));
        assert_eq!(*options.time_range(), QualifiedTimeRange::all_time());
    }

    #[test]
    fn test_topic_list() {
        let mut options = TopicList::new(QualifiedTimeRange::all_time());
        assert!(options.is_empty());
        assert!(!options.accepts_topic("/foo"));

        assert!(options.add("/foo"));
        assert!(!options.add("/foo"));
        assert!(options.add(String::from("/bar")));

        assert_eq!(options.len(), 2);
        assert!(options.accepts_topic("/foo"));
        assert!(options.accepts_topic("/bar"));
        assert!(!options.accepts_topic("/baz"));

        let mut names: Vec<&str> = options.topics().collect();
        names.sort_unstable();
        assert_eq!(names, ["/bar", "/foo"]);
    }

    #[test]
    fn test_topic_pattern_matches_whole_name() {
        let options = TopicPattern::new("/sensors/.*", QualifiedTimeRange::all_time()).unwrap();
        assert!(options.accepts_topic("/sensors/imu"));
        assert!(!options.accepts_topic("/robot/sensors/imu"));
        assert_eq!(options.pattern(), "/sensors/.*");

        let alternation = TopicPattern::new("/a|/b", QualifiedTimeRange::all_time()).unwrap();
        assert!(alternation.accepts_topic("/a"));
        assert!(alternation.accepts_topic("/b"));
        assert!(!alternation.accepts_topic("/ab"));
    }

    #[test]
    fn test_topic_pattern_invalid() {
        let err = TopicPattern::new("/foo(", QualifiedTimeRange::all_time()).unwrap_err();
        assert!(matches!(err, LogError::InvalidPattern(_)));

        let mut options = TopicPattern::new("/foo", QualifiedTimeRange::all_time()).unwrap();
        assert!(options.set_pattern("[").is_err());
        assert_eq!(options.pattern(), "/foo");
        assert!(options.accepts_topic("/foo"));

        options.set_pattern("/bar").unwrap();
        assert!(options.accepts_topic("/bar"));
        assert!(!options.accepts_topic("/foo"));
    }

    #[test]
    fn test_time_range_editing() {
        let mut options = AllTopics::default();
        let range = options.time_range_mut();
        assert!(range.set_finish(QualifiedTime::at(Duration::from_secs(1))));
        assert!(!range.set_start(QualifiedTime::at(Duration::from_secs(2))));

        assert!(!options.time_range().is_valid());
        assert_eq!(
            options.time_range().start().time(),
            Some(Duration::from_secs(2))
        );
    }
}
