//! In-memory message store.
//!
//! `MessageStore` keeps recorded messages sorted by receive time and answers
//! time-qualified queries against them. It has no on-disk format; a recorder
//! or log reader feeds it messages and a player reads batches back out.

use crate::batch::Batch;
use crate::compute::temporal::{resolve_window, select_sample};
use crate::compute::validation::{validate_topic, validate_type_name};
use crate::config::{Config, InvalidRangePolicy};
use crate::error::{LogError, Result};
use crate::query::QueryOptions;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use transport_log_types::{Message, QualifiedTime, Time};

/// A topic and message type pair seen in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDescriptor {
    pub topic: String,
    pub message_type: String,
    /// Number of messages recorded for this pair
    pub message_count: usize,
}

/// Time-ordered in-memory collection of messages.
///
/// Messages with equal receive times keep their insertion order.
///
/// # Examples
///
/// ```rust
/// use transport_log::{AllTopics, MessageStore, Message, QualifiedTime, QualifiedTimeRange};
/// use std::time::Duration;
///
/// let mut store = MessageStore::new();
/// for t in [10, 20, 30] {
///     store.insert(Message::new(Duration::from_nanos(t), b"data", "pkg.Msg", "/chatter"))?;
/// }
///
/// let range = QualifiedTimeRange::from_start(QualifiedTime::at(Duration::from_nanos(25)));
/// let batch = store.query(&AllTopics::new(range))?;
/// assert_eq!(batch.len(), 2);
/// # Ok::<(), transport_log::LogError>(())
/// ```
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    descriptors: FxHashMap<(String, String), usize>,
    config: Config,
}

impl MessageStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(LogError::InvalidConfig)?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record a message. Topic and type names are validated first.
    pub fn insert(&mut self, message: Message) -> Result<()> {
        validate_topic(message.topic())?;
        validate_type_name(message.message_type())?;

        let time = message.time_received();
        let index = self
            .messages
            .partition_point(|m| m.time_received() <= time);
        if index < self.messages.len() {
            log::debug!(
                "Message on '{}' at {}ns arrived out of order",
                message.topic(),
                time.as_nanos()
            );
        }

        *self
            .descriptors
            .entry((message.topic().to_owned(), message.message_type().to_owned()))
            .or_insert(0) += 1;
        self.messages.insert(index, message);
        Ok(())
    }

    /// Record several messages, stopping at the first invalid one.
    /// Returns how many were recorded.
    pub fn extend<I>(&mut self, messages: I) -> Result<usize>
    where
        I: IntoIterator<Item = Message>,
    {
        let mut inserted = 0;
        for message in messages {
            self.insert(message)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in receive-time order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Receive time of the earliest message.
    pub fn start_time(&self) -> Option<Time> {
        self.messages.first().map(Message::time_received)
    }

    /// Receive time of the latest message.
    pub fn end_time(&self) -> Option<Time> {
        self.messages.last().map(Message::time_received)
    }

    /// Topic/type pairs in the store, sorted by topic then type.
    pub fn topics(&self) -> Vec<TopicDescriptor> {
        let mut topics: Vec<TopicDescriptor> = self
            .descriptors
            .iter()
            .map(|((topic, message_type), count)| TopicDescriptor {
                topic: topic.clone(),
                message_type: message_type.clone(),
                message_count: *count,
            })
            .collect();
        topics.sort_by(|a, b| {
            a.topic
                .cmp(&b.topic)
                .then_with(|| a.message_type.cmp(&b.message_type))
        });
        topics
    }

    /// Read the messages selected by `options`.
    ///
    /// Messages are filtered by topic, then the time range is resolved
    /// against what is left. An invalid range is handled according to
    /// `Config::invalid_range_policy`.
    pub fn query(&self, options: &(impl QueryOptions + ?Sized)) -> Result<Batch> {
        let range = options.time_range();
        if !range.is_valid() {
            return match self.config.invalid_range_policy {
                InvalidRangePolicy::Empty => {
                    log::warn!("Ignoring query with invalid time range {}", range);
                    Ok(Batch::default())
                }
                InvalidRangePolicy::Reject => Err(LogError::InvalidRange(range.to_string())),
            };
        }

        let candidates: Vec<&Message> = self
            .messages
            .iter()
            .filter(|m| options.accepts_topic(m.topic()))
            .collect();

        let window = resolve_window(&candidates, range).unwrap_or(0..0);
        let limit = self.config.max_results.unwrap_or(usize::MAX);
        if window.len() > limit {
            log::debug!(
                "Truncating query result from {} to {} messages",
                window.len(),
                limit
            );
        }

        let messages: Vec<Message> = candidates[window]
            .iter()
            .take(limit)
            .map(|&m| m.clone())
            .collect();
        Ok(Batch::new(messages))
    }

    /// Find the single message a qualified time refers to, optionally
    /// restricted to one topic. Duplicate time stamps are resolved with
    /// `Config::tie_break`.
    pub fn lookup(&self, time: &QualifiedTime, topic: Option<&str>) -> Option<&Message> {
        let tie_break = self.config.tie_break;
        match topic {
            None => select_sample(&self.messages, time, tie_break).map(|i| &self.messages[i]),
            Some(topic) => {
                let candidates: Vec<&Message> =
                    self.messages.iter().filter(|m| m.topic() == topic).collect();
                select_sample(&candidates, time, tie_break).map(|i| candidates[i])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TieBreak;
    use crate::query::{AllTopics, TopicList};
    use std::time::Duration;
    use transport_log_types::{QualifiedTimeRange, Qualifier};

    fn ns(n: u64) -> Time {
        Duration::from_nanos(n)
    }

    fn msg(t: u64, topic: &str, payload: &[u8]) -> Message {
        Message::new(ns(t), payload, "test.Msg", topic)
    }

    fn payloads(messages: &[Message]) -> Vec<String> {
        messages
            .iter()
            .map(|m| String::from_utf8_lossy(m.data()).into_owned())
            .collect()
    }

    #[test]
    fn test_insert_keeps_time_order() {
        let mut store = MessageStore::new();
        store.insert(msg(30, "/a", b"3")).unwrap();
        store.insert(msg(10, "/a", b"1")).unwrap();
        store.insert(msg(20, "/a", b"2")).unwrap();
        store.insert(msg(20, "/a", b"2b")).unwrap();

        assert_eq!(payloads(store.messages()), ["1", "2", "2b", "3"]);
        assert_eq!(store.start_time(), Some(ns(10)));
        assert_eq!(store.end_time(), Some(ns(30)));
    }

    #[test]
    fn test_insert_rejects_invalid_names() {
        let mut store = MessageStore::new();
        assert!(store.insert(Message::default()).is_err());
        assert!(store.insert(msg(1, "/bad topic", b"")).is_err());
        assert!(store.insert(Message::new(ns(1), b"", "", "/ok")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_extend_stops_at_first_error() {
        let mut store = MessageStore::new();
        let err = store.extend(vec![msg(1, "/a", b""), msg(2, "", b""), msg(3, "/a", b"")]);
        assert!(err.is_err());
        assert_eq!(store.len(), 1);

        assert_eq!(store.extend(vec![msg(4, "/b", b"")]).unwrap(), 1);
    }

    #[test]
    fn test_topics() {
        let mut store = MessageStore::new();
        store.insert(msg(1, "/b", b"")).unwrap();
        store.insert(msg(2, "/a", b"")).unwrap();
        store.insert(msg(3, "/b", b"")).unwrap();
        store.insert(Message::new(ns(4), b"", "other.Msg", "/b")).unwrap();

        let topics = store.topics();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].topic, "/a");
        assert_eq!(topics[1].topic, "/b");
        assert_eq!(topics[1].message_type, "other.Msg");
        assert_eq!(topics[2].message_type, "test.Msg");
        assert_eq!(topics[2].message_count, 2);
    }

    #[test]
    fn test_query_filters_topics_before_matching() {
        let mut store = MessageStore::new();
        store.insert(msg(10, "/a", b"a10")).unwrap();
        store.insert(msg(15, "/b", b"b15")).unwrap();
        store.insert(msg(20, "/a", b"a20")).unwrap();

        // Closest before 18 on /a is 10, even though /b has a message at 15.
        let range = QualifiedTimeRange::from_start(QualifiedTime::new(
            ns(18),
            Qualifier::ClosestBefore,
        ));
        let batch = store.query(&TopicList::from_topics(["/a"], range)).unwrap();
        assert_eq!(payloads(batch.messages()), ["a10", "a20"]);
    }

    #[test]
    fn test_query_invalid_range_policies() {
        let mut store = MessageStore::new();
        store.insert(msg(10, "/a", b"")).unwrap();
        let range = QualifiedTimeRange::new(QualifiedTime::at(ns(20)), QualifiedTime::at(ns(5)));

        let batch = store.query(&AllTopics::new(range)).unwrap();
        assert!(batch.is_empty());

        let config = Config::default().with_invalid_range_policy(InvalidRangePolicy::Reject);
        let mut strict = MessageStore::with_config(config).unwrap();
        strict.insert(msg(10, "/a", b"")).unwrap();
        let err = strict.query(&AllTopics::new(range)).unwrap_err();
        assert!(matches!(err, LogError::InvalidRange(_)));
    }

    #[test]
    fn test_query_max_results() {
        let mut store = MessageStore::with_config(Config::default().with_max_results(2)).unwrap();
        for t in 1..=5 {
            store.insert(msg(t, "/a", b"")).unwrap();
        }
        let batch = store.query(&AllTopics::default()).unwrap();
        assert_eq!(batch.time_span(), Some((ns(1), ns(2))));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = Config {
            max_results: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            MessageStore::with_config(config),
            Err(LogError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lookup_with_tie_break() {
        let mut store = MessageStore::new();
        store.insert(msg(10, "/a", b"first")).unwrap();
        store.insert(msg(10, "/a", b"second")).unwrap();
        store.insert(msg(20, "/b", b"other")).unwrap();

        let at = QualifiedTime::at(ns(15));
        assert_eq!(store.lookup(&at, None).unwrap().data(), b"first");
        assert_eq!(store.lookup(&at, Some("/b")), None);

        let mut latest =
            MessageStore::with_config(Config::default().with_tie_break(TieBreak::Latest)).unwrap();
        latest.extend(store.messages().to_vec()).unwrap();
        assert_eq!(latest.lookup(&at, Some("/a")).unwrap().data(), b"second");

        let after = QualifiedTime::new(ns(10), Qualifier::ClosestAfter);
        assert_eq!(latest.lookup(&after, None).unwrap().topic(), "/b");
        assert_eq!(latest.lookup(&QualifiedTime::indeterminate(), None), None);
    }
}
