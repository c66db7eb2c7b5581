//! Topic-level keys.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::uuid::Uuid;

/// A topic known by both id and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    id: Uuid,
    name: String,
}

impl Topic {
    pub fn new(id: Uuid, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if id.is_zero() {
            return Err(Error::NullTopicId);
        }
        if name.is_empty() {
            return Err(Error::EmptyTopicName);
        }
        Ok(Self { id, name })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.id)
    }
}

/// A topic name and partition number.
///
/// The 32-bit hash code is computed once per instance since these are used
/// as map keys on hot read paths.
#[derive(Debug, Clone)]
pub struct TopicPartition {
    topic: String,
    partition: i32,
    hash: OnceLock<i32>,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
            hash: OnceLock::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// Stable hash of `(topic, partition)`, equal for equal values.
    pub fn hash_code(&self) -> i32 {
        *self.hash.get_or_init(|| {
            let topic_hash = self
                .topic
                .encode_utf16()
                .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)));
            31i32
                .wrapping_mul(31i32.wrapping_add(self.partition))
                .wrapping_add(topic_hash)
        })
    }
}

impl PartialEq for TopicPartition {
    fn eq(&self, other: &Self) -> bool {
        self.partition == other.partition && self.topic == other.topic
    }
}

impl Eq for TopicPartition {}

impl Hash for TopicPartition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl PartialOrd for TopicPartition {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TopicPartition {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.topic, self.partition).cmp(&(&other.topic, other.partition))
    }
}

impl Display for TopicPartition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.topic, self.partition)
    }
}

/// A topic partition paired with the id of its topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicIdPartition {
    pub topic_id: Uuid,
    pub topic_partition: TopicPartition,
}

impl TopicIdPartition {
    pub fn new(topic_id: Uuid, topic_partition: TopicPartition) -> Self {
        Self {
            topic_id,
            topic_partition,
        }
    }
}

impl Display for TopicIdPartition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.topic_id, self.topic_partition)
    }
}

/// One replica of a partition, hosted on `broker_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartitionReplica {
    topic: String,
    partition: i32,
    broker_id: i32,
}

impl TopicPartitionReplica {
    pub fn new(topic: impl Into<String>, partition: i32, broker_id: i32) -> Result<Self> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(Error::EmptyTopicName);
        }
        Ok(Self {
            topic,
            partition,
            broker_id,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partition(&self) -> i32 {
        self.partition
    }

    pub fn broker_id(&self) -> i32 {
        self.broker_id
    }
}

impl Display for TopicPartitionReplica {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.topic, self.partition, self.broker_id)
    }
}

/// A set of topics addressed either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicCollection {
    Ids(Vec<Uuid>),
    Names(Vec<String>),
}

impl TopicCollection {
    /// Pair parallel lists of ids and names.
    pub fn zip(ids: Vec<Uuid>, names: Vec<String>) -> Result<Vec<Topic>> {
        if ids.len() != names.len() {
            return Err(Error::TopicCollectionLengthMismatch {
                ids: ids.len(),
                names: names.len(),
            });
        }

        ids.into_iter()
            .zip(names)
            .map(|(id, name)| Topic::new(id, name))
            .collect()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Names(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
