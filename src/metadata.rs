//! Cluster-wide Kafka metadata, as decoded from a metadata response.
//!
//! Fetching and decoding happen elsewhere; this module only turns the result
//! into a [`Cluster`] snapshot.

use std::collections::HashMap;

use tracing::debug;

use crate::cluster::{Cluster, ClusterBuilder};
use crate::node::Node;
use crate::partition_info::PartitionInfo;
use crate::uuid::Uuid;

/// Metadata container for the entire cluster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// The cluster ID, if the responding broker reports one.
    pub cluster_id: Option<String>,

    /// Brokers.
    pub brokers: Vec<MetadataBroker>,

    /// The ID of the controller broker.
    pub controller_id: Option<i32>,

    /// Topics.
    pub topics: Vec<MetadataTopic>,
}

/// Metadata for a certain broker.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBroker {
    /// The broker ID
    pub node_id: i32,

    /// The broker hostname
    pub host: String,

    /// The broker port
    pub port: i32,

    /// Rack.
    pub rack: Option<String>,
}

impl From<&MetadataBroker> for Node {
    fn from(b: &MetadataBroker) -> Self {
        Self {
            id: b.node_id,
            host: b.host.clone(),
            port: b.port,
            rack: b.rack.clone(),
        }
    }
}

/// Per-topic error reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicError {
    /// The client may not describe this topic.
    AuthorizationFailed,

    /// The topic name is not legal.
    InvalidTopic,

    /// Any other error code, e.g. an unknown topic or a leader election in progress.
    Other(i16),
}

/// Metadata for a certain topic.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTopic {
    /// The topic name
    pub name: String,

    /// The topic ID; [`Uuid::ZERO`] if unknown
    pub topic_id: Uuid,

    /// Error for this topic, if any
    pub error: Option<TopicError>,

    /// True if the topic is internal
    pub is_internal: Option<bool>,

    /// Each partition in the topic
    pub partitions: Vec<MetadataPartition>,
}

/// Metadata for a certain partition.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPartition {
    /// The partition index
    pub partition_index: i32,

    /// The ID of the leader broker, `-1` if there is none
    pub leader_id: i32,

    /// The set of all nodes that host this partition
    pub replica_nodes: Vec<i32>,

    /// The set of all nodes that are in sync with the leader for this partition
    pub isr_nodes: Vec<i32>,

    /// The set of replicas that are offline
    pub offline_replicas: Vec<i32>,
}

impl Metadata {
    /// Build a [`Cluster`] snapshot.
    ///
    /// Topics that failed authorization or have invalid names are recorded as
    /// such; topics with other errors are left out. Replica ids that do not
    /// match a broker become placeholder nodes without an address, and a
    /// leader that does not match a broker is treated as no leader.
    pub fn build_cluster(&self) -> Cluster {
        let nodes_by_id: HashMap<i32, Node> = self
            .brokers
            .iter()
            .map(|b| (b.node_id, Node::from(b)))
            .collect();
        let resolve = |id: &i32| {
            nodes_by_id
                .get(id)
                .cloned()
                .unwrap_or_else(|| Node::new(*id, "", -1))
        };

        let mut partitions = vec![];
        let mut unauthorized_topics = vec![];
        let mut invalid_topics = vec![];
        let mut internal_topics = vec![];
        let mut topic_ids = HashMap::new();

        for topic in &self.topics {
            match topic.error {
                Some(TopicError::AuthorizationFailed) => {
                    unauthorized_topics.push(topic.name.clone());
                    continue;
                }
                Some(TopicError::InvalidTopic) => {
                    invalid_topics.push(topic.name.clone());
                    continue;
                }
                Some(TopicError::Other(code)) => {
                    debug!(topic = topic.name.as_str(), code, "skipping topic with error");
                    continue;
                }
                None => {}
            }

            if topic.is_internal == Some(true) {
                internal_topics.push(topic.name.clone());
            }
            if !topic.topic_id.is_zero() {
                topic_ids.insert(topic.name.clone(), topic.topic_id);
            }

            for p in &topic.partitions {
                partitions.push(
                    PartitionInfo::new(
                        topic.name.clone(),
                        p.partition_index,
                        nodes_by_id.get(&p.leader_id).cloned(),
                        p.replica_nodes.iter().map(resolve).collect(),
                        p.isr_nodes.iter().map(resolve).collect(),
                    )
                    .with_offline_replicas(p.offline_replicas.iter().map(resolve).collect()),
                );
            }
        }

        debug!(
            n_brokers = self.brokers.len(),
            n_partitions = partitions.len(),
            "built cluster from metadata"
        );

        ClusterBuilder::new()
            .cluster_id(self.cluster_id.clone().unwrap_or_default())
            .nodes(nodes_by_id.values().cloned())
            .partitions(partitions)
            .unauthorized_topics(unauthorized_topics)
            .invalid_topics(invalid_topics)
            .internal_topics(internal_topics)
            .controller(self.controller_id.and_then(|id| nodes_by_id.get(&id).cloned()))
            .topic_ids(topic_ids)
            .build()
    }
}

impl From<&Metadata> for Cluster {
    fn from(m: &Metadata) -> Self {
        m.build_cluster()
    }
}
