use std::fmt::{Display, Formatter};

use crate::node::Node;
use crate::topic::TopicPartition;

/// Leadership and replica state of a single partition.
///
/// `in_sync_replicas` and `offline_replicas` are expected to be subsets of
/// `replicas`; this is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    /// The topic name
    pub topic: String,

    /// The partition index
    pub partition: i32,

    /// The leader, if there currently is one
    pub leader: Option<Node>,

    /// The set of all nodes that host this partition
    pub replicas: Vec<Node>,

    /// The set of all nodes that are in sync with the leader for this partition
    pub in_sync_replicas: Vec<Node>,

    /// Replicas hosted on brokers that are currently offline
    pub offline_replicas: Vec<Node>,
}

impl PartitionInfo {
    pub fn new(
        topic: impl Into<String>,
        partition: i32,
        leader: Option<Node>,
        replicas: Vec<Node>,
        in_sync_replicas: Vec<Node>,
    ) -> Self {
        Self {
            topic: topic.into(),
            partition,
            leader,
            replicas,
            in_sync_replicas,
            offline_replicas: vec![],
        }
    }

    pub fn with_offline_replicas(mut self, offline_replicas: Vec<Node>) -> Self {
        self.offline_replicas = offline_replicas;
        self
    }

    pub fn topic_partition(&self) -> TopicPartition {
        TopicPartition::new(self.topic.clone(), self.partition)
    }

    pub fn has_leader(&self) -> bool {
        self.leader.is_some()
    }
}

fn format_node_ids(nodes: &[Node]) -> String {
    let ids: Vec<_> = nodes.iter().map(Node::id_string).collect();
    format!("[{}]", ids.join(","))
}

impl Display for PartitionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Partition(topic = {}, partition = {}, leader = {}, replicas = {}, isr = {}, offlineReplicas = {})",
            self.topic,
            self.partition,
            self.leader
                .as_ref()
                .map(Node::id_string)
                .unwrap_or_else(|| "none".to_owned()),
            format_node_ids(&self.replicas),
            format_node_ids(&self.in_sync_replicas),
            format_node_ids(&self.offline_replicas),
        )
    }
}
