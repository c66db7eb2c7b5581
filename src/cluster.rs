//! In-memory snapshot of the cluster topology.
//!
//! A [`Cluster`] owns the authoritative partition map plus derived indexes
//! (by topic, by leader, available-by-topic) and keeps them in step on every
//! mutation. All state sits behind a single [`RwLock`]; queries return owned
//! copies so callers can hold on to results across later mutations.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::partition_info::PartitionInfo;
use crate::topic::TopicPartition;
use crate::uuid::Uuid;

mod bootstrap;
mod resource;

pub use self::bootstrap::parse_address;
pub use self::resource::{ClusterResource, ClusterResourceListener, ClusterResourceListeners};

/// Builder for [`Cluster`].
///
/// This is the full constructor: every input collection is copied into the
/// new snapshot and all derived indexes are built in one pass. Inputs that are
/// never set are treated as empty.
#[derive(Debug, Default, Clone)]
pub struct ClusterBuilder {
    cluster_id: Option<String>,
    is_bootstrap_configured: bool,
    nodes: Vec<Node>,
    partitions: HashMap<TopicPartition, PartitionInfo>,
    unauthorized_topics: HashSet<String>,
    invalid_topics: HashSet<String>,
    internal_topics: HashSet<String>,
    controller: Option<Node>,
    topic_ids: HashMap<String, Uuid>,
}

impl ClusterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster_id(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }

    pub fn bootstrap_configured(mut self, is_bootstrap_configured: bool) -> Self {
        self.is_bootstrap_configured = is_bootstrap_configured;
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.nodes = nodes.into_iter().collect();
        self
    }

    /// Set the partition map, keyed by each partition's own topic and index.
    pub fn partitions(self, partitions: impl IntoIterator<Item = PartitionInfo>) -> Self {
        self.partitions_by_topic_partition(
            partitions
                .into_iter()
                .map(|p| (p.topic_partition(), p))
                .collect(),
        )
    }

    pub fn partitions_by_topic_partition(
        mut self,
        partitions: HashMap<TopicPartition, PartitionInfo>,
    ) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn unauthorized_topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
        self.unauthorized_topics = topics.into_iter().collect();
        self
    }

    pub fn invalid_topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
        self.invalid_topics = topics.into_iter().collect();
        self
    }

    pub fn internal_topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
        self.internal_topics = topics.into_iter().collect();
        self
    }

    pub fn controller(mut self, controller: Option<Node>) -> Self {
        self.controller = controller;
        self
    }

    pub fn topic_ids(mut self, topic_ids: HashMap<String, Uuid>) -> Self {
        self.topic_ids = topic_ids;
        self
    }

    /// Build [`Cluster`].
    pub fn build(self) -> Cluster {
        let mut nodes = self.nodes;
        nodes.sort_by_key(|n| n.id);

        let mut nodes_by_id = HashMap::with_capacity(nodes.len());
        let mut partitions_by_node: HashMap<i32, Vec<Arc<PartitionInfo>>> =
            HashMap::with_capacity(nodes.len());
        for node in &nodes {
            nodes_by_id.insert(node.id, node.clone());
            partitions_by_node.insert(node.id, vec![]);
        }

        let mut partitions_by_topic_partition = HashMap::with_capacity(self.partitions.len());
        let mut partitions_by_topic: HashMap<String, Vec<Arc<PartitionInfo>>> = HashMap::new();
        for (tp, p) in self.partitions {
            let p = Arc::new(p);
            partitions_by_topic
                .entry(p.topic.clone())
                .or_default()
                .push(Arc::clone(&p));
            if let Some(leader) = &p.leader {
                partitions_by_node
                    .entry(leader.id)
                    .or_default()
                    .push(Arc::clone(&p));
            }
            partitions_by_topic_partition.insert(tp, p);
        }

        // map iteration order is arbitrary, present partitions by index
        for list in partitions_by_topic.values_mut() {
            list.sort_by_key(|p| p.partition);
        }
        for list in partitions_by_node.values_mut() {
            list.sort_by(|a, b| (&a.topic, a.partition).cmp(&(&b.topic, b.partition)));
        }

        let topic_names = self
            .topic_ids
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect();

        let mut state = ClusterState {
            cluster_resource: ClusterResource::new(self.cluster_id.unwrap_or_default()),
            is_bootstrap_configured: self.is_bootstrap_configured,
            nodes,
            nodes_by_id,
            partitions_by_topic_partition,
            partitions_by_topic,
            available_partitions_by_topic: HashMap::new(),
            partitions_by_node,
            unauthorized_topics: self.unauthorized_topics,
            invalid_topics: self.invalid_topics,
            internal_topics: self.internal_topics,
            controller: self.controller,
            topic_ids: self.topic_ids,
            topic_names,
        };
        state.update_available_partitions();

        Cluster {
            state: RwLock::new(state),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ClusterState {
    cluster_resource: ClusterResource,
    is_bootstrap_configured: bool,

    /// Sorted by node id.
    nodes: Vec<Node>,
    nodes_by_id: HashMap<i32, Node>,

    /// Source of truth for partitions, everything below is derived from it.
    partitions_by_topic_partition: HashMap<TopicPartition, Arc<PartitionInfo>>,
    partitions_by_topic: HashMap<String, Vec<Arc<PartitionInfo>>>,
    available_partitions_by_topic: HashMap<String, Vec<Arc<PartitionInfo>>>,
    partitions_by_node: HashMap<i32, Vec<Arc<PartitionInfo>>>,

    unauthorized_topics: HashSet<String>,
    invalid_topics: HashSet<String>,
    internal_topics: HashSet<String>,
    controller: Option<Node>,

    topic_ids: HashMap<String, Uuid>,
    topic_names: HashMap<Uuid, String>,
}

impl ClusterState {
    fn update_available_partitions(&mut self) {
        self.available_partitions_by_topic = self
            .partitions_by_topic
            .iter()
            .filter_map(|(topic, partitions)| {
                let available: Vec<_> = partitions
                    .iter()
                    .filter(|p| p.has_leader())
                    .map(Arc::clone)
                    .collect();
                (!available.is_empty()).then(|| (topic.clone(), available))
            })
            .collect();
    }

    /// Drop `(topic, partition)` from the by-topic and by-node indexes.
    fn unindex_partition(&mut self, topic: &str, partition: i32) {
        let matches = |p: &Arc<PartitionInfo>| p.topic == topic && p.partition == partition;

        if let Some(list) = self.partitions_by_topic.get_mut(topic) {
            list.retain(|p| !matches(p));
            if list.is_empty() {
                self.partitions_by_topic.remove(topic);
            }
        }
        for list in self.partitions_by_node.values_mut() {
            list.retain(|p| !matches(p));
        }
    }
}

/// A snapshot of the nodes, topics and partitions of a cluster.
#[derive(Debug)]
pub struct Cluster {
    state: RwLock<ClusterState>,
}

impl Cluster {
    /// A cluster with no nodes, topics or partitions and an empty cluster id.
    pub fn empty() -> Self {
        ClusterBuilder::new().build()
    }

    /// Build a placeholder cluster from `host:port` connection addresses.
    ///
    /// Nodes get the ids `-1, -2, ...` in input order so they never collide
    /// with real broker ids.
    pub fn bootstrap<I, S>(addresses: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = addresses
            .into_iter()
            .enumerate()
            .map(|(i, address)| {
                let (host, port) = parse_address(address.as_ref())?;
                let id = -1 - i32::try_from(i).map_err(|_| Error::InvalidAddress {
                    address: address.as_ref().to_owned(),
                    reason: "too many bootstrap addresses".to_owned(),
                })?;
                Ok(Node::new(id, host, i32::from(port)))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(n_nodes = nodes.len(), "built bootstrap cluster");

        Ok(ClusterBuilder::new()
            .bootstrap_configured(true)
            .nodes(nodes)
            .build())
    }

    pub fn builder() -> ClusterBuilder {
        ClusterBuilder::new()
    }

    /// Add a node. Fails without changes if a node with the same id exists.
    ///
    /// The node list stays sorted by id.
    pub fn add_node(&self, node: Node) -> Result<()> {
        let mut state = self.state.write();
        if state.nodes_by_id.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }

        debug!(node_id = node.id, host = node.host.as_str(), "added node");

        state.partitions_by_node.entry(node.id).or_default();
        state.nodes_by_id.insert(node.id, node.clone());
        let pos = state.nodes.partition_point(|n| n.id < node.id);
        state.nodes.insert(pos, node);
        Ok(())
    }

    /// Add or replace a partition.
    ///
    /// Fails without changes only if an equal entry is already present; a
    /// different entry for the same topic partition replaces the old one in
    /// every index.
    pub fn add_partition(&self, partition: PartitionInfo) -> Result<()> {
        let mut state = self.state.write();
        let tp = partition.topic_partition();

        match state
            .partitions_by_topic_partition
            .get(&tp)
            .map(|existing| **existing == partition)
        {
            Some(true) => {
                return Err(Error::DuplicatePartition {
                    topic: partition.topic,
                    partition: partition.partition,
                });
            }
            Some(false) => state.unindex_partition(&partition.topic, partition.partition),
            None => {}
        }

        debug!(
            topic = partition.topic.as_str(),
            partition = partition.partition,
            leader = partition.leader.as_ref().map(|n| n.id),
            "added partition"
        );

        let p = Arc::new(partition);
        state
            .partitions_by_topic
            .entry(p.topic.clone())
            .or_default()
            .push(Arc::clone(&p));
        if let Some(leader) = &p.leader {
            state
                .partitions_by_node
                .entry(leader.id)
                .or_default()
                .push(Arc::clone(&p));
        }
        state.partitions_by_topic_partition.insert(tp, p);
        state.update_available_partitions();
        Ok(())
    }

    /// Remove a node and every partition it leads. Unknown ids are ignored.
    ///
    /// Led partitions are purged from all indexes, including the primary
    /// partition map. Partitions where the node is only a follower are kept.
    pub fn remove_node(&self, node_id: i32) {
        let mut state = self.state.write();
        let Some(pos) = state.nodes.iter().position(|n| n.id == node_id) else {
            return;
        };
        state.nodes.remove(pos);
        state.nodes_by_id.remove(&node_id);

        let led_by_node =
            |p: &Arc<PartitionInfo>| p.leader.as_ref().is_some_and(|l| l.id == node_id);

        state
            .partitions_by_topic_partition
            .retain(|_, p| !led_by_node(p));
        state.partitions_by_topic.retain(|_, list| {
            list.retain(|p| !led_by_node(p));
            !list.is_empty()
        });
        let removed = state
            .partitions_by_node
            .remove(&node_id)
            .map(|l| l.len())
            .unwrap_or_default();
        state.update_available_partitions();

        debug!(node_id, removed_partitions = removed, "removed node");
    }

    /// Remove a partition from every index. Unknown partitions are ignored.
    pub fn remove_partition(&self, topic: &str, partition: i32) {
        let mut state = self.state.write();
        let removed = state
            .partitions_by_topic_partition
            .remove(&TopicPartition::new(topic, partition));
        state.unindex_partition(topic, partition);
        state.update_available_partitions();

        if removed.is_some() {
            debug!(topic, partition, "removed partition");
        }
    }

    /// Return a new cluster with `partitions` merged over the current ones.
    ///
    /// `self` is left untouched; the result re-derives all indexes.
    pub fn with_partitions(&self, partitions: HashMap<TopicPartition, PartitionInfo>) -> Self {
        let builder = {
            let state = self.state.read();

            let mut merged: HashMap<TopicPartition, PartitionInfo> = state
                .partitions_by_topic_partition
                .iter()
                .map(|(tp, p)| (tp.clone(), PartitionInfo::clone(p)))
                .collect();
            merged.extend(partitions);

            ClusterBuilder::new()
                .cluster_id(state.cluster_resource.cluster_id())
                .bootstrap_configured(state.is_bootstrap_configured)
                .nodes(state.nodes.clone())
                .partitions_by_topic_partition(merged)
                .unauthorized_topics(state.unauthorized_topics.clone())
                .invalid_topics(state.invalid_topics.clone())
                .internal_topics(state.internal_topics.clone())
                .controller(state.controller.clone())
                .topic_ids(state.topic_ids.clone())
        };
        builder.build()
    }

    /// All known nodes, sorted by id.
    pub fn nodes(&self) -> Vec<Node> {
        self.state.read().nodes.clone()
    }

    pub fn node_by_id(&self, id: i32) -> Option<Node> {
        self.state.read().nodes_by_id.get(&id).cloned()
    }

    /// The node with `id` if it is a replica of `partition` and not offline.
    pub fn node_if_online(&self, partition: &TopicPartition, id: i32) -> Option<Node> {
        let state = self.state.read();
        let node = state.nodes_by_id.get(&id)?;
        let p = state.partitions_by_topic_partition.get(partition)?;

        let is_replica = p.replicas.iter().any(|r| r.id == id);
        let is_offline = p.offline_replicas.iter().any(|r| r.id == id);
        (is_replica && !is_offline).then(|| node.clone())
    }

    pub fn leader_for(&self, partition: &TopicPartition) -> Option<Node> {
        self.state
            .read()
            .partitions_by_topic_partition
            .get(partition)
            .and_then(|p| p.leader.clone())
    }

    pub fn partition(&self, partition: &TopicPartition) -> Option<PartitionInfo> {
        self.state
            .read()
            .partitions_by_topic_partition
            .get(partition)
            .map(|p| PartitionInfo::clone(p))
    }

    pub fn partitions_for_topic(&self, topic: &str) -> Vec<PartitionInfo> {
        copy_list(self.state.read().partitions_by_topic.get(topic))
    }

    /// Number of partitions of `topic`, `None` if the topic is unknown.
    pub fn partition_count_for_topic(&self, topic: &str) -> Option<usize> {
        self.state
            .read()
            .partitions_by_topic
            .get(topic)
            .map(Vec::len)
    }

    /// Partitions of `topic` that currently have a leader.
    pub fn available_partitions_for_topic(&self, topic: &str) -> Vec<PartitionInfo> {
        copy_list(self.state.read().available_partitions_by_topic.get(topic))
    }

    /// Partitions led by `node_id`.
    pub fn partitions_for_node(&self, node_id: i32) -> Vec<PartitionInfo> {
        copy_list(self.state.read().partitions_by_node.get(&node_id))
    }

    pub fn topics(&self) -> HashSet<String> {
        self.state.read().partitions_by_topic.keys().cloned().collect()
    }

    pub fn unauthorized_topics(&self) -> HashSet<String> {
        self.state.read().unauthorized_topics.clone()
    }

    pub fn invalid_topics(&self) -> HashSet<String> {
        self.state.read().invalid_topics.clone()
    }

    pub fn internal_topics(&self) -> HashSet<String> {
        self.state.read().internal_topics.clone()
    }

    pub fn controller(&self) -> Option<Node> {
        self.state.read().controller.clone()
    }

    pub fn cluster_resource(&self) -> ClusterResource {
        self.state.read().cluster_resource.clone()
    }

    /// The cluster id, empty if the source did not provide one.
    pub fn cluster_id(&self) -> String {
        self.state.read().cluster_resource.cluster_id().to_owned()
    }

    pub fn topic_ids(&self) -> HashMap<String, Uuid> {
        self.state.read().topic_ids.clone()
    }

    pub fn topic_id(&self, topic: &str) -> Option<Uuid> {
        self.state.read().topic_ids.get(topic).copied()
    }

    pub fn topic_name(&self, id: Uuid) -> Option<String> {
        self.state.read().topic_names.get(&id).cloned()
    }

    pub fn is_bootstrap_configured(&self) -> bool {
        self.state.read().is_bootstrap_configured
    }
}

fn copy_list(list: Option<&Vec<Arc<PartitionInfo>>>) -> Vec<PartitionInfo> {
    list.map(|l| l.iter().map(|p| PartitionInfo::clone(p)).collect())
        .unwrap_or_default()
}

impl Default for Cluster {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for Cluster {
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

/// Coarse change detection: compares the cluster id, the bootstrap flag, the
/// unauthorized and invalid topic sets and the node list. Partitions, the
/// controller and topic ids are not compared.
impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // Never hold both read locks at once: with writers queued on both
        // sides, `a == b` and `b == a` would wait on each other.
        let a = self.state.read().comparable();
        let b = other.state.read();
        a.is_bootstrap_configured == b.is_bootstrap_configured
            && a.cluster_resource == b.cluster_resource
            && a.unauthorized_topics == b.unauthorized_topics
            && a.invalid_topics == b.invalid_topics
            && a.nodes == b.nodes
    }
}

/// The fields [`Cluster`] equality looks at, copied out of the lock.
#[derive(Debug)]
struct Comparable {
    cluster_resource: ClusterResource,
    is_bootstrap_configured: bool,
    unauthorized_topics: HashSet<String>,
    invalid_topics: HashSet<String>,
    nodes: Vec<Node>,
}

impl ClusterState {
    fn comparable(&self) -> Comparable {
        Comparable {
            cluster_resource: self.cluster_resource.clone(),
            is_bootstrap_configured: self.is_bootstrap_configured,
            unauthorized_topics: self.unauthorized_topics.clone(),
            invalid_topics: self.invalid_topics.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl Eq for Cluster {}

impl Hash for Cluster {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let s = self.state.read();
        s.is_bootstrap_configured.hash(state);
        s.cluster_resource.hash(state);
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();

        let nodes: Vec<_> = state.nodes.iter().map(ToString::to_string).collect();
        let mut partitions: Vec<_> = state.partitions_by_topic_partition.iter().collect();
        partitions.sort_by(|(a, _), (b, _)| a.cmp(b));
        let partitions: Vec<_> = partitions.iter().map(|(_, p)| p.to_string()).collect();

        write!(
            f,
            "Cluster(id = {}, nodes = [{}], partitions = [{}], controller = {})",
            state.cluster_resource.cluster_id(),
            nodes.join(", "),
            partitions.join(", "),
            state
                .controller
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "null".to_owned()),
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn node(id: i32) -> Node {
        Node::new(id, format!("host{id}"), 9092)
    }

    fn partition(
        topic: &str,
        partition: i32,
        leader: Option<i32>,
        replicas: &[i32],
    ) -> PartitionInfo {
        let replicas: Vec<_> = replicas.iter().copied().map(node).collect();
        PartitionInfo::new(topic, partition, leader.map(node), replicas.clone(), replicas)
    }

    fn three_node_cluster() -> Cluster {
        let mut topic_ids = HashMap::new();
        topic_ids.insert("orders".to_owned(), Uuid::new(1, 2));
        topic_ids.insert("payments".to_owned(), Uuid::new(3, 4));

        Cluster::builder()
            .cluster_id("cluster-1")
            .nodes([node(3), node(1), node(2)])
            .partitions([
                partition("orders", 0, Some(1), &[1, 2]),
                partition("orders", 1, Some(2), &[2, 3]),
                partition("orders", 2, None, &[3]),
                partition("payments", 0, Some(1), &[1]),
            ])
            .internal_topics(["__consumer_offsets".to_owned()])
            .controller(Some(node(2)))
            .topic_ids(topic_ids)
            .build()
    }

    /// Every partition in the primary map must be reachable from the derived
    /// indexes, and nothing else may be.
    fn assert_indexes_consistent(cluster: &Cluster) {
        let state = cluster.state.read();

        let mut by_topic = 0;
        for (topic, list) in &state.partitions_by_topic {
            assert!(!list.is_empty(), "empty by-topic entry for {topic}");
            for p in list {
                by_topic += 1;
                let stored = state
                    .partitions_by_topic_partition
                    .get(&p.topic_partition())
                    .expect("by-topic entry missing from primary map");
                assert_eq!(stored, p);
            }
        }
        assert_eq!(by_topic, state.partitions_by_topic_partition.len());

        for p in state.partitions_by_topic_partition.values() {
            if let Some(leader) = &p.leader {
                let by_node = state.partitions_by_node.get(&leader.id).unwrap();
                assert_eq!(by_node.iter().filter(|q| *q == p).count(), 1);
                let available = state.available_partitions_by_topic.get(&p.topic).unwrap();
                assert_eq!(available.iter().filter(|q| *q == p).count(), 1);
            }
        }

        let ids: Vec<_> = state.nodes.iter().map(|n| n.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(state.nodes.len(), state.nodes_by_id.len());
    }

    #[test]
    fn test_build_sorts_nodes_and_indexes() {
        let cluster = three_node_cluster();
        assert_indexes_consistent(&cluster);

        let ids: Vec<_> = cluster.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(cluster.cluster_id(), "cluster-1");
        assert_eq!(cluster.partition_count_for_topic("orders"), Some(3));
        assert_eq!(cluster.partition_count_for_topic("nope"), None);
        assert_eq!(cluster.available_partitions_for_topic("orders").len(), 2);
        assert_eq!(cluster.partitions_for_node(1).len(), 2);
        assert!(cluster.partitions_for_node(3).is_empty());
        assert_eq!(cluster.controller(), Some(node(2)));

        let partitions: Vec<_> = cluster
            .partitions_for_topic("orders")
            .iter()
            .map(|p| p.partition)
            .collect();
        assert_eq!(partitions, vec![0, 1, 2]);
    }

    #[test]
    fn test_topic_id_lookups() {
        let cluster = three_node_cluster();
        assert_eq!(cluster.topic_id("orders"), Some(Uuid::new(1, 2)));
        assert_eq!(cluster.topic_name(Uuid::new(3, 4)).as_deref(), Some("payments"));
        assert_eq!(cluster.topic_id("nope"), None);
        assert_eq!(cluster.topic_name(Uuid::ZERO), None);
    }

    #[test]
    fn test_empty() {
        let cluster = Cluster::empty();
        assert_eq!(cluster.cluster_id(), "");
        assert!(cluster.nodes().is_empty());
        assert!(cluster.topics().is_empty());
        assert!(cluster.controller().is_none());
        assert!(!cluster.is_bootstrap_configured());
    }

    #[test]
    fn test_add_node_duplicate() {
        let cluster = Cluster::empty();
        cluster.add_node(node(1)).unwrap();
        assert_matches!(cluster.add_node(node(1)), Err(Error::DuplicateNode { id: 1 }));
        assert_eq!(cluster.nodes().len(), 1);
    }

    #[test]
    fn test_add_node_keeps_nodes_sorted() {
        let cluster = three_node_cluster();
        cluster.add_node(node(0)).unwrap();
        cluster.add_node(node(10)).unwrap();
        cluster.add_node(node(5)).unwrap();

        let ids: Vec<_> = cluster.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 5, 10]);
        assert_eq!(cluster.node_by_id(5), Some(node(5)));
        assert!(cluster.partitions_for_node(5).is_empty());
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_add_partition_duplicate_rejected() {
        let cluster = three_node_cluster();
        assert_matches!(
            cluster.add_partition(partition("orders", 0, Some(1), &[1, 2])),
            Err(Error::DuplicatePartition { partition: 0, .. })
        );
        assert_eq!(cluster.partition_count_for_topic("orders"), Some(3));
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_add_partition_overwrite_replaces_index_entries() {
        let cluster = three_node_cluster();

        // leadership moves from node 1 to node 2
        cluster
            .add_partition(partition("orders", 0, Some(2), &[1, 2]))
            .unwrap();

        assert_eq!(cluster.partition_count_for_topic("orders"), Some(3));
        assert_eq!(
            cluster.leader_for(&TopicPartition::new("orders", 0)),
            Some(node(2))
        );
        assert!(
            cluster
                .partitions_for_node(1)
                .iter()
                .all(|p| p.topic != "orders")
        );
        assert_eq!(cluster.partitions_for_node(2).len(), 2);
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_add_partition_without_leader_not_available() {
        let cluster = Cluster::empty();
        cluster.add_partition(partition("t", 0, None, &[1])).unwrap();
        assert_eq!(cluster.partitions_for_topic("t").len(), 1);
        assert!(cluster.available_partitions_for_topic("t").is_empty());

        cluster.add_partition(partition("t", 1, Some(1), &[1])).unwrap();
        let available = cluster.available_partitions_for_topic("t");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].partition, 1);
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_remove_partition() {
        let cluster = three_node_cluster();
        cluster.remove_partition("orders", 1);

        assert!(
            cluster
                .partitions_for_topic("orders")
                .iter()
                .all(|p| p.partition != 1)
        );
        assert!(cluster.partition(&TopicPartition::new("orders", 1)).is_none());
        assert!(cluster.partitions_for_node(2).is_empty());
        assert_indexes_consistent(&cluster);

        cluster.remove_partition("payments", 0);
        assert!(!cluster.topics().contains("payments"));
        assert_eq!(cluster.partition_count_for_topic("payments"), None);
        assert!(cluster.available_partitions_for_topic("payments").is_empty());
        assert_indexes_consistent(&cluster);

        // unknown partitions are ignored
        cluster.remove_partition("nope", 0);
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_remove_node_purges_led_partitions() {
        let cluster = three_node_cluster();
        cluster.remove_node(1);

        assert!(cluster.node_by_id(1).is_none());
        assert_eq!(cluster.nodes().len(), 2);
        assert!(cluster.partitions_for_node(1).is_empty());

        // led partitions are gone from the primary map as well
        assert!(cluster.partition(&TopicPartition::new("orders", 0)).is_none());
        assert!(cluster.partition(&TopicPartition::new("payments", 0)).is_none());
        assert!(!cluster.topics().contains("payments"));

        // partitions led elsewhere survive, even with node 1 as follower
        assert_eq!(cluster.partition_count_for_topic("orders"), Some(2));
        assert_indexes_consistent(&cluster);
    }

    #[test]
    fn test_remove_unknown_node_is_noop() {
        let cluster = three_node_cluster();
        cluster.remove_node(42);
        assert_eq!(cluster.nodes().len(), 3);
        assert_eq!(cluster.partition_count_for_topic("orders"), Some(3));
    }

    #[test]
    fn test_node_if_online() {
        let p = partition("t", 0, Some(1), &[1, 2]).with_offline_replicas(vec![node(2)]);
        let cluster = Cluster::builder()
            .nodes([node(1), node(2), node(3)])
            .partitions([p])
            .build();
        let tp = TopicPartition::new("t", 0);

        assert_eq!(cluster.node_if_online(&tp, 1), Some(node(1)));
        // offline replica
        assert_eq!(cluster.node_if_online(&tp, 2), None);
        // not a replica
        assert_eq!(cluster.node_if_online(&tp, 3), None);
        // unknown node
        assert_eq!(cluster.node_if_online(&tp, 4), None);
        // unknown partition
        assert_eq!(cluster.node_if_online(&TopicPartition::new("t", 9), 1), None);
    }

    #[test]
    fn test_with_partitions_leaves_original() {
        let cluster = three_node_cluster();

        let mut delta = HashMap::new();
        let p = partition("orders", 2, Some(3), &[3]);
        delta.insert(p.topic_partition(), p);
        let p = partition("events", 0, Some(1), &[1]);
        delta.insert(p.topic_partition(), p);

        let updated = cluster.with_partitions(delta);
        assert_indexes_consistent(&updated);

        assert_eq!(updated.available_partitions_for_topic("orders").len(), 3);
        assert_eq!(updated.partition_count_for_topic("events"), Some(1));
        assert_eq!(updated.cluster_id(), "cluster-1");
        assert_eq!(updated.topic_id("orders"), Some(Uuid::new(1, 2)));
        assert_eq!(updated.controller(), Some(node(2)));

        assert_eq!(cluster.available_partitions_for_topic("orders").len(), 2);
        assert_eq!(cluster.partition_count_for_topic("events"), None);
    }

    #[test]
    fn test_returned_collections_are_copies() {
        let cluster = three_node_cluster();
        let before = cluster.partitions_for_topic("orders");
        let nodes = cluster.nodes();

        cluster.remove_partition("orders", 0);
        cluster.add_node(node(9)).unwrap();

        assert_eq!(before.len(), 3);
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_equality_is_coarse() {
        let a = three_node_cluster();
        let b = a.with_partitions(HashMap::new());
        b.remove_partition("orders", 0);
        assert_eq!(a, b);

        b.add_node(node(7)).unwrap();
        assert_ne!(a, b);

        let c = Cluster::builder()
            .cluster_id("other")
            .nodes([node(1), node(2), node(3)])
            .build();
        assert_ne!(a, c);
        assert_eq!(a, a);
    }

    #[test]
    fn test_display() {
        let cluster = Cluster::builder()
            .cluster_id("c")
            .nodes([node(1)])
            .partitions([partition("t", 0, Some(1), &[1])])
            .build();
        assert_eq!(
            cluster.to_string(),
            "Cluster(id = c, nodes = [host1:9092 (id: 1 rack: null)], \
             partitions = [Partition(topic = t, partition = 0, leader = 1, replicas = [1], isr = [1], offlineReplicas = [])], \
             controller = null)"
        );
    }
}
