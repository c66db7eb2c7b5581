use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use tracing::debug;

/// Cluster-level identity, handed to [`ClusterResourceListener`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClusterResource {
    cluster_id: String,
}

impl ClusterResource {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
        }
    }

    /// Empty if the metadata source does not report cluster ids.
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }
}

impl Display for ClusterResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClusterResource(clusterId={})", self.cluster_id)
    }
}

/// Notified whenever a new cluster snapshot has been built.
pub trait ClusterResourceListener: Send + Sync {
    fn on_update(&self, cluster_resource: &ClusterResource);
}

/// Registry that fans [`ClusterResource`] updates out to its listeners in
/// registration order.
#[derive(Default)]
pub struct ClusterResourceListeners {
    listeners: Vec<Arc<dyn ClusterResourceListener>>,
}

impl ClusterResourceListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Arc<dyn ClusterResourceListener>) {
        self.listeners.push(listener);
    }

    pub fn on_update(&self, cluster_resource: &ClusterResource) {
        debug!(
            cluster_id = cluster_resource.cluster_id(),
            n_listeners = self.listeners.len(),
            "notifying cluster resource listeners"
        );
        for listener in &self.listeners {
            listener.on_update(cluster_resource);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Debug for ClusterResourceListeners {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterResourceListeners")
            .field("n_listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
