#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rust_2018_idioms,
    unsafe_code
)]
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::future_not_send,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]
pub mod backoff;
pub mod buffer;
pub mod checksum;
pub mod cluster;
pub mod copy_on_write_map;
pub mod error;
pub mod future;
pub mod metadata;
pub mod metric_name;
pub mod node;
pub mod partition_info;
pub mod topic;
pub mod uuid;
pub mod varint;

pub use cluster::{Cluster, ClusterBuilder, ClusterResource};
pub use error::{Error, Result};
pub use node::Node;
pub use partition_info::PartitionInfo;
pub use topic::{Topic, TopicPartition, TopicPartitionReplica};
pub use uuid::Uuid;
