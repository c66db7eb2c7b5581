use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Duplicate node with id {id}")]
    DuplicateNode { id: i32 },

    #[error("Duplicate partition {partition} for topic '{topic}'")]
    DuplicatePartition { topic: String, partition: i32 },

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Topic name must not be empty")]
    EmptyTopicName,

    #[error("Topic id must not be the zero UUID")]
    NullTopicId,

    #[error("Got {ids} topic ids but {names} topic names")]
    TopicCollectionLengthMismatch { ids: usize, names: usize },

    #[error("Metric {0} must not be empty")]
    EmptyMetricField(&'static str),

    #[error("Invalid address \"{address}\": {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Buffer supplier is closed")]
    BufferSupplierClosed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
