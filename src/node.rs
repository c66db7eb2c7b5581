use std::fmt::{Display, Formatter};

/// A member of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// The broker ID
    pub id: i32,

    /// The broker hostname
    pub host: String,

    /// The broker port
    pub port: i32,

    /// Rack.
    pub rack: Option<String>,
}

impl Node {
    /// Placeholder for "no such node".
    pub const NO_NODE: Self = Self {
        id: -1,
        host: String::new(),
        port: -1,
        rack: None,
    };

    pub fn new(id: i32, host: impl Into<String>, port: i32) -> Self {
        Self {
            id,
            host: host.into(),
            port,
            rack: None,
        }
    }

    pub fn with_rack(mut self, rack: impl Into<String>) -> Self {
        self.rack = Some(rack.into());
        self
    }

    /// A node without a usable address.
    pub fn is_empty(&self) -> bool {
        self.host.is_empty() || self.port < 0
    }

    pub fn has_rack(&self) -> bool {
        self.rack.is_some()
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} (id: {} rack: {})",
            self.host,
            self.port,
            self.id,
            self.rack.as_deref().unwrap_or("null")
        )
    }
}
