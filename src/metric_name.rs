//! Names of client metrics.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};

/// A fully qualified metric: name, group and identifying tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricName {
    pub name: String,
    pub group: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
}

impl MetricName {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        description: impl Into<String>,
        tags: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            description: description.into(),
            tags,
        }
    }
}

impl Display for MetricName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MetricName [name={}, group={}, description={}, tags={:?}]",
            self.name, self.group, self.description, self.tags
        )
    }
}

/// A [`MetricName`] without tag values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricNameTemplate {
    name: String,
    group: String,
    description: String,
    tags: BTreeSet<String>,
}

impl MetricNameTemplate {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        description: impl Into<String>,
        tags: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let name = name.into();
        let group = group.into();
        let description = description.into();
        for (field, value) in [("name", &name), ("group", &group), ("description", &description)]
        {
            if value.is_empty() {
                return Err(Error::EmptyMetricField(field));
            }
        }

        Ok(Self {
            name,
            group,
            description,
            tags: tags.into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Fill in tag values. Values for tags the template does not declare are
    /// ignored, missing ones are left out.
    pub fn instantiate(&self, tag_values: &BTreeMap<String, String>) -> MetricName {
        let tags = tag_values
            .iter()
            .filter(|(k, _)| self.tags.contains(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        MetricName::new(&self.name, &self.group, &self.description, tags)
    }
}
