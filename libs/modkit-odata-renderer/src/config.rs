//! Configuration for the property writer.

use serde::{Deserialize, Serialize};

/// How an empty collection is checked against the declared cardinality.
///
/// An empty collection has no element to infer a type from, so its element
/// type is never checked; this policy only decides the cardinality check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCollectionPolicy {
    /// Accept an empty collection for any declared type, including
    /// single-valued ones.
    #[default]
    AlwaysAccept,
    /// Accept an empty collection only when the declared type is a collection.
    RequireDeclaredCollection,
}

impl EmptyCollectionPolicy {
    /// Whether an empty collection skips validation for the given declaration.
    #[must_use]
    pub fn accepts(self, declared_is_collection: bool) -> bool {
        match self {
            EmptyCollectionPolicy::AlwaysAccept => true,
            EmptyCollectionPolicy::RequireDeclaredCollection => declared_is_collection,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PropertyWriterConfig {
    /// Default: `always_accept`
    pub empty_collection: EmptyCollectionPolicy,
}

impl PropertyWriterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_empty_collection(mut self, policy: EmptyCollectionPolicy) -> Self {
        self.empty_collection = policy;
        self
    }
}
