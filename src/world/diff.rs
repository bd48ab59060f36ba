//! Desired-set diffing
//!
//! Topic lists are compared by membership only. Reordering a list never
//! produces a delta.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

/// Names that entered and left the desired set between two fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopicDelta {
    /// In `current` order.
    pub added: Vec<String>,
    /// In `previous` order.
    pub removed: Vec<String>,
}

impl TopicDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn diff(previous: &[String], current: &[String]) -> TopicDelta {
    let prev: HashSet<&str> = previous.iter().map(String::as_str).collect();
    let curr: HashSet<&str> = current.iter().map(String::as_str).collect();

    TopicDelta {
        added: current
            .iter()
            .filter(|t| !prev.contains(t.as_str()))
            .cloned()
            .collect(),
        removed: previous
            .iter()
            .filter(|t| !curr.contains(t.as_str()))
            .cloned()
            .collect(),
    }
}

/// Drop repeated names, keeping the first occurrence.
pub fn dedup_topics(topics: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(topics.len());
    let mut unique = Vec::with_capacity(topics.len());
    for topic in topics {
        if seen.contains(&topic) {
            warn!("Ignoring repeated topic '{topic}' in desired set");
            continue;
        }
        seen.insert(topic.clone());
        unique.push(topic);
    }
    unique
}
