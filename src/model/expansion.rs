//! Session-scoped expansion state of class groups.
//!
//! Keys are class IRIs or the synthetic artifact sub-group names
//! (`"used"`, `"introduced"`). After every mutation exactly one artifact
//! representation is authoritative: the umbrella `Artifact` group or the split
//! sub-groups, never both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ontology::{INTRODUCED_ARTIFACT_KEY, OntologyClass, USED_ARTIFACT_KEY};

/// Which class groups are materialized into instance nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    entries: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is expanded. Absent keys are collapsed.
    pub fn is_expanded(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn is_class_expanded(&self, class: OntologyClass) -> bool {
        self.is_expanded(class.key())
    }

    /// Flip `key` and return its new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let value = !self.is_expanded(key);
        self.set(key, value);
        value
    }

    /// Set `key`, then restore umbrella/split exclusivity.
    pub fn set(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), value);
        if !value {
            return;
        }
        let umbrella = OntologyClass::Artifact.key();
        if key == USED_ARTIFACT_KEY || key == INTRODUCED_ARTIFACT_KEY {
            if self.entries.insert(umbrella.to_string(), false) == Some(true) {
                tracing::debug!(key, "artifact umbrella collapsed in favour of split view");
            }
        } else if key == umbrella {
            for split in [USED_ARTIFACT_KEY, INTRODUCED_ARTIFACT_KEY] {
                if self.entries.get(split).copied().unwrap_or(false) {
                    self.entries.insert(split.to_string(), false);
                    tracing::debug!(split, "artifact sub-group collapsed in favour of umbrella");
                }
            }
        }
    }

    /// Whether either artifact sub-group is expanded.
    pub fn split_artifacts_active(&self) -> bool {
        self.is_expanded(USED_ARTIFACT_KEY) || self.is_expanded(INTRODUCED_ARTIFACT_KEY)
    }

    /// Keys currently set to `true`, in key order.
    pub fn expanded_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.as_str())
    }
}
