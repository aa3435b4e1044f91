//! Persisted schema descriptor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Expected shape of a dataset, derived once from a reference table and
/// applied unchanged to every later validation run.
///
/// Header order is the sole source of truth for position checks. The
/// vocabularies have set semantics (membership only); they are stored as
/// insertion-ordered lists so the persisted document is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Expected field names, in order.
    pub header: Vec<String>,
    /// Item name -> valid units of measurement.
    pub unit_vocabulary: IndexMap<String, Vec<String>>,
    /// Field name -> valid values for categorical fields.
    pub categorical_vocabulary: IndexMap<String, Vec<String>>,
    /// Fields that must not contain empty cells.
    pub required_fields: Vec<String>,
    /// Raw value -> canonical value, applied before unit checking.
    pub substitution_rules: IndexMap<String, String>,
}

impl SchemaDescriptor {
    /// Whether the item appears in the unit vocabulary.
    pub fn is_known_item(&self, item: &str) -> bool {
        self.unit_vocabulary.contains_key(item)
    }

    /// Whether the unit is recorded for the item. Unknown items allow
    /// nothing.
    pub fn allows_unit(&self, item: &str, unit: &str) -> bool {
        self.unit_vocabulary
            .get(item)
            .is_some_and(|units| units.iter().any(|u| u == unit))
    }
}
