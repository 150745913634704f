//! Taxonomy entities: hierarchical Category tree and flat Tag labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hierarchical taxonomy node. `parent_id` forms an adjacency-list tree;
/// a node must never be its own ancestor (enforced at write time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    /// Derived from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `Some(None)` reparents to root; `None` leaves the parent alone.
    #[serde(default, with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

/// Flat label attachable to news, articles, and galleries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Serde helper distinguishing "absent" from "explicitly null".
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, ser: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reparent_patch_distinguishes_absent_from_null() {
        let patch: CategoryPatch = serde_json::from_value(serde_json::json!({
            "name": "Events"
        }))
        .unwrap();
        assert!(patch.parent_id.is_none());

        let patch: CategoryPatch = serde_json::from_value(serde_json::json!({
            "parent_id": null
        }))
        .unwrap();
        assert_eq!(patch.parent_id, Some(None));

        let patch: CategoryPatch = serde_json::from_value(serde_json::json!({
            "parent_id": 7
        }))
        .unwrap();
        assert_eq!(patch.parent_id, Some(Some(7)));
    }
}
