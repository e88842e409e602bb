//! Location records as exchanged with the `/locations` endpoints.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical location identifier.
///
/// Backend primary keys are integers, but older API revisions serialized them
/// inconsistently as numbers or numeric strings. Both forms normalize to this one
/// type on ingestion; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for LocationId {
    fn from(value: i64) -> Self {
        LocationId(value)
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = LocationId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<LocationId, E> {
                Ok(LocationId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<LocationId, E> {
                i64::try_from(value)
                    .map(LocationId)
                    .map_err(|_| E::custom("location id out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<LocationId, E> {
                value
                    .trim()
                    .parse::<i64>()
                    .map(LocationId)
                    .map_err(|_| E::custom(format!("invalid location id: {value:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A storage location. May nest under another location via `parent_id`.
///
/// `id` is optional to tolerate malformed backend rows; the tree builder assigns a
/// synthetic identifier to such records rather than dropping them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub id: Option<LocationId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<LocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a location.
#[derive(Debug, Clone, Serialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LocationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewLocation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            parent_id: None,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_parent(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_string());
        self
    }
}

/// Fields accepted on location update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LocationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LocationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_parent(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_string());
        self
    }
}

/// A location with its children, as served by `GET /locations/tree`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationTree {
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub children: Vec<LocationTree>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_id_accepts_numbers_and_numeric_strings() {
        let from_number: LocationId = serde_json::from_str("7").unwrap();
        let from_string: LocationId = serde_json::from_str("\"7\"").unwrap();
        let from_padded: LocationId = serde_json::from_str("\" 7 \"").unwrap();

        assert_eq!(from_number, LocationId(7));
        assert_eq!(from_string, LocationId(7));
        assert_eq!(from_padded, LocationId(7));
    }

    #[test]
    fn location_id_rejects_non_numeric_strings() {
        let result: Result<LocationId, _> = serde_json::from_str("\"kitchen\"");
        assert!(result.is_err());
    }

    #[test]
    fn location_normalizes_a_string_parent_id() {
        let location: Location = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Kitchen",
            "parent_id": "1"
        }))
        .unwrap();

        assert_eq!(location.parent_id, Some(LocationId(1)));
    }

    #[test]
    fn location_without_an_id_still_deserializes() {
        let location: Location = serde_json::from_value(serde_json::json!({
            "name": "Orphaned shelf"
        }))
        .unwrap();

        assert!(location.id.is_none());
        assert!(location.parent_id.is_none());
    }

    #[test]
    fn location_tree_nests_recursively() {
        let tree: LocationTree = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Home",
            "parent_id": null,
            "children": [
                {"id": 2, "name": "Kitchen", "parent_id": 1, "children": []}
            ]
        }))
        .unwrap();

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].location.name, "Kitchen");
    }
}
