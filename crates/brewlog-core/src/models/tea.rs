//! Tea model

use serde::{Deserialize, Serialize};

use super::entity::{deserialize_server_id, Entity, EntityKind, LocalId};
use super::{Brewing, Origin, Subcategory, Vendor};

/// A tea in the user's catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tea {
    /// Server identifier (UUID), absent until the tea has been uploaded
    #[serde(
        rename = "id",
        default,
        deserialize_with = "deserialize_server_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_id: Option<String>,
    /// Device-local identifier
    #[serde(rename = "offline_id", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocalId>,
    pub name: String,
    /// Category ID
    #[serde(default)]
    pub category: u32,
    /// Encoded image, sent on creation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gongfu_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub western_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Default brewing preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gongfu_preferred: Option<bool>,
    /// Price per gram
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_consumed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation date, ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
}

impl Tea {
    /// Create a new local-only tea
    #[must_use]
    pub fn new(name: impl Into<String>, category: u32) -> Self {
        Self {
            name: name.into(),
            category,
            created_on: Some(chrono::Utc::now().to_rfc3339()),
            ..Self::default()
        }
    }
}

impl Entity for Tea {
    const KIND: EntityKind = EntityKind::Tea;

    fn local_id(&self) -> Option<LocalId> {
        self.local_id
    }

    fn set_local_id(&mut self, id: LocalId) {
        self.local_id = Some(id);
    }

    fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    fn set_server_id(&mut self, id: String) {
        self.server_id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tea_new_is_local_only() {
        let tea = Tea::new("Da Hong Pao", 3);
        assert_eq!(tea.server_id(), None);
        assert_eq!(tea.local_id(), None);
        assert!(tea.created_on.is_some());
    }

    #[test]
    fn test_tea_wire_field_names() {
        let mut tea = Tea::new("Bai Mu Dan", 2);
        tea.set_local_id(LocalId::new(4));
        tea.set_server_id("6f1c".to_string());
        let value = serde_json::to_value(&tea).unwrap();
        assert_eq!(value["id"], "6f1c");
        assert_eq!(value["offline_id"], 4);
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_tea_parses_api_payload() {
        let tea: Tea = serde_json::from_str(
            r#"{"id": "0b5a9c7e-1d2f-4c59-9a51-3e2d6c1f7a10", "name": "Jin Xuan", "category": 3, "unknown": 1}"#,
        )
        .unwrap();
        assert_eq!(tea.server_id(), Some("0b5a9c7e-1d2f-4c59-9a51-3e2d6c1f7a10"));
        assert_eq!(tea.name, "Jin Xuan");
        assert!(!tea.is_archived);
    }
}
