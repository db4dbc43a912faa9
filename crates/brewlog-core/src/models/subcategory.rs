//! Subcategory model

use serde::{Deserialize, Serialize};

use super::entity::{deserialize_server_id, Entity, EntityKind, LocalId};
use super::{Brewing, Origin};

/// A tea subcategory (e.g. a cultivar or named style within a category)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(
        rename = "id",
        default,
        deserialize_with = "deserialize_server_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_id: Option<String>,
    #[serde(rename = "offline_id", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocalId>,
    pub name: String,
    /// Parent category ID
    #[serde(default)]
    pub category: u32,
    /// English name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gongfu_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub western_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_source: Option<String>,
}

impl Subcategory {
    pub fn new(name: impl Into<String>, category: u32) -> Self {
        Self {
            name: name.into(),
            category,
            ..Self::default()
        }
    }
}

impl Entity for Subcategory {
    const KIND: EntityKind = EntityKind::Subcategory;

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
