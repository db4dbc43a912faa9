//! Vendor model

use serde::{Deserialize, Serialize};

use super::entity::{deserialize_server_id, Entity, EntityKind, LocalId};
use super::Origin;

/// A tea vendor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Server identifier
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u16>,
}

impl Vendor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Entity for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

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
