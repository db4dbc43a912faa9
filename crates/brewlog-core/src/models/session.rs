//! Brewing session model

use serde::{Deserialize, Serialize};

use super::entity::{deserialize_server_id, Entity, EntityKind, LocalId};
use super::Brewing;

const fn first_infusion() -> u32 {
    1
}

/// A brewing session: a series of timed infusions of one tea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewingSession {
    #[serde(
        rename = "id",
        default,
        deserialize_with = "deserialize_server_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_id: Option<String>,
    #[serde(rename = "offline_id", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocalId>,
    /// Server identifier of the brewed tea
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub brewing: Brewing,
    /// 1-based index of the infusion being brewed
    #[serde(default = "first_infusion")]
    pub current_infusion: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_brewed_on: Option<String>,
}

impl BrewingSession {
    /// Start a new session on its first infusion
    #[must_use]
    pub fn new(brewing: Brewing) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            server_id: None,
            local_id: None,
            tea: None,
            name: None,
            brewing,
            current_infusion: 1,
            is_completed: false,
            created_on: Some(now.clone()),
            last_brewed_on: Some(now),
        }
    }
}

impl Entity for BrewingSession {
    const KIND: EntityKind = EntityKind::Session;

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

    fn infusion_countdown(&self) -> Option<chrono::Duration> {
        self.brewing.infusion_duration(self.current_infusion)
    }

    fn advance_infusion(&mut self) {
        self.current_infusion = self.current_infusion.saturating_add(1);
    }
}
