//! Category model (read-only, served by the API)

use serde::{Deserialize, Serialize};

use super::Brewing;

/// A top-level tea category such as green, oolong or puerh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gongfu_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub western_brewing: Option<Brewing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_source: Option<String>,
}
