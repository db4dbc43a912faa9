//! Identity types shared by every synced collection

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Device-local identifier of an entity, unique within its kind's collection.
///
/// Assigned by [`crate::sync::next_local_id`] and stable for the lifetime of
/// the entity on this device. Independent of the server identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(u32);

impl LocalId {
    /// The first identifier handed out in an empty collection.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The identifier directly after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Accept server identifiers emitted either as strings (UUIDs) or integers.
pub(crate) fn deserialize_server_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.and_then(|raw| match raw {
            RawId::Text(text) => crate::util::normalize_text_option(Some(text)),
            RawId::Number(number) => Some(number.to_string()),
        }),
    )
}

/// The synced collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Tea,
    Session,
    Vendor,
    Subcategory,
}

impl EntityKind {
    /// Every synced collection, in the order a full sync visits them.
    pub const ALL: [Self; 4] = [Self::Tea, Self::Session, Self::Vendor, Self::Subcategory];

    /// API path segment for this collection.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Tea => "tea",
            Self::Session => "brewing_session",
            Self::Vendor => "vendor",
            Self::Subcategory => "subcategory",
        }
    }

    /// Store key holding the last confirmed server state.
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Tea => "teas",
            Self::Session => "sessions",
            Self::Vendor => "vendors",
            Self::Subcategory => "subcategories",
        }
    }

    /// Store key holding entries created or edited while offline.
    pub const fn offline_key(self) -> &'static str {
        match self {
            Self::Tea => "offline-teas",
            Self::Session => "offline-sessions",
            Self::Vendor => "offline-vendors",
            Self::Subcategory => "offline-subcategories",
        }
    }

    /// Body fields only sent on creation, never on update.
    pub const fn binary_fields(self) -> &'static [&'static str] {
        match self {
            Self::Tea => &["image"],
            Self::Session | Self::Vendor | Self::Subcategory => &[],
        }
    }

    /// Whether brewing clocks reference entities of this kind.
    pub const fn has_clocks(self) -> bool {
        matches!(self, Self::Session)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tea => "tea",
            Self::Session => "session",
            Self::Vendor => "vendor",
            Self::Subcategory => "subcategory",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tea" | "teas" => Ok(Self::Tea),
            "session" | "sessions" | "brewing_session" => Ok(Self::Session),
            "vendor" | "vendors" => Ok(Self::Vendor),
            "subcategory" | "subcategories" => Ok(Self::Subcategory),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

/// A record held in one of the synced collections.
///
/// Only the identity pair is required; every other field is opaque to the
/// sync core and travels through serde unchanged.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Collection this entity type belongs to
    const KIND: EntityKind;

    /// Device-local identifier, `None` until the entity enters a collection
    fn local_id(&self) -> Option<LocalId>;

    fn set_local_id(&mut self, id: LocalId);

    /// Server-assigned identifier, `None` while the entity exists only locally
    fn server_id(&self) -> Option<&str>;

    fn set_server_id(&mut self, id: String);

    /// Countdown length of the infusion currently brewing.
    ///
    /// Only brewing sessions own clocks; `None` means the clock never expires.
    fn infusion_countdown(&self) -> Option<chrono::Duration> {
        None
    }

    /// Fold an expired countdown into the infusion counter.
    fn advance_infusion(&mut self) {}
}
