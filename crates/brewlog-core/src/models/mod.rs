//! Data models for Brewlog

mod brewing;
mod category;
mod clock;
mod entity;
mod origin;
mod session;
mod subcategory;
mod tea;
mod vendor;

pub use brewing::{parse_duration_seconds, Brewing, MAX_DURATION_SECONDS};
pub use category::Category;
pub use clock::Clock;
pub use entity::{Entity, EntityKind, LocalId};
pub use origin::Origin;
pub use session::BrewingSession;
pub use subcategory::Subcategory;
pub use tea::Tea;
pub use vendor::Vendor;
