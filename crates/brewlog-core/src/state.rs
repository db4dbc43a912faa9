//! Shared sync state reported to clients.

/// Connection state of the catalogue, as shown next to the sync button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Changes are waiting for the server
    #[default]
    Offline,
    Syncing,
    /// Local state matches the server
    Synced,
    /// The last sync failed on this device (store failure)
    Error,
}

impl SyncState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
