//! Generic collection reducer shared by every entity kind

use crate::models::{Entity, LocalId};

/// State transition applied to an in-memory collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<E> {
    /// Empty the collection
    Clear,
    /// Replace the whole collection
    Set(Vec<E>),
    /// Append an entity
    Add(E),
    /// Replace the element with the same local id
    Edit(E),
    /// Remove the element with the same local id
    Delete(E),
    /// Stamp a server identifier onto the element with the given local id
    EditServerId { local_id: LocalId, server_id: String },
}

/// Apply `action` to `state`, returning the new collection.
///
/// Never mutates its input. `Edit`/`Delete`/`EditServerId` on a local id that
/// is not present leave the collection unchanged.
pub fn reduce<E: Entity>(state: &[E], action: Action<E>) -> Vec<E> {
    match action {
        Action::Clear => Vec::new(),
        Action::Set(data) => data,
        Action::Add(entity) => {
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend_from_slice(state);
            next.push(entity);
            next
        }
        Action::Edit(entity) => state
            .iter()
            .map(|item| {
                if same_local_id(item, &entity) {
                    entity.clone()
                } else {
                    item.clone()
                }
            })
            .collect(),
        Action::Delete(entity) => state
            .iter()
            .filter(|&item| !same_local_id(item, &entity))
            .cloned()
            .collect(),
        Action::EditServerId {
            local_id,
            server_id,
        } => state
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.local_id() == Some(local_id) {
                    item.set_server_id(server_id.clone());
                }
                item
            })
            .collect(),
    }
}

fn same_local_id<E: Entity>(a: &E, b: &E) -> bool {
    matches!((a.local_id(), b.local_id()), (Some(a), Some(b)) if a == b)
}

/// Receiver of collection actions (the UI state the sync core writes to).
pub trait Dispatch<E> {
    fn dispatch(&self, action: Action<E>);

    /// Whether writes through this dispatcher still reach live state.
    ///
    /// Superseded syncs see `false` and skip their remaining writes.
    fn is_current(&self) -> bool {
        true
    }
}

impl<E, F> Dispatch<E> for F
where
    F: Fn(Action<E>),
{
    fn dispatch(&self, action: Action<E>) {
        self(action);
    }
}
