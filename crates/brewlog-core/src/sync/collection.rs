//! Shared in-memory collection with stale-sync protection

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{Entity, LocalId};

use super::reducer::{reduce, Action, Dispatch};

#[derive(Debug)]
struct Inner<E> {
    items: Vec<E>,
    generation: u64,
}

/// In-memory state of one entity kind, shared between the UI and sync tasks.
///
/// Every [`Collection::begin_sync`] starts a new generation. Writes made
/// through an older [`SyncTicket`] are dropped, so a slow response from an
/// earlier sync never overwrites the result of a later one.
#[derive(Debug)]
pub struct Collection<E> {
    inner: Arc<Mutex<Inner<E>>>,
}

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: Vec::new(),
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current items.
    pub fn snapshot(&self) -> Vec<E> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Item with the given local id.
    pub fn find(&self, local_id: LocalId) -> Option<E> {
        self.lock()
            .items
            .iter()
            .find(|item| item.local_id() == Some(local_id))
            .cloned()
    }

    /// Start a sync, invalidating tickets of every sync still in flight.
    pub fn begin_sync(&self) -> SyncTicket<E> {
        let mut inner = self.lock();
        inner.generation = inner.generation.wrapping_add(1);
        SyncTicket {
            collection: self.clone(),
            generation: inner.generation,
        }
    }

    fn apply(&self, action: Action<E>, generation: Option<u64>) -> bool {
        let mut inner = self.lock();
        if generation.is_some_and(|generation| generation != inner.generation) {
            return false;
        }
        inner.items = reduce(&inner.items, action);
        true
    }
}

impl<E: Entity> Dispatch<E> for Collection<E> {
    fn dispatch(&self, action: Action<E>) {
        self.apply(action, None);
    }
}

/// Dispatcher handed to one sync run.
#[derive(Debug)]
pub struct SyncTicket<E> {
    collection: Collection<E>,
    generation: u64,
}

impl<E: Entity> Dispatch<E> for SyncTicket<E> {
    fn dispatch(&self, action: Action<E>) {
        if !self.collection.apply(action, Some(self.generation)) {
            tracing::debug!(
                kind = %E::KIND,
                generation = self.generation,
                "Ignoring write from superseded sync"
            );
        }
    }

    fn is_current(&self) -> bool {
        self.collection.lock().generation == self.generation
    }
}
