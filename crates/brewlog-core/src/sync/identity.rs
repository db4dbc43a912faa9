//! Local identifier allocation

use crate::models::{Entity, LocalId};

/// Allocate the next local id for a collection.
///
/// Returns an id strictly greater than every `local_id` in `items`, or
/// [`LocalId::FIRST`] for an empty collection. Callers must pass the full
/// current collection, pending entries included, for the result to be unique.
pub fn next_local_id<E: Entity>(items: &[E]) -> LocalId {
    next_local_id_after(items.iter().filter_map(Entity::local_id))
}

/// Allocate the id after the highest of `ids`.
pub fn next_local_id_after(ids: impl IntoIterator<Item = LocalId>) -> LocalId {
    ids.into_iter()
        .max()
        .map_or(LocalId::FIRST, LocalId::next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tea;

    fn tea(local_id: Option<u32>) -> Tea {
        Tea {
            local_id: local_id.map(LocalId::new),
            ..Tea::default()
        }
    }

    #[test]
    fn test_empty_collection_starts_at_one() {
        assert_eq!(next_local_id::<Tea>(&[]), LocalId::new(1));
    }

    #[test]
    fn test_exceeds_maximum_not_first_gap() {
        let teas = vec![tea(Some(1)), tea(Some(5)), tea(Some(3))];
        assert_eq!(next_local_id(&teas), LocalId::new(6));
    }

    #[test]
    fn test_ignores_unassigned() {
        let teas = vec![tea(None), tea(Some(2))];
        assert_eq!(next_local_id(&teas), LocalId::new(3));
    }

    #[test]
    fn test_repeated_allocation_is_unique() {
        let mut teas: Vec<Tea> = Vec::new();
        for _ in 0..20 {
            let id = next_local_id(&teas);
            teas.push(tea(Some(id.get())));
        }
        let mut ids = teas.iter().filter_map(|tea| tea.local_id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_is_pure() {
        let teas = vec![tea(Some(4))];
        assert_eq!(next_local_id(&teas), next_local_id(&teas));
    }
}
