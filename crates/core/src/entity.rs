//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Find an entity by identifier in an ordered collection.
pub fn find_by_id<'a, E: Entity>(entities: &'a [E], id: &E::Id) -> Option<&'a E> {
    entities.iter().find(|e| e.id() == id)
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<'a, E: Entity>(entities: &'a mut [E], id: &E::Id) -> Option<&'a mut E> {
    entities.iter_mut().find(|e| e.id() == id)
}

/// Remove the entity with the given identifier, keeping the order of the rest.
///
/// Returns `true` if an entity was removed.
pub fn remove_by_id<E: Entity>(entities: &mut Vec<E>, id: &E::Id) -> bool {
    let before = entities.len();
    entities.retain(|e| e.id() != id);
    entities.len() != before
}
