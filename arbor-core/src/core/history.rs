use heapless::Vec;

use super::Target;
use super::tree::StateTree;
use crate::{EventIdentity, MAX_HISTORY_POINTS, StateIdentity};

/// Index of a history pseudostate in the definition's history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    /// Remembers the owner's child that was active.
    Shallow,
    /// Remembers the leaf that was active.
    Deep,
}

/// Static description of a history pseudostate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPoint<S> {
    pub owner: S,
    pub kind: HistoryKind,
    /// Used until something is recorded. May be a choice.
    pub default: Target<S>,
}

impl<S: StateIdentity> HistoryPoint<S> {
    pub const fn shallow(owner: S, default: Target<S>) -> Self {
        Self {
            owner,
            kind: HistoryKind::Shallow,
            default,
        }
    }

    pub const fn deep(owner: S, default: Target<S>) -> Self {
        Self {
            owner,
            kind: HistoryKind::Deep,
            default,
        }
    }

    /// The value to remember when `leaf` is active inside the owner.
    pub(crate) fn value_for<E: EventIdentity, V: 'static>(
        &self,
        tree: &StateTree<S, E, V>,
        leaf: S,
    ) -> S {
        match self.kind {
            HistoryKind::Deep => leaf,
            HistoryKind::Shallow => match tree.child_toward(self.owner, leaf) {
                Some(child) => child,
                None => super::error::malformed("history recorded outside its owner"),
            },
        }
    }
}

/// Mutable history values of one machine, one slot per history point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore<S> {
    slots: Vec<Option<S>, MAX_HISTORY_POINTS>,
}

impl<S: StateIdentity> HistoryStore<S> {
    /// All slots start unrecorded.
    pub fn new(points: usize) -> Self {
        let slots = ::core::iter::repeat(None)
            .take(points.min(MAX_HISTORY_POINTS))
            .collect();
        Self { slots }
    }

    /// The recorded state if any, otherwise the point's declared default.
    pub fn resolve(&self, id: HistoryId, point: &HistoryPoint<S>) -> Target<S> {
        self.recorded(id).map_or(point.default, Target::State)
    }

    pub fn record(&mut self, id: HistoryId, state: S) {
        match self.slots.get_mut(id.0) {
            Some(slot) => *slot = Some(state),
            None => super::error::malformed("history id outside the history table"),
        }
    }

    pub fn recorded(&self, id: HistoryId) -> Option<S> {
        self.slots.get(id.0).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{Id, TREE};

    #[test]
    fn unrecorded_point_resolves_to_default() {
        let point = HistoryPoint::deep(Id::A, Target::State(Id::A1));
        let store = HistoryStore::<Id>::new(2);
        assert_eq!(store.resolve(HistoryId(0), &point), Target::State(Id::A1));
        assert_eq!(store.recorded(HistoryId(0)), None);
    }

    #[test]
    fn slot_count_is_capped_at_capacity() {
        let mut store = HistoryStore::<Id>::new(MAX_HISTORY_POINTS + 4);
        store.record(HistoryId(MAX_HISTORY_POINTS - 1), Id::A2);
        assert_eq!(store.recorded(HistoryId(MAX_HISTORY_POINTS - 1)), Some(Id::A2));
        assert_eq!(store.recorded(HistoryId(MAX_HISTORY_POINTS)), None);
    }

    #[test]
    fn points_are_recorded_independently() {
        let first = HistoryPoint::deep(Id::A, Target::State(Id::A1));
        let second = HistoryPoint::shallow(Id::A, Target::State(Id::A1));
        let mut store = HistoryStore::new(2);
        store.record(HistoryId(0), Id::A2);
        assert_eq!(store.resolve(HistoryId(0), &first), Target::State(Id::A2));
        assert_eq!(store.resolve(HistoryId(1), &second), Target::State(Id::A1));
        store.record(HistoryId(0), Id::A1);
        assert_eq!(store.recorded(HistoryId(0)), Some(Id::A1));
    }

    #[test]
    fn shallow_and_deep_values() {
        let deep = HistoryPoint::deep(Id::Root, Target::State(Id::A));
        let shallow = HistoryPoint::shallow(Id::Root, Target::State(Id::A));
        assert_eq!(deep.value_for(&TREE, Id::A2), Id::A2);
        assert_eq!(shallow.value_for(&TREE, Id::A2), Id::A);
    }
}
