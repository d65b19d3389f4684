//! Authored state storage and name lookup.

use crate::data::AnimationState;
use crate::ids::StateId;

/// Ordered collection of authored states with linear name lookup.
///
/// State lists are small and authored by hand; lookup stays a linear scan
/// with first-match-wins semantics, matching how authors reason about the
/// table.
#[derive(Default, Debug)]
pub struct StateLibrary {
    items: Vec<(StateId, AnimationState)>,
}

impl StateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: StateId, state: AnimationState) {
        self.items.push((id, state));
    }

    pub fn get(&self, id: StateId) -> Option<&AnimationState> {
        self.items
            .iter()
            .find_map(|(sid, state)| if *sid == id { Some(state) } else { None })
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut AnimationState> {
        self.items
            .iter_mut()
            .find_map(|(sid, state)| if *sid == id { Some(state) } else { None })
    }

    /// First state whose name matches, in authoring order.
    pub fn find_by_name(&self, name: &str) -> Option<StateId> {
        self.items
            .iter()
            .find_map(|(id, state)| if state.name == name { Some(*id) } else { None })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(StateId, AnimationState)> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
