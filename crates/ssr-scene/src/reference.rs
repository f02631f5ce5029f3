use crate::entity::{Entity, EntityState};

/// The listening point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    state: EntityState,
}

impl Reference {
    pub fn new() -> Reference {
        Reference::default()
    }
}

impl Entity for Reference {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}
