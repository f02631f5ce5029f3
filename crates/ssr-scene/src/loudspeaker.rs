use ssr_api::SpeakerModel;

use crate::entity::{Entity, EntityState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loudspeaker {
    state: EntityState,
    model: SpeakerModel,
}

impl Loudspeaker {
    pub fn new() -> Loudspeaker {
        Loudspeaker::default()
    }

    pub fn model(&self) -> SpeakerModel {
        self.model
    }

    pub fn set_model(&mut self, model: SpeakerModel) {
        self.model = model;
    }
}

impl Entity for Loudspeaker {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}
