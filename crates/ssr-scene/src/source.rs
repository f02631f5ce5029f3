use ssr_api::SourceModel;

use crate::entity::{Entity, EntityState};

pub const LEVEL_FLOOR_DB: f32 = -60.0;
pub const LEVEL_CEILING_DB: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SoundSource {
    state: EntityState,
    id: String,
    name: String,
    model: SourceModel,
    audio_file: Option<String>,
    volume: f32,
    level: f32,
    normalized_level: f32,
    muted: bool,
}

impl SoundSource {
    pub fn new(id: impl Into<String>) -> SoundSource {
        SoundSource {
            state: EntityState::new(),
            id: id.into(),
            name: "<unnamed>".into(),
            model: SourceModel::Point,
            audio_file: None,
            volume: 0.0,
            level: LEVEL_FLOOR_DB,
            normalized_level: 0.0,
            muted: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn model(&self) -> SourceModel {
        self.model
    }

    pub fn set_model(&mut self, model: SourceModel) {
        self.model = model;
    }

    pub fn audio_file(&self) -> Option<&str> {
        self.audio_file.as_deref()
    }

    pub fn set_audio_file(&mut self, audio_file: Option<String>) {
        self.audio_file = audio_file;
    }

    /// Source gain in dB.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level mapped onto `[0, 1]`, see [`normalize_level`].
    pub fn normalized_level(&self) -> f32 {
        self.normalized_level
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level;
        self.normalized_level = normalize_level(level);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl Entity for SoundSource {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}

/// Maps a level in dB from `[-60, +12]` onto `[0, 1]`, clamping outside.
pub fn normalize_level(level: f32) -> f32 {
    let normalized = (level - LEVEL_FLOOR_DB) / (LEVEL_CEILING_DB - LEVEL_FLOOR_DB);
    if normalized.is_nan() {
        return 0.0;
    }
    normalized.clamp(0.0, 1.0)
}
