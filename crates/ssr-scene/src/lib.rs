mod entity;
mod flag;
mod loudspeaker;
mod reference;
mod scene;
mod shared;
mod source;

pub use glam::Vec2;

pub use self::entity::{Entity, EntityState};
pub use self::flag::DirtyFlag;
pub use self::loudspeaker::Loudspeaker;
pub use self::reference::Reference;
pub use self::scene::AudioScene;
pub use self::shared::SharedScene;
pub use self::source::{normalize_level, SoundSource, LEVEL_CEILING_DB, LEVEL_FLOOR_DB};
