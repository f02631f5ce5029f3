mod config;
mod controller;
mod draw;
mod scale;
pub mod transform;
mod view;

pub use self::config::{DrawMode, Orientation, ViewConfig};
pub use self::controller::{
    db_to_slider, plane_wave_azimuth, slider_to_db, Controller, Gesture, TickReport,
};
pub use self::draw::{source_radius, DrawList, LoudspeakerSprite, ReferenceSprite, SourceSprite};
pub use self::scale::SizeScale;
pub use self::transform::Transforms;
pub use self::view::SceneView;
