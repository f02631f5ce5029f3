use glam::{Affine2, Vec2};
use ssr_api::{SourceModel, SpeakerModel};
use ssr_scene::{AudioScene, Entity};

use crate::config::DrawMode;
use crate::scale::SizeScale;
use crate::transform::{map_angle, rotation, Transforms};

/// Screen-space description of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub sources: Vec<SourceSprite>,
    pub loudspeakers: Vec<LoudspeakerSprite>,
    pub reference: Option<ReferenceSprite>,
    pub size_scale: Option<SizeScale>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSprite {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub position: Vec2,
    /// Marker radius in pixels, grows slowly with the zoom level.
    pub radius: f32,
    pub halo_radius: f32,
    /// Screen direction of a plane wave in degrees, y pointing down.
    pub heading: f32,
    pub model: SourceModel,
    pub selected: bool,
    pub muted: bool,
    pub fixed: bool,
    /// Level meter fill in `[0, 1]`.
    pub level: f32,
    /// The level is above 0 dB.
    pub clipping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoudspeakerSprite {
    pub position: Vec2,
    pub heading: f32,
    pub model: SpeakerModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSprite {
    pub position: Vec2,
    pub heading: f32,
}

/// Radius of a source marker for the given zoom, `base` at the default
/// zoom range.
pub fn source_radius(base: f32, scaling: f32) -> f32 {
    let factor = (scaling.log2() - 0.5) / 5.0;
    if factor.is_nan() {
        return base * 0.2;
    }
    base * factor.clamp(0.2, 2.0)
}

pub(crate) struct DrawParams {
    pub scaling: f32,
    pub source_radius: f32,
    pub halo_radius: f32,
}

pub(crate) fn build(
    scene: &AudioScene,
    transforms: &Transforms,
    params: &DrawParams,
    size_scale: Option<SizeScale>,
) -> DrawList {
    let world_to_screen = transforms.full();
    let radius = source_radius(params.source_radius, params.scaling);

    let sources = scene
        .sources()
        .iter()
        .enumerate()
        .map(|(index, source)| SourceSprite {
            index,
            id: source.id().to_owned(),
            name: source.name().to_owned(),
            position: world_to_screen.transform_point2(source.position()),
            radius,
            halo_radius: params.halo_radius,
            heading: map_angle(&world_to_screen, source.azimuth()),
            model: source.model(),
            selected: source.is_selected(),
            muted: source.is_muted(),
            fixed: source.is_position_fixed(),
            level: source.normalized_level(),
            clipping: source.level() > 0.0,
        })
        .collect();

    // loudspeaker positions are given relative to the reference
    let listener_frame = match (transforms.mode(), scene.reference()) {
        (DrawMode::ReferenceFixed, _) | (DrawMode::SourcesFixed, None) => *transforms.viewport(),
        (DrawMode::SourcesFixed, Some(reference)) => {
            world_to_screen
                * Affine2::from_translation(reference.position())
                * rotation(reference.azimuth())
        }
    };

    let loudspeakers = scene
        .loudspeakers()
        .iter()
        .map(|speaker| LoudspeakerSprite {
            position: listener_frame.transform_point2(speaker.position()),
            heading: map_angle(&listener_frame, speaker.azimuth()),
            model: speaker.model(),
        })
        .collect();

    let reference = scene.reference().map(|_| ReferenceSprite {
        position: listener_frame.transform_point2(Vec2::ZERO),
        heading: map_angle(&listener_frame, 0.0),
    });

    DrawList {
        sources,
        loudspeakers,
        reference,
        size_scale,
    }
}
