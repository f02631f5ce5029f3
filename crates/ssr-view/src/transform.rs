//! Coordinate pipeline from world space through reference space to screen
//! pixels. All angles are in degrees.

use glam::{Affine2, Vec2};
use ssr_scene::{Entity, Reference};

use crate::config::DrawMode;

/// World to reference space.
pub fn reference_transform(mode: DrawMode, reference: Option<&Reference>) -> Affine2 {
    match (mode, reference) {
        (DrawMode::ReferenceFixed, Some(reference)) => {
            rotation(-reference.azimuth()) * Affine2::from_translation(-reference.position())
        }
        (DrawMode::ReferenceFixed, None) => Affine2::IDENTITY,
        (DrawMode::SourcesFixed, _) => rotation(-90.0),
    }
}

/// Reference space to screen pixels.
///
/// Applied to a point, in order: a quarter turn so that "forward" points up,
/// zoom with the vertical axis flipped, the user's pan, the orientation
/// compensating center rotation, and finally the move to the viewport
/// center.
pub fn viewport_transform(
    size: Vec2,
    center_rotation: f32,
    scaling: f32,
    translation: Vec2,
) -> Affine2 {
    Affine2::from_translation(size / 2.0)
        * rotation(-center_rotation)
        * Affine2::from_translation(translation)
        * Affine2::from_scale(Vec2::new(scaling, -scaling))
        * rotation(90.0)
}

pub fn rotation(degrees: f32) -> Affine2 {
    Affine2::from_angle(degrees.to_radians())
}

/// Length a radius of `radius` has after going through `transform`.
pub fn map_radius(transform: &Affine2, radius: f32) -> f32 {
    let x = transform.transform_vector2(Vec2::new(radius, 0.0)).length();
    let y = transform.transform_vector2(Vec2::new(0.0, radius)).length();
    (x * y).sqrt()
}

/// Direction of `degrees` after going through `transform`.
pub fn map_angle(transform: &Affine2, degrees: f32) -> f32 {
    let direction = Vec2::from_angle(degrees.to_radians());
    let mapped = transform.transform_vector2(direction);
    mapped.y.atan2(mapped.x).to_degrees()
}

/// The current reference and viewport transforms together with their
/// inverses.
#[derive(Debug, Clone, PartialEq)]
pub struct Transforms {
    mode: DrawMode,
    reference: Affine2,
    inverse_reference: Affine2,
    viewport: Affine2,
    inverse_viewport: Affine2,
}

impl Transforms {
    pub fn new(mode: DrawMode) -> Transforms {
        let reference = reference_transform(mode, None);
        Transforms {
            mode,
            reference,
            inverse_reference: reference.inverse(),
            viewport: Affine2::IDENTITY,
            inverse_viewport: Affine2::IDENTITY,
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_reference(&mut self, reference: Option<&Reference>) {
        self.reference = reference_transform(self.mode, reference);
        self.inverse_reference = self.reference.inverse();
    }

    pub fn set_viewport(&mut self, viewport: Affine2) {
        self.viewport = viewport;
        self.inverse_viewport = viewport.inverse();
    }

    pub fn reference(&self) -> &Affine2 {
        &self.reference
    }

    pub fn viewport(&self) -> &Affine2 {
        &self.viewport
    }

    pub fn inverse_viewport(&self) -> &Affine2 {
        &self.inverse_viewport
    }

    /// World to screen.
    pub fn full(&self) -> Affine2 {
        self.viewport * self.reference
    }

    pub fn map_to_screen(&self, world: Vec2) -> Vec2 {
        self.viewport
            .transform_point2(self.reference.transform_point2(world))
    }

    pub fn map_to_world(&self, screen: Vec2) -> Vec2 {
        self.inverse_reference
            .transform_point2(self.inverse_viewport.transform_point2(screen))
    }

    pub fn world_to_reference(&self, world: Vec2) -> Vec2 {
        self.reference.transform_point2(world)
    }

    pub fn reference_to_world(&self, point: Vec2) -> Vec2 {
        self.inverse_reference.transform_point2(point)
    }

    pub fn screen_to_reference(&self, screen: Vec2) -> Vec2 {
        self.inverse_viewport.transform_point2(screen)
    }

    pub fn reference_to_screen(&self, point: Vec2) -> Vec2 {
        self.viewport.transform_point2(point)
    }
}
