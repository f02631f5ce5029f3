use glam::Vec2;
use ssr_core::RealTime;

/// How the scene is laid out around the listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// The reference stays at the origin facing up, everything else moves
    /// around it.
    #[default]
    ReferenceFixed,
    /// Sources keep their world coordinates, the reference moves.
    SourcesFixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Center rotation in degrees once the view has settled in this
    /// orientation.
    pub fn center_rotation(self) -> f32 {
        match self {
            Orientation::Portrait => 0.0,
            Orientation::Landscape => -90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub draw_mode: DrawMode,
    pub orientation: Orientation,
    /// Duration of zoom, pan and rotation animations.
    pub animation: RealTime,
    /// Maximum screen distance between a touch and the source it picks.
    pub select_radius: f32,
    /// Screen margin kept free around the scene by fit-to-scene.
    pub fit_border: f32,
    /// Minimum time between two position requests while dragging.
    pub drag_interval: RealTime,
    pub initial_scaling: f32,
    pub initial_translation: Vec2,
    pub fling_factor: f32,
    pub zoom_step: f32,
    /// Base radius of a source marker in pixels.
    pub source_radius: f32,
}

impl Default for ViewConfig {
    fn default() -> ViewConfig {
        ViewConfig {
            draw_mode: DrawMode::ReferenceFixed,
            orientation: Orientation::Portrait,
            animation: RealTime::from_millis(800),
            select_radius: 70.0,
            fit_border: 60.0,
            drag_interval: RealTime::from_millis(30),
            initial_scaling: 0.5,
            initial_translation: Vec2::new(0.0, 80.0),
            fling_factor: 0.3,
            zoom_step: 1.3,
            source_radius: 15.0,
        }
    }
}
