use std::sync::Arc;

use glam::{Affine2, Vec2};
use ssr_core::{Clock, Interpolator};
use ssr_scene::{AudioScene, DirtyFlag, Entity};

use crate::config::{Orientation, ViewConfig};
use crate::draw::{self, DrawList, DrawParams};
use crate::scale::SizeScale;
use crate::transform::{viewport_transform, Transforms};

/// Pan, zoom and orientation state of the scene display, plus the
/// transforms derived from it.
///
/// Owned by the consumer. Methods that need entity positions take the
/// already locked scene.
#[derive(Debug)]
pub struct SceneView {
    config: ViewConfig,
    clock: Arc<dyn Clock>,
    size: Option<Vec2>,
    scaling: f32,
    translation: Vec2,
    center_rotation: f32,
    orientation: Orientation,
    scaling_interp: Interpolator,
    translation_x_interp: Interpolator,
    translation_y_interp: Interpolator,
    center_rotation_interp: Interpolator,
    transforms: Transforms,
    had_reference: bool,
    size_scale: Option<SizeScale>,
    viewport_flag: DirtyFlag,
    orientation_flag: DirtyFlag,
    fit_pending: bool,
}

impl SceneView {
    pub fn new(config: ViewConfig, clock: Arc<dyn Clock>) -> SceneView {
        let interp = Interpolator::new(config.animation);
        let mut view = SceneView {
            scaling: config.initial_scaling,
            translation: config.initial_translation,
            center_rotation: config.orientation.center_rotation(),
            orientation: config.orientation,
            scaling_interp: interp.clone(),
            translation_x_interp: interp.clone(),
            translation_y_interp: interp.clone(),
            center_rotation_interp: interp,
            transforms: Transforms::new(config.draw_mode),
            had_reference: false,
            size_scale: None,
            viewport_flag: DirtyFlag::dirty(),
            orientation_flag: DirtyFlag::dirty(),
            fit_pending: false,
            size: None,
            clock,
            config,
        };
        view.refresh_viewport();
        view
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn size(&self) -> Option<Vec2> {
        self.size
    }

    pub fn scaling(&self) -> f32 {
        self.scaling
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn center_rotation(&self) -> f32 {
        self.center_rotation
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn size_scale(&self) -> Option<SizeScale> {
        self.size_scale
    }

    /// Whether any animation is still running.
    pub fn is_animating(&self) -> bool {
        self.scaling_interp.is_active()
            || self.translation_x_interp.is_active()
            || self.translation_y_interp.is_active()
            || self.center_rotation_interp.is_active()
    }

    pub fn take_viewport_changed(&mut self) -> bool {
        self.viewport_flag.take()
    }

    pub fn take_orientation_changed(&mut self) -> bool {
        self.orientation_flag.take()
    }

    /// Sets the viewport size in pixels. A fit requested before the size
    /// was known runs on the next [`SceneView::advance`].
    pub fn resize(&mut self, size: Vec2) {
        tracing::debug!(width = size.x, height = size.y, "view resized");
        self.size = Some(size);
        self.refresh_viewport();
    }

    pub fn set_scaling(&mut self, scaling: f32) {
        self.scaling = scaling;
        self.refresh_viewport();
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
        self.refresh_viewport();
    }

    pub fn set_center_rotation(&mut self, center_rotation: f32) {
        self.center_rotation = center_rotation;
        self.refresh_viewport();
    }

    /// Animates the zoom by `factor`, relative to the end of a zoom that is
    /// still running.
    pub fn zoom(&mut self, factor: f32) {
        let target = self.scaling_interp.chained_target(self.scaling) * factor;
        self.scaling_interp.set_endpoints(self.scaling, target);
        self.scaling_interp.start(self.clock.now());
    }

    /// Animates the pan by `delta`. Each axis chains onto its own running
    /// animation, a zero component leaves that axis alone.
    pub fn translate(&mut self, delta: Vec2) {
        let now = self.clock.now();

        if delta.x != 0.0 {
            let target = self.translation_x_interp.chained_target(self.translation.x) + delta.x;
            self.translation_x_interp
                .set_endpoints(self.translation.x, target);
            self.translation_x_interp.start(now);
        }

        if delta.y != 0.0 {
            let target = self.translation_y_interp.chained_target(self.translation.y) + delta.y;
            self.translation_y_interp
                .set_endpoints(self.translation.y, target);
            self.translation_y_interp.start(now);
        }
    }

    /// Starts the rotation into `orientation`. Returns `false` if the view is
    /// already there.
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if self.orientation == orientation {
            return false;
        }

        let start = self.orientation.center_rotation();
        let end = orientation.center_rotation();
        tracing::debug!(?orientation, "orientation changed");

        self.orientation = orientation;
        self.orientation_flag.set();
        self.center_rotation_interp.set_endpoints(start, end);
        self.center_rotation_interp.start(self.clock.now());
        true
    }

    /// Maps a screen-space pan onto the translation axes of the current
    /// orientation.
    pub fn screen_to_pan(&self, delta: Vec2) -> Vec2 {
        match self.orientation {
            Orientation::Portrait => delta,
            Orientation::Landscape => Vec2::new(delta.y, -delta.x),
        }
    }

    /// Updates the reference transform if the reference moved, runs a
    /// deferred fit and steps all animations.
    pub fn advance(&mut self, scene: &mut AudioScene) {
        self.sync_reference(scene);

        if self.fit_pending && self.size.is_some() {
            self.fit_pending = false;
            self.fit_to_scene(scene);
        }

        let now = self.clock.now();
        let mut changed = false;

        if self.scaling_interp.is_active() {
            self.scaling = self.scaling_interp.current_value(now);
            changed = true;
        }

        if self.translation_x_interp.is_active() {
            self.translation.x = self.translation_x_interp.current_value(now);
            changed = true;
        }

        if self.translation_y_interp.is_active() {
            self.translation.y = self.translation_y_interp.current_value(now);
            changed = true;
        }

        if self.center_rotation_interp.is_active() {
            self.center_rotation = self.center_rotation_interp.current_value(now);
            changed = true;
        }

        if changed {
            self.refresh_viewport();
        }
    }

    /// Recomputes the reference transform when the reference was replaced,
    /// removed, moved or turned.
    pub fn sync_reference(&mut self, scene: &mut AudioScene) {
        let has_reference = scene.reference().is_some();
        let moved = match scene.reference_mut() {
            Some(reference) => {
                let turned = reference.take_azimuth_changed();
                reference.take_position_changed() | turned
            }
            None => false,
        };

        if moved || has_reference != self.had_reference {
            self.had_reference = has_reference;
            self.transforms.set_reference(scene.reference());
        }
    }

    /// Animates zoom and pan so that the reference and every source fit
    /// into the viewport with a border of `fit_border` pixels.
    ///
    /// The fit is taken per axis of the scene's screen bounding box: once
    /// settled, `extent + 2 * fit_border <= size` holds on both axes, with
    /// equality on the tighter one. It is not a radial bound around the
    /// reference.
    pub fn fit_to_scene(&mut self, scene: &mut AudioScene) {
        let Some(size) = self.size else {
            tracing::debug!("deferring fit until the view size is known");
            self.fit_pending = true;
            return;
        };

        self.sync_reference(scene);
        self.refresh_viewport();

        let border = self.config.fit_border * 2.0;
        let (min, max) = self.scene_bounds(scene, self.transforms.viewport());
        let diff = max - min;

        let mut viewport = *self.transforms.viewport();
        if diff.x > 0.0 || diff.y > 0.0 {
            let factor_x = if diff.x > 0.0 {
                (size.x - border) / diff.x
            } else {
                f32::INFINITY
            };
            let factor_y = if diff.y > 0.0 {
                (size.y - border) / diff.y
            } else {
                f32::INFINITY
            };

            let factor = factor_x.min(factor_y);
            if factor.is_finite() && factor > 0.0 {
                self.zoom(factor);
                viewport = viewport_transform(
                    size,
                    self.center_rotation,
                    self.scaling * factor,
                    self.translation,
                );
            } else {
                tracing::debug!(factor, "viewport too small to fit scene");
            }
        }

        let (min, max) = self.scene_bounds(scene, &viewport);
        let diff = max - min;
        let pan = -min + (size - diff) / 2.0;
        self.translate(self.screen_to_pan(pan));
    }

    /// Bounding box, in screen coordinates under `viewport`, of the
    /// reference and all sources.
    fn scene_bounds(&self, scene: &AudioScene, viewport: &Affine2) -> (Vec2, Vec2) {
        let to_screen = *viewport * *self.transforms.reference();

        let anchor = match scene.reference() {
            Some(reference) => to_screen.transform_point2(reference.position()),
            None => viewport.transform_point2(Vec2::ZERO),
        };

        scene
            .sources()
            .iter()
            .map(|source| to_screen.transform_point2(source.position()))
            .fold((anchor, anchor), |(min, max), point| {
                (min.min(point), max.max(point))
            })
    }

    /// Index of the source nearest to a screen point, if it lies within the
    /// selection radius.
    pub fn nearest_source(&mut self, scene: &mut AudioScene, screen: Vec2) -> Option<usize> {
        self.sync_reference(scene);

        let world = self.transforms.map_to_world(screen);
        let index = scene.nearest_source(world)?;
        let source = scene.source_at(index)?;

        let distance = self.transforms.map_to_screen(source.position()).distance(screen);
        if distance > self.config.select_radius {
            return None;
        }

        Some(index)
    }

    pub fn draw_list(&mut self, scene: &mut AudioScene) -> DrawList {
        self.sync_reference(scene);

        let params = DrawParams {
            scaling: self.scaling,
            source_radius: self.config.source_radius,
            halo_radius: self.config.select_radius,
        };
        draw::build(scene, &self.transforms, &params, self.size_scale)
    }

    fn refresh_viewport(&mut self) {
        let size = self.size.unwrap_or(Vec2::ZERO);
        let viewport = viewport_transform(size, self.center_rotation, self.scaling, self.translation);

        self.transforms.set_viewport(viewport);
        self.size_scale = SizeScale::compute(
            size,
            self.transforms.viewport(),
            self.transforms.inverse_viewport(),
        );
        self.viewport_flag.set();
    }
}
