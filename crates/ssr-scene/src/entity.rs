use glam::Vec2;

use crate::flag::DirtyFlag;

/// State shared by every placeable thing in a scene.
///
/// Every setter marks the matching change flag; the flags start out set so
/// the first consumer pass picks up the initial values.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    position: Vec2,
    saved_position: Vec2,
    azimuth: f32,
    selected: bool,
    position_fixed: bool,
    position_flag: DirtyFlag,
    azimuth_flag: DirtyFlag,
    selected_flag: DirtyFlag,
}

impl EntityState {
    pub fn new() -> EntityState {
        EntityState {
            position: Vec2::ZERO,
            saved_position: Vec2::ZERO,
            azimuth: 0.0,
            selected: false,
            position_fixed: false,
            position_flag: DirtyFlag::dirty(),
            azimuth_flag: DirtyFlag::dirty(),
            selected_flag: DirtyFlag::dirty(),
        }
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.selected_flag.set();
    }
}

impl Default for EntityState {
    fn default() -> EntityState {
        EntityState::new()
    }
}

pub trait Entity {
    fn state(&self) -> &EntityState;

    fn state_mut(&mut self) -> &mut EntityState;

    fn position(&self) -> Vec2 {
        self.state().position
    }

    fn set_position(&mut self, position: Vec2) {
        let state = self.state_mut();
        state.position = position;
        state.position_flag.set();
    }

    /// Orientation in degrees, kept in `[0, 360)`.
    fn azimuth(&self) -> f32 {
        self.state().azimuth
    }

    fn set_azimuth(&mut self, azimuth: f32) {
        let state = self.state_mut();
        state.azimuth = wrap_degrees(azimuth);
        state.azimuth_flag.set();
    }

    fn is_selected(&self) -> bool {
        self.state().selected
    }

    fn is_position_fixed(&self) -> bool {
        self.state().position_fixed
    }

    fn set_position_fixed(&mut self, fixed: bool) {
        self.state_mut().position_fixed = fixed;
    }

    /// Scratch position used by the consumer while dragging.
    fn saved_position(&self) -> Vec2 {
        self.state().saved_position
    }

    fn save_position(&mut self, position: Vec2) {
        self.state_mut().saved_position = position;
    }

    /// The `take_*_changed` flags belong to the consumer. The scene only
    /// raises them; a consumer that redraws everything each tick may ignore
    /// them, one that redraws incrementally clears them as it goes.
    fn take_position_changed(&mut self) -> bool {
        self.state_mut().position_flag.take()
    }

    fn take_azimuth_changed(&mut self) -> bool {
        self.state_mut().azimuth_flag.take()
    }

    fn take_selected_changed(&mut self) -> bool {
        self.state_mut().selected_flag.take()
    }
}

fn wrap_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return degrees;
    }

    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Dummy(EntityState);

    impl Entity for Dummy {
        fn state(&self) -> &EntityState {
            &self.0
        }

        fn state_mut(&mut self) -> &mut EntityState {
            &mut self.0
        }
    }

    #[test]
    fn flags_start_dirty_and_clear_once() {
        let mut entity = Dummy::default();
        assert!(entity.take_position_changed());
        assert!(!entity.take_position_changed());
        assert!(entity.take_azimuth_changed());
        assert!(!entity.take_azimuth_changed());
        assert!(entity.take_selected_changed());
        assert!(!entity.take_selected_changed());
    }

    #[test]
    fn setters_mark_flags() {
        let mut entity = Dummy::default();
        entity.take_position_changed();
        entity.take_azimuth_changed();

        entity.set_position(Vec2::new(1.0, 2.0));
        assert_eq!(entity.position(), Vec2::new(1.0, 2.0));
        assert!(entity.take_position_changed());
        assert!(!entity.take_azimuth_changed());

        entity.set_azimuth(-90.0);
        assert_eq!(entity.azimuth(), 270.0);
        assert!(entity.take_azimuth_changed());
    }

    #[test]
    fn saved_position_does_not_touch_flags() {
        let mut entity = Dummy::default();
        entity.take_position_changed();
        entity.save_position(Vec2::new(5.0, 5.0));
        assert_eq!(entity.saved_position(), Vec2::new(5.0, 5.0));
        assert_eq!(entity.position(), Vec2::ZERO);
        assert!(!entity.take_position_changed());
    }

    #[test]
    fn wraps_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert_eq!(wrap_degrees(-1e-9), 0.0);
    }
}
