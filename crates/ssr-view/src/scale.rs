use glam::{Affine2, Vec2};

use crate::transform::map_radius;

/// Distance between the screen edge and the start of the scale bar.
pub const SCALE_MARGIN: f32 = 20.0;

const STEPS: [f64; 5] = [0.75, 0.5, 0.3, 0.2, 0.15];

/// On-screen distance scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    /// Length of the bar in scene units (meters).
    pub meters: f32,
    /// Length of the bar in pixels.
    pub pixels: f32,
    /// Left end of the bar.
    pub start: Vec2,
}

impl SizeScale {
    /// Picks the longest round length that still fits along the short edge
    /// of a viewport of `size`.
    pub fn compute(size: Vec2, viewport: &Affine2, inverse_viewport: &Affine2) -> Option<SizeScale> {
        let edge = size.x.min(size.y) - SCALE_MARGIN * 2.0;
        if edge <= 0.0 {
            return None;
        }

        let available = f64::from(map_radius(inverse_viewport, edge));
        if !(available.is_finite() && available > 0.0) {
            return None;
        }

        let meters = nice_length(available) as f32;
        Some(SizeScale {
            meters,
            pixels: map_radius(viewport, meters),
            start: Vec2::new(SCALE_MARGIN, size.y - 5.0),
        })
    }

    pub fn label(&self) -> String {
        format!("{}m", self.meters)
    }
}

/// Largest value of the form `k * 10^n`, with `k` one of 0.1, 0.15, 0.2,
/// 0.3, 0.5, 0.75, that is smaller than `length`.
pub fn nice_length(length: f64) -> f64 {
    let mut power = 1.0;
    if length > 1.0 {
        power = 10.0;
        while length / power > 1.0 {
            power *= 10.0;
        }
    } else {
        while length / power < 0.1 {
            power *= 0.1;
        }
    }

    let fraction = length / power;
    let step = STEPS
        .iter()
        .copied()
        .find(|&step| fraction > step)
        .unwrap_or(0.1);

    step * power
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::viewport_transform;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn picks_round_lengths() {
        assert!(close(nice_length(8.0), 7.5));
        assert!(close(nice_length(10.0), 7.5));
        assert!(close(nice_length(6.0), 5.0));
        assert!(close(nice_length(2.5), 2.0));
        assert!(close(nice_length(0.45), 0.3));
        assert!(close(nice_length(0.12), 0.1));
        assert!(close(nice_length(0.018), 0.015));
        assert!(close(nice_length(420.0), 300.0));
    }

    #[test]
    fn scale_fits_short_edge() {
        let size = Vec2::new(320.0, 480.0);
        let viewport = viewport_transform(size, 0.0, 40.0, Vec2::ZERO);
        let scale = SizeScale::compute(size, &viewport, &viewport.inverse()).unwrap();

        // 280px at 40px/m is 7m
        assert!((scale.meters - 5.0).abs() < 1e-5);
        assert!((scale.pixels - 200.0).abs() < 1e-3);
        assert_eq!(scale.label(), "5m");
    }

    #[test]
    fn no_scale_without_size() {
        let viewport = viewport_transform(Vec2::ZERO, 0.0, 1.0, Vec2::ZERO);
        assert_eq!(
            SizeScale::compute(Vec2::ZERO, &viewport, &viewport.inverse()),
            None
        );
    }
}
