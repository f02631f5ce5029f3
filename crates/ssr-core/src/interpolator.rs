use crate::time::RealTime;

/// A single scalar transition from a start to an end value over a fixed
/// duration, eased with a decelerating curve.
///
/// The interpolator does not read a clock itself, every time-dependent call
/// takes the caller's notion of "now". It deactivates itself on the first
/// [`Interpolator::current_value`] call made after the duration has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    start_value: f32,
    end_value: f32,
    start_time: RealTime,
    duration: RealTime,
    active: bool,
}

impl Interpolator {
    pub fn new(duration: RealTime) -> Interpolator {
        Interpolator {
            start_value: 0.0,
            end_value: 0.0,
            start_time: RealTime::ZERO,
            duration,
            active: false,
        }
    }

    pub fn set_duration(&mut self, duration: RealTime) {
        self.duration = duration;
    }

    pub fn duration(&self) -> RealTime {
        self.duration
    }

    pub fn set_endpoints(&mut self, start: f32, end: f32) {
        self.start_value = start;
        self.end_value = end;
    }

    pub fn start_value(&self) -> f32 {
        self.start_value
    }

    pub fn end_value(&self) -> f32 {
        self.end_value
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, now: RealTime) {
        self.start_time = now;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Target for a new transition that continues from whatever this one is
    /// heading to, so repeated relative changes accumulate instead of jumping.
    pub fn chained_target(&self, current: f32) -> f32 {
        if self.active {
            self.end_value
        } else {
            current
        }
    }

    pub fn current_value(&mut self, now: RealTime) -> f32 {
        let elapsed = now.saturating_sub(self.start_time);
        if elapsed > self.duration {
            self.active = false;
        }

        let progress = if self.duration.as_nanos() <= 0 {
            1.0
        } else {
            (elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64).clamp(0.0, 1.0) as f32
        };

        let value = self.start_value + decelerate(progress) * (self.end_value - self.start_value);

        if self.start_value < self.end_value {
            value.clamp(self.start_value, self.end_value)
        } else {
            value.clamp(self.end_value, self.start_value)
        }
    }
}

pub fn decelerate(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv
}
