use std::ops::{Add, Sub};
use std::time::Duration;

const NANOS_IN_MILLI: i64 = 1_000_000;
const NANOS_IN_SEC: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RealTime {
    nanos: i64,
}

impl RealTime {
    pub const ZERO: RealTime = RealTime::from_nanos(0);

    pub const fn from_nanos(nanos: i64) -> RealTime {
        RealTime { nanos }
    }

    pub const fn from_millis(millis: i64) -> RealTime {
        RealTime::from_nanos(millis * NANOS_IN_MILLI)
    }

    pub fn from_millis_f32(millis: f32) -> RealTime {
        RealTime::from_nanos((millis * (NANOS_IN_MILLI as f32)) as i64)
    }

    pub fn from_secs(secs: i64) -> RealTime {
        RealTime::from_nanos(secs * NANOS_IN_SEC)
    }

    pub fn from_duration(duration: Duration) -> RealTime {
        RealTime::from_nanos(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX))
    }

    pub fn as_nanos(self) -> i64 {
        self.nanos
    }

    pub fn as_millis(self) -> i64 {
        self.nanos / NANOS_IN_MILLI
    }

    pub fn as_millis_f32(self) -> f32 {
        (self.nanos as f32) / (NANOS_IN_MILLI as f32)
    }

    pub fn as_secs_f64(self) -> f64 {
        (self.nanos as f64) / (NANOS_IN_SEC as f64)
    }

    pub fn saturating_sub(self, rhs: RealTime) -> RealTime {
        RealTime::from_nanos(self.nanos.saturating_sub(rhs.nanos))
    }
}

impl Add<RealTime> for RealTime {
    type Output = RealTime;

    fn add(self, rhs: RealTime) -> RealTime {
        RealTime {
            nanos: self.nanos + rhs.nanos,
        }
    }
}

impl Sub<RealTime> for RealTime {
    type Output = RealTime;

    fn sub(self, rhs: RealTime) -> RealTime {
        RealTime {
            nanos: self.nanos - rhs.nanos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_conversions() {
        let t = RealTime::from_millis(800);
        assert_eq!(t.as_millis(), 800);
        assert_eq!(t.as_nanos(), 800_000_000);
        assert!((t.as_millis_f32() - 800.0).abs() < 1e-3);
        assert_eq!(RealTime::from_secs(2) - t, RealTime::from_millis(1200));
    }

    #[test]
    fn saturating_sub_clamps() {
        let a = RealTime::from_nanos(i64::MIN + 1);
        assert_eq!(a.saturating_sub(RealTime::from_secs(1)).as_nanos(), i64::MIN);
    }
}
