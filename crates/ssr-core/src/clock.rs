use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

use crate::time::RealTime;

pub trait Clock: Debug + Send + Sync + 'static {
    /// Monotonic time since an arbitrary, fixed origin.
    fn now(&self) -> RealTime;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> SystemClock {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> RealTime {
        RealTime::from_duration(self.origin.elapsed())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn set(&self, time: RealTime) {
        self.nanos.store(time.as_nanos(), Ordering::Release);
    }

    pub fn advance(&self, delta: RealTime) {
        self.nanos.fetch_add(delta.as_nanos(), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> RealTime {
        RealTime::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}
