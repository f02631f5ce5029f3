pub mod clock;
pub mod collections;
pub mod interpolator;
pub mod time;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::interpolator::Interpolator;
pub use self::time::RealTime;
