mod attrs;
mod description;
mod phase;
mod synchronizer;
#[cfg(test)]
mod tests;
mod update;

pub use self::description::DescriptionHandler;
pub use self::phase::{Phase, Progress};
pub use self::synchronizer::{spawn, AbortHandle, SyncHandle, Synchronizer};
pub use self::update::UpdateHandler;
