use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::scene::AudioScene;

/// Handle to the one scene shared between the network actor and the
/// consumer. All access goes through [`SharedScene::lock`].
#[derive(Debug, Clone, Default)]
pub struct SharedScene {
    inner: Arc<Mutex<AudioScene>>,
}

impl SharedScene {
    pub fn new() -> SharedScene {
        SharedScene::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, AudioScene> {
        // setters are infallible, so a poisoned scene is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut AudioScene) -> R) -> R {
        f(&mut self.lock())
    }
}
