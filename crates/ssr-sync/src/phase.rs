use ssr_api::Result;
use ssr_scene::SharedScene;

use crate::description::DescriptionHandler;
use crate::update::UpdateHandler;

/// The two parsing modes of a connection, entered in order.
#[derive(Debug)]
pub enum Phase {
    Description(DescriptionHandler),
    Update(UpdateHandler),
}

/// Outcome of handing a chunk to the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The chunk was applied, the phase is unchanged.
    Applied,
    /// The chunk completed the scene description. The phase has switched to
    /// [`Phase::Update`].
    SceneReady,
}

impl Phase {
    pub fn new() -> Phase {
        Phase::Description(DescriptionHandler::new())
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Phase::Update(_))
    }

    pub fn handle_chunk(&mut self, chunk: &[u8], scene: &SharedScene) -> Result<Progress> {
        match self {
            Phase::Description(handler) => {
                if handler.handle_chunk(chunk, scene)? {
                    *self = Phase::Update(UpdateHandler::new());
                    return Ok(Progress::SceneReady);
                }
            }
            Phase::Update(handler) => handler.handle_chunk(chunk, scene)?,
        }

        Ok(Progress::Applied)
    }
}

impl Default for Phase {
    fn default() -> Phase {
        Phase::new()
    }
}
