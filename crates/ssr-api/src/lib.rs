mod error;
mod event;
pub mod model;
pub mod request;

pub use self::error::{Error, Result};
pub use self::event::SceneEvent;
pub use self::model::{SourceModel, SpeakerModel, TransportCommand, TransportState};
pub use self::request::{Request, RequestItem};
