mod framing;
mod sender;
pub mod transport;

pub use self::framing::{encode_frame, FrameReader, DELIMITER, READ_AHEAD_SIZE};
pub use self::sender::{RequestSender, RequestSink};
pub use self::transport::{Interrupt, Transport};
