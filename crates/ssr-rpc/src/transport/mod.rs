mod local;
mod tcp;

use std::io::{Read, Write};

use ssr_api::Result;

pub use self::local::{local, LocalInterrupt, LocalPeer, LocalReader, LocalTransport, LocalWriter};
pub use self::tcp::{TcpInterrupt, TcpTransport};

/// A duplex byte stream to the rendering server.
pub trait Transport: Send + 'static {
    type Reader: Read + Send + 'static;
    type Writer: Write + Send + 'static;
    type Interrupt: Interrupt;

    /// Splits the stream into its read half, write half and a handle that
    /// can unblock a read in progress on the read half.
    fn split(self) -> Result<(Self::Reader, Self::Writer, Self::Interrupt)>;
}

pub trait Interrupt: Send + Sync + 'static {
    /// Makes any pending or future read on the paired reader return.
    /// Calling it more than once has no further effect.
    fn interrupt(&self);
}
