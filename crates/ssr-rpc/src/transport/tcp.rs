use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use ssr_api::{Error, Result};

use super::{Interrupt, Transport};

#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to `address`, given as `host:port`.
    pub fn connect(address: &str) -> Result<TcpTransport> {
        let addrs: Vec<_> = address
            .to_socket_addrs()
            .map_err(|_| Error::InvalidAddress {
                address: address.to_owned(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(Error::InvalidAddress {
                address: address.to_owned(),
            });
        }

        let stream = TcpStream::connect(&addrs[..])?;
        tracing::info!(peer = ?stream.peer_addr().ok(), "connected");

        Ok(TcpTransport::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> TcpTransport {
        if let Err(error) = stream.set_nodelay(true) {
            tracing::debug!(?error, "failed to disable nagle");
        }
        TcpTransport { stream }
    }
}

impl Transport for TcpTransport {
    type Reader = TcpStream;
    type Writer = TcpStream;
    type Interrupt = TcpInterrupt;

    fn split(self) -> Result<(TcpStream, TcpStream, TcpInterrupt)> {
        let reader = self.stream.try_clone()?;
        let interrupt = TcpInterrupt {
            stream: self.stream.try_clone()?,
        };
        Ok((reader, self.stream, interrupt))
    }
}

#[derive(Debug)]
pub struct TcpInterrupt {
    stream: TcpStream,
}

impl Interrupt for TcpInterrupt {
    fn interrupt(&self) {
        // a blocked read returns once the socket is shut down
        if let Err(error) = self.stream.shutdown(Shutdown::Both) {
            tracing::debug!(?error, "socket shutdown failed");
        }
    }
}
