use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::{Receiver, Sender, TryRecvError};
use ssr_api::{Error, Result};

use super::{Interrupt, Transport};
use crate::framing::{encode_frame, DELIMITER};

/// In-memory transport pair. The [`LocalTransport`] side behaves like the
/// client end of a socket, the [`LocalPeer`] side plays the server.
pub fn local(cap: Option<usize>) -> (LocalTransport, LocalPeer) {
    let ((server_sender, client_receiver), (client_sender, server_receiver)) =
        if let Some(cap) = cap {
            (async_channel::bounded(cap), async_channel::bounded(cap))
        } else {
            (async_channel::unbounded(), async_channel::unbounded())
        };

    (
        LocalTransport {
            sender: client_sender,
            receiver: client_receiver,
        },
        LocalPeer {
            sender: server_sender,
            receiver: server_receiver,
        },
    )
}

#[derive(Debug)]
pub struct LocalTransport {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
}

impl Transport for LocalTransport {
    type Reader = LocalReader;
    type Writer = LocalWriter;
    type Interrupt = LocalInterrupt;

    fn split(self) -> Result<(LocalReader, LocalWriter, LocalInterrupt)> {
        let interrupted = Arc::new(AtomicBool::new(false));

        let reader = LocalReader {
            receiver: self.receiver.clone(),
            pending: Vec::new(),
            pos: 0,
            interrupted: interrupted.clone(),
        };
        let writer = LocalWriter {
            sender: self.sender,
        };
        let interrupt = LocalInterrupt {
            receiver: self.receiver,
            interrupted,
        };

        Ok((reader, writer, interrupt))
    }
}

#[derive(Debug)]
pub struct LocalReader {
    receiver: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    pos: usize,
    interrupted: Arc<AtomicBool>,
}

impl Read for LocalReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.pending.len() {
            match self.receiver.recv_blocking() {
                Ok(bytes) => {
                    self.pending = bytes;
                    self.pos = 0;
                }
                Err(_) if self.interrupted.load(Ordering::Acquire) => {
                    return Err(io::ErrorKind::ConnectionAborted.into());
                }
                Err(_) => return Ok(0),
            }
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[derive(Debug)]
pub struct LocalWriter {
    sender: Sender<Vec<u8>>,
}

impl Write for LocalWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .send_blocking(buf.to_vec())
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LocalInterrupt {
    receiver: Receiver<Vec<u8>>,
    interrupted: Arc<AtomicBool>,
}

impl Interrupt for LocalInterrupt {
    fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
        self.receiver.close();
    }
}

/// Server side of a [`local`] transport.
#[derive(Debug)]
pub struct LocalPeer {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
}

impl LocalPeer {
    pub fn send_bytes(&self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.sender
            .send_blocking(bytes.into())
            .map_err(|_| Error::Disconnected)
    }

    /// Sends one document followed by the frame delimiter.
    pub fn send_document(&self, document: &str) -> Result<()> {
        let mut frame = Vec::with_capacity(document.len() + 1);
        encode_frame(document.as_bytes(), &mut frame)?;
        self.send_bytes(frame)
    }

    pub fn recv_bytes(&self) -> Result<Vec<u8>> {
        self.receiver.recv_blocking().map_err(|_| Error::Disconnected)
    }

    pub fn try_recv_bytes(&self) -> Result<Option<Vec<u8>>> {
        match self.receiver.try_recv() {
            Ok(bytes) => Ok(Some(bytes)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(Error::Disconnected),
        }
    }

    /// Collects everything the client has written so far and splits it into
    /// documents.
    pub fn drain_documents(&self) -> Vec<String> {
        let mut bytes = Vec::new();
        while let Ok(part) = self.receiver.try_recv() {
            bytes.extend_from_slice(&part);
        }

        bytes
            .split(|&b| b == DELIMITER)
            .filter(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned())
            .collect()
    }

    /// Closes the server-to-client direction, the client reads end of stream.
    pub fn close(&self) {
        self.sender.close();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn bytes_flow_both_ways() {
        let (transport, peer) = local(None);
        let (mut reader, mut writer, _interrupt) = transport.split().unwrap();

        peer.send_bytes(b"hello".to_vec()).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");

        writer.write_all(b"<request/>\0<request/>\0").unwrap();
        assert_eq!(peer.drain_documents(), vec!["<request/>", "<request/>"]);
    }

    #[test]
    fn closed_peer_reads_as_end_of_stream() {
        let (transport, peer) = local(None);
        let (mut reader, _writer, _interrupt) = transport.split().unwrap();

        peer.send_document("<update/>").unwrap();
        peer.close();

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"<update/>\0");
    }

    #[test]
    fn interrupt_unblocks_read() {
        let (transport, _peer) = local(None);
        let (mut reader, _writer, interrupt) = transport.split().unwrap();

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 16];
            reader.read(&mut buf)
        });

        thread::sleep(Duration::from_millis(20));
        interrupt.interrupt();
        interrupt.interrupt();

        let error = handle.join().unwrap().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::ConnectionAborted);
    }

    #[test]
    fn write_after_peer_gone_is_broken_pipe() {
        let (transport, peer) = local(None);
        let (_reader, mut writer, _interrupt) = transport.split().unwrap();
        drop(peer);

        let error = writer.write(b"x").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
