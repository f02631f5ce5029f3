use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use ssr_api::{Request, Result};

use crate::framing::encode_frame;

/// Anything that can deliver requests to the server.
pub trait RequestSink {
    fn send(&self, request: &Request) -> Result<()>;
}

/// Writes framed requests to the write half of a transport. Clones share
/// the same writer, whole frames are never interleaved.
#[derive(Debug)]
pub struct RequestSender<W> {
    writer: Arc<Mutex<W>>,
}

impl<W: Write> RequestSender<W> {
    pub fn new(writer: W) -> RequestSender<W> {
        RequestSender {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn send_document(&self, document: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(document.len() + 1);
        encode_frame(document, &mut frame)?;

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&frame)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write> RequestSink for RequestSender<W> {
    fn send(&self, request: &Request) -> Result<()> {
        if request.is_empty() {
            return Ok(());
        }

        let document = request.encode()?;
        tracing::trace!(request = %String::from_utf8_lossy(&document), "sending request");

        self.send_document(&document).inspect_err(|error| {
            tracing::debug!(%error, "failed to send request");
        })
    }
}

impl<W> Clone for RequestSender<W> {
    fn clone(&self) -> Self {
        RequestSender {
            writer: self.writer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ssr_api::{Error, RequestItem, TransportCommand};

    use super::*;
    use crate::transport::{local, Transport};

    #[test]
    fn sends_framed_requests() {
        let (transport, peer) = local(None);
        let (_reader, writer, _interrupt) = transport.split().unwrap();
        let sender = RequestSender::new(writer);

        sender
            .send(&Request::single(RequestItem::Transport {
                command: TransportCommand::Start,
            }))
            .unwrap();
        sender.clone().send(&Request::new()).unwrap();
        sender
            .send(&Request::single(RequestItem::SceneVolume { volume: 0.0 }))
            .unwrap();

        assert_eq!(
            peer.drain_documents(),
            vec![
                r#"<request><state transport="start"/></request>"#,
                r#"<request><scene volume="0"/></request>"#,
            ]
        );
    }

    #[test]
    fn reports_closed_connection() {
        let (transport, peer) = local(None);
        let (_reader, writer, _interrupt) = transport.split().unwrap();
        drop(peer);

        let sender = RequestSender::new(writer);
        let result = sender.send(&Request::single(RequestItem::ReferenceAzimuth { azimuth: 1.0 }));
        assert_eq!(result, Err(Error::Disconnected));
    }

    #[test]
    fn rejects_embedded_delimiter() {
        let sender = RequestSender::new(Vec::new());
        assert_eq!(sender.send_document(b"a\0"), Err(Error::InvalidFrame));
    }
}
