use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use async_channel::{Receiver, Sender};
use ssr_api::{Error, Result, SceneEvent};
use ssr_rpc::{FrameReader, Interrupt, RequestSender, Transport};
use ssr_scene::SharedScene;

use crate::phase::{Phase, Progress};

/// Cancels a running [`Synchronizer`].
#[derive(Clone)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
    interrupt: Arc<dyn Interrupt>,
}

impl AbortHandle {
    pub fn new(interrupt: impl Interrupt) -> AbortHandle {
        AbortHandle {
            aborted: Arc::new(AtomicBool::new(false)),
            interrupt: Arc::new(interrupt),
        }
    }

    /// Raises the abort flag and unblocks a pending read. Only the first call
    /// has an effect.
    pub fn abort(&self) {
        if !self.aborted.swap(true, Ordering::AcqRel) {
            tracing::debug!("aborting synchronizer");
            self.interrupt.interrupt();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortHandle")
            .field("aborted", &self.is_aborted())
            .finish_non_exhaustive()
    }
}

/// The network side of a connection: reads chunks, applies them to the
/// shared scene and reports how the connection went.
///
/// Exactly one terminal event is sent per run: [`SceneEvent::Disconnected`]
/// when the stream ends, [`SceneEvent::Error`] on a transport fault, and
/// nothing at all after an abort.
#[derive(Debug)]
pub struct Synchronizer<R> {
    frames: FrameReader<R>,
    scene: SharedScene,
    phase: Phase,
    abort: AbortHandle,
    events: Sender<SceneEvent>,
}

impl<R: Read> Synchronizer<R> {
    pub fn new(
        reader: R,
        scene: SharedScene,
        abort: AbortHandle,
        events: Sender<SceneEvent>,
    ) -> Synchronizer<R> {
        Synchronizer {
            frames: FrameReader::new(reader),
            scene,
            phase: Phase::new(),
            abort,
            events,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn run(mut self) {
        tracing::debug!("synchronizer started");

        match self.run_inner() {
            Ok(()) => {
                tracing::info!("server closed the connection");
                self.emit(SceneEvent::Disconnected);
            }
            Err(_) if self.abort.is_aborted() => {
                tracing::debug!("synchronizer aborted");
            }
            Err(error) => {
                tracing::error!(%error, "connection failed");
                self.emit(SceneEvent::Error {
                    message: error.to_string(),
                });
            }
        }

        tracing::debug!("synchronizer stopped");
    }

    fn run_inner(&mut self) -> Result<()> {
        loop {
            if self.abort.is_aborted() {
                return Err(Error::Aborted);
            }

            let chunk = match self.frames.next_chunk() {
                Ok(Some(chunk)) => chunk,
                Ok(None) if self.abort.is_aborted() => return Err(Error::Aborted),
                Ok(None) => return Ok(()),
                Err(error) => return Err(read_error(error)),
            };

            match self.phase.handle_chunk(chunk, &self.scene) {
                Ok(Progress::SceneReady) => {
                    tracing::info!("scene description applied");
                    if self.events.try_send(SceneEvent::Ready).is_err() {
                        tracing::debug!("scene event receiver is gone");
                    }
                }
                Ok(Progress::Applied) => {}
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed chunk");
                }
            }
        }
    }

    fn emit(&self, event: SceneEvent) {
        if self.events.try_send(event).is_err() {
            tracing::debug!("scene event receiver is gone");
        }
    }
}

#[cold]
fn read_error(error: io::Error) -> Error {
    match error.kind() {
        // keep the message of a fault that only looks like an abort
        io::ErrorKind::ConnectionAborted => Error::new_io(error),
        _ => Error::from(error),
    }
}

/// A synchronizer running on its own thread.
#[derive(Debug)]
pub struct SyncHandle<W> {
    pub abort: AbortHandle,
    pub events: Receiver<SceneEvent>,
    pub requests: RequestSender<W>,
    pub join: JoinHandle<()>,
}

impl<W> SyncHandle<W> {
    /// Aborts the synchronizer and waits for its thread to finish.
    pub fn shutdown(self) {
        self.abort.abort();
        if self.join.join().is_err() {
            tracing::error!("synchronizer thread panicked");
        }
    }
}

/// Splits `transport` and starts a synchronizer for it on a new thread.
pub fn spawn<T: Transport>(transport: T, scene: SharedScene) -> Result<SyncHandle<T::Writer>> {
    let (reader, writer, interrupt) = transport.split()?;

    let abort = AbortHandle::new(interrupt);
    let (sender, receiver) = async_channel::unbounded();
    let synchronizer = Synchronizer::new(reader, scene, abort.clone(), sender);

    let join = thread::Builder::new()
        .name("ssr-sync".into())
        .spawn(move || synchronizer.run())?;

    Ok(SyncHandle {
        abort,
        events: receiver,
        requests: RequestSender::new(writer),
        join,
    })
}
