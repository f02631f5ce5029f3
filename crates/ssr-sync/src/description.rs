use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use ssr_api::Result;
use ssr_scene::{Loudspeaker, Reference, SharedScene, SoundSource};

use crate::attrs;

/// First id handed to a source the server sent without one.
pub const FIRST_SYNTHESIZED_ID: u64 = 100;

/// Builds a fresh scene from the server's full scene description.
///
/// New sources and loudspeakers are assembled outside the scene lock and
/// attached when their element closes.
#[derive(Debug)]
pub struct DescriptionHandler {
    next_id: u64,
    received: bool,
}

#[derive(Debug)]
enum Pending {
    None,
    Source(SoundSource),
    Loudspeaker(Loudspeaker),
    Reference,
    Volume,
    Transport,
}

impl DescriptionHandler {
    pub fn new() -> DescriptionHandler {
        DescriptionHandler {
            next_id: FIRST_SYNTHESIZED_ID,
            received: false,
        }
    }

    /// Whether a complete description has been applied.
    pub fn received(&self) -> bool {
        self.received
    }

    /// Applies one chunk. Returns `true` once the chunk completed a
    /// description.
    pub fn handle_chunk(&mut self, chunk: &[u8], scene: &SharedScene) -> Result<bool> {
        let mut reader = Reader::from_reader(chunk);
        reader.trim_text(true);

        let mut parse = ChunkParse {
            root: Root::Expected,
            pending: Pending::None,
        };

        loop {
            match reader.read_event()? {
                Event::Start(element) => self.start(&mut parse, &element, scene),
                Event::Empty(element) => {
                    self.start(&mut parse, &element, scene);
                    self.end(&mut parse, element.local_name().as_ref(), scene);
                }
                Event::End(element) => self.end(&mut parse, element.local_name().as_ref(), scene),
                Event::Text(text) => match text.unescape() {
                    Ok(text) => parse.text(&text, scene),
                    Err(error) => tracing::debug!(%error, "skipping malformed text"),
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if parse.root == Root::Closed {
            tracing::debug!(sources = scene.lock().num_sources(), "scene description received");
            self.received = true;
            return Ok(true);
        }

        Ok(false)
    }

    fn start(&mut self, parse: &mut ChunkParse, element: &BytesStart<'_>, scene: &SharedScene) {
        let name = element.local_name();
        let name = name.as_ref();

        match parse.root {
            Root::Expected => {
                if name == attrs::UPDATE {
                    tracing::debug!("creating new audio scene");
                    scene.lock().reset();
                    parse.root = Root::Open;
                } else {
                    tracing::debug!(root = %String::from_utf8_lossy(name), "outer element is not an update");
                    parse.root = Root::Ignored;
                }
                return;
            }
            Root::Open => {}
            Root::Ignored | Root::Closed => return,
        }

        if let Pending::None = parse.pending {
            match self.open(name, element, scene) {
                Some(pending) => parse.pending = pending,
                None => {
                    tracing::debug!(element = %String::from_utf8_lossy(name), "unhandled element")
                }
            }
            return;
        }

        let handled = match &mut parse.pending {
            Pending::Source(source) => attrs::apply_child(source, name, element),
            Pending::Loudspeaker(speaker) => attrs::apply_child(speaker, name, element),
            Pending::Reference => {
                attrs::apply_child(scene.lock().reference_or_default(), name, element)
            }
            Pending::None | Pending::Volume | Pending::Transport => false,
        };

        if !handled {
            tracing::debug!(element = %String::from_utf8_lossy(name), "unhandled element");
        }
    }

    fn open(&mut self, name: &[u8], element: &BytesStart<'_>, scene: &SharedScene) -> Option<Pending> {
        let pending = match name {
            attrs::SOURCE => {
                let id = match attrs::get(element, "id") {
                    Some(id) => id,
                    None => self.synthesize_id(scene),
                };
                let mut source = SoundSource::new(id);
                attrs::apply_source(&mut source, element);
                Pending::Source(source)
            }
            attrs::LOUDSPEAKER => {
                let mut speaker = Loudspeaker::new();
                attrs::apply_loudspeaker(&mut speaker, element);
                Pending::Loudspeaker(speaker)
            }
            attrs::REFERENCE => {
                scene.lock().set_reference(Reference::new());
                Pending::Reference
            }
            attrs::VOLUME => Pending::Volume,
            attrs::TRANSPORT => Pending::Transport,
            _ => return None,
        };

        Some(pending)
    }

    fn end(&self, parse: &mut ChunkParse, name: &[u8], scene: &SharedScene) {
        if parse.root != Root::Open {
            return;
        }

        let pending = std::mem::replace(&mut parse.pending, Pending::None);
        match (pending, name) {
            (Pending::Source(source), attrs::SOURCE) => {
                scene.lock().add_source(source);
            }
            (Pending::Loudspeaker(speaker), attrs::LOUDSPEAKER) => {
                scene.lock().add_loudspeaker(speaker);
            }
            (Pending::Reference, attrs::REFERENCE)
            | (Pending::Volume, attrs::VOLUME)
            | (Pending::Transport, attrs::TRANSPORT) => {}
            (Pending::None, attrs::UPDATE) => parse.root = Root::Closed,
            (pending, _) => parse.pending = pending,
        }
    }

    fn synthesize_id(&mut self, scene: &SharedScene) -> String {
        let scene = scene.lock();
        loop {
            let id = self.next_id.to_string();
            self.next_id += 1;
            if !scene.contains_source(&id) {
                return id;
            }
        }
    }
}

impl Default for DescriptionHandler {
    fn default() -> DescriptionHandler {
        DescriptionHandler::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Expected,
    Open,
    Ignored,
    Closed,
}

#[derive(Debug)]
struct ChunkParse {
    root: Root,
    pending: Pending,
}

impl ChunkParse {
    fn text(&self, text: &str, scene: &SharedScene) {
        if self.root != Root::Open {
            return;
        }

        match self.pending {
            Pending::Volume => attrs::apply_volume(&mut scene.lock(), text),
            Pending::Transport => attrs::apply_transport(&mut scene.lock(), text),
            _ => {}
        }
    }
}
