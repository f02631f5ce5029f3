use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use ssr_api::Result;
use ssr_scene::SharedScene;

use crate::attrs;

/// Applies incremental `update` documents to an existing scene.
///
/// The scene lock is taken once per element, never across a whole chunk.
#[derive(Debug, Default)]
pub struct UpdateHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    /// Index of the addressed source, `None` if its id is unknown.
    Source(Option<usize>),
    Reference,
}

#[derive(Debug)]
struct ChunkParse {
    in_update: bool,
    target: Target,
}

impl UpdateHandler {
    pub fn new() -> UpdateHandler {
        UpdateHandler
    }

    pub fn handle_chunk(&self, chunk: &[u8], scene: &SharedScene) -> Result<()> {
        let mut reader = Reader::from_reader(chunk);
        reader.trim_text(true);

        let mut parse = ChunkParse {
            in_update: false,
            target: Target::None,
        };

        loop {
            match reader.read_event()? {
                Event::Start(element) => start(&mut parse, &element, scene),
                Event::Empty(element) => {
                    start(&mut parse, &element, scene);
                    end(&mut parse, element.local_name().as_ref());
                }
                Event::End(element) => end(&mut parse, element.local_name().as_ref()),
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(())
    }
}

fn start(parse: &mut ChunkParse, element: &BytesStart<'_>, scene: &SharedScene) {
    let name = element.local_name();
    let name = name.as_ref();

    if !parse.in_update {
        if name == attrs::UPDATE {
            parse.in_update = true;
        } else {
            tracing::debug!(element = %String::from_utf8_lossy(name), "unhandled element");
        }
        return;
    }

    let handled = match parse.target {
        Target::Source(Some(index)) => {
            let mut scene = scene.lock();
            match scene.source_at_mut(index) {
                Some(source) => attrs::apply_child(source, name, element),
                None => false,
            }
        }
        // children of an unknown source
        Target::Source(None) => true,
        Target::Reference => {
            attrs::apply_child(scene.lock().reference_or_default(), name, element)
        }
        Target::None => match name {
            attrs::SOURCE => {
                parse.target = Target::Source(apply_source(element, scene));
                true
            }
            attrs::REFERENCE => {
                parse.target = Target::Reference;
                true
            }
            attrs::SCENE => {
                if let Some(volume) = attrs::get(element, "volume") {
                    attrs::apply_volume(&mut scene.lock(), &volume);
                }
                true
            }
            attrs::STATE => {
                if let Some(transport) = attrs::get(element, "transport") {
                    attrs::apply_transport(&mut scene.lock(), &transport);
                }
                true
            }
            _ => false,
        },
    };

    if !handled {
        tracing::debug!(element = %String::from_utf8_lossy(name), "unhandled element");
    }
}

fn apply_source(element: &BytesStart<'_>, scene: &SharedScene) -> Option<usize> {
    let Some(id) = attrs::get(element, "id") else {
        tracing::debug!("source update without id");
        return None;
    };

    let mut scene = scene.lock();
    let Some(index) = scene.source_index(&id) else {
        tracing::debug!(%id, "update for unknown source");
        return None;
    };

    if let Some(source) = scene.source_at_mut(index) {
        attrs::apply_source(source, element);
    }

    Some(index)
}

fn end(parse: &mut ChunkParse, name: &[u8]) {
    match name {
        attrs::SOURCE | attrs::REFERENCE => parse.target = Target::None,
        attrs::UPDATE => parse.in_update = false,
        _ => {}
    }
}
