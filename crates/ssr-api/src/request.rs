use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use smallvec::SmallVec;

use crate::model::TransportCommand;
use crate::Result;

/// A single outbound `request` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    items: SmallVec<[RequestItem; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestItem {
    SourceMute {
        id: String,
        muted: bool,
    },
    SourceMove {
        id: String,
        x: f32,
        y: f32,
        azimuth: Option<f32>,
    },
    SceneVolume {
        volume: f32,
    },
    Transport {
        command: TransportCommand,
    },
    ReferenceAzimuth {
        azimuth: f32,
    },
}

impl Request {
    pub fn new() -> Request {
        Request::default()
    }

    pub fn single(item: RequestItem) -> Request {
        let mut request = Request::new();
        request.push(item);
        request
    }

    pub fn push(&mut self, item: RequestItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[RequestItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes the request without the frame delimiter.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::with_capacity(128));
        writer.write_event(Event::Start(BytesStart::new("request")))?;

        for item in &self.items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("request")))?;
        Ok(writer.into_inner())
    }
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &RequestItem) -> Result<()> {
    match item {
        RequestItem::SourceMute { id, muted } => {
            let source = BytesStart::new("source")
                .with_attributes([("id", id.as_str()), ("mute", bool_str(*muted))]);
            writer.write_event(Event::Empty(source))?;
        }

        RequestItem::SourceMove { id, x, y, azimuth } => {
            let source = BytesStart::new("source").with_attributes([("id", id.as_str())]);
            writer.write_event(Event::Start(source))?;

            if let Some(azimuth) = azimuth {
                let azimuth = azimuth.to_string();
                let orientation =
                    BytesStart::new("orientation").with_attributes([("azimuth", azimuth.as_str())]);
                writer.write_event(Event::Empty(orientation))?;
            }

            let (x, y) = (x.to_string(), y.to_string());
            let position =
                BytesStart::new("position").with_attributes([("x", x.as_str()), ("y", y.as_str())]);
            writer.write_event(Event::Empty(position))?;

            writer.write_event(Event::End(BytesEnd::new("source")))?;
        }

        RequestItem::SceneVolume { volume } => {
            let volume = volume.to_string();
            let scene = BytesStart::new("scene").with_attributes([("volume", volume.as_str())]);
            writer.write_event(Event::Empty(scene))?;
        }

        RequestItem::Transport { command } => {
            let state =
                BytesStart::new("state").with_attributes([("transport", command.as_str())]);
            writer.write_event(Event::Empty(state))?;
        }

        RequestItem::ReferenceAzimuth { azimuth } => {
            writer.write_event(Event::Start(BytesStart::new("reference")))?;
            let azimuth = azimuth.to_string();
            let orientation =
                BytesStart::new("orientation").with_attributes([("azimuth", azimuth.as_str())]);
            writer.write_event(Event::Empty(orientation))?;
            writer.write_event(Event::End(BytesEnd::new("reference")))?;
        }
    }

    Ok(())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
