use quick_xml::events::BytesStart;
use ssr_api::{SourceModel, SpeakerModel, TransportState};
use ssr_scene::{AudioScene, Entity, Loudspeaker, SoundSource, Vec2};

pub const UPDATE: &[u8] = b"update";
pub const SOURCE: &[u8] = b"source";
pub const LOUDSPEAKER: &[u8] = b"loudspeaker";
pub const REFERENCE: &[u8] = b"reference";
pub const POSITION: &[u8] = b"position";
pub const ORIENTATION: &[u8] = b"orientation";
pub const VOLUME: &[u8] = b"volume";
pub const TRANSPORT: &[u8] = b"transport";
pub const SCENE: &[u8] = b"scene";
pub const STATE: &[u8] = b"state";

/// Unescaped value of the attribute `name`, if present and well-formed.
pub fn get(element: &BytesStart<'_>, name: &str) -> Option<String> {
    let attr = match element.try_get_attribute(name) {
        Ok(attr) => attr?,
        Err(error) => {
            tracing::debug!(%error, name, "malformed attribute");
            return None;
        }
    };

    match attr.unescape_value() {
        Ok(value) => Some(value.into_owned()),
        Err(error) => {
            tracing::debug!(%error, name, "malformed attribute value");
            None
        }
    }
}

/// Parses a finite float. Anything else yields `None`, leaving the caller's
/// previous value in place.
pub fn parse_f32(value: &str) -> Option<f32> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::debug!(value, "ignoring malformed number");
            None
        }
    }
}

pub fn get_f32(element: &BytesStart<'_>, name: &str) -> Option<f32> {
    get(element, name).and_then(|value| parse_f32(&value))
}

/// Only the literal `true` counts as true.
pub fn get_bool(element: &BytesStart<'_>, name: &str) -> Option<bool> {
    get(element, name).map(|value| value == "true")
}

pub fn apply_position<E: Entity + ?Sized>(entity: &mut E, element: &BytesStart<'_>) {
    if let (Some(x), Some(y)) = (get_f32(element, "x"), get_f32(element, "y")) {
        entity.set_position(Vec2::new(x, y));
    }

    if let Some(fixed) = get_bool(element, "fixed") {
        entity.set_position_fixed(fixed);
    }
}

pub fn apply_orientation<E: Entity + ?Sized>(entity: &mut E, element: &BytesStart<'_>) {
    if let Some(azimuth) = get_f32(element, "azimuth") {
        entity.set_azimuth(azimuth);
    }
}

/// Applies a `position` or `orientation` child element. Returns `false` for
/// any other element.
pub fn apply_child<E: Entity + ?Sized>(entity: &mut E, name: &[u8], element: &BytesStart<'_>) -> bool {
    match name {
        POSITION => apply_position(entity, element),
        ORIENTATION => apply_orientation(entity, element),
        _ => return false,
    }
    true
}

pub fn apply_source(source: &mut SoundSource, element: &BytesStart<'_>) {
    if let Some(name) = get(element, "name") {
        source.set_name(name);
    }

    if let Some(model) = get(element, "model") {
        match model.parse::<SourceModel>() {
            Ok(model) => source.set_model(model),
            Err(()) => tracing::debug!(%model, "unknown source model"),
        }
    }

    if let Some(muted) = get_bool(element, "mute") {
        source.set_muted(muted);
    }

    if let Some(file) = get(element, "file") {
        source.set_audio_file(Some(file));
    }

    if let Some(volume) = get_f32(element, "volume") {
        source.set_volume(volume);
    }

    if let Some(level) = get_f32(element, "level") {
        source.set_level(level);
    }
}

pub fn apply_loudspeaker(loudspeaker: &mut Loudspeaker, element: &BytesStart<'_>) {
    if let Some(model) = get(element, "model") {
        match model.parse::<SpeakerModel>() {
            Ok(model) => loudspeaker.set_model(model),
            Err(()) => tracing::debug!(%model, "unknown loudspeaker model"),
        }
    }
}

pub fn apply_volume(scene: &mut AudioScene, value: &str) {
    if let Some(volume) = parse_f32(value) {
        scene.set_volume(volume);
    }
}

pub fn apply_transport(scene: &mut AudioScene, value: &str) {
    match TransportState::from_protocol(value) {
        Some(state) => {
            tracing::debug!(?state, "transport state");
            scene.set_transport_state(state);
        }
        None => tracing::debug!(value, "unknown transport state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(xml: &str) -> BytesStart<'_> {
        let inner = xml
            .trim_start_matches('<')
            .trim_end_matches("/>")
            .trim_end_matches('>');
        let name_len = inner.find(' ').unwrap_or(inner.len());
        BytesStart::from_content(inner, name_len)
    }

    #[test]
    fn parses_numbers_leniently() {
        assert_eq!(parse_f32(" 1.5 "), Some(1.5));
        assert_eq!(parse_f32("-2"), Some(-2.0));
        assert_eq!(parse_f32("abc"), None);
        assert_eq!(parse_f32(""), None);
        assert_eq!(parse_f32("NaN"), None);
        assert_eq!(parse_f32("inf"), None);
    }

    #[test]
    fn reads_escaped_attributes() {
        let e = element(r#"<source id="a&amp;b" mute="yes"/>"#);
        assert_eq!(get(&e, "id").as_deref(), Some("a&b"));
        assert_eq!(get(&e, "name"), None);
        assert_eq!(get_bool(&e, "mute"), Some(false));
    }

    #[test]
    fn position_needs_both_coordinates() {
        let mut source = SoundSource::new("1");
        source.set_position(Vec2::new(3.0, 4.0));

        apply_position(&mut source, &element(r#"<position x="1" y="oops"/>"#));
        assert_eq!(source.position(), Vec2::new(3.0, 4.0));

        apply_position(&mut source, &element(r#"<position x="1" y="2" fixed="true"/>"#));
        assert_eq!(source.position(), Vec2::new(1.0, 2.0));
        assert!(source.is_position_fixed());
    }

    #[test]
    fn source_attributes() {
        let mut source = SoundSource::new("1");
        apply_source(
            &mut source,
            &element(r#"<source name="Guitar" model="plane" mute="true" volume="-6" level="x"/>"#),
        );

        assert_eq!(source.name(), "Guitar");
        assert_eq!(source.model(), SourceModel::Plane);
        assert!(source.is_muted());
        assert_eq!(source.volume(), -6.0);
        assert_eq!(source.level(), ssr_scene::LEVEL_FLOOR_DB);
    }

    #[test]
    fn scene_values() {
        let mut scene = AudioScene::new();
        apply_volume(&mut scene, "-12.5");
        apply_volume(&mut scene, "loud");
        assert_eq!(scene.volume(), -12.5);

        apply_transport(&mut scene, "start");
        assert_eq!(scene.transport_state(), TransportState::Playing);
        apply_transport(&mut scene, "pause");
        assert_eq!(scene.transport_state(), TransportState::Playing);
    }
}
