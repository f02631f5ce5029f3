use ssr_api::{SourceModel, SpeakerModel, TransportState};
use ssr_scene::{Entity, SharedScene, Vec2};

use crate::description::{DescriptionHandler, FIRST_SYNTHESIZED_ID};
use crate::phase::{Phase, Progress};
use crate::update::UpdateHandler;

const DESCRIPTION: &str = r#"<update>
    <source id="1" name="Vocals" model="point" volume="-3" mute="false">
        <position x="1" y="2"/>
        <orientation azimuth="90"/>
    </source>
    <source id="2" name="Drums" model="plane">
        <position x="-1.5" y="0.5" fixed="true"/>
    </source>
    <loudspeaker model="subwoofer">
        <position x="0" y="3"/>
        <orientation azimuth="-90"/>
    </loudspeaker>
    <reference>
        <position x="0.5" y="0.25"/>
        <orientation azimuth="45"/>
    </reference>
    <volume>-6</volume>
    <transport>start</transport>
</update>"#;

fn described() -> SharedScene {
    let scene = SharedScene::new();
    let mut handler = DescriptionHandler::new();
    assert!(handler.handle_chunk(DESCRIPTION.as_bytes(), &scene).unwrap());
    scene
}

#[test]
fn description_builds_scene() {
    let scene = described();
    let scene = scene.lock();

    assert_eq!(scene.num_sources(), 2);
    let vocals = scene.source("1").unwrap();
    assert_eq!(vocals.name(), "Vocals");
    assert_eq!(vocals.volume(), -3.0);
    assert_eq!(vocals.position(), Vec2::new(1.0, 2.0));
    assert_eq!(vocals.azimuth(), 90.0);

    let drums = scene.source_at(1).unwrap();
    assert_eq!(drums.id(), "2");
    assert_eq!(drums.model(), SourceModel::Plane);
    assert!(drums.is_position_fixed());

    assert_eq!(scene.loudspeakers().len(), 1);
    let speaker = scene.loudspeaker_at(0).unwrap();
    assert_eq!(speaker.model(), SpeakerModel::Subwoofer);
    assert_eq!(speaker.azimuth(), 270.0);

    let reference = scene.reference().unwrap();
    assert_eq!(reference.position(), Vec2::new(0.5, 0.25));
    assert_eq!(reference.azimuth(), 45.0);

    assert_eq!(scene.volume(), -6.0);
    assert_eq!(scene.transport_state(), TransportState::Playing);
}

#[test]
fn description_twice_does_not_duplicate() {
    let scene = SharedScene::new();
    let mut handler = DescriptionHandler::new();
    assert!(handler.handle_chunk(DESCRIPTION.as_bytes(), &scene).unwrap());
    assert!(handler.handle_chunk(DESCRIPTION.as_bytes(), &scene).unwrap());

    let scene = scene.lock();
    assert_eq!(scene.num_sources(), 2);
    assert_eq!(scene.loudspeakers().len(), 1);
}

#[test]
fn description_waits_for_update_root() {
    let scene = SharedScene::new();
    let mut handler = DescriptionHandler::new();

    let done = handler
        .handle_chunk(br#"<hello><source id="9"/></hello>"#, &scene)
        .unwrap();
    assert!(!done);
    assert!(!handler.received());
    assert_eq!(scene.lock().num_sources(), 0);

    assert!(handler.handle_chunk(b"<update/>", &scene).unwrap());
    assert!(handler.received());
}

#[test]
fn missing_ids_are_synthesized() {
    let scene = SharedScene::new();
    let mut handler = DescriptionHandler::new();
    let chunk = format!(
        r#"<update><source id="{FIRST_SYNTHESIZED_ID}"/><source name="a"/><source name="b"/></update>"#
    );
    handler.handle_chunk(chunk.as_bytes(), &scene).unwrap();

    let scene = scene.lock();
    let ids: Vec<_> = scene.sources().iter().map(|s| s.id().to_owned()).collect();
    assert_eq!(ids, ["100", "101", "102"]);
    assert_eq!(scene.source("101").unwrap().name(), "a");
}

#[test]
fn updates_raise_consumer_flags() {
    let scene = described();
    {
        let mut scene = scene.lock();
        let vocals = scene.source_mut("1").unwrap();
        vocals.take_position_changed();
        vocals.take_azimuth_changed();
    }

    UpdateHandler::new()
        .handle_chunk(
            br#"<update><source id="1"><position x="4" y="4"/></source></update>"#,
            &scene,
        )
        .unwrap();

    let mut scene = scene.lock();
    let vocals = scene.source_mut("1").unwrap();
    assert!(vocals.take_position_changed());
    assert!(!vocals.take_position_changed());
    assert!(!vocals.take_azimuth_changed());
}

#[test]
fn bad_entity_in_text_is_skipped() {
    let scene = SharedScene::new();
    let mut handler = DescriptionHandler::new();
    let chunk = br#"<update><volume>&bogus;</volume><source id="1" name="a"/><transport>start</transport></update>"#;

    assert!(handler.handle_chunk(chunk, &scene).unwrap());

    let scene = scene.lock();
    assert_eq!(scene.num_sources(), 1);
    assert_eq!(scene.volume(), 0.0);
    assert_eq!(scene.transport_state(), TransportState::Playing);
}

#[test]
fn malformed_values_keep_previous() {
    let scene = described();
    UpdateHandler::new()
        .handle_chunk(
            br#"<update><source id="1" volume="loud"><position x="nan?" y="1"/><orientation azimuth=""/></source><scene volume="x"/></update>"#,
            &scene,
        )
        .unwrap();

    let scene = scene.lock();
    let vocals = scene.source("1").unwrap();
    assert_eq!(vocals.volume(), -3.0);
    assert_eq!(vocals.position(), Vec2::new(1.0, 2.0));
    assert_eq!(vocals.azimuth(), 90.0);
    assert_eq!(scene.volume(), -6.0);
}

#[test]
fn update_applies_changes() {
    let scene = described();
    {
        let mut scene = scene.lock();
        scene.take_volume_changed();
        scene.take_transport_changed();
        scene.source_mut("2").unwrap().take_position_changed();
    }

    UpdateHandler::new()
        .handle_chunk(
            concat!(
                r#"<update><source id="2" mute="true" level="0"><position x="4" y="5"/></source>"#,
                r#"<reference><orientation azimuth="370"/></reference>"#,
                r#"<scene volume="-20"/><state transport="stop"/></update>"#
            )
            .as_bytes(),
            &scene,
        )
        .unwrap();

    let mut scene = scene.lock();
    let drums = scene.source_mut("2").unwrap();
    assert!(drums.is_muted());
    assert_eq!(drums.level(), 0.0);
    assert_eq!(drums.position(), Vec2::new(4.0, 5.0));
    assert!(drums.take_position_changed());

    assert_eq!(scene.reference().unwrap().azimuth(), 10.0);
    assert_eq!(scene.volume(), -20.0);
    assert!(scene.take_volume_changed());
    assert_eq!(scene.transport_state(), TransportState::Paused);
    assert!(scene.take_transport_changed());
}

#[test]
fn unknown_source_is_ignored() {
    let scene = described();
    let before: Vec<_> = scene.lock().sources().to_vec();

    UpdateHandler::new()
        .handle_chunk(
            br#"<update><source id="42" mute="true"><position x="9" y="9"/></source><bogus/></update>"#,
            &scene,
        )
        .unwrap();

    assert_eq!(scene.lock().sources(), &before[..]);
}

#[test]
fn reference_created_by_update() {
    let scene = SharedScene::new();
    UpdateHandler::new()
        .handle_chunk(br#"<update><reference><position x="1" y="1"/></reference></update>"#, &scene)
        .unwrap();

    assert_eq!(scene.lock().reference().unwrap().position(), Vec2::ONE);
}

#[test]
fn malformed_chunk_is_an_error() {
    let scene = described();
    let result = UpdateHandler::new().handle_chunk(b"<update><source id=\"1\"></update>", &scene);
    assert!(result.is_err());
}

#[test]
fn phase_switches_once() {
    let scene = SharedScene::new();
    let mut phase = Phase::new();
    assert!(!phase.is_update());

    assert_eq!(
        phase.handle_chunk(b"<update><source id=\"1\"/></update>", &scene).unwrap(),
        Progress::SceneReady
    );
    assert!(phase.is_update());

    assert_eq!(
        phase.handle_chunk(b"<update><source id=\"7\"/></update>", &scene).unwrap(),
        Progress::Applied
    );
    assert_eq!(scene.lock().num_sources(), 1);
}
