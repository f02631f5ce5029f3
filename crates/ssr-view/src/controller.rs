use std::sync::Arc;

use glam::Vec2;
use smallvec::SmallVec;
use ssr_api::{Request, RequestItem, Result, SceneEvent, SourceModel, TransportCommand, TransportState};
use ssr_core::{Clock, RealTime};
use ssr_rpc::RequestSink;
use ssr_scene::{Entity, SharedScene, LEVEL_CEILING_DB, LEVEL_FLOOR_DB};

use crate::config::{Orientation, ViewConfig};
use crate::draw::DrawList;
use crate::view::SceneView;

/// Discrete input events, positions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A finger touched the screen. Starts every other gesture.
    Down { position: Vec2 },
    /// The finger moved; `first` is where it went down.
    Drag { first: Vec2, current: Vec2 },
    /// The finger left the screen while moving, velocity in pixels per
    /// second.
    Fling { velocity: Vec2 },
    Tap { position: Vec2 },
    DoubleTap { position: Vec2 },
}

/// What a consumer tick found.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// New scene volume, if it changed since the last tick.
    pub volume: Option<f32>,
    /// New transport state, if it changed since the last tick.
    pub transport: Option<TransportState>,
    pub viewport_changed: bool,
    pub draw_list: DrawList,
}

/// The consumer side: turns ticks and user input into view updates and
/// requests to the server.
#[derive(Debug)]
pub struct Controller<S> {
    view: SceneView,
    scene: SharedScene,
    sink: S,
    clock: Arc<dyn Clock>,
    touched: Option<usize>,
    scrolling: bool,
    first_scroll: Vec2,
    saved_translation: Vec2,
    last_send: Option<RealTime>,
    ready: bool,
}

impl<S: RequestSink> Controller<S> {
    pub fn new(config: ViewConfig, scene: SharedScene, sink: S, clock: Arc<dyn Clock>) -> Controller<S> {
        Controller {
            view: SceneView::new(config, clock.clone()),
            scene,
            sink,
            clock,
            touched: None,
            scrolling: false,
            first_scroll: Vec2::ZERO,
            saved_translation: Vec2::ZERO,
            last_send: None,
            ready: false,
        }
    }

    pub fn view(&self) -> &SceneView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut SceneView {
        &mut self.view
    }

    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether the initial scene description has arrived.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Index of the source the current gesture started on.
    pub fn touched(&self) -> Option<usize> {
        self.touched
    }

    pub fn on_scene_event(&mut self, event: &SceneEvent) {
        match event {
            SceneEvent::Ready => {
                tracing::info!("scene ready");
                self.ready = true;
                let mut scene = self.scene.lock();
                self.view.fit_to_scene(&mut scene);
            }
            SceneEvent::Disconnected => {
                tracing::info!("disconnected from server");
                self.ready = false;
            }
            SceneEvent::Error { message } => {
                tracing::error!(error = %message, "connection lost");
                self.ready = false;
            }
        }
    }

    /// One consumer cycle: drains the scene's change flags, steps the view
    /// animations and builds the frame, all under a single lock.
    pub fn tick(&mut self) -> TickReport {
        let mut scene = self.scene.lock();

        let volume = scene.take_volume_changed().then(|| scene.volume());
        let transport = scene
            .take_transport_changed()
            .then(|| scene.transport_state());

        self.view.advance(&mut scene);
        let viewport_changed = self.view.take_viewport_changed();
        let draw_list = self.view.draw_list(&mut scene);

        TickReport {
            volume,
            transport,
            viewport_changed,
            draw_list,
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.view.resize(size);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        self.view.set_orientation(orientation)
    }

    pub fn zoom_in(&mut self) {
        let step = self.view.config().zoom_step;
        self.view.zoom(step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.view.config().zoom_step;
        self.view.zoom(1.0 / step);
    }

    pub fn fit_to_scene(&mut self) {
        let mut scene = self.scene.lock();
        self.view.fit_to_scene(&mut scene);
    }

    pub fn on_gesture(&mut self, gesture: Gesture) -> Result<()> {
        match gesture {
            Gesture::Down { position } => {
                self.down(position);
                Ok(())
            }
            Gesture::Drag { first, current } => self.drag(first, current),
            Gesture::Fling { velocity } => {
                if self.touched.is_none() {
                    let factor = self.view.config().fling_factor;
                    let pan = self.view.screen_to_pan(velocity * factor);
                    self.view.translate(pan);
                }
                Ok(())
            }
            Gesture::Tap { position } => {
                self.down(position);
                self.tap();
                Ok(())
            }
            Gesture::DoubleTap { position } => {
                self.down(position);
                self.double_tap()
            }
        }
    }

    pub fn play(&self) -> Result<()> {
        self.send_transport(TransportCommand::Start)
    }

    pub fn pause(&self) -> Result<()> {
        self.send_transport(TransportCommand::Stop)
    }

    pub fn rewind(&self) -> Result<()> {
        self.send_transport(TransportCommand::Rewind)
    }

    /// Requests a new scene volume in dB.
    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.sink
            .send(&Request::single(RequestItem::SceneVolume { volume }))
    }

    /// Reports the listener's head orientation in degrees.
    pub fn set_head_azimuth(&self, azimuth: f32) -> Result<()> {
        self.sink
            .send(&Request::single(RequestItem::ReferenceAzimuth { azimuth }))
    }

    fn send_transport(&self, command: TransportCommand) -> Result<()> {
        self.sink
            .send(&Request::single(RequestItem::Transport { command }))
    }

    fn down(&mut self, position: Vec2) {
        self.scrolling = false;
        let mut scene = self.scene.lock();
        self.touched = self.view.nearest_source(&mut scene, position);
    }

    fn tap(&mut self) {
        let mut scene = self.scene.lock();
        match self.touched {
            Some(index) => {
                let selected = scene.source_at(index).is_some_and(|s| s.is_selected());
                if selected {
                    scene.deselect(index);
                } else {
                    scene.select(index);
                }
            }
            None if scene.has_selection() => scene.deselect_all(),
            None => scene.select_all(),
        }
    }

    fn double_tap(&mut self) -> Result<()> {
        let mut scene = self.scene.lock();
        let Some(index) = self.touched else {
            self.view.fit_to_scene(&mut scene);
            return Ok(());
        };
        let Some(touched) = scene.source_at(index) else {
            return Ok(());
        };

        let mut request = Request::new();
        if touched.is_selected() {
            for source in scene.selected_sources() {
                request.push(RequestItem::SourceMute {
                    id: source.id().to_owned(),
                    muted: !source.is_muted(),
                });
            }
        } else {
            request.push(RequestItem::SourceMute {
                id: touched.id().to_owned(),
                muted: !touched.is_muted(),
            });
        }

        drop(scene);
        self.sink.send(&request)
    }

    fn drag(&mut self, first: Vec2, current: Vec2) -> Result<()> {
        let Some(index) = self.touched else {
            self.pan(current);
            return Ok(());
        };

        let mut scene = self.scene.lock();
        let Some(selected) = scene.source_at(index).map(|s| s.is_selected()) else {
            self.touched = None;
            return Ok(());
        };

        if !selected {
            scene.deselect_all();
            scene.select(index);
        }

        self.view.sync_reference(&mut scene);
        let transforms = self.view.transforms();

        if !self.scrolling {
            self.scrolling = true;
            self.first_scroll = first;

            let indices: SmallVec<[usize; 8]> = scene.selected_indices().into();
            for index in indices {
                if let Some(source) = scene.source_at_mut(index) {
                    let screen = transforms.map_to_screen(source.position());
                    source.save_position(screen);
                }
            }
        }

        let now = self.clock.now();
        if let Some(last) = self.last_send {
            if now.saturating_sub(last) < self.view.config().drag_interval {
                return Ok(());
            }
        }
        self.last_send = Some(now);

        let reference_azimuth = scene.reference().map_or(0.0, |r| r.azimuth());
        let offset = current - self.first_scroll;

        let mut request = Request::new();
        for source in scene.selected_sources() {
            if source.is_position_fixed() {
                continue;
            }

            let point = transforms.screen_to_reference(source.saved_position() + offset);
            let azimuth = match source.model() {
                SourceModel::Plane => plane_wave_azimuth(point, reference_azimuth),
                SourceModel::Point => None,
            };
            let world = transforms.reference_to_world(point);

            request.push(RequestItem::SourceMove {
                id: source.id().to_owned(),
                x: world.x,
                y: world.y,
                azimuth,
            });
        }

        drop(scene);
        self.sink.send(&request)
    }

    fn pan(&mut self, current: Vec2) {
        if !self.scrolling {
            self.scrolling = true;
            self.first_scroll = current;
            self.saved_translation = self.view.translation();
        }

        let delta = self.view.screen_to_pan(current - self.first_scroll);
        self.view.set_translation(self.saved_translation + delta);
    }
}

/// Orientation of a plane wave at `point` (reference space) so that it
/// travels towards the reference.
pub fn plane_wave_azimuth(point: Vec2, reference_azimuth: f32) -> Option<f32> {
    let norm = point.length();
    if norm == 0.0 {
        return None;
    }

    let angle = (point.x / norm).clamp(-1.0, 1.0).acos().to_degrees();
    let angle = if point.y >= 0.0 { angle } else { -angle };
    Some(angle - 180.0 + reference_azimuth)
}

/// Maps a volume slider position in `[0, max]` to dB.
pub fn slider_to_db(progress: u32, max: u32) -> f32 {
    if max == 0 {
        return LEVEL_FLOOR_DB;
    }
    progress as f32 / max as f32 * (LEVEL_CEILING_DB - LEVEL_FLOOR_DB) + LEVEL_FLOOR_DB
}

pub fn db_to_slider(db: f32, max: u32) -> u32 {
    let position = (db - LEVEL_FLOOR_DB) / (LEVEL_CEILING_DB - LEVEL_FLOOR_DB) * max as f32;
    position.round().clamp(0.0, max as f32) as u32
}
