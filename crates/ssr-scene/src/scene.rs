use glam::Vec2;
use smallvec::SmallVec;
use ssr_api::TransportState;
use ssr_core::collections::HashMap;

use crate::entity::Entity;
use crate::flag::DirtyFlag;
use crate::loudspeaker::Loudspeaker;
use crate::reference::Reference;
use crate::source::SoundSource;

#[derive(Debug)]
pub struct AudioScene {
    sources: Vec<SoundSource>,
    source_index: HashMap<String, usize>,
    selected: SmallVec<[usize; 8]>,
    loudspeakers: Vec<Loudspeaker>,
    reference: Option<Reference>,
    volume: f32,
    volume_flag: DirtyFlag,
    transport: TransportState,
    transport_flag: DirtyFlag,
}

impl AudioScene {
    pub fn new() -> AudioScene {
        AudioScene {
            sources: Vec::new(),
            source_index: HashMap::default(),
            selected: SmallVec::new(),
            loudspeakers: Vec::new(),
            reference: None,
            volume: 0.0,
            volume_flag: DirtyFlag::dirty(),
            transport: TransportState::Paused,
            transport_flag: DirtyFlag::dirty(),
        }
    }

    /// Appends a source and returns its index.
    ///
    /// A source whose id is already present replaces the existing entry in
    /// place and inherits its selection state, so ids stay unique.
    pub fn add_source(&mut self, mut source: SoundSource) -> usize {
        if let Some(&index) = self.source_index.get(source.id()) {
            tracing::debug!(id = source.id(), "replacing source with duplicate id");
            let selected = self.sources[index].is_selected();
            source.state_mut().set_selected(selected);
            self.sources[index] = source;
            return index;
        }

        let index = self.sources.len();
        self.source_index.insert(source.id().to_owned(), index);
        self.sources.push(source);
        index
    }

    pub fn contains_source(&self, id: &str) -> bool {
        self.source_index.contains_key(id)
    }

    pub fn source_index(&self, id: &str) -> Option<usize> {
        self.source_index.get(id).copied()
    }

    pub fn source(&self, id: &str) -> Option<&SoundSource> {
        self.source_index(id).map(|index| &self.sources[index])
    }

    pub fn source_mut(&mut self, id: &str) -> Option<&mut SoundSource> {
        self.source_index(id).map(|index| &mut self.sources[index])
    }

    pub fn source_at(&self, index: usize) -> Option<&SoundSource> {
        self.sources.get(index)
    }

    pub fn source_at_mut(&mut self, index: usize) -> Option<&mut SoundSource> {
        self.sources.get_mut(index)
    }

    pub fn sources(&self) -> &[SoundSource] {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut [SoundSource] {
        &mut self.sources
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn add_loudspeaker(&mut self, loudspeaker: Loudspeaker) -> usize {
        self.loudspeakers.push(loudspeaker);
        self.loudspeakers.len() - 1
    }

    pub fn loudspeaker_at(&self, index: usize) -> Option<&Loudspeaker> {
        self.loudspeakers.get(index)
    }

    pub fn loudspeakers(&self) -> &[Loudspeaker] {
        &self.loudspeakers
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    pub fn reference_mut(&mut self) -> Option<&mut Reference> {
        self.reference.as_mut()
    }

    pub fn set_reference(&mut self, reference: Reference) -> &mut Reference {
        self.reference.insert(reference)
    }

    pub fn reference_or_default(&mut self) -> &mut Reference {
        self.reference.get_or_insert_with(Reference::new)
    }

    /// Scene master volume in dB.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.volume_flag.set();
    }

    pub fn take_volume_changed(&mut self) -> bool {
        self.volume_flag.take()
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport
    }

    pub fn set_transport_state(&mut self, state: TransportState) {
        self.transport = state;
        self.transport_flag.set();
    }

    pub fn take_transport_changed(&mut self) -> bool {
        self.transport_flag.take()
    }

    pub fn select(&mut self, index: usize) -> bool {
        let Some(source) = self.sources.get_mut(index) else {
            return false;
        };

        if !self.selected.contains(&index) {
            self.selected.push(index);
        }
        source.state_mut().set_selected(true);
        true
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        let Some(source) = self.sources.get_mut(index) else {
            return false;
        };

        self.selected.retain(|v| *v != index);
        source.state_mut().set_selected(false);
        true
    }

    pub fn select_all(&mut self) {
        self.selected.clear();
        for (index, source) in self.sources.iter_mut().enumerate() {
            source.state_mut().set_selected(true);
            self.selected.push(index);
        }
    }

    pub fn deselect_all(&mut self) {
        for &index in &self.selected {
            self.sources[index].state_mut().set_selected(false);
        }
        self.selected.clear();
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Indices of selected sources, in selection order.
    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_sources(&self) -> impl Iterator<Item = &SoundSource> + '_ {
        self.selected.iter().map(|&index| &self.sources[index])
    }

    /// Index of the source closest to `point`, which is given in scene
    /// coordinates.
    pub fn nearest_source(&self, point: Vec2) -> Option<usize> {
        let mut best = None;
        let mut best_distance = f32::INFINITY;

        for (index, source) in self.sources.iter().enumerate() {
            let distance = source.position().distance(point);
            if distance < best_distance {
                best_distance = distance;
                best = Some(index);
            }
        }

        best
    }

    /// Drops every entity. Volume and transport state are kept.
    pub fn reset(&mut self) {
        self.sources.clear();
        self.source_index.clear();
        self.selected.clear();
        self.loudspeakers.clear();
        self.reference = None;
    }
}

impl Default for AudioScene {
    fn default() -> AudioScene {
        AudioScene::new()
    }
}
