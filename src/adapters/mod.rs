//! Pooled reference adapters. Each one owns a fixed set of node records sized
//! from the entity's [`PoolSizes`]; a frame activates the first `n` records of
//! every pool and hides the rest.

pub mod scene;
pub mod canvas;

pub use canvas::CanvasAdapter;
pub use scene::SceneAdapter;

use nalgebra::Vector2;
use crate::runtime::model::PoolSizes;
use crate::runtime::pose::ObjectEntry;
use crate::shared_types::EntryKind;

/// A host-side child node: a pivot transform plus the child it carries.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode<S> {
    pub name: String,
    pub active: bool,
    pub sprite: Option<S>,
    /// Position of the pivot node in the parent's space.
    pub position: Vector2<f32>,
    /// Rotation of the pivot node in degrees.
    pub angle: f32,
    /// Position of the child relative to its pivot node.
    pub offset: Vector2<f32>,
    pub scale: Vector2<f32>,
    pub pivot: Vector2<f32>,
    pub size: Vector2<f32>,
    pub alpha: f32,
    /// Draw order among siblings.
    pub order: i32,
    /// Renderer sorting layer. Empty for adapters without layers.
    pub sorting_layer: String,
}

impl<S> Default for SceneNode<S> {
    fn default() -> Self {
        Self {
            name: String::new(),
            active: false,
            sprite: None,
            position: Vector2::zeros(),
            angle: 0.0,
            offset: Vector2::zeros(),
            scale: Vector2::new(1.0, 1.0),
            pivot: Vector2::new(0.5, 0.5),
            size: Vector2::zeros(),
            alpha: 1.0,
            order: 0,
            sorting_layer: String::new(),
        }
    }
}

impl<S> SceneNode<S> {
    fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name.clear();
            self.name.push_str(name);
        }
    }

    fn set_sorting_layer(&mut self, layer: &str) {
        if self.sorting_layer != layer {
            self.sorting_layer.clear();
            self.sorting_layer.push_str(layer);
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodePool<S> {
    nodes: Vec<SceneNode<S>>,
    cursor: usize,
}

impl<S> NodePool<S> {
    pub fn new(size: usize) -> Self {
        Self {
            nodes: (0..size).map(|_| SceneNode::default()).collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SceneNode<S>] {
        &self.nodes
    }

    pub fn active(&self) -> impl Iterator<Item = &SceneNode<S>> {
        self.nodes.iter().filter(|it| it.active)
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Hands out the next record of this frame, or `None` once the pool is
    /// exhausted.
    fn next_node(&mut self) -> Option<(usize, &mut SceneNode<S>)> {
        let index = self.cursor;
        let node = self.nodes.get_mut(index)?;
        self.cursor += 1;
        node.active = true;
        Some((index, node))
    }

    fn hide_rest(&mut self) {
        let start = self.cursor.min(self.nodes.len());
        for node in self.nodes[start..].iter_mut() {
            node.active = false;
            node.sprite = None;
        }
    }
}

/// A sound the adapter was asked to play, waiting for the host to drain it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedSound<A> {
    pub sound: A,
    pub volume: f32,
    pub panning: f32,
}

/// Pools and pending sounds shared by both adapters.
#[derive(Clone, Debug)]
pub struct NodePools<S, A> {
    pub sprites: NodePool<S>,
    pub boxes: NodePool<S>,
    pub points: NodePool<S>,
    sounds: Vec<PlayedSound<A>>,
}

impl<S, A> NodePools<S, A> {
    pub fn new(sizes: PoolSizes) -> Self {
        Self {
            sprites: NodePool::new(sizes.sprites),
            boxes: NodePool::new(sizes.boxes),
            points: NodePool::new(sizes.points),
            sounds: Vec::new(),
        }
    }

    fn rewind(&mut self) {
        self.sprites.rewind();
        self.boxes.rewind();
        self.points.rewind();
        self.sounds.clear();
    }

    fn hide_rest(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Sprite => self.sprites.hide_rest(),
            EntryKind::Box => self.boxes.hide_rest(),
            EntryKind::Point => self.points.hide_rest(),
            EntryKind::Sound => {}
        }
    }

    fn push_sound(&mut self, sound: A, volume: f32, panning: f32) {
        self.sounds.push(PlayedSound { sound, volume, panning });
    }

    /// Sounds played during the last frame, oldest first. Sounds a host does
    /// not drain before the next frame are dropped.
    pub fn drain_sounds(&mut self) -> std::vec::Drain<'_, PlayedSound<A>> {
        self.sounds.drain(..)
    }
}

const DEFAULT_PIVOT: f32 = 0.5;

/// Offset that moves a box's child node so the collider centre sits where
/// the box pivot says it should.
fn box_offset(entry: &ObjectEntry, width: f32, height: f32) -> Vector2<f32> {
    Vector2::new(
        (DEFAULT_PIVOT - entry.info.pivot_x) * width * entry.info.scale_x,
        (DEFAULT_PIVOT - entry.info.pivot_y) * height * entry.info.scale_y,
    )
}
