use nalgebra::Vector2;
use crate::adapters::{box_offset, NodePools};
use crate::runtime::dispatch::FrameSink;
use crate::runtime::model::{PoolSizes, SoundKey};
use crate::runtime::pose::ObjectEntry;
use crate::shared_types::EntryKind;

/// UI canvas adapter. Everything stays in pixels and draw order is expressed
/// as a sibling index so several instances can share one canvas.
#[derive(Clone, Debug)]
pub struct CanvasAdapter<S, A> {
    pub pools: NodePools<S, A>,
    pub sorting_order: i32,
}

impl<S, A> CanvasAdapter<S, A> {
    pub fn new(sizes: PoolSizes) -> Self {
        Self {
            pools: NodePools::new(sizes),
            sorting_order: 0,
        }
    }
}

impl<S: Clone, A: Clone> FrameSink for CanvasAdapter<S, A> {
    type Sprite = S;
    type Sound = A;

    fn begin_frame(&mut self) {
        self.pools.rewind();
    }

    fn apply_sprite_transform(&mut self, sprite: &S, entry: &ObjectEntry) {
        let pool_len = self.pools.sprites.len() as i32;
        let sorting_order = self.sorting_order;
        if let Some((index, node)) = self.pools.sprites.next_node() {
            let info = &entry.info;
            node.set_name(entry.name);
            node.sprite = Some(sprite.clone());
            node.position = Vector2::new(info.x, info.y);
            node.angle = info.angle;
            node.scale = Vector2::new(info.scale_x, info.scale_y);
            node.pivot = Vector2::new(info.pivot_x, info.pivot_y);
            node.alpha = info.alpha;
            node.order = sorting_order * pool_len + index as i32;
        }
    }

    fn apply_box_transform(&mut self, entry: &ObjectEntry) {
        if let Some((_, node)) = self.pools.boxes.next_node() {
            let info = &entry.info;
            node.set_name(entry.name);
            node.size = Vector2::new(entry.width, entry.height);
            node.position = Vector2::new(info.x, info.y);
            node.angle = info.angle;
            node.offset = box_offset(entry, entry.width, entry.height);
            node.scale = Vector2::new(info.scale_x, info.scale_y);
        }
    }

    fn apply_point_transform(&mut self, entry: &ObjectEntry) {
        if let Some((_, node)) = self.pools.points.next_node() {
            node.set_name(entry.name);
            node.position = Vector2::new(entry.info.x, entry.info.y);
        }
    }

    fn play_sound(&mut self, sound: &A, cue: &SoundKey) {
        self.pools.push_sound(sound.clone(), cue.volume, cue.panning);
    }

    fn end_category(&mut self, kind: EntryKind) {
        self.pools.hide_rest(kind);
    }
}
