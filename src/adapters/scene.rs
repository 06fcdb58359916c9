use nalgebra::Vector2;
use crate::adapters::{box_offset, NodePools};
use crate::runtime::dispatch::FrameSink;
use crate::runtime::model::{PoolSizes, SoundKey};
use crate::runtime::pose::ObjectEntry;
use crate::shared_types::EntryKind;

/// World-space adapter: positions and box sizes are divided by the
/// pixels-per-unit factor.
#[derive(Clone, Debug)]
pub struct SceneAdapter<S, A> {
    pub pools: NodePools<S, A>,
    pub ppu: f32,
    pub sorting_layer: String,
    pub sorting_order: i32,
}

impl<S, A> SceneAdapter<S, A> {
    pub fn new(sizes: PoolSizes, ppu: f32) -> Self {
        Self {
            pools: NodePools::new(sizes),
            ppu,
            sorting_layer: String::from("Default"),
            sorting_order: 0,
        }
    }
}

impl<S: Clone, A: Clone> FrameSink for SceneAdapter<S, A> {
    type Sprite = S;
    type Sound = A;

    fn begin_frame(&mut self) {
        self.pools.rewind();
    }

    fn apply_sprite_transform(&mut self, sprite: &S, entry: &ObjectEntry) {
        let ppu = self.ppu;
        let order = self.sorting_order;
        if let Some((index, node)) = self.pools.sprites.next_node() {
            let info = &entry.info;
            node.set_name(entry.name);
            node.set_sorting_layer(&self.sorting_layer);
            node.sprite = Some(sprite.clone());
            node.position = Vector2::new(info.x / ppu, info.y / ppu);
            node.angle = info.angle;
            node.offset = Vector2::zeros();
            node.scale = Vector2::new(info.scale_x, info.scale_y);
            node.pivot = Vector2::new(info.pivot_x, info.pivot_y);
            node.alpha = info.alpha;
            node.order = order + index as i32;
        }
    }

    fn apply_box_transform(&mut self, entry: &ObjectEntry) {
        let ppu = self.ppu;
        if let Some((_, node)) = self.pools.boxes.next_node() {
            let info = &entry.info;
            let width = entry.width / ppu;
            let height = entry.height / ppu;
            node.set_name(entry.name);
            node.size = Vector2::new(width, height);
            node.position = Vector2::new(info.x / ppu, info.y / ppu);
            node.angle = info.angle;
            node.offset = box_offset(entry, width, height);
            node.scale = Vector2::new(info.scale_x, info.scale_y);
            node.pivot = Vector2::new(info.pivot_x, info.pivot_y);
        }
    }

    fn apply_point_transform(&mut self, entry: &ObjectEntry) {
        let ppu = self.ppu;
        if let Some((_, node)) = self.pools.points.next_node() {
            node.set_name(entry.name);
            node.position = Vector2::new(entry.info.x / ppu, entry.info.y / ppu);
            node.angle = entry.info.angle;
        }
    }

    fn play_sound(&mut self, sound: &A, cue: &SoundKey) {
        self.pools.push_sound(sound.clone(), cue.volume, cue.panning);
    }

    fn end_category(&mut self, kind: EntryKind) {
        self.pools.hide_rest(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::animator::Animator;
    use crate::runtime::data::SpriterData;

    #[test]
    fn pools_activate_and_hide() {
        let data = SpriterData::load(include_bytes!("../test_assets/knight.scon")).unwrap();
        let entity = &data.entities[0];
        let mut animator = Animator::new(entity, SceneAdapter::<&str, &str>::new(entity.pool_sizes, 100.0));
        animator.sprite_provider_mut().set(0, 0, "body");
        animator.sprite_provider_mut().set(0, 1, "sword");
        animator.sound_provider_mut().set(1, 1, "clang");

        animator.play("walk").unwrap();
        animator.update(0.0);
        let pools = &animator.sink().pools;
        assert_eq!(pools.sprites.active().count(), 2);
        assert_eq!(pools.sprites.nodes()[0].sprite, Some("sword"));
        assert_eq!(pools.boxes.active().count(), 1);
        assert_eq!(pools.points.nodes()[0].name, "muzzle");

        // attack starts with only the body: the second sprite slot and the
        // box and point slots are hidden
        animator.play("attack").unwrap();
        animator.update(0.0);
        let pools = &animator.sink().pools;
        assert_eq!(pools.sprites.active().count(), 1);
        assert_eq!(pools.sprites.nodes()[0].sprite, Some("body"));
        assert!(!pools.sprites.nodes()[1].active);
        assert_eq!(pools.sprites.nodes()[1].sprite, None);
        assert_eq!(pools.boxes.active().count(), 0);
        assert_eq!(pools.points.active().count(), 0);

        animator.update(600.0);
        let sounds: Vec<_> = animator.sink_mut().pools.drain_sounds().collect();
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].sound, "clang");
        assert!(animator.sink_mut().pools.drain_sounds().next().is_none());
    }

    #[test]
    fn box_offsets_follow_the_pivot() {
        let data = SpriterData::load(include_bytes!("../test_assets/knight.scon")).unwrap();
        let entity = &data.entities[0];
        let mut animator = Animator::new(entity, SceneAdapter::<&str, &str>::new(entity.pool_sizes, 100.0));
        animator.play("walk").unwrap();
        animator.update(0.0);

        let hitbox = &animator.sink().pools.boxes.nodes()[0];
        assert_eq!(hitbox.name, "hitbox");
        assert!((hitbox.size.x - 0.4).abs() < 1e-5);
        assert!((hitbox.size.y - 0.8).abs() < 1e-5);
        // pivot (0.5, 0): centred horizontally, lifted by half the height
        assert!(hitbox.offset.x.abs() < 1e-5);
        assert!((hitbox.offset.y - 0.4).abs() < 1e-5);
        // hangs off the root bone at (10, 0)
        assert!((hitbox.position.x - 0.1).abs() < 1e-5);
    }

    #[test]
    fn sprites_carry_the_sorting_layer() {
        let data = SpriterData::load(include_bytes!("../test_assets/knight.scon")).unwrap();
        let entity = &data.entities[0];
        let mut adapter = SceneAdapter::<&str, &str>::new(entity.pool_sizes, 100.0);
        adapter.sorting_layer = "Characters".to_string();
        adapter.sorting_order = 4;
        let mut animator = Animator::new(entity, adapter);
        animator.sprite_provider_mut().set(0, 0, "body");
        animator.sprite_provider_mut().set(0, 1, "sword");
        animator.play("walk").unwrap();
        animator.update(0.0);

        let sprites = animator.sink().pools.sprites.nodes();
        assert!(sprites.iter().all(|it| it.sorting_layer == "Characters"));
        assert_eq!(sprites[1].order, 5);
        // boxes and points are not drawn
        assert_eq!(animator.sink().pools.boxes.nodes()[0].sorting_layer, "");

        animator.sink_mut().sorting_layer = "Foreground".to_string();
        animator.update(16.0);
        assert_eq!(animator.sink().pools.sprites.nodes()[0].sorting_layer, "Foreground");
    }

    #[test]
    fn undrained_sounds_do_not_pile_up() {
        let data = SpriterData::load(include_bytes!("../test_assets/knight.scon")).unwrap();
        let entity = &data.entities[0];
        let mut animator = Animator::new(entity, SceneAdapter::<&str, &str>::new(entity.pool_sizes, 100.0));
        animator.sound_provider_mut().set(1, 0, "step");
        animator.play("walk").unwrap();

        animator.update(350.0);
        animator.update(100.0);
        assert!(animator.sink_mut().pools.drain_sounds().next().is_none());

        // the step cue sits at 300; crossing it again in a single frame shows up
        animator.update(900.0);
        let sounds: Vec<_> = animator.sink_mut().pools.drain_sounds().collect();
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].sound, "step");
    }
}
