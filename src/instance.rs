use crate::adapters::{CanvasAdapter, NodePools, SceneAdapter};
use crate::config::{InstanceConfig, RenderMode};
use crate::error::PlaybackError;
use crate::runtime::animator::Animator;
use crate::runtime::data::{FileEntry, FileKind, SpriterData};
use crate::runtime::dispatch::FrameSink;
use crate::runtime::model::{PoolSizes, SoundKey};
use crate::runtime::pose::ObjectEntry;
use crate::runtime::queue::AnimationQueue;
use crate::shared_types::EntryKind;

/// The adapter an instance renders through, chosen from its config.
#[derive(Clone, Debug)]
pub enum InstanceAdapter<S, A> {
    Scene(SceneAdapter<S, A>),
    Canvas(CanvasAdapter<S, A>),
}

impl<S, A> InstanceAdapter<S, A> {
    fn from_config(config: &InstanceConfig, sizes: PoolSizes) -> Self {
        match config.render_mode {
            RenderMode::SceneRenderer => {
                let mut adapter = SceneAdapter::new(sizes, config.ppu);
                adapter.sorting_layer = config.sorting_layer.clone();
                adapter.sorting_order = config.sorting_order;
                InstanceAdapter::Scene(adapter)
            }
            RenderMode::UiCanvas => {
                let mut adapter = CanvasAdapter::new(sizes);
                adapter.sorting_order = config.sorting_order;
                InstanceAdapter::Canvas(adapter)
            }
        }
    }

    pub fn pools(&self) -> &NodePools<S, A> {
        match self {
            InstanceAdapter::Scene(adapter) => &adapter.pools,
            InstanceAdapter::Canvas(adapter) => &adapter.pools,
        }
    }

    pub fn pools_mut(&mut self) -> &mut NodePools<S, A> {
        match self {
            InstanceAdapter::Scene(adapter) => &mut adapter.pools,
            InstanceAdapter::Canvas(adapter) => &mut adapter.pools,
        }
    }

    fn set_sorting(&mut self, layer: &str, order: i32) {
        match self {
            InstanceAdapter::Scene(adapter) => {
                if adapter.sorting_layer != layer {
                    adapter.sorting_layer = layer.to_string();
                }
                adapter.sorting_order = order;
            }
            InstanceAdapter::Canvas(adapter) => adapter.sorting_order = order,
        }
    }
}

impl<S: Clone, A: Clone> FrameSink for InstanceAdapter<S, A> {
    type Sprite = S;
    type Sound = A;

    fn begin_frame(&mut self) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.begin_frame(),
            InstanceAdapter::Canvas(adapter) => adapter.begin_frame(),
        }
    }

    fn apply_sprite_transform(&mut self, sprite: &S, entry: &ObjectEntry) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.apply_sprite_transform(sprite, entry),
            InstanceAdapter::Canvas(adapter) => adapter.apply_sprite_transform(sprite, entry),
        }
    }

    fn apply_box_transform(&mut self, entry: &ObjectEntry) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.apply_box_transform(entry),
            InstanceAdapter::Canvas(adapter) => adapter.apply_box_transform(entry),
        }
    }

    fn apply_point_transform(&mut self, entry: &ObjectEntry) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.apply_point_transform(entry),
            InstanceAdapter::Canvas(adapter) => adapter.apply_point_transform(entry),
        }
    }

    fn play_sound(&mut self, sound: &A, cue: &SoundKey) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.play_sound(sound, cue),
            InstanceAdapter::Canvas(adapter) => adapter.play_sound(sound, cue),
        }
    }

    fn end_category(&mut self, kind: EntryKind) {
        match self {
            InstanceAdapter::Scene(adapter) => adapter.end_category(kind),
            InstanceAdapter::Canvas(adapter) => adapter.end_category(kind),
        }
    }
}

/// Host-side driver for one entity: picks the adapter, registers the host's
/// sprites and sounds, plays queued animations and mirrors the active tag.
pub struct SpriterInstance<'e, S: Clone, A: Clone> {
    animator: Animator<'e, InstanceAdapter<S, A>>,
    queue: AnimationQueue,
    config: InstanceConfig,
    default_tag: String,
    tag: String,
}

impl<'e, S: Clone, A: Clone> SpriterInstance<'e, S, A> {
    /// Builds an instance for `config.entity_index` and plays its first
    /// animation. `resolve_sprite` and `resolve_sound` turn file entries into
    /// host resources; entries they cannot resolve are skipped during playback.
    pub fn new(
        data: &'e SpriterData,
        config: InstanceConfig,
        default_tag: impl Into<String>,
        mut resolve_sprite: impl FnMut(&FileEntry) -> Option<S>,
        mut resolve_sound: impl FnMut(&FileEntry) -> Option<A>,
    ) -> Result<Self, PlaybackError> {
        let entity = match data.entity(config.entity_index) {
            Some(entity) => entity,
            None => {
                log::error!(
                    "Entity not found in SpriterData with index {} (entities: {})",
                    config.entity_index,
                    data.entities.len()
                );
                return Err(PlaybackError::EntityNotFound {
                    index: config.entity_index,
                    count: data.entities.len(),
                });
            }
        };

        let adapter = InstanceAdapter::from_config(&config, entity.pool_sizes);
        let mut animator = Animator::new(entity, adapter);
        for entry in data.file_entries() {
            let (folder, file) = (entry.file_ref.folder, entry.file_ref.file);
            match entry.kind {
                FileKind::Image => match resolve_sprite(entry) {
                    Some(sprite) => animator.sprite_provider_mut().set(folder, file, sprite),
                    None => log::warn!("No sprite resolved for '{}'", entry.name),
                },
                FileKind::Sound => match resolve_sound(entry) {
                    Some(sound) => animator.sound_provider_mut().set(folder, file, sound),
                    None => log::warn!("No sound resolved for '{}'", entry.name),
                },
            }
        }
        if let Some(first) = entity.animation_names().next() {
            animator.play(first)?;
        }

        let default_tag = default_tag.into();
        Ok(Self {
            animator,
            queue: AnimationQueue::default(),
            config,
            tag: default_tag.clone(),
            default_tag,
        })
    }

    /// Poses the first frame without advancing time.
    pub fn start(&mut self) {
        self.tick(0.0);
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.animator.sink_mut().set_sorting(&self.config.sorting_layer, self.config.sorting_order);
        self.animator.update(delta_seconds * 1000.0);

        if let Err(err) = self.queue.advance(&mut self.animator) {
            log::warn!("Skipping queued animation: {}", err);
        }

        if self.config.use_native_tags {
            let tag = self.animator.frame_data().tags.first().unwrap_or(&self.default_tag);
            if self.tag != *tag {
                self.tag.clone_from(tag);
            }
        }
    }

    pub fn queue(&mut self, name: impl Into<String>) {
        self.queue.push(name);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// The host-side tag: the first active tag of the current frame, or the
    /// default tag. Only tracked when native tags are enabled.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Sorting changes are picked up on the next tick.
    pub fn config_mut(&mut self) -> &mut InstanceConfig {
        &mut self.config
    }

    pub fn animator(&self) -> &Animator<'e, InstanceAdapter<S, A>> {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator<'e, InstanceAdapter<S, A>> {
        &mut self.animator
    }
}
