use std::collections::HashMap;
use crate::runtime::model::SoundKey;
use crate::runtime::pose::{FrameData, ObjectEntry};
use crate::shared_types::{EntryKind, FileRef};

/// Receives a composed frame. One implementation per host rendering mode.
///
/// Per frame the calls arrive as: `begin_frame`, every sprite in z order,
/// `end_category(Sprite)`, every box, `end_category(Box)`, every point,
/// `end_category(Point)`, every sound, `end_category(Sound)`. Pooled
/// implementations reset their emit indices in `begin_frame` and hide the
/// slots left unused in `end_category`.
pub trait FrameSink {
    type Sprite;
    type Sound;

    fn begin_frame(&mut self) {}

    fn apply_sprite_transform(&mut self, sprite: &Self::Sprite, entry: &ObjectEntry);

    fn apply_box_transform(&mut self, entry: &ObjectEntry);

    fn apply_point_transform(&mut self, entry: &ObjectEntry);

    fn play_sound(&mut self, sound: &Self::Sound, cue: &SoundKey);

    fn end_category(&mut self, _kind: EntryKind) {}
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    type Sprite = T::Sprite;
    type Sound = T::Sound;

    fn begin_frame(&mut self) {
        (**self).begin_frame()
    }

    fn apply_sprite_transform(&mut self, sprite: &Self::Sprite, entry: &ObjectEntry) {
        (**self).apply_sprite_transform(sprite, entry)
    }

    fn apply_box_transform(&mut self, entry: &ObjectEntry) {
        (**self).apply_box_transform(entry)
    }

    fn apply_point_transform(&mut self, entry: &ObjectEntry) {
        (**self).apply_point_transform(entry)
    }

    fn play_sound(&mut self, sound: &Self::Sound, cue: &SoundKey) {
        (**self).play_sound(sound, cue)
    }

    fn end_category(&mut self, kind: EntryKind) {
        (**self).end_category(kind)
    }
}

/// Host resources keyed by their folder/file pair in the source asset.
#[derive(Clone, Debug)]
pub struct AssetProvider<T> {
    assets: HashMap<FileRef, T>,
}

impl<T> Default for AssetProvider<T> {
    fn default() -> Self {
        Self { assets: HashMap::new() }
    }
}

impl<T> AssetProvider<T> {
    pub fn set(&mut self, folder: usize, file: usize, asset: T) {
        self.assets.insert(FileRef::new(folder, file), asset);
    }

    pub fn get(&self, file_ref: FileRef) -> Option<&T> {
        self.assets.get(&file_ref)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Pushes `frame` into `sink`. Sprites and sounds whose file has no
/// registered resource are skipped.
pub fn dispatch<K: FrameSink>(
    frame: &FrameData,
    sprites: &AssetProvider<K::Sprite>,
    sounds: &AssetProvider<K::Sound>,
    sink: &mut K,
) {
    sink.begin_frame();
    for entry in frame.sprites.iter() {
        if let Some(sprite) = entry.info.file.and_then(|file| sprites.get(file)) {
            sink.apply_sprite_transform(sprite, entry);
        }
    }
    sink.end_category(EntryKind::Sprite);
    for entry in frame.boxes.iter() {
        sink.apply_box_transform(entry);
    }
    sink.end_category(EntryKind::Box);
    for entry in frame.points.iter() {
        sink.apply_point_transform(entry);
    }
    sink.end_category(EntryKind::Point);
    for cue in frame.sounds.iter() {
        if let Some(sound) = sounds.get(cue.file) {
            sink.play_sound(sound, cue);
        }
    }
    sink.end_category(EntryKind::Sound);
}
