use crate::runtime::model::{Animation, Entity, MainlineKey, ObjectKind, SoundKey, SpatialInfo, Timeline};
use crate::runtime::timeline::{resolve, wrap_time};

/// One composed bone, sprite, box or point. `info` is in entity space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectEntry<'e> {
    pub name: &'e str,
    pub width: f32,
    pub height: f32,
    pub info: SpatialInfo,
}

/// Everything one tick produced. Owned by the animator and overwritten in
/// place, so the vectors keep their capacity between frames.
#[derive(Clone, Debug, Default)]
pub struct FrameData<'e> {
    pub bones: Vec<ObjectEntry<'e>>,
    pub sprites: Vec<ObjectEntry<'e>>,
    pub boxes: Vec<ObjectEntry<'e>>,
    pub points: Vec<ObjectEntry<'e>>,
    pub sounds: Vec<SoundKey>,
    pub events: Vec<&'e str>,
    pub tags: &'e [String],
}

impl<'e> FrameData<'e> {
    pub fn clear(&mut self) {
        self.clear_pose();
        self.sounds.clear();
        self.events.clear();
    }

    fn clear_pose(&mut self) {
        self.bones.clear();
        self.sprites.clear();
        self.boxes.clear();
        self.points.clear();
        self.tags = &[];
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|it| it == tag)
    }
}

/// Interval of animation time swept by the last tick. Cues are fired by
/// crossing, so a large delta never skips one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CueWindow {
    Empty,
    /// `[from, to)`, or `[from, length) ∪ [0, to)` when wrapped.
    Forward { from: f32, to: f32, wrapped: bool, end_inclusive: bool },
    /// `(to, from]`, or `[0, from] ∪ (to, length)` when wrapped.
    Backward { from: f32, to: f32, wrapped: bool, end_inclusive: bool },
    /// At least one whole loop was swept.
    FullCycle,
}

impl CueWindow {
    pub fn contains(&self, t: f32) -> bool {
        match *self {
            CueWindow::Empty => false,
            CueWindow::FullCycle => true,
            CueWindow::Forward { from, to, wrapped: false, end_inclusive } =>
                t >= from && (t < to || (end_inclusive && t == to)),
            CueWindow::Forward { from, to, wrapped: true, .. } => t >= from || t < to,
            CueWindow::Backward { from, to, wrapped: false, end_inclusive } =>
                t <= from && (t > to || (end_inclusive && t == to)),
            CueWindow::Backward { from, to, wrapped: true, .. } => t <= from || t > to,
        }
    }
}

fn mainline_key_id(animation: &Animation, time: f32) -> usize {
    animation.mainline.partition_point(|key| key.time <= time).saturating_sub(1)
}

/// Applies the mainline key's curve to the time between it and the next
/// mainline key.
fn adjust_time(animation: &Animation, key_id: usize, time: f32) -> f32 {
    let key_a = &animation.mainline[key_id];
    if key_a.curve == crate::runtime::curve::Curve::Linear {
        return time;
    }
    let next_time = match animation.mainline.get(key_id + 1) {
        Some(key_b) => key_b.time,
        None if animation.looping => animation.length + animation.mainline[0].time,
        None => return time,
    };
    if next_time <= key_a.time || time < key_a.time {
        return time;
    }
    let factor = (time - key_a.time) / (next_time - key_a.time);
    let adjusted = key_a.time + key_a.curve.apply(factor) * (next_time - key_a.time);
    wrap_time(adjusted, animation.length, animation.looping)
}

/// Names and sizes come from the object info when the timeline has one.
fn entry_for<'e>(entity: &'e Entity, timeline: &'e Timeline, info: SpatialInfo) -> ObjectEntry<'e> {
    match timeline.object_info.and_then(|id| entity.object_infos.get(id)) {
        Some(object_info) => ObjectEntry {
            name: &object_info.name,
            width: object_info.width,
            height: object_info.height,
            info,
        },
        None => ObjectEntry { name: &timeline.name, width: 0.0, height: 0.0, info },
    }
}

/// Composes the pose of `animation` at `time` into `frame`: bones in world
/// space, then sprites, boxes and points in z order, then the active tags.
/// Sounds and events are left alone, see [`collect_cues`].
pub fn compose<'e>(entity: &'e Entity, animation: &'e Animation, time: f32, frame: &mut FrameData<'e>) {
    frame.clear_pose();
    let time = wrap_time(time, animation.length, animation.looping);
    if animation.mainline.is_empty() {
        return;
    }
    let key_id = mainline_key_id(animation, time);
    let key: &'e MainlineKey = &animation.mainline[key_id];
    let time = adjust_time(animation, key_id, time);

    let placeholder = ObjectEntry { name: "", width: 0.0, height: 0.0, info: SpatialInfo::identity() };
    frame.bones.resize(key.bone_refs.len(), placeholder);
    for &bone_id in key.bone_order.iter() {
        let bone_ref = key.bone_refs[bone_id];
        let timeline = &animation.timelines[bone_ref.timeline];
        let local = resolve(timeline, time, animation.length, animation.looping);
        let info = match bone_ref.parent {
            Some(pid) => local.apply_parent(&frame.bones[pid].info),
            None => local,
        };
        frame.bones[bone_id] = entry_for(entity, timeline, info);
    }

    for object_ref in key.object_refs.iter() {
        let timeline = &animation.timelines[object_ref.timeline];
        if matches!(timeline.kind, ObjectKind::Bone | ObjectKind::Skipped) {
            continue;
        }
        let local = resolve(timeline, time, animation.length, animation.looping);
        let info = match object_ref.parent {
            Some(pid) => local.apply_parent(&frame.bones[pid].info),
            None => local,
        };
        let entry = entry_for(entity, timeline, info);
        match timeline.kind {
            ObjectKind::Sprite => frame.sprites.push(entry),
            ObjectKind::Box => frame.boxes.push(entry),
            ObjectKind::Point => frame.points.push(entry),
            ObjectKind::Bone | ObjectKind::Skipped => {}
        }
    }

    let tag_id = animation.taglines.partition_point(|key| key.time <= time);
    if tag_id > 0 {
        frame.tags = &animation.taglines[tag_id - 1].tags;
    }
}

/// Collects the sound cues and events whose time lies inside `window`.
pub fn collect_cues<'e>(animation: &'e Animation, window: CueWindow, frame: &mut FrameData<'e>) {
    frame.sounds.clear();
    frame.events.clear();
    if window == CueWindow::Empty {
        return;
    }
    let cue_time = |t: f32| if animation.looping { wrap_time(t, animation.length, true) } else { t };
    for soundline in animation.soundlines.iter() {
        for key in soundline.keys.iter() {
            if window.contains(cue_time(key.time)) {
                frame.sounds.push(*key);
            }
        }
    }
    for eventline in animation.eventlines.iter() {
        for &time in eventline.times.iter() {
            if window.contains(cue_time(time)) {
                frame.events.push(&eventline.name);
            }
        }
    }
}
