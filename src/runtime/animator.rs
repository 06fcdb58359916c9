use crate::error::PlaybackError;
use crate::runtime::curve::lerp;
use crate::runtime::dispatch::{dispatch, AssetProvider, FrameSink};
use crate::runtime::model::{Animation, Entity, PoolSizes, SpatialInfo};
use crate::runtime::pose::{collect_cues, compose, CueWindow, FrameData, ObjectEntry};
use crate::runtime::timeline::angle_lerp;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    /// A non-looping animation reached its boundary. The cursor holds there
    /// until the caller plays something else.
    Finished,
}

#[derive(Copy, Clone, Debug)]
struct Transition {
    elapsed: f32,
    total: f32,
}

#[derive(Copy, Clone, Debug)]
struct BlendTarget {
    animation_id: usize,
    time: f32,
    factor: f32,
    transition: Option<Transition>,
}

/// Plays the animations of one entity and pushes every frame into a sink.
///
/// The entity is borrowed, so any number of animators can share one loaded
/// [`SpriterData`](crate::runtime::data::SpriterData).
pub struct Animator<'e, K: FrameSink> {
    entity: &'e Entity,
    sink: K,
    sprite_provider: AssetProvider<K::Sprite>,
    sound_provider: AssetProvider<K::Sound>,

    current_animation_id: Option<usize>,
    time: f32,
    speed: f32,
    status: PlaybackStatus,
    blend: Option<BlendTarget>,

    frame_data: FrameData<'e>,
    blend_frame: FrameData<'e>,

    finished_listeners: Vec<Box<dyn FnMut(&str) + 'e>>,
    finished_this_tick: Option<&'e str>,
}

impl<'e, K: FrameSink> Animator<'e, K> {
    pub fn new(entity: &'e Entity, sink: K) -> Self {
        Self {
            entity,
            sink,
            sprite_provider: AssetProvider::default(),
            sound_provider: AssetProvider::default(),
            current_animation_id: None,
            time: 0.0,
            speed: 1.0,
            status: PlaybackStatus::Stopped,
            blend: None,
            frame_data: FrameData::default(),
            blend_frame: FrameData::default(),
            finished_listeners: Vec::new(),
            finished_this_tick: None,
        }
    }

    fn find_animation(&self, name: &str) -> Result<usize, PlaybackError> {
        self.entity
            .animation_id(name)
            .ok_or_else(|| PlaybackError::AnimationNotFound(name.to_string()))
    }

    fn start_time(&self, animation_id: usize) -> f32 {
        if self.speed < 0.0 { self.entity.animations[animation_id].length } else { 0.0 }
    }

    /// Starts `name` from its beginning (or its end when the speed is
    /// negative). An unknown name leaves the current playback untouched.
    pub fn play(&mut self, name: &str) -> Result<(), PlaybackError> {
        let animation_id = self.find_animation(name)?;
        self.current_animation_id = Some(animation_id);
        self.time = self.start_time(animation_id);
        self.status = PlaybackStatus::Playing;
        self.blend = None;
        Ok(())
    }

    /// Cross-fades from the current animation into `name` over `duration_ms`.
    /// Without a current animation this is a plain [`play`](Self::play).
    pub fn transition(&mut self, name: &str, duration_ms: f32) -> Result<(), PlaybackError> {
        let animation_id = self.find_animation(name)?;
        if !(duration_ms > 0.0) || self.current_animation_id.is_none() || self.status == PlaybackStatus::Stopped {
            return self.play(name);
        }
        self.blend = Some(BlendTarget {
            animation_id,
            time: self.start_time(animation_id),
            factor: 0.0,
            transition: Some(Transition { elapsed: 0.0, total: duration_ms }),
        });
        Ok(())
    }

    /// Mixes a second animation into the output with a fixed `factor`.
    pub fn blend(&mut self, name: &str, factor: f32) -> Result<(), PlaybackError> {
        let animation_id = self.find_animation(name)?;
        let time = match self.blend {
            Some(target) if target.animation_id == animation_id => target.time,
            _ => self.start_time(animation_id),
        };
        self.blend = Some(BlendTarget {
            animation_id,
            time,
            factor: factor.clamp(0.0, 1.0),
            transition: None,
        });
        Ok(())
    }

    pub fn clear_blend(&mut self) {
        self.blend = None;
    }

    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.blend = None;
        self.frame_data.clear();
    }

    /// Advances playback by `delta_ms` scaled by the speed, recomposes the
    /// frame and dispatches it to the sink. Does nothing while stopped or
    /// when `delta_ms` is not finite.
    pub fn update(&mut self, delta_ms: f32) {
        self.finished_this_tick = None;
        if !delta_ms.is_finite() {
            return;
        }
        let animation_id = match (self.status, self.current_animation_id) {
            (PlaybackStatus::Stopped, _) | (_, None) => return,
            (_, Some(animation_id)) => animation_id,
        };
        let entity = self.entity;
        let cue_animation = &entity.animations[animation_id];

        let window = if self.status == PlaybackStatus::Playing {
            self.advance(cue_animation, delta_ms)
        } else {
            CueWindow::Empty
        };
        self.advance_blend(delta_ms);

        if let Some(current_id) = self.current_animation_id {
            compose(entity, &entity.animations[current_id], self.time, &mut self.frame_data);
        }
        if let Some(target) = self.blend {
            if target.factor > 0.0 {
                compose(entity, &entity.animations[target.animation_id], target.time, &mut self.blend_frame);
                blend_frames(&mut self.frame_data, &self.blend_frame, target.factor);
            }
        }
        collect_cues(cue_animation, window, &mut self.frame_data);

        dispatch(&self.frame_data, &self.sprite_provider, &self.sound_provider, &mut self.sink);
    }

    fn advance(&mut self, animation: &'e Animation, delta_ms: f32) -> CueWindow {
        let step = delta_ms * self.speed;
        let length = animation.length;
        let from = self.time;
        if step == 0.0 {
            return CueWindow::Empty;
        }
        if length <= 0.0 {
            self.time = 0.0;
            if !animation.looping {
                self.finish(animation);
            }
            return CueWindow::Empty;
        }

        let raw = from + step;
        if animation.looping {
            self.time = raw.rem_euclid(length);
            if self.time >= length {
                self.time = 0.0;
            }
            if step.abs() >= length {
                CueWindow::FullCycle
            } else if step > 0.0 {
                CueWindow::Forward { from, to: self.time, wrapped: raw >= length, end_inclusive: false }
            } else {
                CueWindow::Backward { from, to: self.time, wrapped: raw < 0.0, end_inclusive: false }
            }
        } else if step > 0.0 {
            let clamped = raw >= length;
            self.time = raw.min(length);
            if clamped {
                self.finish(animation);
            }
            CueWindow::Forward { from, to: self.time, wrapped: false, end_inclusive: clamped }
        } else {
            let clamped = raw <= 0.0;
            self.time = raw.max(0.0);
            if clamped {
                self.finish(animation);
            }
            CueWindow::Backward { from, to: self.time, wrapped: false, end_inclusive: clamped }
        }
    }

    fn finish(&mut self, animation: &'e Animation) {
        self.status = PlaybackStatus::Finished;
        self.finished_this_tick = Some(&animation.name);
        for listener in self.finished_listeners.iter_mut() {
            listener(animation.name.as_str());
        }
    }

    fn advance_blend(&mut self, delta_ms: f32) {
        let mut target = match self.blend {
            Some(target) => target,
            None => return,
        };
        let animation = &self.entity.animations[target.animation_id];
        let raw = target.time + delta_ms * self.speed;
        target.time = if animation.looping && animation.length > 0.0 {
            raw.rem_euclid(animation.length)
        } else {
            raw.clamp(0.0, animation.length.max(0.0))
        };

        if let Some(transition) = target.transition.as_mut() {
            transition.elapsed += delta_ms.abs();
            target.factor = (transition.elapsed / transition.total).min(1.0);
            if transition.elapsed >= transition.total {
                self.current_animation_id = Some(target.animation_id);
                self.time = target.time;
                self.status = PlaybackStatus::Playing;
                self.blend = None;
                return;
            }
        }
        self.blend = Some(target);
    }

    /// Registers a callback invoked once each time a non-looping animation
    /// reaches its end. Listeners run in registration order during `update`.
    pub fn add_finished_listener(&mut self, listener: impl FnMut(&str) + 'e) {
        self.finished_listeners.push(Box::new(listener));
    }

    /// Name of the animation that finished during the last `update`, if any.
    pub fn finished_this_tick(&self) -> Option<&'e str> {
        self.finished_this_tick
    }

    pub fn entity(&self) -> &'e Entity {
        self.entity
    }

    pub fn pool_sizes(&self) -> PoolSizes {
        self.entity.pool_sizes
    }

    pub fn current_animation(&self) -> Option<&'e Animation> {
        let entity = self.entity;
        self.current_animation_id.map(|id| &entity.animations[id])
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Moves the cursor, wrapping or clamping it into the current animation.
    /// A finished animation resumes once the cursor leaves the boundary it
    /// stopped at. Non-finite times are ignored.
    pub fn set_time(&mut self, time: f32) {
        if !time.is_finite() {
            return;
        }
        if let Some(animation) = self.current_animation() {
            self.time = crate::runtime::timeline::wrap_time(time, animation.length, animation.looping);
            let boundary = if self.speed < 0.0 { 0.0 } else { animation.length };
            if self.status == PlaybackStatus::Finished && self.time != boundary {
                self.status = PlaybackStatus::Playing;
            }
        }
    }

    pub fn progress(&self) -> f32 {
        match self.current_animation() {
            Some(animation) if animation.length > 0.0 => self.time / animation.length,
            _ => 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Non-finite speeds are ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed = speed;
        }
    }

    pub fn blend_factor(&self) -> Option<f32> {
        self.blend.map(|it| it.factor)
    }

    pub fn is_transitioning(&self) -> bool {
        self.blend.map_or(false, |it| it.transition.is_some())
    }

    pub fn frame_data(&self) -> &FrameData<'e> {
        &self.frame_data
    }

    pub fn sprite_provider_mut(&mut self) -> &mut AssetProvider<K::Sprite> {
        &mut self.sprite_provider
    }

    pub fn sound_provider_mut(&mut self) -> &mut AssetProvider<K::Sound> {
        &mut self.sound_provider
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}

fn blend_info(a: &SpatialInfo, b: &SpatialInfo, t: f32) -> SpatialInfo {
    SpatialInfo {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        angle: angle_lerp(a.angle, b.angle, 0, t),
        scale_x: lerp(a.scale_x, b.scale_x, t),
        scale_y: lerp(a.scale_y, b.scale_y, t),
        alpha: lerp(a.alpha, b.alpha, t),
        pivot_x: lerp(a.pivot_x, b.pivot_x, t),
        pivot_y: lerp(a.pivot_y, b.pivot_y, t),
        file: if t < 0.5 { a.file } else { b.file },
    }
}

/// Interpolates entries of the two poses that share a name. Entries present
/// on one side only are kept from the dominant side and dropped otherwise.
fn blend_entries<'e>(primary: &mut Vec<ObjectEntry<'e>>, secondary: &[ObjectEntry<'e>], t: f32) {
    let secondary_dominant = t >= 0.5;
    let mut matched = vec![false; secondary.len()];
    let mut kept = 0;
    for id in 0..primary.len() {
        let entry = primary[id];
        let other = (0..secondary.len()).find(|&it| !matched[it] && secondary[it].name == entry.name);
        match other {
            Some(other) => {
                matched[other] = true;
                primary[kept] = ObjectEntry { info: blend_info(&entry.info, &secondary[other].info, t), ..entry };
                kept += 1;
            }
            None if !secondary_dominant => {
                primary[kept] = entry;
                kept += 1;
            }
            None => {}
        }
    }
    primary.truncate(kept);
    if secondary_dominant {
        primary.extend(secondary.iter().zip(matched).filter(|(_, used)| !used).map(|(entry, _)| *entry));
    }
}

/// Mixes `secondary` into `primary`, category by category.
fn blend_frames<'e>(primary: &mut FrameData<'e>, secondary: &FrameData<'e>, t: f32) {
    blend_entries(&mut primary.bones, &secondary.bones, t);
    blend_entries(&mut primary.sprites, &secondary.sprites, t);
    blend_entries(&mut primary.boxes, &secondary.boxes, t);
    blend_entries(&mut primary.points, &secondary.points, t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::runtime::data::SpriterData;
    use crate::runtime::dispatch::tests::RecordingSink;

    fn load() -> SpriterData {
        SpriterData::load(include_bytes!("../test_assets/knight.scon")).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn looping_idle_wraps_without_finishing() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        let finished = Rc::new(Cell::new(0));
        let counter = finished.clone();
        animator.add_finished_listener(move |_| counter.set(counter.get() + 1));

        animator.play("Idle").unwrap();
        animator.update(500.0);
        assert!(close(animator.frame_data().bones[0].info.angle, 45.0));

        animator.update(500.0);
        assert_eq!(animator.time(), 0.0);
        assert!(close(animator.frame_data().bones[0].info.angle, 0.0));
        assert_eq!(finished.get(), 0);
        assert_eq!(animator.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn non_looping_idle_clamps_and_finishes_once() {
        let mut data = load();
        data.entities[0].animations[2].looping = false;
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        let finished = Rc::new(Cell::new(0));
        let counter = finished.clone();
        animator.add_finished_listener(move |name| {
            assert_eq!(name, "Idle");
            counter.set(counter.get() + 1)
        });

        animator.play("Idle").unwrap();
        animator.update(1200.0);
        assert_eq!(animator.time(), 1000.0);
        assert_eq!(animator.frame_data().bones[0].info.angle, 90.0);
        assert_eq!(animator.finished_this_tick(), Some("Idle"));
        assert_eq!(finished.get(), 1);

        animator.update(300.0);
        animator.update(300.0);
        assert_eq!(animator.time(), 1000.0);
        assert_eq!(animator.status(), PlaybackStatus::Finished);
        assert_eq!(animator.finished_this_tick(), None);
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn missing_animation_leaves_state_alone() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        assert_eq!(
            animator.play("Missing"),
            Err(PlaybackError::AnimationNotFound("Missing".into()))
        );
        assert_eq!(animator.status(), PlaybackStatus::Stopped);
        assert!(animator.current_animation().is_none());

        animator.play("walk").unwrap();
        animator.update(250.0);
        assert!(animator.play("Missing").is_err());
        assert!(animator.transition("Missing", 100.0).is_err());
        assert_eq!(animator.status(), PlaybackStatus::Playing);
        assert_eq!(animator.current_animation().unwrap().name, "walk");
        assert_eq!(animator.time(), 250.0);
    }

    #[test]
    fn reverse_playback_starts_at_end_and_finishes_at_zero() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.set_speed(-1.0);
        animator.play("attack").unwrap();
        assert_eq!(animator.time(), 600.0);
        animator.update(250.0);
        assert_eq!(animator.time(), 350.0);
        animator.update(1000.0);
        assert_eq!(animator.time(), 0.0);
        assert_eq!(animator.status(), PlaybackStatus::Finished);
    }

    #[test]
    fn zero_speed_pauses() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();
        animator.update(100.0);
        animator.set_speed(0.0);
        animator.update(400.0);
        assert_eq!(animator.time(), 100.0);
        assert_eq!(animator.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn cues_fire_on_crossing() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();

        animator.update(350.0);
        assert_eq!(animator.frame_data().sounds.len(), 1);
        assert!(animator.frame_data().events.is_empty());

        animator.update(100.0);
        assert!(animator.frame_data().sounds.is_empty());
        assert_eq!(animator.frame_data().events, vec!["swing"]);

        // wraps past the end and back over the step sound, stopping short of the swing
        animator.update(900.0);
        assert_eq!(animator.frame_data().sounds.len(), 1);
        assert!(animator.frame_data().events.is_empty());
        assert!(close(animator.time(), 350.0));

        // a delta of a whole length fires everything once
        animator.update(1000.0);
        assert_eq!(animator.frame_data().sounds.len(), 1);
        assert_eq!(animator.frame_data().events, vec!["swing"]);
    }

    #[test]
    fn cue_on_the_last_frame_fires_once() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("attack").unwrap();
        animator.update(600.0);
        assert_eq!(animator.frame_data().sounds.len(), 1);
        assert_eq!(animator.frame_data().events, vec!["hit"]);
        animator.update(16.0);
        assert!(animator.frame_data().sounds.is_empty());
        assert!(animator.frame_data().events.is_empty());
    }

    #[test]
    fn transition_hands_over_after_duration() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();
        animator.transition("attack", 200.0).unwrap();
        assert!(animator.is_transitioning());

        animator.update(100.0);
        assert!(close(animator.blend_factor().unwrap(), 0.5));
        assert_eq!(animator.current_animation().unwrap().name, "walk");

        animator.update(100.0);
        assert!(animator.blend_factor().is_none());
        assert_eq!(animator.current_animation().unwrap().name, "attack");
        assert_eq!(animator.time(), 200.0);
    }

    #[test]
    fn fixed_blend_mixes_bone_positions() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();
        animator.blend("attack", 0.5).unwrap();
        animator.update(0.0);
        let frame = animator.frame_data();
        // walk root sits at x = 10, attack root at x = 0; the arm only exists in
        // walk and is dropped once attack carries half the weight
        assert_eq!(frame.bones.len(), 1);
        assert_eq!(frame.bones[0].name, "root");
        assert!(close(frame.bones[0].info.x, 5.0));
        assert!(close(frame.bones[0].info.angle, 45.0));
        // the body hangs off the root in both, so it follows the blended root
        assert_eq!(frame.sprites.len(), 1);
        assert_eq!(frame.sprites[0].name, "body");
        assert!(close(frame.sprites[0].info.x, 5.0));
    }

    #[test]
    fn light_blend_keeps_bones_missing_from_the_target() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();
        animator.blend("attack", 0.25).unwrap();
        animator.update(0.0);
        let frame = animator.frame_data();
        assert_eq!(frame.bones.len(), 2);
        assert!(close(frame.bones[0].info.x, 7.5));
        assert_eq!(frame.bones[1].name, "arm");
        assert_eq!(frame.sprites.len(), 2);
    }

    #[test]
    fn transition_midway_blends_instead_of_snapping() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("walk").unwrap();
        animator.transition("attack", 200.0).unwrap();
        animator.update(100.0);
        // walk root at t = 100 is x = 12, attack root stays at 0
        let root = animator.frame_data().bones[0];
        assert!(close(root.info.x, 6.0));
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("Idle").unwrap();
        animator.update(250.0);
        animator.set_time(f32::INFINITY);
        animator.set_time(f32::NAN);
        animator.set_speed(f32::NAN);
        animator.update(f32::INFINITY);
        animator.update(f32::NAN);
        assert_eq!(animator.time(), 250.0);
        assert_eq!(animator.speed(), 1.0);
        animator.update(16.0);
        assert!(close(animator.frame_data().bones[0].info.angle, 23.94));

        animator.play("walk").unwrap();
        animator.update(f32::NEG_INFINITY);
        assert_eq!(animator.time(), 0.0);
        assert!(animator.transition("attack", f32::NAN).is_ok());
        assert_eq!(animator.current_animation().unwrap().name, "attack");
        assert!(!animator.is_transitioning());
    }

    #[test]
    fn set_time_resumes_a_finished_animation() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.play("attack").unwrap();
        animator.update(700.0);
        assert_eq!(animator.status(), PlaybackStatus::Finished);

        animator.set_time(600.0);
        assert_eq!(animator.status(), PlaybackStatus::Finished);

        animator.set_time(100.0);
        assert_eq!(animator.status(), PlaybackStatus::Playing);
        animator.update(100.0);
        assert_eq!(animator.time(), 200.0);
    }

    #[test]
    fn frames_reach_the_sink() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.sprite_provider_mut().set(0, 0, "body.png");
        animator.sprite_provider_mut().set(0, 1, "sword.png");
        animator.sound_provider_mut().set(1, 0, "step.wav");
        animator.play("walk").unwrap();
        animator.update(0.0);
        assert_eq!(
            animator.sink().calls,
            vec![
                "begin",
                "sprite sword.png sword",
                "sprite body.png body",
                "end Sprite",
                "box hitbox",
                "end Box",
                "point muzzle",
                "end Point",
                "end Sound",
            ]
        );
    }

    #[test]
    fn stopped_animator_does_nothing() {
        let data = load();
        let mut animator = Animator::new(&data.entities[0], RecordingSink::default());
        animator.update(100.0);
        assert!(animator.sink().calls.is_empty());
        animator.play("walk").unwrap();
        animator.stop();
        animator.update(100.0);
        assert!(animator.sink().calls.is_empty());
        assert_eq!(animator.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn frame_counts_stay_within_pool_sizes() {
        let data = load();
        let entity = &data.entities[0];
        let mut frame = FrameData::default();
        for animation in entity.animations.iter() {
            let mut t = 0.0;
            while t <= animation.length {
                compose(entity, animation, t, &mut frame);
                assert!(frame.sprites.len() <= entity.pool_sizes.sprites);
                assert!(frame.boxes.len() <= entity.pool_sizes.boxes);
                assert!(frame.points.len() <= entity.pool_sizes.points);
                t += 50.0;
            }
        }
        assert_eq!(entity.pool_sizes, PoolSizes { sprites: 2, boxes: 1, points: 1 });
    }
}
