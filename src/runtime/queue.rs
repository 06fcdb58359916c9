use std::collections::VecDeque;
use crate::error::PlaybackError;
use crate::runtime::animator::Animator;
use crate::runtime::dispatch::FrameSink;

/// Animation names to play one after another. Each time the current
/// animation finishes the next name is played at normal speed.
#[derive(Clone, Debug, Default)]
pub struct AnimationQueue {
    pending: VecDeque<String>,
}

impl AnimationQueue {
    pub fn push(&mut self, name: impl Into<String>) {
        self.pending.push_back(name.into());
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    /// Call after `Animator::update`. When the animator finished during that
    /// update, pops the next name and plays it. Returns the started name.
    ///
    /// A name the entity does not know is consumed and reported.
    pub fn advance<K: FrameSink>(&mut self, animator: &mut Animator<'_, K>) -> Result<Option<String>, PlaybackError> {
        if animator.finished_this_tick().is_none() {
            return Ok(None);
        }
        let name = match self.pending.pop_front() {
            Some(name) => name,
            None => return Ok(None),
        };
        animator.set_speed(1.0);
        animator.play(&name)?;
        Ok(Some(name))
    }
}
