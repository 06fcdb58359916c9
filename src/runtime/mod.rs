pub mod curve;
pub mod model;
pub mod data;
pub mod timeline;
pub mod pose;
pub mod dispatch;
pub mod animator;
pub mod queue;

pub use animator::{Animator, PlaybackStatus};
pub use data::SpriterData;
pub use dispatch::{AssetProvider, FrameSink};
pub use pose::{FrameData, ObjectEntry};
pub use queue::AnimationQueue;
