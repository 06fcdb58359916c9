//! Error types for loading, playback and configuration.

use thiserror::Error;

/// Raised while turning a SCON document into the runtime model. No entity is
/// ever handed out when one of these occurs.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document is not valid SCON JSON
    #[error("Malformed SCON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Timeline keys are out of order or share a timestamp
    #[error("Timeline '{timeline}' in animation '{animation}' has non-increasing key times ({previous} then {next})")]
    NonMonotonicKeys {
        animation: String,
        timeline: String,
        previous: f32,
        next: f32,
    },

    /// Mainline keys are out of order or share a timestamp
    #[error("Mainline of animation '{animation}' has non-increasing key times")]
    NonMonotonicMainline { animation: String },

    /// A bone reference chain loops back on itself
    #[error("Cyclic bone hierarchy in animation '{animation}' at mainline key {key}")]
    CyclicHierarchy { animation: String, key: usize },

    /// A reference names a parent bone that does not exist in its key
    #[error("Reference {reference} in animation '{animation}' names missing parent bone {parent}")]
    MissingParent {
        animation: String,
        reference: usize,
        parent: i32,
    },

    /// A mainline reference points past the timeline list
    #[error("Animation '{animation}' references missing timeline {timeline}")]
    MissingTimeline { animation: String, timeline: usize },

    /// A timeline has no keys at all
    #[error("Timeline '{timeline}' in animation '{animation}' has no keys")]
    EmptyTimeline { animation: String, timeline: String },

    /// A key references a folder/file pair absent from the folder list
    #[error("Missing file {file} in folder {folder}")]
    MissingFile { folder: usize, file: usize },

    /// A timeline references an object info the entity does not declare
    #[error("Entity '{entity}' has no object info {index}")]
    MissingObjectInfo { entity: String, index: usize },

    /// A tagline key references a tag outside the tag list
    #[error("Unknown tag index {0}")]
    UnknownTag(usize),

    /// Curve type outside the closed set of Spriter curves
    #[error("Unknown curve type: {0}")]
    UnknownCurve(String),

    /// Object type this runtime cannot play back
    #[error("Unsupported object type: {0}")]
    UnsupportedObjectType(String),

    /// Animation length below zero
    #[error("Animation '{animation}' has invalid length {length}")]
    InvalidLength { animation: String, length: f32 },
}

/// Lookup failures reported to the caller. Playback state is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    #[error("Entity index {index} out of bounds (count: {count})")]
    EntityNotFound { index: usize, count: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid RON configuration: {0}")]
    Ron(#[from] ron::Error),
}
