use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Folder/file pair addressing an image or sound inside the source asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Default)]
pub struct FileRef {
    #[serde(default)]
    pub folder: usize,
    #[serde(default)]
    pub file: usize,
}

impl FileRef {
    pub fn new(folder: usize, file: usize) -> Self {
        Self { folder, file }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Sprite,
    Box,
    Point,
    Sound,
}

// Older exporters write `"looping": "false"`, newer ones a real boolean.
pub(crate) fn deserialize_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected boolean, got \"{}\"", other))),
        },
        Value::Null => Ok(true),
        other => Err(serde::de::Error::custom(format!("expected boolean, got {}", other))),
    }
}

pub(crate) fn default_true() -> bool { true }
pub(crate) fn default_one() -> f32 { 1.0 }
pub(crate) fn default_one_int() -> i32 { 1 }
pub(crate) fn default_no_parent() -> i32 { -1 }
pub(crate) fn default_pivot_y() -> f32 { 1.0 }
pub(crate) fn default_linear() -> String { "linear".into() }
pub(crate) fn default_sprite() -> String { "sprite".into() }
pub(crate) fn default_image() -> String { "image".into() }
pub(crate) fn default_name() -> String { "default".into() }
