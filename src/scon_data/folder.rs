use serde::Deserialize;
use crate::shared_types::{default_image, default_pivot_y};

#[derive(Clone, Deserialize, Debug)]
pub struct RawFolder {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "file")]
    #[serde(default)]
    pub files: Vec<RawFile>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawFile {
    #[serde(default)]
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub pivot_x: f32,
    #[serde(default = "default_pivot_y")]
    pub pivot_y: f32,
    #[serde(rename = "type")]
    #[serde(default = "default_image")]
    pub file_type: String,
}
