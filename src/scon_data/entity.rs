use serde::Deserialize;
use crate::shared_types::default_sprite;

#[derive(Clone, Deserialize, Debug)]
pub struct RawEntity {
    #[serde(default)]
    pub id: usize,
    pub name: String,

    #[serde(default)]
    pub obj_info: Vec<RawObjectInfo>,

    #[serde(rename = "animation")]
    #[serde(default)]
    pub animations: Vec<super::animation::RawAnimation>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawObjectInfo {
    pub name: String,
    #[serde(rename = "type")]
    #[serde(default = "default_sprite")]
    pub object_type: String,
    #[serde(default)]
    pub w: f32,
    #[serde(default)]
    pub h: f32,
    #[serde(default)]
    pub pivot_x: f32,
    #[serde(default)]
    pub pivot_y: f32,
}
