use serde::Deserialize;
use crate::shared_types::{default_linear, default_one_int, default_sprite};

#[derive(Clone, Deserialize, Debug)]
pub struct RawTimeline {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "obj")]
    #[serde(default)]
    pub obj_info: Option<usize>,
    #[serde(default = "default_sprite")]
    pub object_type: String,
    #[serde(rename = "key")]
    #[serde(default)]
    pub keys: Vec<RawTimelineKey>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawTimelineKey {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    #[serde(default = "default_one_int")]
    pub spin: i32,
    #[serde(default = "default_linear")]
    pub curve_type: String,
    #[serde(default)]
    pub c1: f32,
    #[serde(default)]
    pub c2: f32,
    #[serde(default)]
    pub c3: f32,
    #[serde(default)]
    pub c4: f32,
    #[serde(default)]
    pub bone: Option<super::transform::RawSpatial>,
    #[serde(default)]
    pub object: Option<super::transform::RawSpatial>,
}
