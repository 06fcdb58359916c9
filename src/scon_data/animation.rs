use serde::Deserialize;
use crate::shared_types::{default_linear, default_name, default_no_parent, default_true, deserialize_loose_bool};

#[derive(Clone, Deserialize, Debug)]
pub struct RawAnimation {
    #[serde(default)]
    pub id: usize,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub length: f32,
    #[serde(default)]
    pub interval: f32,
    #[serde(default = "default_true")]
    #[serde(deserialize_with = "deserialize_loose_bool")]
    pub looping: bool,

    #[serde(default)]
    pub mainline: RawMainline,

    #[serde(rename = "timeline")]
    #[serde(default)]
    pub timelines: Vec<super::timeline::RawTimeline>,

    #[serde(rename = "soundline")]
    #[serde(default)]
    pub soundlines: Vec<super::tracks::RawSoundline>,

    #[serde(rename = "eventline")]
    #[serde(default)]
    pub eventlines: Vec<super::tracks::RawEventline>,

    #[serde(default)]
    pub meta: Option<super::tracks::RawMeta>,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct RawMainline {
    #[serde(rename = "key")]
    #[serde(default)]
    pub keys: Vec<RawMainlineKey>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawMainlineKey {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub time: f32,
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
    pub bone_ref: Vec<RawRef>,
    #[serde(default)]
    pub object_ref: Vec<RawRef>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawRef {
    #[serde(default)]
    pub id: usize,
    #[serde(default = "default_no_parent")]
    pub parent: i32,
    pub timeline: usize,
    #[serde(default)]
    pub key: usize,
    #[serde(default)]
    pub z_index: i32,
}
