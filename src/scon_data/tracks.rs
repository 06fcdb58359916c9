use serde::Deserialize;
use crate::shared_types::default_one;

#[derive(Clone, Deserialize, Debug)]
pub struct RawSoundline {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "key")]
    #[serde(default)]
    pub keys: Vec<RawSoundKey>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawSoundKey {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    pub object: RawSoundObject,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawSoundObject {
    #[serde(default)]
    pub folder: usize,
    #[serde(default)]
    pub file: usize,
    #[serde(default = "default_one")]
    pub volume: f32,
    #[serde(default)]
    pub panning: f32,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawEventline {
    #[serde(default)]
    pub id: usize,
    pub name: String,
    #[serde(rename = "key")]
    #[serde(default)]
    pub keys: Vec<RawTimedKey>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawTimedKey {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub time: f32,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct RawMeta {
    #[serde(default)]
    pub tagline: Option<RawTagline>,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct RawTagline {
    #[serde(rename = "key")]
    #[serde(default)]
    pub keys: Vec<RawTagKey>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawTagKey {
    #[serde(default)]
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    #[serde(rename = "tag")]
    #[serde(default)]
    pub tags: Vec<RawTagRef>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawTagRef {
    #[serde(default)]
    pub id: usize,
    pub t: usize,
}
