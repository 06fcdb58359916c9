pub mod folder;
pub mod entity;
pub mod animation;
pub mod timeline;
pub mod tracks;
pub mod transform;

use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct RawSpriterData {
    #[serde(default)]
    pub scon_version: String,

    #[serde(default)]
    pub generator: String,

    #[serde(default)]
    pub generator_version: String,

    #[serde(rename = "folder")]
    #[serde(default)]
    pub folders: Vec<folder::RawFolder>,

    #[serde(rename = "entity")]
    #[serde(default)]
    pub entities: Vec<entity::RawEntity>,

    #[serde(default)]
    pub tag_list: Vec<RawTagDefinition>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct RawTagDefinition {
    #[serde(default)]
    pub id: usize,
    pub name: String,
}

impl RawSpriterData {
    pub fn parse(raw_bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw_bytes)
    }
}
