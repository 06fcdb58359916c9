use serde::Deserialize;
use crate::shared_types::default_one;

/// Spatial block shared by bone and object keys. Objects additionally carry a
/// file reference and an optional pivot which falls back to the file's pivot.
#[derive(Copy, Clone, Deserialize, Debug)]
pub struct RawSpatial {
    #[serde(default)]
    pub folder: Option<usize>,

    #[serde(default)]
    pub file: Option<usize>,

    #[serde(default)]
    pub x: f32,

    #[serde(default)]
    pub y: f32,

    #[serde(default)]
    pub angle: f32,

    #[serde(default = "default_one")]
    pub scale_x: f32,

    #[serde(default = "default_one")]
    pub scale_y: f32,

    #[serde(default)]
    pub pivot_x: Option<f32>,

    #[serde(default)]
    pub pivot_y: Option<f32>,

    #[serde(rename = "a")]
    #[serde(default = "default_one")]
    pub alpha: f32,
}

impl Default for RawSpatial {
    fn default() -> Self {
        Self {
            folder: None,
            file: None,
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            pivot_x: None,
            pivot_y: None,
            alpha: 1.0,
        }
    }
}
