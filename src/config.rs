use std::io::Read;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// World-space nodes, see [`SceneAdapter`](crate::adapters::SceneAdapter).
    SceneRenderer,
    /// UI canvas nodes, see [`CanvasAdapter`](crate::adapters::CanvasAdapter).
    UiCanvas,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::SceneRenderer
    }
}

fn default_ppu() -> f32 { 100.0 }
fn default_sorting_layer() -> String { "Default".into() }

/// Per-instance settings. Every field has a default, so a config file only
/// lists what it changes:
///
/// ```ron
/// (entity_index: 1, render_mode: UiCanvas, use_native_tags: true)
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    #[serde(default)]
    pub entity_index: usize,

    #[serde(default = "default_ppu")]
    pub ppu: f32,

    #[serde(default = "default_sorting_layer")]
    pub sorting_layer: String,

    #[serde(default)]
    pub sorting_order: i32,

    #[serde(default)]
    pub use_native_tags: bool,

    #[serde(default)]
    pub render_mode: RenderMode,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            entity_index: 0,
            ppu: default_ppu(),
            sorting_layer: default_sorting_layer(),
            sorting_order: 0,
            use_native_tags: false,
            render_mode: RenderMode::default(),
        }
    }
}

impl InstanceConfig {
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(source)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        Ok(ron::de::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = InstanceConfig::from_ron("(entity_index: 1, render_mode: UiCanvas)").unwrap();
        assert_eq!(config.entity_index, 1);
        assert_eq!(config.render_mode, RenderMode::UiCanvas);
        assert_eq!(config.ppu, 100.0);
        assert_eq!(config.sorting_layer, "Default");
        assert!(!config.use_native_tags);
        assert_eq!(InstanceConfig::from_ron("()").unwrap(), InstanceConfig::default());
    }

    #[test]
    fn reads_from_a_reader() {
        let source = "(ppu: 32.0, sorting_order: -2, use_native_tags: true)";
        let config = InstanceConfig::from_reader(source.as_bytes()).unwrap();
        assert_eq!(config.ppu, 32.0);
        assert_eq!(config.sorting_order, -2);
        assert!(config.use_native_tags);
    }

    #[test]
    fn malformed_config_is_reported() {
        assert!(matches!(
            InstanceConfig::from_ron("(render_mode: Hologram)"),
            Err(ConfigError::Ron(_))
        ));
    }
}
