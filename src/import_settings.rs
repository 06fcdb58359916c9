use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::config::RenderMode;
use crate::error::ConfigError;

/// Render mode picked for one imported asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportChoice {
    pub asset: String,
    pub render_mode: RenderMode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImportPoll {
    /// Assets are still waiting for a choice.
    Waiting,
    /// Nothing is left to ask about; confirmed choices were applied.
    Dismissed,
}

/// Collects a render mode for every asset of an import batch. Choices are
/// only applied once the whole batch has been answered.
#[derive(Clone, Debug, Default)]
pub struct ImportSettings {
    pending: VecDeque<String>,
    confirmed: Vec<ImportChoice>,
}

impl ImportSettings {
    pub fn new<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: assets.into_iter().map(Into::into).collect(),
            confirmed: Vec::new(),
        }
    }

    /// The asset currently asked about.
    pub fn current(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn confirmed(&self) -> &[ImportChoice] {
        &self.confirmed
    }

    pub fn choose_current(&mut self, render_mode: RenderMode) {
        if let Some(asset) = self.pending.pop_front() {
            self.confirmed.push(ImportChoice { asset, render_mode });
        }
    }

    pub fn choose_rest(&mut self, render_mode: RenderMode) {
        self.confirmed.extend(self.pending.drain(..).map(|asset| ImportChoice { asset, render_mode }));
    }

    /// Once nothing is pending, hands every confirmed choice to `apply`
    /// exactly once and reports the batch as dismissed.
    pub fn poll(&mut self, mut apply: impl FnMut(&ImportChoice)) -> ImportPoll {
        if !self.pending.is_empty() {
            return ImportPoll::Waiting;
        }
        for choice in self.confirmed.drain(..) {
            apply(&choice);
        }
        ImportPoll::Dismissed
    }

    pub fn choices_to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(&self.confirmed, ron::ser::PrettyConfig::default())?)
    }

    pub fn choices_from_ron(source: &str) -> Result<Vec<ImportChoice>, ConfigError> {
        Ok(ron::de::from_str(source)?)
    }
}
