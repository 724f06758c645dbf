use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::insight::DEFAULT_RANGE_BIAS_RATIO;
use crate::stats::DEFAULT_HOT_TOP_N;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Number of most recent draws analysed.
    pub window: usize,
    pub hot_top_n: usize,
    pub interval_size: u32,
    pub range_bias_ratio: f64,
    /// Overlap at or below which two successive draws count as a drop.
    pub max_drop_overlap: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            window: 10,
            hot_top_n: DEFAULT_HOT_TOP_N,
            interval_size: 5,
            range_bias_ratio: DEFAULT_RANGE_BIAS_RATIO,
            max_drop_overlap: 1,
        }
    }
}

impl InsightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            bail!("window must be at least 1");
        }
        if self.interval_size == 0 {
            bail!("interval_size must be at least 1");
        }
        if !self.range_bias_ratio.is_finite() || self.range_bias_ratio <= 0.0 {
            bail!("range_bias_ratio must be a positive number");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {:?}", path))?;
        let config: InsightConfig =
            serde_json::from_str(&json).with_context(|| format!("Invalid config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Cannot write config {:?}", path))?;
        Ok(())
    }
}
