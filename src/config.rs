use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::ChromaResult;
use crate::key::KeyThreshold;

/// Session configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChromaConfig {
    /// Per-channel key classification bound (strict `>` on R, G and B).
    #[serde(default)]
    pub key_threshold: KeyThreshold,
    /// Polling cadence between composite cycles. The next cycle arms only
    /// after the current one finishes, so this is not a frame-rate guarantee.
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,
    /// Background image to composite key pixels from.
    pub background_source: PathBuf,
}

fn default_cycle_interval_ms() -> u64 {
    50
}

impl ChromaConfig {
    pub fn new(background_source: impl Into<PathBuf>) -> Self {
        Self {
            key_threshold: KeyThreshold::default(),
            cycle_interval_ms: default_cycle_interval_ms(),
            background_source: background_source.into(),
        }
    }

    /// Read a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ChromaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_threshold_150_interval_50ms() {
        let cfg = ChromaConfig::new("bg.png");
        assert_eq!(cfg.key_threshold, KeyThreshold(150));
        assert_eq!(cfg.cycle_interval_ms, 50);
        assert_eq!(cfg.cycle_interval(), Duration::from_millis(50));
    }

    #[test]
    fn json_omitted_fields_use_defaults() {
        let cfg: ChromaConfig =
            serde_json::from_str(r#"{ "background_source": "media/beach.jpg" }"#).unwrap();
        assert_eq!(cfg.key_threshold, KeyThreshold(150));
        assert_eq!(cfg.cycle_interval_ms, 50);
        assert_eq!(cfg.background_source, PathBuf::from("media/beach.jpg"));
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let cfg = ChromaConfig {
            key_threshold: KeyThreshold(99),
            cycle_interval_ms: 16,
            background_source: PathBuf::from("bg.png"),
        };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: ChromaConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.key_threshold, KeyThreshold(99));
        assert_eq!(back.cycle_interval_ms, 16);
        assert_eq!(back.background_source, cfg.background_source);
    }
}
