use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ct_core::{CampaignConfig, SimulationParams, DEFAULT_PER_CALL_COST, DEFAULT_RECOVERY_RATE, HIGH_COST_THRESHOLD};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub campaign: CampaignConfig,
    pub simulation: SimulationConfig,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub params: SimulationParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    pub per_call_cost: f64,
    pub high_cost_threshold: f64,
    pub recovery_rate: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// YAML dataset; the builtin demo data when unset. `~` is expanded.
    #[serde(default)]
    pub dataset: Option<String>,
    /// Overrides the seed stored in the dataset.
    #[serde(default)]
    pub attribute_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            campaign: CampaignConfig::default(),
            simulation: SimulationConfig { tick_ms: 1_000, seed: None, params: SimulationParams::default() },
            pricing: PricingConfig {
                per_call_cost: DEFAULT_PER_CALL_COST,
                high_cost_threshold: HIGH_COST_THRESHOLD,
                recovery_rate: DEFAULT_RECOVERY_RATE,
            },
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse calltrigger.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.campaign.validate().context("[campaign]")?;
        self.simulation.params.validate().context("[simulation.params]")?;
        if self.simulation.tick_ms == 0 {
            return Err(anyhow!("[simulation] tick_ms must be positive"));
        }
        if self.pricing.per_call_cost.is_nan() || self.pricing.per_call_cost <= 0.0 {
            return Err(anyhow!("[pricing] per_call_cost must be positive, got {}", self.pricing.per_call_cost));
        }
        ct_core::recoverable_revenue(0, self.pricing.recovery_rate).context("[pricing] recovery_rate")?;
        Ok(())
    }

    /// Absolute dataset path, if one is configured.
    pub fn dataset_path(&self, repo_root: &Path) -> Option<PathBuf> {
        let raw = self.source.dataset.as_deref()?;
        let expanded = PathBuf::from(shellexpand::tilde(raw).to_string());
        Some(if expanded.is_absolute() { expanded } else { repo_root.join(expanded) })
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".calltrigger").join("calltrigger.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::config_path(dir.path());
        let cfg = Config::default();
        cfg.save_to(&path).unwrap();
        let back = Config::load_from(&path).unwrap();
        assert_eq!(back, cfg);
        back.validate().unwrap();
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        let mut cfg = Config::default();
        cfg.simulation.seed = Some(42);
        cfg.source.dataset = Some("data/reps.yaml".into());
        let mut text = toml::to_string_pretty(&cfg).unwrap();
        // drop the optional [source] table entirely
        if let Some(i) = text.find("[source]") {
            text.truncate(i);
        }
        std::fs::write(&path, text).unwrap();
        let back = Config::load_from(&path).unwrap();
        assert_eq!(back.simulation.seed, Some(42));
        assert_eq!(back.source, SourceConfig::default());
    }

    #[test]
    fn test_validate_reports_section() {
        let mut cfg = Config::default();
        cfg.campaign.pacing.concurrent_channels = 99;
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("[campaign]"));

        let mut cfg = Config::default();
        cfg.pricing.recovery_rate = 42;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_dataset_path_is_resolved_against_repo() {
        let mut cfg = Config::default();
        assert!(cfg.dataset_path(Path::new("/repo")).is_none());
        cfg.source.dataset = Some("data/reps.yaml".into());
        assert_eq!(cfg.dataset_path(Path::new("/repo")).unwrap(), PathBuf::from("/repo/data/reps.yaml"));
        cfg.source.dataset = Some("/abs/reps.yaml".into());
        assert_eq!(cfg.dataset_path(Path::new("/repo")).unwrap(), PathBuf::from("/abs/reps.yaml"));
    }
}
