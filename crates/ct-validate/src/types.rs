use serde::{Deserialize, Serialize};

use ct_core::{CampaignConfig, HIGH_COST_THRESHOLD};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCategory {
    Selection,
    Budget,
    Compliance,
    Schedule,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warn,
    Fail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: ValidationCategory,
    pub severity: Severity,
    pub message: String,
}

/// Everything the pre-launch rules look at.
#[derive(Clone, Debug)]
pub struct ValidateInput {
    pub selected: usize,
    /// Selected outlets flagged Do Not Disturb.
    pub dnd_selected: usize,
    pub estimated_cost: f64,
    pub finish_eta_minutes: u64,
    pub high_cost_threshold: f64,
    pub config: CampaignConfig,
}

impl Default for ValidateInput {
    fn default() -> Self {
        Self {
            selected: 0,
            dnd_selected: 0,
            estimated_cost: 0.0,
            finish_eta_minutes: 0,
            high_cost_threshold: HIGH_COST_THRESHOLD,
            config: CampaignConfig::default(),
        }
    }
}
