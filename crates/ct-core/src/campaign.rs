use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{model::*, types::*, CoreError, CoreResult};

pub const CONCURRENT_CHANNELS: std::ops::RangeInclusive<u32> = 1..=50;
pub const RING_TIME_SECS: std::ops::RangeInclusive<u32> = 10..=60;
pub const RETRY_ATTEMPTS: std::ops::RangeInclusive<u32> = 0..=5;
pub const RETRY_BACKOFF_MINS: std::ops::RangeInclusive<u32> = 1..=60;
pub const COST_CAP: std::ops::RangeInclusive<u64> = 100..=50_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Schedule {
    Now,
    At { when: NaiveDateTime },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notifications {
    pub whatsapp_pre: bool,
    pub whatsapp_post: bool,
    pub recording: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Pacing {
    pub concurrent_channels: u32,
    pub ring_time_secs: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff_mins: u32,
}

impl RetryPolicy {
    /// Minute offsets after the first dial at which each retry fires.
    pub fn schedule(&self) -> Vec<u32> {
        crate::retry_schedule(self.attempts, self.backoff_mins)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Compliance {
    pub respect_dnd: bool,
    pub quiet_hours: bool,
}

/// Calling parameters for one campaign. Frozen by the controller at launch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CampaignConfig {
    /// `None` means the day the campaign is launched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub window: TimeWindow,
    pub agent: Agent,
    pub language_fallback: Language,
    pub trunk: TrunkProvider,
    pub notifications: Notifications,
    pub pacing: Pacing,
    pub retry: RetryPolicy,
    pub prioritization: Prioritization,
    pub compliance: Compliance,
    pub cost_cap: u64,
    pub schedule: Schedule,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            date: None,
            window: TimeWindow {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
                end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            },
            agent: Agent::Hindi,
            language_fallback: Language::English,
            trunk: TrunkProvider::Plivo,
            notifications: Notifications { whatsapp_pre: true, whatsapp_post: false, recording: true },
            pacing: Pacing { concurrent_channels: 10, ring_time_secs: 30 },
            retry: RetryPolicy { attempts: 3, backoff_mins: 5 },
            prioritization: Prioritization::Value,
            compliance: Compliance { respect_dnd: true, quiet_hours: true },
            cost_cap: 5_000,
            schedule: Schedule::Now,
        }
    }
}

fn check_range<T>(name: &str, value: T, range: &std::ops::RangeInclusive<T>) -> CoreResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if !range.contains(&value) {
        return Err(CoreError::validation(format!(
            "{name} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

impl CampaignConfig {
    /// Bounds follow the settings form; anything outside them is rejected, not clamped.
    pub fn validate(&self) -> CoreResult<()> {
        self.window.validate()?;
        check_range("concurrent_channels", self.pacing.concurrent_channels, &CONCURRENT_CHANNELS)?;
        check_range("ring_time_secs", self.pacing.ring_time_secs, &RING_TIME_SECS)?;
        check_range("retry.attempts", self.retry.attempts, &RETRY_ATTEMPTS)?;
        check_range("retry.backoff_mins", self.retry.backoff_mins, &RETRY_BACKOFF_MINS)?;
        check_range("cost_cap", self.cost_cap, &COST_CAP)?;
        Ok(())
    }

    /// Sustained calls per minute: dialing is bounded by the trunk's CPS,
    /// answering by the channel count at roughly one call per channel-minute.
    pub fn calls_per_minute(&self) -> u32 {
        (self.trunk.cps() * 60).min(self.pacing.concurrent_channels).max(1)
    }
}
