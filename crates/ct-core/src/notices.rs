use serde::{Deserialize, Serialize};

use crate::{CampaignId, CampaignSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// User-facing toast raised by the campaign controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    NoSelection,
    Launched { campaign_id: CampaignId, total: u32 },
    LaunchRejected { reason: String },
    Paused,
    Resumed,
    Stopped { processed: u32, total: u32 },
    Completed { summary: CampaignSummary },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::NoSelection => "No Outlets Selected",
            Notice::Launched { .. } => "Campaign Launched",
            Notice::LaunchRejected { .. } => "Launch Failed",
            Notice::Paused => "Campaign Paused",
            Notice::Resumed => "Campaign Resumed",
            Notice::Stopped { .. } => "Campaign Stopped",
            Notice::Completed { .. } => "Campaign Completed",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notice::NoSelection => "Please select at least one outlet to start calls.".to_string(),
            Notice::Launched { total, .. } => format!("Started calling {total} outlets."),
            Notice::LaunchRejected { reason } => reason.clone(),
            Notice::Paused => "Dialing is on hold.".to_string(),
            Notice::Resumed => "Dialing resumed.".to_string(),
            Notice::Stopped { processed, total } => {
                format!("All active calls have been terminated. {processed} of {total} calls processed.")
            }
            Notice::Completed { summary } => format!(
                "{} calls processed with {:.0}% success rate.",
                summary.completed + summary.failed,
                summary.success_rate
            ),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::NoSelection | Notice::LaunchRejected { .. } => NoticeLevel::Error,
            Notice::Launched { .. } | Notice::Completed { .. } => NoticeLevel::Success,
            _ => NoticeLevel::Info,
        }
    }
}

/// Where notices go. Fire-and-forget: a sink never fails the caller.
pub trait NotificationSink {
    fn notify(&mut self, notice: Notice);
}

/// Keeps every notice in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub notices: Vec<Notice>,
}

impl RecordingSink {
    pub fn titles(&self) -> Vec<&'static str> {
        self.notices.iter().map(Notice::title).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_reports_success_rate() {
        let n = Notice::Completed {
            summary: CampaignSummary { total: 10, completed: 8, failed: 2, success_rate: 80.0, orders: 5, revenue: 9_000 },
        };
        assert_eq!(n.description(), "10 calls processed with 80% success rate.");
        assert_eq!(n.level(), NoticeLevel::Success);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.notify(Notice::Paused);
        sink.notify(Notice::LaunchRejected { reason: "no items selected".into() });
        assert_eq!(sink.titles(), ["Campaign Paused", "Launch Failed"]);
        assert_eq!(sink.notices[1].level(), NoticeLevel::Error);
    }
}
