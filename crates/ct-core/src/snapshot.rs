use serde::{Deserialize, Serialize};

use crate::{CallLogEntry, CampaignId, KpiSnapshot, ProgressState, SimState};

/// Read-only view of a campaign, published after each full tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub campaign_id: Option<CampaignId>,
    pub state: SimState,
    pub tick: u64,
    pub progress: ProgressState,
    pub kpis: KpiSnapshot,
    /// Newest first.
    pub log: Vec<CallLogEntry>,
}

impl CampaignSnapshot {
    pub fn status_line(&self) -> String {
        let p = &self.progress;
        format!(
            "[{:?}] tick {} | initiated {} ringing {} live {} completed {} failed {} / {} ({:.0}%)",
            self.state,
            self.tick,
            p.initiated,
            p.ringing,
            p.live,
            p.completed,
            p.failed,
            p.total,
            self.kpis.completion_percent
        )
    }
}
