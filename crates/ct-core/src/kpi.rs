use serde::{Deserialize, Serialize};

use crate::{
    engine::{estimate_cost, estimate_finish_time, recoverable_revenue, DIAL_LAUNCH_ETA},
    CoreResult, Outlet, ProgressState, SalesRep,
};

/// Live campaign figures, derived from the counters on every tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Percent of dialed calls that got past initiation.
    pub contact_rate: f64,
    pub orders: u32,
    pub revenue: u64,
    pub average_order_value: u64,
    /// Percent of completed calls that produced an order.
    pub call_to_order: f64,
    pub success_rate: f64,
    pub completion_percent: f64,
    pub eta_minutes: u64,
}

impl KpiSnapshot {
    pub fn derive(progress: &ProgressState, orders: u32, revenue: u64, calls_per_minute: u32) -> Self {
        let dialed = progress.sum();
        let contacted = dialed - progress.initiated;
        let contact_rate = pct(contacted, dialed);
        let average_order_value = if orders == 0 { 0 } else { revenue / orders as u64 };
        let outstanding = (progress.total - progress.resolved()) as usize;
        Self {
            contact_rate,
            orders,
            revenue,
            average_order_value,
            call_to_order: pct(orders, progress.completed),
            success_rate: progress.success_rate(),
            completion_percent: progress.completion_percent(),
            eta_minutes: estimate_finish_time(outstanding, calls_per_minute.max(1)).unwrap_or(0),
        }
    }
}

fn pct(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

pub const DEFAULT_RECOVERY_RATE: u32 = 85;

/// Dashboard headline over the absent reps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadlineKpis {
    pub absent_reps: usize,
    pub at_risk: u64,
    pub recovery_rate: u32,
    pub recoverable: u64,
}

impl HeadlineKpis {
    pub fn compute(reps: &[SalesRep], recovery_rate: u32) -> CoreResult<Self> {
        let at_risk = reps.iter().map(|r| r.estimated_value).sum();
        Ok(Self {
            absent_reps: reps.len(),
            at_risk,
            recovery_rate,
            recoverable: recoverable_revenue(at_risk, recovery_rate)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaunchSummary {
    pub selected: usize,
    pub not_in_pjp: usize,
    pub dnd: usize,
    pub estimated_cost: f64,
    pub dial_launch_eta: String,
    pub finish_eta_minutes: u64,
    pub high_cost: bool,
}

impl LaunchSummary {
    pub fn compute(
        selected: &[&Outlet],
        per_call_cost: f64,
        calls_per_minute: u32,
        high_cost_threshold: f64,
    ) -> CoreResult<Self> {
        let estimated_cost = estimate_cost(selected.len(), per_call_cost);
        Ok(Self {
            selected: selected.len(),
            not_in_pjp: selected.iter().filter(|o| !o.in_pjp).count(),
            dnd: selected.iter().filter(|o| o.dnd).count(),
            estimated_cost,
            dial_launch_eta: DIAL_LAUNCH_ETA.to_string(),
            finish_eta_minutes: estimate_finish_time(selected.len(), calls_per_minute)?,
            high_cost: estimated_cost > high_cost_threshold,
        })
    }
}
