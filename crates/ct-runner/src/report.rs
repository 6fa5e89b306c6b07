use ct_core::{CampaignConfig, CampaignSnapshot, HeadlineKpis, LaunchSummary};
use ct_validate::{Finding, Severity};

use crate::util::format_inr;

/// Markdown report printed when a campaign ends (completed or stopped).
pub fn format_campaign_report(snap: &CampaignSnapshot, cfg: &CampaignConfig) -> String {
    let p = &snap.progress;
    let k = &snap.kpis;
    let mut s = String::new();
    let id = snap.campaign_id.as_ref().map(|c| c.as_str()).unwrap_or("-");
    s.push_str(&format!("# Campaign {}: {:?}\n\n", id, snap.state));
    s.push_str(&format!(
        "**Agent:** {} | **Trunk:** {} | **Window:** {}\n\n",
        cfg.agent.display_name(),
        cfg.trunk.label(),
        cfg.window.label()
    ));
    s.push_str("## Calls\n");
    s.push_str(&format!("- Total: {}\n", p.total));
    s.push_str(&format!("- Completed: {}\n", p.completed));
    s.push_str(&format!("- Failed: {}\n", p.failed));
    s.push_str(&format!("- Not reached: {}\n", p.total - p.resolved()));
    s.push_str(&format!("- Success rate: {:.0}%\n\n", k.success_rate));
    s.push_str("## Orders\n");
    s.push_str(&format!("- Orders: {}\n", k.orders));
    s.push_str(&format!("- Revenue: {}\n", format_inr(k.revenue)));
    s.push_str(&format!("- Average order value: {}\n", format_inr(k.average_order_value)));
    s.push_str(&format!("- Call to order: {:.0}%\n", k.call_to_order));
    if !snap.log.is_empty() {
        s.push_str("\n## Recent calls\n");
        for e in &snap.log {
            let value = e.order_value.map(format_inr).unwrap_or_else(|| "-".to_string());
            s.push_str(&format!("- {} ({}) {} {}: {}\n", e.outlet_name, e.phone, e.status.label(), e.result(), value));
        }
    }
    s
}

pub fn format_headline(h: &HeadlineKpis) -> String {
    format!(
        "Absent reps: {} | At risk: {} | Recoverable at {}%: {}",
        h.absent_reps,
        format_inr(h.at_risk),
        h.recovery_rate,
        format_inr(h.recoverable)
    )
}

pub fn format_launch_summary(l: &LaunchSummary, findings: &[Finding]) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "Selected: {} ({} not in PJP) | Est. cost: ₹{:.2} | Dial launch: {} | Finish ETA: {} min\n",
        l.selected, l.not_in_pjp, l.estimated_cost, l.dial_launch_eta, l.finish_eta_minutes
    ));
    for f in findings {
        let tag = match f.severity {
            Severity::Fail => "FAIL",
            Severity::Warn => "WARN",
        };
        s.push_str(&format!("[{}] {}: {}\n", tag, f.rule_id, f.message));
    }
    s
}
