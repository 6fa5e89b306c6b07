use crate::{CoreError, CoreResult, Outlet, Prioritization};

/// Per-call cost in rupees used by the launch summary.
pub const DEFAULT_PER_CALL_COST: f64 = 2.5;
/// Estimated cost above which the launch summary flags a high-cost operation.
pub const HIGH_COST_THRESHOLD: f64 = 10_000.0;
/// Time until the first call is dialed after launch.
pub const DIAL_LAUNCH_ETA: &str = "30 sec";

/// `selected * per_call`, rounded to paise.
pub fn estimate_cost(selected: usize, per_call: f64) -> f64 {
    ((selected as f64) * per_call * 100.0).round() / 100.0
}

/// `ceil(selected / rate_per_period)`; a zero rate can never finish.
pub fn estimate_finish_time(selected: usize, rate_per_period: u32) -> CoreResult<u64> {
    if rate_per_period == 0 {
        return Err(CoreError::validation("rate per period must be positive"));
    }
    Ok((selected as u64).div_ceil(rate_per_period as u64))
}

/// Dial order for a campaign. Stable: outlets the strategy cannot tell apart
/// keep their selection order.
pub fn dial_order<'a>(outlets: &[&'a Outlet], strategy: Prioritization) -> Vec<&'a Outlet> {
    let mut ordered = outlets.to_vec();
    match strategy {
        Prioritization::Value => ordered.sort_by(|a, b| b.expected_value.cmp(&a.expected_value)),
        Prioritization::Priority => ordered.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        Prioritization::TimeWindow => ordered.sort_by(|a, b| a.window.start.cmp(&b.window.start)),
    }
    ordered
}

/// `round(at_risk * rate / 100)`; rate is a percentage in 20..=100, step 5.
pub fn recoverable_revenue(at_risk: u64, recovery_rate: u32) -> CoreResult<u64> {
    if !(20..=100).contains(&recovery_rate) || recovery_rate % 5 != 0 {
        return Err(CoreError::validation(format!(
            "recovery rate must be a multiple of 5 within 20..=100, got {recovery_rate}"
        )));
    }
    Ok(((at_risk as f64) * (recovery_rate as f64) / 100.0).round() as u64)
}
