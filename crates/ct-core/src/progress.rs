use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{Bucket, CoreError, CoreResult, Outlet, OutletId, SimState};

/// Bucket counters for one campaign. Buckets are disjoint stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub total: u32,
    pub initiated: u32,
    pub ringing: u32,
    pub live: u32,
    pub completed: u32,
    pub failed: u32,
}

impl ProgressState {
    pub fn sum(&self) -> u32 {
        self.initiated + self.ringing + self.live + self.completed + self.failed
    }

    pub fn resolved(&self) -> u32 {
        self.completed + self.failed
    }

    pub fn remaining_to_dial(&self) -> u32 {
        self.total.saturating_sub(self.sum())
    }

    pub fn in_flight(&self) -> u32 {
        self.initiated + self.ringing + self.live
    }

    pub fn is_done(&self) -> bool {
        self.total > 0 && self.resolved() == self.total
    }

    pub fn get(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::Initiated => self.initiated,
            Bucket::Ringing => self.ringing,
            Bucket::Live => self.live,
            Bucket::Completed => self.completed,
            Bucket::Failed => self.failed,
        }
    }

    /// `completed / (completed + failed)` as a percentage; 0 before anything resolves.
    pub fn success_rate(&self) -> f64 {
        match self.resolved() {
            0 => 0.0,
            n => self.completed as f64 * 100.0 / n as f64,
        }
    }

    pub fn completion_percent(&self) -> f64 {
        match self.total {
            0 => 0.0,
            t => self.resolved() as f64 * 100.0 / t as f64,
        }
    }

    pub fn check(&self) -> CoreResult<()> {
        if self.sum() > self.total {
            return Err(CoreError::invariant(format!(
                "bucket sum {} exceeds total {}",
                self.sum(),
                self.total
            )));
        }
        Ok(())
    }

    /// Conservation plus monotonicity between two consecutive published states.
    pub fn check_transition(&self, prev: &ProgressState) -> CoreResult<()> {
        self.check()?;
        if self.total != prev.total {
            return Err(CoreError::invariant(format!("total changed {} -> {}", prev.total, self.total)));
        }
        if self.sum() < prev.sum() {
            return Err(CoreError::invariant(format!("bucket sum fell {} -> {}", prev.sum(), self.sum())));
        }
        if self.completed < prev.completed || self.failed < prev.failed {
            return Err(CoreError::invariant("resolved counters decreased"));
        }
        Ok(())
    }
}

/// Tunables for the simulated dialer. Ratios are probabilities in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub dial_min: u32,
    pub dial_max: u32,
    /// Chance an initiated call starts ringing this tick.
    pub ring_ratio: f64,
    /// Chance a ringing call is picked up this tick.
    pub answer_ratio: f64,
    /// Chance a live call ends this tick.
    pub resolve_ratio: f64,
    pub success_ratio: f64,
    pub order_ratio: f64,
    pub log_capacity: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            dial_min: 1,
            dial_max: 3,
            ring_ratio: 0.5,
            answer_ratio: 0.5,
            resolve_ratio: 0.5,
            success_ratio: 0.85,
            order_ratio: 0.6,
            log_capacity: 20,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> CoreResult<()> {
        if self.dial_min == 0 || self.dial_min > self.dial_max {
            return Err(CoreError::validation(format!(
                "dial range must satisfy 1 <= dial_min <= dial_max, got {}..={}",
                self.dial_min, self.dial_max
            )));
        }
        for (name, v) in [
            ("ring_ratio", self.ring_ratio),
            ("answer_ratio", self.answer_ratio),
            ("resolve_ratio", self.resolve_ratio),
            ("success_ratio", self.success_ratio),
            ("order_ratio", self.order_ratio),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(CoreError::validation(format!("{name} must be within 0..=1, got {v}")));
            }
        }
        Ok(())
    }
}

/// One outlet queued for dialing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialItem {
    pub outlet_id: OutletId,
    pub outlet_name: String,
    pub phone: String,
    pub expected_value: u64,
}

impl From<&Outlet> for DialItem {
    fn from(o: &Outlet) -> Self {
        Self {
            outlet_id: o.id.clone(),
            outlet_name: o.name.clone(),
            phone: o.primary_phone().unwrap_or_default().to_string(),
            expected_value: o.expected_value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub seq: u64,
    pub tick: u64,
    pub outlet_id: OutletId,
    pub outlet_name: String,
    pub phone: String,
    /// `Completed` or `Failed`.
    pub status: Bucket,
    pub order_value: Option<u64>,
}

impl CallLogEntry {
    pub fn result(&self) -> &'static str {
        match (self.status, self.order_value) {
            (Bucket::Completed, Some(_)) => "Order placed",
            (Bucket::Completed, None) => "No order",
            _ => "No answer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
    pub success_rate: f64,
    pub orders: u32,
    pub revenue: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Skipped,
    Advanced,
    /// This tick resolved the last call.
    Completed(CampaignSummary),
}

/// Calls in flight, tracked by queue index so the log can name the outlet.
#[derive(Clone, Debug, Default)]
struct Flight {
    next: usize,
    initiated: VecDeque<usize>,
    ringing: VecDeque<usize>,
    live: VecDeque<usize>,
    completed: u32,
    failed: u32,
    orders: u32,
    revenue: u64,
    ticks: u64,
    seq: u64,
    log: VecDeque<CallLogEntry>,
}

impl Flight {
    fn progress(&self, total: u32) -> ProgressState {
        ProgressState {
            total,
            initiated: self.initiated.len() as u32,
            ringing: self.ringing.len() as u32,
            live: self.live.len() as u32,
            completed: self.completed,
            failed: self.failed,
        }
    }
}

/// Number of `n` items that move on this tick; at least one when `n > 0`.
fn movers<R: Rng>(rng: &mut R, n: usize, ratio: f64) -> usize {
    if n == 0 {
        return 0;
    }
    (0..n).filter(|_| rng.gen_bool(ratio)).count().max(1)
}

fn shift(from: &mut VecDeque<usize>, to: &mut VecDeque<usize>, n: usize) {
    for _ in 0..n {
        match from.pop_front() {
            Some(i) => to.push_back(i),
            None => break,
        }
    }
}

fn advance<R: Rng>(f: &mut Flight, queue: &[DialItem], params: &SimulationParams, rng: &mut R) {
    f.ticks += 1;

    // moves are sized from the counts at the start of the tick
    let resolving = movers(rng, f.live.len(), params.resolve_ratio);
    let answering = movers(rng, f.ringing.len(), params.answer_ratio);
    let ringing = movers(rng, f.initiated.len(), params.ring_ratio);
    let remaining = queue.len() - f.next;
    let dialing = rng.gen_range(params.dial_min..=params.dial_max) as usize;
    let dialing = dialing.min(remaining);

    for _ in 0..resolving {
        let Some(idx) = f.live.pop_front() else { break };
        let item = &queue[idx];
        let (status, order_value) = if rng.gen_bool(params.success_ratio) {
            f.completed += 1;
            let order = if rng.gen_bool(params.order_ratio) {
                let lo = item.expected_value / 2;
                let hi = (item.expected_value * 3 / 2).max(lo);
                Some(rng.gen_range(lo..=hi))
            } else {
                None
            };
            if let Some(v) = order {
                f.orders += 1;
                f.revenue += v;
            }
            (Bucket::Completed, order)
        } else {
            f.failed += 1;
            (Bucket::Failed, None)
        };
        f.seq += 1;
        f.log.push_front(CallLogEntry {
            seq: f.seq,
            tick: f.ticks,
            outlet_id: item.outlet_id.clone(),
            outlet_name: item.outlet_name.clone(),
            phone: item.phone.clone(),
            status,
            order_value,
        });
    }
    f.log.truncate(params.log_capacity);

    let Flight { initiated, ringing: ring_q, live, .. } = &mut *f;
    shift(ring_q, live, answering);
    shift(initiated, ring_q, ringing);

    for idx in f.next..f.next + dialing {
        f.initiated.push_back(idx);
    }
    f.next += dialing;
}

/// Drives the bucket counters for one campaign.
///
/// `idle -> running -> {paused <-> running} -> stopped | completed`.
/// A tick is computed on a private copy and published whole, so a stop
/// between ticks never observes a half-applied step.
pub struct ProgressSimulator<R = StdRng> {
    params: SimulationParams,
    rng: R,
    state: SimState,
    queue: Vec<DialItem>,
    flight: Flight,
}

impl ProgressSimulator<StdRng> {
    pub fn seeded(params: SimulationParams, seed: u64) -> CoreResult<Self> {
        Self::new(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ProgressSimulator<R> {
    pub fn new(params: SimulationParams, rng: R) -> CoreResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng,
            state: SimState::Idle,
            queue: Vec::new(),
            flight: Flight::default(),
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn total(&self) -> u32 {
        self.queue.len() as u32
    }

    pub fn progress(&self) -> ProgressState {
        self.flight.progress(self.total())
    }

    pub fn orders(&self) -> u32 {
        self.flight.orders
    }

    pub fn revenue(&self) -> u64 {
        self.flight.revenue
    }

    pub fn ticks(&self) -> u64 {
        self.flight.ticks
    }

    /// Newest first.
    pub fn log(&self) -> impl Iterator<Item = &CallLogEntry> {
        self.flight.log.iter()
    }

    pub fn queue(&self) -> &[DialItem] {
        &self.queue
    }

    pub fn start(&mut self, queue: Vec<DialItem>) -> CoreResult<()> {
        if self.state != SimState::Idle {
            return Err(CoreError::validation(format!(
                "simulator must be idle to start, is {:?}",
                self.state
            )));
        }
        if queue.is_empty() {
            return Err(CoreError::validation("no items selected"));
        }
        self.queue = queue;
        self.flight = Flight::default();
        self.state = SimState::Running;
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        self.transition(SimState::Running, SimState::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(SimState::Paused, SimState::Running)
    }

    /// Terminal. Counters stay as they were after the last published tick.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.state = SimState::Stopped;
        true
    }

    fn transition(&mut self, from: SimState, to: SimState) -> bool {
        if self.state != from {
            return false;
        }
        self.state = to;
        true
    }

    pub fn tick(&mut self) -> CoreResult<TickOutcome> {
        if self.state != SimState::Running {
            return Ok(TickOutcome::Skipped);
        }
        let total = self.total();
        let prev = self.flight.progress(total);
        let mut next = self.flight.clone();
        advance(&mut next, &self.queue, &self.params, &mut self.rng);
        next.progress(total).check_transition(&prev)?;
        self.flight = next;

        if self.progress().is_done() {
            self.state = SimState::Completed;
            return Ok(TickOutcome::Completed(self.summary()));
        }
        Ok(TickOutcome::Advanced)
    }

    pub fn summary(&self) -> CampaignSummary {
        let p = self.progress();
        CampaignSummary {
            total: p.total,
            completed: p.completed,
            failed: p.failed,
            success_rate: p.success_rate(),
            orders: self.flight.orders,
            revenue: self.flight.revenue,
        }
    }

    pub fn reset(&mut self) {
        self.state = SimState::Idle;
        self.queue.clear();
        self.flight = Flight::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<DialItem> {
        (0..n)
            .map(|i| DialItem {
                outlet_id: OutletId::from_str(format!("1-{i}")),
                outlet_name: format!("Outlet {i}"),
                phone: format!("+91 98765{i:05}"),
                expected_value: 2000,
            })
            .collect()
    }

    fn sim() -> ProgressSimulator {
        ProgressSimulator::seeded(SimulationParams::default(), 7).unwrap()
    }

    #[test]
    fn empty_queue_is_rejected_and_stays_idle() {
        let mut s = sim();
        let err = s.start(vec![]).unwrap_err();
        assert_eq!(err, CoreError::validation("no items selected"));
        assert_eq!(s.state(), SimState::Idle);
        assert_eq!(s.tick().unwrap(), TickOutcome::Skipped);
    }

    #[test]
    fn runs_to_completion() {
        let mut s = sim();
        s.start(items(10)).unwrap();
        let mut summary = None;
        for _ in 0..200 {
            if let TickOutcome::Completed(sum) = s.tick().unwrap() {
                summary = Some(sum);
                break;
            }
        }
        let summary = summary.expect("campaign should complete");
        assert_eq!(summary.completed + summary.failed, 10);
        assert_eq!(s.state(), SimState::Completed);
        assert_eq!(s.tick().unwrap(), TickOutcome::Skipped);
    }

    #[test]
    fn first_tick_only_dials() {
        let mut s = sim();
        s.start(items(10)).unwrap();
        s.tick().unwrap();
        let p = s.progress();
        assert!((1..=3).contains(&p.initiated));
        assert_eq!(p.ringing + p.live + p.resolved(), 0);
    }

    #[test]
    fn log_is_bounded_and_newest_first() {
        let params = SimulationParams { log_capacity: 3, ..Default::default() };
        let mut s = ProgressSimulator::seeded(params, 1).unwrap();
        s.start(items(30)).unwrap();
        while s.state() == SimState::Running {
            s.tick().unwrap();
        }
        let seqs: Vec<u64> = s.log().map(|e| e.seq).collect();
        assert_eq!(seqs, [30, 29, 28]);
    }

    #[test]
    fn orders_only_come_from_completed_calls() {
        let params = SimulationParams { success_ratio: 0.0, ..Default::default() };
        let mut s = ProgressSimulator::seeded(params, 3).unwrap();
        s.start(items(12)).unwrap();
        while s.state() == SimState::Running {
            s.tick().unwrap();
        }
        let p = s.progress();
        assert_eq!(p.failed, 12);
        assert_eq!(s.orders(), 0);
        assert_eq!(s.revenue(), 0);
        assert_eq!(p.success_rate(), 0.0);
    }

    #[test]
    fn stop_is_terminal_and_idempotent() {
        let mut s = sim();
        assert!(!s.stop());
        s.start(items(5)).unwrap();
        s.tick().unwrap();
        assert!(s.stop());
        assert!(!s.stop());
        assert!(!s.resume());
        assert!(s.start(items(5)).is_err());
        s.reset();
        assert_eq!(s.state(), SimState::Idle);
        assert_eq!(s.progress(), ProgressState::default());
    }

    #[test]
    fn bad_params_are_rejected() {
        let params = SimulationParams { dial_min: 4, dial_max: 2, ..Default::default() };
        assert!(ProgressSimulator::seeded(params, 0).is_err());
        let params = SimulationParams { order_ratio: 1.5, ..Default::default() };
        assert!(ProgressSimulator::seeded(params, 0).is_err());
    }

    #[test]
    fn transition_check_catches_decrease() {
        let prev = ProgressState { total: 5, completed: 2, ..Default::default() };
        let next = ProgressState { total: 5, failed: 3, ..Default::default() };
        assert!(next.check_transition(&prev).is_err());
        let over = ProgressState { total: 1, initiated: 2, ..Default::default() };
        assert!(over.check().is_err());
    }
}
