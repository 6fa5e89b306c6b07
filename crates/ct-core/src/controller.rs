use rand::{rngs::StdRng, Rng};

use crate::{
    engine, CampaignConfig, CampaignId, CampaignSnapshot, CoreError, CoreResult, DialItem, KpiSnapshot,
    Notice, NotificationSink, Outlet, ProgressSimulator, SimState, SimulationParams, TickOutcome,
};

#[derive(Clone, Debug)]
struct Active {
    id: CampaignId,
    config: CampaignConfig,
}

/// Owns one simulator and the config it was launched with.
///
/// Every user action goes through here so the sink sees one notice per
/// accepted action. The config stays frozen until [`CampaignController::reset`]
/// or the next launch.
pub struct CampaignController<S, R = StdRng> {
    sim: ProgressSimulator<R>,
    sink: S,
    per_call_cost: f64,
    active: Option<Active>,
}

impl<S: NotificationSink> CampaignController<S, StdRng> {
    pub fn seeded(params: SimulationParams, seed: u64, per_call_cost: f64, sink: S) -> CoreResult<Self> {
        Ok(Self::new(ProgressSimulator::seeded(params, seed)?, per_call_cost, sink))
    }
}

impl<S: NotificationSink, R: Rng> CampaignController<S, R> {
    pub fn new(sim: ProgressSimulator<R>, per_call_cost: f64, sink: S) -> Self {
        Self { sim, sink, per_call_cost, active: None }
    }

    pub fn per_call_cost(&self) -> f64 {
        self.per_call_cost
    }

    pub fn estimate_cost(&self, selected: usize) -> f64 {
        engine::estimate_cost(selected, self.per_call_cost)
    }

    pub fn estimate_finish_time(&self, selected: usize, rate_per_period: u32) -> CoreResult<u64> {
        engine::estimate_finish_time(selected, rate_per_period)
    }

    pub fn launch(&mut self, selection: &[&Outlet], config: CampaignConfig) -> CoreResult<CampaignId> {
        if selection.is_empty() {
            self.sink.notify(Notice::NoSelection);
            return Err(CoreError::validation("no items selected"));
        }
        if let Err(e) = self.check_launch(selection.len(), &config) {
            self.sink.notify(Notice::LaunchRejected { reason: e.to_string() });
            return Err(e);
        }
        if self.sim.state().is_terminal() {
            self.reset();
        }

        let queue: Vec<DialItem> = engine::dial_order(selection, config.prioritization)
            .into_iter()
            .map(DialItem::from)
            .collect();
        let total = queue.len() as u32;
        self.sim.start(queue)?;

        let id = CampaignId::new();
        self.active = Some(Active { id: id.clone(), config });
        self.sink.notify(Notice::Launched { campaign_id: id.clone(), total });
        Ok(id)
    }

    fn check_launch(&self, selected: usize, config: &CampaignConfig) -> CoreResult<()> {
        if self.sim.state().is_active() {
            return Err(CoreError::validation("a campaign is already running"));
        }
        config.validate()?;
        let cost = self.estimate_cost(selected);
        if cost > config.cost_cap as f64 {
            return Err(CoreError::validation(format!(
                "estimated cost {cost:.2} exceeds cost cap {}",
                config.cost_cap
            )));
        }
        Ok(())
    }

    pub fn stop(&mut self) -> bool {
        if !self.sim.stop() {
            return false;
        }
        let p = self.sim.progress();
        self.sink.notify(Notice::Stopped { processed: p.resolved(), total: p.total });
        true
    }

    pub fn pause(&mut self) -> bool {
        let ok = self.sim.pause();
        if ok {
            self.sink.notify(Notice::Paused);
        }
        ok
    }

    pub fn resume(&mut self) -> bool {
        let ok = self.sim.resume();
        if ok {
            self.sink.notify(Notice::Resumed);
        }
        ok
    }

    pub fn tick(&mut self) -> CoreResult<TickOutcome> {
        let outcome = self.sim.tick()?;
        if let TickOutcome::Completed(summary) = &outcome {
            self.sink.notify(Notice::Completed { summary: summary.clone() });
        }
        Ok(outcome)
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.active = None;
    }

    pub fn state(&self) -> SimState {
        self.sim.state()
    }

    pub fn campaign_id(&self) -> Option<&CampaignId> {
        self.active.as_ref().map(|a| &a.id)
    }

    pub fn config(&self) -> Option<&CampaignConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    pub fn simulator(&self) -> &ProgressSimulator<R> {
        &self.sim
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        let progress = self.sim.progress();
        let rate = self.config().map(CampaignConfig::calls_per_minute).unwrap_or(1);
        CampaignSnapshot {
            campaign_id: self.campaign_id().cloned(),
            state: self.sim.state(),
            tick: self.sim.ticks(),
            progress,
            kpis: KpiSnapshot::derive(&progress, self.sim.orders(), self.sim.revenue(), rate),
            log: self.sim.log().cloned().collect(),
        }
    }
}
