use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rand::Rng;
use tracing::{debug, info, warn};

use ct_core::{
    CampaignController, CampaignSnapshot, HeadlineKpis, LaunchSummary, Notice, NotificationSink, Outlet, TickOutcome,
};
use ct_source::{MockSource, RecordSource};
use ct_validate::{default_rules, is_blocking, run_rules, Finding, Severity, ValidateInput};

use crate::{doctor::doctor, Clock, Config, Session, TickTimer};

pub struct Runner {
    pub repo_root: PathBuf,
    pub cfg: Config,
    pub source: Box<dyn RecordSource>,
}

/// What the per-tick callback wants the loop to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Pause,
    Resume,
    Stop,
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Overrides `[simulation] seed`.
    pub seed: Option<u64>,
    /// Stop the campaign after this many ticks.
    pub max_ticks: Option<u64>,
}

pub struct CampaignOutcome<S> {
    pub controller: CampaignController<S>,
    pub snapshot: CampaignSnapshot,
    pub findings: Vec<Finding>,
    pub held_for_dnd: usize,
    pub seed: u64,
}

impl Runner {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let cfg_path = Config::config_path(&repo_root);
        let cfg = if cfg_path.exists() {
            Config::load_from(&cfg_path)?
        } else {
            let cfg = Config::default();
            cfg.save_to(&cfg_path)?;
            cfg
        };
        let source = open_source(&repo_root, &cfg)?;
        debug!(source = %source.describe(), "record source ready");
        Ok(Self { repo_root, cfg, source })
    }

    pub fn init_repo(repo_root: &Path) -> Result<PathBuf> {
        let cfg_path = Config::config_path(repo_root);
        if !cfg_path.exists() {
            Config::default().save_to(&cfg_path)?;
        }
        Ok(cfg_path)
    }

    pub fn doctor(&self) -> Result<()> {
        doctor(&self.repo_root, &self.cfg, self.source.as_ref())
    }

    pub fn session(&self) -> Result<Session> {
        Session::load(self.source.as_ref())
    }

    pub fn headline(&self, recovery_rate: Option<u32>) -> Result<HeadlineKpis> {
        let reps = self.source.absent_reps()?;
        let rate = recovery_rate.unwrap_or(self.cfg.pricing.recovery_rate);
        Ok(HeadlineKpis::compute(&reps, rate)?)
    }

    pub fn launch_summary(&self, selected: &[&Outlet]) -> Result<LaunchSummary> {
        Ok(LaunchSummary::compute(
            selected,
            self.cfg.pricing.per_call_cost,
            self.cfg.campaign.calls_per_minute(),
            self.cfg.pricing.high_cost_threshold,
        )?)
    }

    /// Pre-launch checks over the user's selection. Cost and timing are
    /// priced on the outlets that will be dialed; DND outlets held back by
    /// compliance are only counted for the DND warning.
    pub fn prelaunch(&self, selected: &[&Outlet]) -> Result<Vec<Finding>> {
        let respect_dnd = self.cfg.campaign.compliance.respect_dnd;
        let dial: Vec<&Outlet> = selected.iter().copied().filter(|o| !(respect_dnd && o.dnd)).collect();
        let summary = self.launch_summary(&dial)?;
        let input = ValidateInput {
            selected: summary.selected,
            dnd_selected: selected.iter().filter(|o| o.dnd).count(),
            estimated_cost: summary.estimated_cost,
            finish_eta_minutes: summary.finish_eta_minutes,
            high_cost_threshold: self.cfg.pricing.high_cost_threshold,
            config: self.cfg.campaign.clone(),
        };
        Ok(run_rules(&default_rules(), &input))
    }

    pub fn controller<S: NotificationSink>(&self, seed: u64, sink: S) -> Result<CampaignController<S>> {
        Ok(CampaignController::seeded(
            self.cfg.simulation.params.clone(),
            seed,
            self.cfg.pricing.per_call_cost,
            sink,
        )?)
    }

    /// Launch the session's selection and drive it until it completes or stops.
    pub fn launch<S: NotificationSink>(
        &self,
        session: &Session,
        mut sink: S,
        clock: &dyn Clock,
        opts: RunOptions,
        on_tick: impl FnMut(&CampaignSnapshot) -> LoopControl,
    ) -> Result<CampaignOutcome<S>> {
        self.cfg.validate().context("invalid calltrigger.toml")?;
        let findings = self.prelaunch(&session.selected_outlets())?;
        for f in &findings {
            warn!(rule = %f.rule_id, severity = ?f.severity, "{}", f.message);
        }

        let (dial, held_for_dnd) = session.launchable(self.cfg.campaign.compliance.respect_dnd);
        // an empty dial list is left to the controller, which sends its own notice
        if !dial.is_empty() && is_blocking(&findings) {
            let reason = blocking_reason(&findings);
            sink.notify(Notice::LaunchRejected { reason: reason.clone() });
            bail!("pre-launch checks failed: {reason}");
        }
        let seed = opts.seed.or(self.cfg.simulation.seed).unwrap_or_else(rand::random);
        let mut controller = self.controller(seed, sink)?;
        let id = controller.launch(&dial, self.cfg.campaign.clone()).context("launch campaign")?;
        info!(campaign = %id, outlets = dial.len(), held_for_dnd, seed, "campaign launched");
        debug!(retry_at_mins = ?self.cfg.campaign.retry.schedule(), "retry schedule for unanswered calls");

        let period = Duration::from_millis(self.cfg.simulation.tick_ms);
        let snapshot = drive(&mut controller, clock, period, opts.max_ticks, on_tick)?;
        info!(campaign = %id, state = ?snapshot.state, ticks = snapshot.tick, "campaign finished");
        Ok(CampaignOutcome { controller, snapshot, findings, held_for_dnd, seed })
    }
}

fn blocking_reason(findings: &[Finding]) -> String {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Fail)
        .map(|f| format!("{}: {}", f.rule_id, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn open_source(repo_root: &Path, cfg: &Config) -> Result<Box<dyn RecordSource>> {
    let source = match cfg.dataset_path(repo_root) {
        Some(path) => MockSource::from_path(&path).with_context(|| "open [source] dataset")?,
        None => MockSource::builtin()?,
    };
    let source = match cfg.source.attribute_seed {
        Some(seed) => source.with_seed(seed),
        None => source,
    };
    Ok(Box::new(source))
}

/// Tick loop. Ticks are serialized with the callback's decisions; a stop
/// cancels the timer before the next deadline can fire.
pub fn drive<S: NotificationSink, R: Rng>(
    controller: &mut CampaignController<S, R>,
    clock: &dyn Clock,
    period: Duration,
    max_ticks: Option<u64>,
    mut on_tick: impl FnMut(&CampaignSnapshot) -> LoopControl,
) -> Result<CampaignSnapshot> {
    if !controller.state().is_active() {
        return Ok(controller.snapshot());
    }
    let mut timer = TickTimer::new(period);
    timer.start(clock.now());
    let mut attempts = 0u64;

    while let Some(wait) = timer.until_next(clock.now()) {
        clock.sleep(wait);
        if !timer.fire(clock.now()) {
            continue;
        }
        let outcome = controller.tick().context("simulator tick")?;
        attempts += 1;
        let snap = controller.snapshot();
        debug!("{}", snap.status_line());

        let control = on_tick(&snap);
        if matches!(outcome, TickOutcome::Completed(_)) {
            timer.cancel();
            break;
        }
        match control {
            LoopControl::Stop => {
                controller.stop();
                timer.cancel();
            }
            LoopControl::Pause => {
                controller.pause();
            }
            LoopControl::Resume => {
                controller.resume();
            }
            LoopControl::Continue => {}
        }
        if timer.is_armed() && max_ticks.is_some_and(|m| attempts >= m) {
            info!(max_ticks = attempts, "tick limit reached, stopping campaign");
            controller.stop();
            timer.cancel();
        }
    }
    Ok(controller.snapshot())
}
