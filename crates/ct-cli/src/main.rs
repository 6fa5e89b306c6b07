use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ct_core::SortDirection;
use ct_runner::{
    format_campaign_report, format_headline, format_inr, format_launch_summary, parse_id_list, Clock, LoopControl,
    ManualClock, RunOptions, Runner, Session, SystemClock, TracingSink,
};

#[derive(Parser)]
#[command(name = "calltrigger", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create .calltrigger/calltrigger.toml with defaults
    Init,

    /// Validate the config and the record source
    Doctor,

    /// List absent reps
    Reps {
        #[arg(long)]
        search: Option<String>,
        /// Field to sort by: name, territory, today_outlets, estimated_value, missed
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        json: bool,
    },

    /// List outlets of the given reps (all reps by default)
    Outlets {
        /// Comma separated rep ids
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Field to sort by: name, phone, language, priority_rank, expected_value, last_order_days
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        json: bool,
    },

    /// Headline KPIs and the launch summary for a selection
    Summary {
        #[arg(long)]
        reps: Option<String>,
        /// Comma separated outlet ids; every listed outlet when omitted
        #[arg(long)]
        outlets: Option<String>,
        #[arg(long)]
        recovery_rate: Option<u32>,
    },

    /// Launch a simulated calling campaign and follow it to the end
    Launch {
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        outlets: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Run on virtual time instead of waiting tick_ms between ticks
        #[arg(long)]
        no_sleep: bool,
        /// Print the final snapshot as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
}

fn apply_sort(view: &mut ct_core::FilterSortView, sort: Option<String>, desc: bool) {
    if let Some(key) = sort {
        let dir = if desc { SortDirection::Desc } else { SortDirection::Asc };
        view.set_sort(key, dir);
    }
}

fn build_session(runner: &Runner, reps: Option<&str>) -> anyhow::Result<Session> {
    let mut session = runner.session()?;
    let rep_ids: Vec<String> = match reps {
        Some(raw) => parse_id_list(raw),
        None => session.reps().iter().map(|r| r.id.as_str().to_string()).collect(),
    };
    session.select_reps(runner.source.as_ref(), &rep_ids)?;
    Ok(session)
}

/// Explicit outlet ids, or every listed outlet when none are given.
fn select_outlets(session: &mut Session, outlets: Option<&str>) {
    match outlets {
        Some(raw) => session.select_outlets(&parse_id_list(raw)),
        None => session.toggle_all_outlets(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => {
            let path = Runner::init_repo(&repo_root)?;
            info!(path = %path.display(), "config ready");
            println!("Initialized calltrigger config at {}", path.display());
        }
        Command::Doctor => {
            let r = Runner::open(repo_root)?;
            r.doctor()?;
            println!("OK ({})", r.source.describe());
        }
        Command::Reps { search, sort, desc, json } => {
            let r = Runner::open(repo_root)?;
            let mut session = r.session()?;
            session.rep_view.set_search(search.unwrap_or_default());
            apply_sort(&mut session.rep_view, sort, desc);
            let reps = session.visible_reps();
            if json {
                println!("{}", serde_json::to_string_pretty(&reps)?);
            } else {
                for rep in reps {
                    println!(
                        "- {} {} [{}] outlets={} missed={} value={}",
                        rep.id,
                        rep.name,
                        rep.territory,
                        rep.today_outlets,
                        rep.missed_visits(),
                        format_inr(rep.estimated_value)
                    );
                }
            }
        }
        Command::Outlets { reps, search, sort, desc, json } => {
            let r = Runner::open(repo_root)?;
            let mut session = build_session(&r, reps.as_deref())?;
            session.outlet_view.set_search(search.unwrap_or_default());
            apply_sort(&mut session.outlet_view, sort, desc);
            let outlets = session.visible_outlets();
            if json {
                println!("{}", serde_json::to_string_pretty(&outlets)?);
            } else {
                for o in outlets {
                    println!(
                        "- {} {} {} {} {:?} {}{}{}",
                        o.id,
                        o.name,
                        o.primary_phone().unwrap_or("-"),
                        o.window.label(),
                        o.priority,
                        format_inr(o.expected_value),
                        if o.in_pjp { "" } else { " (not in PJP)" },
                        if o.dnd { " [DND]" } else { "" }
                    );
                }
            }
        }
        Command::Summary { reps, outlets, recovery_rate } => {
            let r = Runner::open(repo_root)?;
            println!("{}", format_headline(&r.headline(recovery_rate)?));
            let mut session = build_session(&r, reps.as_deref())?;
            select_outlets(&mut session, outlets.as_deref());
            let selected = session.selected_outlets();
            let summary = r.launch_summary(&selected)?;
            let findings = r.prelaunch(&selected)?;
            print!("{}", format_launch_summary(&summary, &findings));
            let retries = r.cfg.campaign.retry.schedule();
            if !retries.is_empty() {
                let at: Vec<String> = retries.iter().map(|m| format!("+{m}m")).collect();
                println!("Retries for unanswered calls: {}", at.join(", "));
            }
        }
        Command::Launch { reps, outlets, seed, max_ticks, no_sleep, json } => {
            let r = Runner::open(repo_root)?;
            let mut session = build_session(&r, reps.as_deref())?;
            select_outlets(&mut session, outlets.as_deref());
            let manual = ManualClock::new();
            let clock: &dyn Clock = if no_sleep { &manual } else { &SystemClock };
            let opts = RunOptions { seed, max_ticks };
            let outcome = r
                .launch(&session, TracingSink, clock, opts, |snap| {
                    if !json {
                        println!("{}", snap.status_line());
                    }
                    LoopControl::Continue
                })
                .context("campaign failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?);
            } else {
                println!();
                print!("{}", format_campaign_report(&outcome.snapshot, &r.cfg.campaign));
                println!("\nseed: {}", outcome.seed);
            }
        }
    }

    Ok(())
}
