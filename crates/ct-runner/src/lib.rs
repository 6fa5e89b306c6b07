pub mod clock;
pub mod config;
pub mod doctor;
pub mod report;
pub mod runner;
pub mod session;
pub mod sink;
pub mod util;

pub use clock::*;
pub use config::*;
pub use doctor::*;
pub use report::*;
pub use runner::*;
pub use session::*;
pub use sink::*;
pub use util::*;

#[cfg(test)]
mod fixture_tests {
    use super::*;
    use std::path::Path;

    fn fixture_repo() -> (tempfile::TempDir, Runner) {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/datasets/pune.yaml");
        let mut cfg = Config::default();
        cfg.source.dataset = Some(dataset.display().to_string());
        cfg.save_to(&Config::config_path(dir.path())).unwrap();
        let runner = Runner::open(dir.path().to_path_buf()).unwrap();
        (dir, runner)
    }

    #[test]
    fn loads_pune_fixture_through_config() {
        let (_dir, runner) = fixture_repo();
        runner.doctor().unwrap();
        let h = runner.headline(Some(50)).unwrap();
        assert_eq!(h.absent_reps, 2);
        assert_eq!(h.at_risk, 16_000);
        assert_eq!(h.recoverable, 8_000);
    }

    #[test]
    fn fixture_outlets_and_summary() {
        let (_dir, runner) = fixture_repo();
        let mut session = runner.session().unwrap();
        session.select_reps(runner.source.as_ref(), &["p1", "p2"]).unwrap();
        let ids: Vec<&str> = session.visible_outlets().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["p1-0", "p1-1", "p1-2", "p2-0", "p2-1", "notinpjp-p1-0", "notinpjp-p2-0"]);

        session.select_outlets(&["p1-0", "p1-1", "notinpjp-p2-0"]);
        let summary = runner.launch_summary(&session.selected_outlets()).unwrap();
        assert_eq!(summary.selected, 3);
        assert_eq!(summary.not_in_pjp, 1);
        assert_eq!(summary.estimated_cost, 7.5);
        assert_eq!(summary.dial_launch_eta, "30 sec");
        assert!(!summary.high_cost);
    }

    #[test]
    fn missing_dataset_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.source.dataset = Some("nope/missing.yaml".into());
        cfg.save_to(&Config::config_path(dir.path())).unwrap();
        let err = Runner::open(dir.path().to_path_buf()).err().unwrap();
        assert!(format!("{err:#}").contains("read dataset"));
    }
}
