use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::info;

use ct_source::{load_dataset, RecordSource};

use crate::Config;

/// Check the config and the record source before any campaign runs.
pub fn doctor(repo_root: &Path, cfg: &Config, source: &dyn RecordSource) -> Result<()> {
    cfg.validate().context("invalid calltrigger.toml")?;

    if let Some(path) = cfg.dataset_path(repo_root) {
        if !path.exists() {
            return Err(anyhow!("dataset not found: {}", path.display()));
        }
        load_dataset(&path)?;
    }

    let reps = source.absent_reps().context("load absent reps")?;
    if reps.is_empty() {
        return Err(anyhow!("record source has no absent reps: {}", source.describe()));
    }
    let ids: Vec<_> = reps.iter().map(|r| r.id.clone()).collect();
    let outlets = source.outlets_for(&ids).context("load outlets")?;
    info!(source = %source.describe(), reps = reps.len(), outlets = outlets.len(), "doctor ok");
    Ok(())
}
