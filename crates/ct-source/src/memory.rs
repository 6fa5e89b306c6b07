use std::path::Path;

use anyhow::Result;
use ct_core::{Outlet, RepId, SalesRep};
use tracing::debug;

use crate::{builtin_dataset, expand_outlets, load_dataset, traits::RecordSource, Dataset};

/// Dataset held in memory: the builtin demo data or a YAML file.
#[derive(Clone, Debug)]
pub struct MockSource {
    dataset: Dataset,
    origin: String,
}

impl MockSource {
    pub fn builtin() -> Result<Self> {
        Ok(Self { dataset: builtin_dataset()?, origin: "builtin demo dataset".to_string() })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self { dataset: load_dataset(path)?, origin: path.display().to_string() })
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self { dataset, origin: "in-memory dataset".to_string() }
    }

    /// Override the attribute seed from the dataset file.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.dataset.seed = seed;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl RecordSource for MockSource {
    fn absent_reps(&self) -> Result<Vec<SalesRep>> {
        Ok(self.dataset.reps.clone())
    }

    fn outlets_for(&self, rep_ids: &[RepId]) -> Result<Vec<Outlet>> {
        let ids: Vec<&str> = rep_ids.iter().map(RepId::as_str).collect();
        let outlets = expand_outlets(&self.dataset, &ids);
        debug!(reps = ids.len(), outlets = outlets.len(), "expanded outlets");
        Ok(outlets)
    }

    fn describe(&self) -> String {
        format!("{} ({} reps)", self.origin, self.dataset.reps.len())
    }
}
