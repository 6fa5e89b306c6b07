use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use ct_core::{Priority, SalesRep, NOT_IN_PJP_PREFIX};

/// Outlet template offered to every absent rep beyond their journey plan.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdditionalOutlet {
    pub name: String,
    pub phone: String,
    pub expected_value: u64,
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    /// Seeds the generated outlet attributes (language, opt-in, priority...).
    #[serde(default)]
    pub seed: u64,
    pub reps: Vec<SalesRep>,
    #[serde(default)]
    pub additional: Vec<AdditionalOutlet>,
    /// How many additional outlets each rep gets.
    #[serde(default = "default_additional_per_rep")]
    pub additional_per_rep: usize,
}

fn default_additional_per_rep() -> usize {
    2
}

const BUILTIN: &str = include_str!("../data/demo.yaml");

pub fn parse_dataset(yaml: &str) -> Result<Dataset> {
    let ds: Dataset = serde_yaml::from_str(yaml).with_context(|| "parse dataset yaml")?;
    validate_dataset(&ds)?;
    Ok(ds)
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read dataset: {}", path.display()))?;
    parse_dataset(&s).with_context(|| format!("load dataset: {}", path.display()))
}

/// The demo dataset shipped with the crate.
pub fn builtin_dataset() -> Result<Dataset> {
    parse_dataset(BUILTIN).context("builtin dataset")
}

pub fn validate_dataset(ds: &Dataset) -> Result<()> {
    let mut seen = BTreeSet::new();
    for rep in &ds.reps {
        if rep.id.as_str().is_empty() {
            bail!("rep {:?} has an empty id", rep.name);
        }
        if rep.id.as_str().starts_with(NOT_IN_PJP_PREFIX) {
            bail!("rep id {} must not start with {NOT_IN_PJP_PREFIX:?}", rep.id);
        }
        if !seen.insert(rep.id.as_str()) {
            bail!("duplicate rep id {}", rep.id);
        }
    }
    if ds.additional_per_rep > ds.additional.len() {
        bail!(
            "additional_per_rep is {} but only {} additional outlets are defined",
            ds.additional_per_rep,
            ds.additional.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_absent_reps() {
        let ds = builtin_dataset().unwrap();
        let names: Vec<&str> = ds.reps.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Rajesh Kumar", "Priya Sharma", "Amit Singh"]);
        assert_eq!(ds.reps.iter().map(|r| r.estimated_value).sum::<u64>(), 65_000);
        assert_eq!(ds.reps[0].pjp_today.len(), 5);
        assert_eq!(ds.reps[0].missed_visits(), 1);
        assert_eq!(ds.additional.len(), 4);
        assert_eq!(ds.additional_per_rep, 2);
    }

    #[test]
    fn duplicate_rep_ids_are_rejected() {
        let yaml = r#"
reps:
  - { id: "1", name: A, territory: T, today_outlets: 0, estimated_value: 0 }
  - { id: "1", name: B, territory: T, today_outlets: 0, estimated_value: 0 }
additional_per_rep: 0
"#;
        let err = parse_dataset(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate rep id 1"));
    }

    #[test]
    fn rep_ids_cannot_shadow_additional_outlet_ids() {
        let yaml = r#"
reps:
  - { id: "1", name: A, territory: T, today_outlets: 0, estimated_value: 0 }
  - { id: "notinpjp-1", name: B, territory: T, today_outlets: 0, estimated_value: 0 }
additional_per_rep: 0
"#;
        let err = parse_dataset(yaml).unwrap_err();
        assert!(err.to_string().contains("rep id notinpjp-1 must not start with"));
    }

    #[test]
    fn too_few_additional_templates() {
        let yaml = r#"
reps: []
"#;
        assert!(parse_dataset(yaml).is_err());
    }
}
