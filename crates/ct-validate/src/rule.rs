use chrono::NaiveTime;

use crate::types::{Finding, Severity, ValidateInput, ValidationCategory};

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn category(&self) -> ValidationCategory;
    fn eval(&self, input: &ValidateInput) -> Vec<Finding>;

    fn finding(&self, severity: Severity, message: String) -> Finding {
        Finding { rule_id: self.id().to_string(), category: self.category(), severity, message }
    }
}

/// Blocks launch when nothing is selected.
pub struct SelectionNonEmpty;

impl Rule for SelectionNonEmpty {
    fn id(&self) -> &str {
        "selection_non_empty"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Selection
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        if input.selected == 0 {
            return vec![self.finding(Severity::Fail, "select at least one outlet to start calls".to_string())];
        }
        vec![]
    }
}

pub struct CostWithinCap;

impl Rule for CostWithinCap {
    fn id(&self) -> &str {
        "cost_within_cap"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Budget
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        let cap = input.config.cost_cap as f64;
        if input.estimated_cost > cap {
            return vec![self.finding(
                Severity::Fail,
                format!("estimated cost ₹{:.2} exceeds the ₹{} cap", input.estimated_cost, input.config.cost_cap),
            )];
        }
        vec![]
    }
}

pub struct HighCostOperation;

impl Rule for HighCostOperation {
    fn id(&self) -> &str {
        "high_cost_operation"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Budget
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        if input.estimated_cost > input.high_cost_threshold {
            return vec![self.finding(
                Severity::Warn,
                format!("high cost operation: estimated ₹{:.2}", input.estimated_cost),
            )];
        }
        vec![]
    }
}

pub struct DndOutletsExcluded;

impl Rule for DndOutletsExcluded {
    fn id(&self) -> &str {
        "dnd_outlets_excluded"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Compliance
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        if input.config.compliance.respect_dnd && input.dnd_selected > 0 {
            return vec![self.finding(
                Severity::Warn,
                format!("{} selected outlets are on DND and will not be called", input.dnd_selected),
            )];
        }
        vec![]
    }
}

pub struct WindowFitsFinishEta;

impl Rule for WindowFitsFinishEta {
    fn id(&self) -> &str {
        "window_fits_finish_eta"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Schedule
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        let window = input.config.window.minutes().max(0) as u64;
        if input.finish_eta_minutes > window {
            return vec![self.finding(
                Severity::Warn,
                format!(
                    "finish ETA of {} min does not fit the {} call window",
                    input.finish_eta_minutes,
                    input.config.window.label()
                ),
            )];
        }
        vec![]
    }
}

/// Calling hours permitted when quiet hours are respected.
pub const QUIET_HOURS_START: (u32, u32) = (9, 0);
pub const QUIET_HOURS_END: (u32, u32) = (21, 0);

pub struct QuietHours;

impl Rule for QuietHours {
    fn id(&self) -> &str {
        "quiet_hours"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Compliance
    }

    fn eval(&self, input: &ValidateInput) -> Vec<Finding> {
        if !input.config.compliance.quiet_hours {
            return vec![];
        }
        let (Some(open), Some(close)) = (
            NaiveTime::from_hms_opt(QUIET_HOURS_START.0, QUIET_HOURS_START.1, 0),
            NaiveTime::from_hms_opt(QUIET_HOURS_END.0, QUIET_HOURS_END.1, 0),
        ) else {
            return vec![];
        };
        let w = &input.config.window;
        if w.start < open || w.end > close {
            return vec![self.finding(
                Severity::Warn,
                format!("call window {} runs into quiet hours (allowed 09:00-21:00)", w.label()),
            )];
        }
        vec![]
    }
}

pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SelectionNonEmpty),
        Box::new(CostWithinCap),
        Box::new(HighCostOperation),
        Box::new(DndOutletsExcluded),
        Box::new(WindowFitsFinishEta),
        Box::new(QuietHours),
    ]
}

pub fn run_rules(rules: &[Box<dyn Rule>], input: &ValidateInput) -> Vec<Finding> {
    rules.iter().flat_map(|r| r.eval(input)).collect()
}

pub fn is_blocking(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Fail)
}
