//! Outcome accounting: per-label buckets, per-claim tallies and the lost list.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::LostCause;
use crate::value::Value;

/// Label used when neither a classifier nor the predicate supplied one
pub const DEFAULT_LABEL: &str = "";

/// Pass / fail / lost counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pass: usize,
    pub fail: usize,
    pub lost: usize,
}

impl Tally {
    /// Every counted trial, lost ones included
    pub fn cases(&self) -> usize {
        self.pass + self.fail + self.lost
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Lost(_) => self.lost += 1,
        }
    }

    pub fn merge(&mut self, other: &Tally) {
        self.pass += other.pass;
        self.fail += other.fail;
        self.lost += other.lost;
    }
}

/// Running counts for one classification label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub cases: usize,
    pub pass: usize,
    pub fail: usize,
}

/// How one trial ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Lost(
        #[serde(serialize_with = "crate::report::serialize_display")]
        LostCause,
    ),
}

impl Outcome {
    /// Report tag for case lines
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Pass => "Pass",
            Outcome::Fail => "FAIL",
            Outcome::Lost(_) => "LOST",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

/// A single counted trial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    /// Attempt index within the claim, rejected attempts included
    pub serial: usize,
    pub args: Vec<Value>,
    pub label: String,
    pub outcome: Outcome,
}

/// A trial that could not be evaluated, with whatever arguments were
/// generated before it was lost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LostCase {
    pub serial: usize,
    pub args: Vec<Value>,
    pub label: String,
    #[serde(serialize_with = "crate::report::serialize_display")]
    pub cause: LostCause,
}

/// Everything recorded about one claim's run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimSummary {
    pub name: String,
    /// Seed of the RNG this claim drew from
    pub seed: u64,
    pub tally: Tally,
    pub classification: BTreeMap<String, Bucket>,
    pub lost: Vec<LostCase>,
    pub trials: Vec<Trial>,
    /// Attempts discarded by the classifier
    pub rejected: usize,
    /// Trials skipped because the time limit ran out
    pub not_run: usize,
    pub timed_out: bool,
    #[serde(serialize_with = "crate::report::serialize_millis")]
    pub elapsed: Duration,
}

impl ClaimSummary {
    pub(crate) fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            tally: Tally::default(),
            classification: BTreeMap::new(),
            lost: Vec::new(),
            trials: Vec::new(),
            rejected: 0,
            not_run: 0,
            timed_out: false,
            elapsed: Duration::ZERO,
        }
    }

    /// Account for one counted trial
    pub(crate) fn record(&mut self, trial: Trial) {
        self.tally.record(&trial.outcome);
        match &trial.outcome {
            Outcome::Lost(cause) => self.lost.push(LostCase {
                serial: trial.serial,
                args: trial.args.clone(),
                label: trial.label.clone(),
                cause: cause.clone(),
            }),
            outcome => {
                let bucket = self.classification.entry(trial.label.clone()).or_default();
                bucket.cases += 1;
                if outcome.is_pass() {
                    bucket.pass += 1;
                } else {
                    bucket.fail += 1;
                }
            }
        }
        self.trials.push(trial);
    }

    pub fn cases(&self) -> usize {
        self.tally.cases()
    }

    pub fn pass(&self) -> usize {
        self.tally.pass
    }

    pub fn fail(&self) -> usize {
        self.tally.fail
    }

    /// Whether any trial carried a label other than the default
    pub fn uses_classification(&self) -> bool {
        self.classification
            .keys()
            .any(|label| label.as_str() != DEFAULT_LABEL)
    }

    /// No failures, no lost cases, and at least one pass
    pub fn ok(&self) -> bool {
        self.tally.fail == 0 && self.tally.lost == 0 && self.tally.pass > 0
    }
}

/// The outcome of a whole check run, claims in registration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Base seed the per-claim seeds were derived from
    pub seed: u64,
    pub claims: Vec<ClaimSummary>,
    pub total: Tally,
}

impl CheckReport {
    pub(crate) fn new(seed: u64, claims: Vec<ClaimSummary>) -> Self {
        let mut total = Tally::default();
        for claim in &claims {
            total.merge(&claim.tally);
        }
        Self {
            seed,
            claims,
            total,
        }
    }

    /// No failures, no lost cases, and at least one pass across all claims
    pub fn ok(&self) -> bool {
        self.total.fail == 0 && self.total.lost == 0 && self.total.pass > 0
    }

    /// Look up a claim by name; the first match wins when names repeat
    pub fn claim(&self, name: &str) -> Option<&ClaimSummary> {
        self.claims.iter().find(|claim| claim.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredicateError;

    fn trial(serial: usize, label: &str, outcome: Outcome) -> Trial {
        Trial {
            serial,
            args: vec![Value::from(serial)],
            label: label.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_buckets_and_tally() {
        let mut summary = ClaimSummary::new("claim", 1);
        summary.record(trial(0, "small", Outcome::Pass));
        summary.record(trial(1, "small", Outcome::Fail));
        summary.record(trial(2, "large", Outcome::Pass));
        summary.record(trial(
            3,
            "large",
            Outcome::Lost(PredicateError::new("boom").into()),
        ));

        assert_eq!(
            summary.tally,
            Tally {
                pass: 2,
                fail: 1,
                lost: 1
            }
        );
        assert_eq!(summary.cases(), 4);
        assert_eq!(
            summary.classification["small"],
            Bucket {
                cases: 2,
                pass: 1,
                fail: 1
            }
        );
        // lost cases stay out of the buckets
        assert_eq!(summary.classification["large"].cases, 1);
        assert_eq!(summary.lost.len(), 1);
        assert_eq!(summary.lost[0].serial, 3);
        assert_eq!(summary.lost[0].args, vec![Value::from(3)]);
        assert_eq!(summary.trials.len(), 4);
        assert!(summary.uses_classification());
        assert!(!summary.ok());
    }

    #[test]
    fn test_default_label_is_not_a_classification() {
        let mut summary = ClaimSummary::new("claim", 1);
        summary.record(trial(0, DEFAULT_LABEL, Outcome::Pass));
        assert!(!summary.uses_classification());
        assert!(summary.ok());
    }

    #[test]
    fn test_report_totals() {
        let mut first = ClaimSummary::new("first", 1);
        first.record(trial(0, "", Outcome::Pass));
        let mut second = ClaimSummary::new("second", 2);
        second.record(trial(0, "", Outcome::Fail));
        second.record(trial(1, "", Outcome::Pass));

        let report = CheckReport::new(7, vec![first, second]);
        assert_eq!(
            report.total,
            Tally {
                pass: 2,
                fail: 1,
                lost: 0
            }
        );
        assert!(!report.ok());
        assert_eq!(report.claim("second").map(|c| c.seed), Some(2));
    }

    #[test]
    fn test_empty_report_is_not_ok() {
        let report = CheckReport::new(0, vec![ClaimSummary::new("empty", 0)]);
        assert!(!report.ok());
    }
}
