//! Report rendering.
//!
//! The text form is one paragraph per claim:
//!
//! ```text
//! sorted: 2 classifications, 100 cases tested, 97 pass, 3 fail
//!  empty pass 12
//!  long pass 85 fail 3
//!  FAIL [14] long([3,1,2])
//!
//! Total pass 97, fail 3
//! ```
//!
//! How much of it appears depends on the [`Detail`] level.

use std::fmt;

use crate::config::Detail;
use crate::statistics::{Bucket, CheckReport, ClaimSummary, Outcome, Trial};
use crate::value::format_args_list;

/// Trait for custom report output formatting
pub trait ReportFormatter {
    /// Format one claim's paragraph
    fn format_claim(&self, claim: &ClaimSummary) -> String;

    /// Format the grand totals
    fn format_total(&self, report: &CheckReport) -> String;

    /// Format a whole report
    fn format_report(&self, report: &CheckReport) -> String {
        let mut output = String::new();
        for claim in &report.claims {
            output.push_str(&self.format_claim(claim));
        }
        output.push_str(&self.format_total(report));
        output
    }
}

/// Plain-text formatter at a given detail level
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter {
    detail: Detail,
}

impl TextFormatter {
    pub fn new(detail: Detail) -> Self {
        Self { detail }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_claim(&self, claim: &ClaimSummary) -> String {
        if self.detail < Detail::Summary {
            return String::new();
        }
        let mut output = claim_line(claim);

        if self.detail >= Detail::Failures && claim.uses_classification() {
            for (label, bucket) in &claim.classification {
                if self.detail >= Detail::Classes || bucket.fail > 0 {
                    output.push_str(&label_line(label, bucket));
                }
            }
        }

        if self.detail >= Detail::Failures {
            for trial in &claim.trials {
                if !trial.outcome.is_pass() || self.detail >= Detail::Verbose {
                    output.push_str(&case_line(trial));
                }
            }
        }
        output
    }

    fn format_total(&self, report: &CheckReport) -> String {
        if self.detail < Detail::Summary {
            return String::new();
        }
        let total = &report.total;
        let mut line = format!("\nTotal pass {}", total.pass);
        if total.fail > 0 {
            line.push_str(&format!(", fail {}", total.fail));
        }
        if total.lost > 0 {
            line.push_str(&format!(", lost {}", total.lost));
        }
        line.push('\n');
        line
    }
}

/// `"{name}: {classification}{cases} cases tested, {pass} pass{fail}{lost}\n"`
fn claim_line(claim: &ClaimSummary) -> String {
    let classification = if claim.uses_classification() {
        format!("{} classifications, ", claim.classification.len())
    } else {
        String::new()
    };
    let fail = if claim.tally.fail > 0 {
        format!(", {} fail", claim.tally.fail)
    } else {
        String::new()
    };
    let lost = if claim.tally.lost > 0 {
        format!(", {} lost", claim.tally.lost)
    } else {
        String::new()
    };
    format!(
        "{}: {}{} cases tested, {} pass{}{}\n",
        claim.name,
        classification,
        claim.cases(),
        claim.tally.pass,
        fail,
        lost
    )
}

fn label_line(label: &str, bucket: &Bucket) -> String {
    if bucket.fail > 0 {
        format!(" {} pass {} fail {}\n", label, bucket.pass, bucket.fail)
    } else {
        format!(" {} pass {}\n", label, bucket.pass)
    }
}

fn case_line(trial: &Trial) -> String {
    let mut line = format!(
        " {} [{}] {}{}",
        trial.outcome.tag(),
        trial.serial,
        trial.label,
        format_args_list(&trial.args)
    );
    if let Outcome::Lost(cause) = &trial.outcome {
        line.push_str(&format!(" {}", cause));
    }
    line.push('\n');
    line
}

impl CheckReport {
    /// Render the text report at `detail`
    pub fn render(&self, detail: Detail) -> String {
        TextFormatter::new(detail).format_report(self)
    }

    /// The report as a JSON document
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Detail::default()))
    }
}

/// JSON formatter for machine-readable results, one object per claim
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_claim(&self, claim: &ClaimSummary) -> String {
        let event = serde_json::json!({
            "event": "claim",
            "name": claim.name,
            "seed": claim.seed,
            "cases": claim.cases(),
            "pass": claim.tally.pass,
            "fail": claim.tally.fail,
            "lost": claim.tally.lost,
            "not_run": claim.not_run,
            "timed_out": claim.timed_out,
            "classification": claim.classification,
        });
        format!("{}\n", event)
    }

    fn format_total(&self, report: &CheckReport) -> String {
        let event = serde_json::json!({
            "event": "total",
            "seed": report.seed,
            "pass": report.total.pass,
            "fail": report.total.fail,
            "lost": report.total.lost,
            "ok": report.ok(),
        });
        format!("{}\n", event)
    }
}

pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

pub(crate) fn serialize_millis<S>(
    duration: &std::time::Duration,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
