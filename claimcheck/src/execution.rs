//! Trial engine: runs one claim's trials and accounts for their outcomes.
//!
//! Nothing a claim does during a trial can abort the run. Generator and
//! predicate errors become lost cases, and so do panics in generators,
//! classifiers and predicates, which are caught here.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rand::RngCore;

use crate::claim::Claim;
use crate::config::CheckConfig;
use crate::error::{LostCause, Stage};
use crate::rng::create_seeded_rng;
use crate::statistics::{ClaimSummary, DEFAULT_LABEL, Outcome, Tally, Trial};
use crate::value::{Value, format_args_list};

/// Hooks invoked while a check runs. Every method defaults to a no-op.
pub trait CheckObserver: Send + Sync {
    fn on_pass(&self, _claim: &str, _trial: &Trial) {}

    fn on_fail(&self, _claim: &str, _trial: &Trial) {}

    fn on_lost(&self, _claim: &str, _trial: &Trial) {}

    /// The rendered text report, unless the detail level is silent
    fn on_report(&self, _report: &str) {}

    /// Grand totals and whether the whole run was ok
    fn on_result(&self, _total: &Tally, _ok: bool) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CheckObserver for NoopObserver {}

enum Attempt {
    /// The classifier rejected the arguments
    Rejected,
    Counted(Trial),
}

/// Run `claim` until `nr_trials` trials are counted, the attempt budget is
/// spent, or the time limit runs out.
pub(crate) fn run_claim(
    claim: &mut Claim,
    config: &CheckConfig,
    seed: u64,
    observer: &dyn CheckObserver,
) -> ClaimSummary {
    let start = Instant::now();
    let mut rng = create_seeded_rng(seed);
    let mut summary = ClaimSummary::new(claim.name(), seed);
    let max_attempts = config.max_attempts();
    let mut serial = 0;

    tracing::debug!(claim = %claim.name(), seed, nr_trials = config.nr_trials, "starting claim");

    while summary.cases() < config.nr_trials {
        if let Some(limit) = config.time_limit
            && start.elapsed() >= limit
        {
            summary.timed_out = true;
            tracing::warn!(
                claim = %claim.name(),
                cases = summary.cases(),
                limit_ms = limit.as_millis() as u64,
                "time limit reached"
            );
            break;
        }
        if serial >= max_attempts {
            tracing::warn!(
                claim = %claim.name(),
                attempts = serial,
                rejected = summary.rejected,
                "attempt budget exhausted"
            );
            break;
        }

        let made = attempt(claim, &mut rng, serial);
        serial += 1;
        match made {
            Attempt::Rejected => summary.rejected += 1,
            Attempt::Counted(trial) => {
                tracing::trace!(
                    claim = %claim.name(),
                    serial = trial.serial,
                    outcome = trial.outcome.tag(),
                    "trial"
                );
                match &trial.outcome {
                    Outcome::Pass => observer.on_pass(claim.name(), &trial),
                    Outcome::Fail => observer.on_fail(claim.name(), &trial),
                    Outcome::Lost(cause) => {
                        tracing::debug!(
                            claim = %claim.name(),
                            serial = trial.serial,
                            args = %format_args_list(&trial.args),
                            %cause,
                            "lost case"
                        );
                        observer.on_lost(claim.name(), &trial);
                    }
                }
                summary.record(trial);
            }
        }
    }

    summary.not_run = config.nr_trials - summary.cases();
    summary.elapsed = start.elapsed();

    tracing::info!(
        claim = %claim.name(),
        cases = summary.cases(),
        pass = summary.tally.pass,
        fail = summary.tally.fail,
        lost = summary.tally.lost,
        not_run = summary.not_run,
        "claim finished"
    );
    summary
}

/// Make one attempt: resolve the signature, classify, then evaluate
fn attempt(claim: &mut Claim, rng: &mut dyn RngCore, serial: usize) -> Attempt {
    let mut args = Vec::with_capacity(claim.signature.len());
    for spec in claim.signature.iter_mut() {
        match panic::catch_unwind(AssertUnwindSafe(|| spec.resolve(&mut *rng, &[]))) {
            Ok(Ok(value)) => args.push(value),
            Ok(Err(error)) => return lost(serial, args, DEFAULT_LABEL.to_string(), error.into()),
            Err(payload) => {
                let cause = LostCause::panicked(Stage::Generation, payload);
                return lost(serial, args, DEFAULT_LABEL.to_string(), cause);
            }
        }
    }

    let mut label = DEFAULT_LABEL.to_string();
    if let Some(classifier) = claim.classifier.as_mut() {
        match panic::catch_unwind(AssertUnwindSafe(|| classifier.classify(&args))) {
            Ok(Some(assigned)) => label = assigned,
            Ok(None) => return Attempt::Rejected,
            Err(payload) => {
                let cause = LostCause::panicked(Stage::Classification, payload);
                return lost(serial, args, label, cause);
            }
        }
    }

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| claim.predicate.evaluate(&args)))
    {
        Ok(Ok(verdict)) => {
            if let Some(assigned) = verdict.label {
                label = assigned;
            }
            if verdict.passed {
                Outcome::Pass
            } else {
                Outcome::Fail
            }
        }
        Ok(Err(error)) => Outcome::Lost(error.into()),
        Err(payload) => Outcome::Lost(LostCause::panicked(Stage::Predicate, payload)),
    };

    Attempt::Counted(Trial {
        serial,
        args,
        label,
        outcome,
    })
}

fn lost(serial: usize, args: Vec<Value>, label: String, cause: LostCause) -> Attempt {
    Attempt::Counted(Trial {
        serial,
        args,
        label,
        outcome: Outcome::Lost(cause),
    })
}
