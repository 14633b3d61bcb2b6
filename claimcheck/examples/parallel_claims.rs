//! Running claims on several threads, with an observer collecting events

use claimcheck::{
    CheckConfig, CheckObserver, Checker, Detail, ParallelConfig, Tally, Trial, Value,
    integer_between, number_between, specs,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Default)]
struct FailureCounter {
    failures: AtomicUsize,
}

impl CheckObserver for FailureCounter {
    fn on_fail(&self, claim: &str, trial: &Trial) {
        if self.failures.fetch_add(1, Ordering::Relaxed) < 3 {
            println!("  first failures: {} {:?}", claim, trial.args);
        }
    }

    fn on_result(&self, total: &Tally, ok: bool) {
        println!(
            "  result: {} pass, {} fail, {} lost (ok: {})",
            total.pass, total.fail, total.lost, ok
        );
    }
}

fn register(checker: &mut Checker) {
    for bound in [10, 100, 1000, 10_000] {
        checker.claim(
            format!("square root bounded by {}", bound),
            move |args: &[Value]| args[0].to_number().sqrt() <= (bound as f64).sqrt(),
            specs![number_between(0, bound)],
        );
    }
    checker.claim(
        "products are even",
        |args: &[Value]| (args[0].to_number() * args[1].to_number()) % 2.0 == 0.0,
        specs![integer_between(1, 50), integer_between(1, 50)],
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CheckConfig::default()
        .with_trials(5_000)
        .with_seed(7)
        .with_detail(Detail::Summary);

    println!("=== sequential ===");
    let mut sequential = Checker::new().with_observer(FailureCounter::default());
    register(&mut sequential);
    let start = Instant::now();
    let first = sequential.check(&config)?;
    println!("  took {:?}", start.elapsed());

    println!("=== parallel ===");
    let mut parallel = Checker::new().with_observer(FailureCounter::default());
    register(&mut parallel);
    let start = Instant::now();
    let second = parallel.check_parallel(&config, &ParallelConfig::default())?;
    println!("  took {:?}", start.elapsed());

    print!("{}", second.render(config.detail));
    println!(
        "\nsame outcome with the same seed: {}",
        first.render(Detail::Verbose) == second.render(Detail::Verbose)
    );
    Ok(())
}
