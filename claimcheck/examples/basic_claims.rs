//! Basic usage examples demonstrating the core claimcheck API
//!
//! Run with `RUST_LOG=claimcheck=debug` to see the engine's trace events.

use claimcheck::{
    CheckConfig, Checker, Detail, PredicateError, Value, Verdict, array, character_from, fields,
    integer_between, object_of, specs, string, string_of, wun_of,
};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claimcheck=warn".into()),
        )
        .init();

    println!("=== claimcheck: basic claims ===\n");

    let mut checker = Checker::new();

    // Example 1: a plain boolean predicate
    checker.claim(
        "reverse twice is identity",
        |args: &[Value]| {
            let items = args[0].as_array().unwrap_or_default();
            let mut reversed = items.to_vec();
            reversed.reverse();
            reversed.reverse();
            reversed == items
        },
        specs![array()],
    );

    // Example 2: classify trials by the shape of the input
    checker.claim_classified(
        "trimmed strings never grow",
        |args: &[Value]| {
            let text = args[0].as_str().unwrap_or_default();
            text.trim().len() <= text.len()
        },
        specs![string()],
        |args: &[Value]| {
            let text = args[0].as_str()?;
            Some(match text.len() {
                0 => "empty",
                1..=4 => "short",
                _ => "long",
            })
        },
    );

    // Example 3: a claim that is wrong, with the predicate labelling its own trials
    checker.claim(
        "sums stay below 15",
        |args: &[Value]| {
            let sum = args[0].to_number() + args[1].to_number();
            let label = if sum < 10.0 { "small" } else { "large" };
            Verdict::from(sum < 15.0).with_label(label)
        },
        specs![integer_between(0, 9), integer_between(0, 9)],
    );

    // Example 4: a predicate that raises on some inputs produces lost cases
    checker.claim(
        "hex digits parse",
        |args: &[Value]| -> Result<bool, PredicateError> {
            let text = args[0].as_str().unwrap_or_default();
            let n = u32::from_str_radix(text, 16)
                .map_err(|e| PredicateError::new(format!("{:?}: {}", text, e)))?;
            Ok(n <= 0xFFFF)
        },
        specs![string_of(specs![
            integer_between(1, 4),
            wun_of(specs![
                character_from("0123456789abcdef")?,
                character_from("g")?
            ])?,
        ])],
    );

    // Example 5: structured records
    checker.claim(
        "records are well formed",
        |args: &[Value]| {
            let record = args[0].as_object();
            record.is_some_and(|r| r.contains_key("id") && r.contains_key("name"))
        },
        specs![object_of(fields! {
            "id" => integer_between(1, 1000),
            "name" => string(),
        })],
    );

    let config = CheckConfig::default()
        .with_trials(200)
        .with_time_limit(Duration::from_secs(5))
        .with_detail(Detail::Failures);

    let report = checker.check(&config)?;
    print!("{}", report.render(config.detail));
    println!("\nseed: {} (pass it to with_seed to replay this run)", report.seed);
    println!("all claims hold: {}", report.ok());

    Ok(())
}
