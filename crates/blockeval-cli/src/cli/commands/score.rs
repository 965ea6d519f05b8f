use anyhow::Context;
use blockeval_core::accuracy_from_json;
use serde_json::{json, Value};

use crate::cli::args::ScoreArgs;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: ScoreArgs) -> anyhow::Result<i32> {
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let summary: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let accuracy = accuracy_from_json(&summary)?;
    let reported = summary.get("accuracy").and_then(Value::as_f64);

    let report = json!({
        "accuracy": accuracy,
        "reported_accuracy": reported,
        "consistent": reported == Some(accuracy),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(SUCCESS)
}
