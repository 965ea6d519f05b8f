//! Decoding model replies into per-position predictions.
//!
//! Decoding failures are fatal for the block. Individual `results` entries
//! that are unusable are skipped without error.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::errors::MalformedResponse;
use crate::labels::normalize_label;
use crate::model::PredictionEntry;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?i)```(?:json)?").unwrap();
}

/// Strip Markdown code fences and surrounding whitespace.
pub fn sanitize_json_text(raw: &str) -> String {
    CODE_FENCE.replace_all(raw.trim(), "").trim().to_string()
}

/// Decode a raw model reply into a JSON object.
pub fn parse_block_response(raw: &str) -> Result<Value, MalformedResponse> {
    let cleaned = sanitize_json_text(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(|source| MalformedResponse {
        raw: raw.to_string(),
        source,
    })?;

    if !value.is_object() {
        return Err(MalformedResponse {
            raw: raw.to_string(),
            source: <serde_json::Error as serde::de::Error>::custom(
                "expected a JSON object at top level",
            ),
        });
    }
    Ok(value)
}

/// Lenient integer coercion for echoed ids: integers, integral strings,
/// truncated floats and booleans are accepted.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Raw label text. A missing label is empty; an explicit `null` reads as
/// `None` and normalizes to `none`, which never matches a gold label.
fn label_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Entries of the `results` array that carry a usable `local_id`, in order.
///
/// Labels are already normalized.
pub fn extract_entries(parsed: &Value) -> Vec<PredictionEntry> {
    let Some(results) = parsed.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|entry| {
            let local_id = entry.get("local_id").and_then(coerce_int)?;
            Some(PredictionEntry {
                local_id,
                dataset_index: entry.get("dataset_index").and_then(coerce_int),
                sentence: entry
                    .get("sentence")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                predicted_emotion: normalize_label(&label_text(entry.get("predicted_emotion"))),
            })
        })
        .collect()
}

/// Map local position to normalized label. Later duplicates overwrite earlier ones.
pub fn extract_predictions(parsed: &Value) -> HashMap<i64, String> {
    extract_entries(parsed)
        .into_iter()
        .map(|entry| (entry.local_id, entry.predicted_emotion))
        .collect()
}
