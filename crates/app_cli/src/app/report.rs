use anyhow::Result;
use serde_json::Value;
use upload_core::{Alert, AlertLevel, ClassificationResult};

pub(super) fn alert_line(alert: &Alert) -> String {
    let tag = match alert.level {
        AlertLevel::Info => "info",
        AlertLevel::Success => "success",
        AlertLevel::Danger => "error",
    };
    format!("[{tag}] {}", alert.message)
}

pub(super) fn result_json(result: &ClassificationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// One-line human summary when the server used a familiar shape
/// (`prediction` or `label`, with optional `confidence`).
pub(super) fn summary(result: &ClassificationResult) -> Option<String> {
    let body = result.as_value();
    let label = body
        .get("prediction")
        .or_else(|| body.get("label"))
        .and_then(Value::as_str)?;
    match body.get("confidence").and_then(Value::as_f64) {
        Some(confidence) => Some(format!("Result: {label} (confidence {confidence})")),
        None => Some(format!("Result: {label}")),
    }
}
