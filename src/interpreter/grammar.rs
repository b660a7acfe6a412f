use crate::error::{PKError, PKResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

pub const USAGE: &str = "Use 'show me [drug] at [dose] mg' or 'plot [drug] at [dose] mg'.";

static COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:show\s+me|plot)\s+([a-z0-9][a-z0-9 \-]*?)\s+at\s+(\d+)\s*mg\b")
        .expect("command grammar is a valid regex")
});

/// Match the local command grammar and return an untyped record with the
/// same shape the parsing service produces.
pub fn parse_command(text: &str) -> PKResult<Value> {
    let captures = COMMAND
        .captures(text)
        .ok_or_else(|| PKError::UnrecognizedCommand(format!("'{}'. {}", text.trim(), USAGE)))?;

    let drug = captures[1].trim().to_lowercase();
    let dose: f64 = captures[2]
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite())
        .ok_or_else(|| {
            PKError::UnrecognizedCommand(format!("dose '{}' is out of range", &captures[2]))
        })?;

    Ok(json!({ "drug": drug, "dosage": dose, "unit": "mg" }))
}
