use crate::error::{PKError, PKResult};

/// Unit every dose is carried in after normalization.
pub const CANONICAL_UNIT: &str = "mg";

const MICROGRAMS_PER_MILLIGRAM: f64 = 1000.0;

/// Convert a (value, unit) pair to milligrams.
///
/// Accepts `mg`, `µg` (micro sign or Greek mu) and the ASCII `ug`, in any
/// case. Anything else is an [`PKError::UnsupportedUnit`].
pub fn normalize_dose(value: f64, unit: &str) -> PKResult<(f64, &'static str)> {
    let unit = unit.trim().to_lowercase();

    match unit.as_str() {
        "mg" => Ok((value, CANONICAL_UNIT)),
        "µg" | "μg" | "ug" => Ok((value / MICROGRAMS_PER_MILLIGRAM, CANONICAL_UNIT)),
        _ => Err(PKError::UnsupportedUnit(unit)),
    }
}

/// Same as [`normalize_dose`] for a value that still needs coercing from text.
pub fn normalize_dose_str(value: &str, unit: &str) -> PKResult<(f64, &'static str)> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PKError::MalformedRecord(format!("dose '{}' is not a number", value)))?;

    normalize_dose(parsed, unit)
}
