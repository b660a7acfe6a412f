pub mod units;

use crate::models::ParameterSet;

pub use units::{normalize_dose, normalize_dose_str, CANONICAL_UNIT};

/// A validated request to plot one dose of one drug.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseCommand {
    /// Lowercase, trimmed, never empty.
    pub drug_name: String,
    /// Always positive, in `unit`.
    pub dose: f64,
    pub unit: String,
    /// Present when the parsed record already carried Vd/Ka/Ke.
    pub parameters: Option<ParameterSet>,
}

/// Canonical form for drug names used as table keys and in titles.
pub fn normalize_drug_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
