pub mod one_compartment;

use crate::error::{PKError, PKResult};
use serde::{Deserialize, Serialize};

pub use one_compartment::{OneCompartmentModel, KA_PERTURBATION};

pub trait PKModel {
    fn calculate_concentration(&self, time: f64, dose: f64) -> f64;
}

/// One-compartment parameter triple. Every field is finite and strictly
/// positive; outside this crate the only way to build one is
/// [`ParameterSet::new`] (deserialization included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameterSet")]
pub struct ParameterSet {
    #[serde(rename = "Vd")]
    vd: f64, // Volume of distribution (L)
    #[serde(rename = "Ka")]
    ka: f64, // Absorption rate constant (h^-1)
    #[serde(rename = "Ke")]
    ke: f64, // Elimination rate constant (h^-1)
}

#[derive(Deserialize)]
struct RawParameterSet {
    #[serde(rename = "Vd", alias = "vd")]
    vd: f64,
    #[serde(rename = "Ka", alias = "ka")]
    ka: f64,
    #[serde(rename = "Ke", alias = "ke")]
    ke: f64,
}

impl TryFrom<RawParameterSet> for ParameterSet {
    type Error = PKError;

    fn try_from(raw: RawParameterSet) -> PKResult<Self> {
        ParameterSet::new(raw.vd, raw.ka, raw.ke)
    }
}

impl ParameterSet {
    pub fn new(vd: f64, ka: f64, ke: f64) -> PKResult<Self> {
        for (name, value) in [("Vd", vd), ("Ka", ka), ("Ke", ke)] {
            if !value.is_finite() {
                return Err(PKError::MalformedRecord(format!(
                    "{} must be a finite number",
                    name
                )));
            }
            if value <= 0.0 {
                return Err(PKError::non_positive(name, value));
            }
        }

        Ok(Self { vd, ka, ke })
    }

    /// For compile-time tables whose values are known to be positive.
    pub(crate) const fn from_constants(vd: f64, ka: f64, ke: f64) -> Self {
        Self { vd, ka, ke }
    }

    pub fn vd(&self) -> f64 {
        self.vd
    }

    pub fn ka(&self) -> f64 {
        self.ka
    }

    pub fn ke(&self) -> f64 {
        self.ke
    }
}

/// Where the parameters used for a curve came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterSource {
    /// Embedded in the parsed command itself.
    Command,
    Lookup,
    Table,
    /// Generic fallback; the curve is only an approximation.
    Default,
}

impl std::fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ParameterSource::Command => "command",
            ParameterSource::Lookup => "drug lookup",
            ParameterSource::Table => "parameter table",
            ParameterSource::Default => "generic default",
        };
        f.write_str(label)
    }
}
