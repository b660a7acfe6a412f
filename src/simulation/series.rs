use crate::error::{PKError, PKResult};
use serde::{Deserialize, Serialize};

/// Concentration-time curve. `times` is strictly increasing and has the
/// same length as `concentrations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeries {
    times: Vec<f64>,
    concentrations: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTimeSeries {
    times: Vec<f64>,
    concentrations: Vec<f64>,
}

impl TryFrom<RawTimeSeries> for TimeSeries {
    type Error = PKError;

    fn try_from(raw: RawTimeSeries) -> PKResult<Self> {
        TimeSeries::new(raw.times, raw.concentrations)
    }
}

impl TimeSeries {
    pub fn new(times: Vec<f64>, concentrations: Vec<f64>) -> PKResult<Self> {
        if times.len() != concentrations.len() {
            return Err(PKError::MalformedRecord(format!(
                "{} time points but {} concentrations",
                times.len(),
                concentrations.len()
            )));
        }

        if times.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(PKError::MalformedRecord(
                "time points must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            times,
            concentrations,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.concentrations.iter().copied())
    }

    /// Cmax over the sampled points.
    pub fn max_concentration(&self) -> f64 {
        self.concentrations.iter().copied().fold(0.0, f64::max)
    }

    /// Tmax: time of the first sample reaching Cmax.
    pub fn time_to_max(&self) -> Option<f64> {
        self.points()
            .fold(None, |best: Option<(f64, f64)>, (t, c)| match best {
                Some((_, best_c)) if best_c >= c => best,
                _ => Some((t, c)),
            })
            .map(|(t, _)| t)
    }

    pub fn auc(&self) -> f64 {
        // Simple trapezoidal rule for AUC calculation
        self.points()
            .collect::<Vec<_>>()
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }
}
