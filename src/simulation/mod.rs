pub mod series;

use crate::config::SimulationConfig;
use crate::error::{PKError, PKResult};
use crate::models::{OneCompartmentModel, PKModel, ParameterSet};
use log::debug;

pub use series::TimeSeries;

/// Evaluates the one-compartment curve for a single dose on a fixed grid.
/// Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Simulator {
    time_points: Vec<f64>,
}

impl Simulator {
    pub fn new(config: &SimulationConfig) -> PKResult<Self> {
        config.validate()?;

        Ok(Self {
            time_points: linspace(0.0, config.horizon_hours, config.samples),
        })
    }

    pub fn time_points(&self) -> &[f64] {
        &self.time_points
    }

    pub fn simulate(&self, dose: f64, params: &ParameterSet) -> PKResult<TimeSeries> {
        if !(dose.is_finite() && dose > 0.0) {
            return Err(PKError::non_positive("dosage", dose));
        }

        let model = OneCompartmentModel::new(*params);
        debug!(
            "Simulating {} mg with Vd={} Ka={} Ke={}",
            dose,
            params.vd(),
            model.effective_ka(),
            params.ke()
        );

        let concentrations: Vec<f64> = self
            .time_points
            .iter()
            .map(|&t| model.calculate_concentration(t, dose))
            .collect();

        if let Some(i) = concentrations.iter().position(|c| !c.is_finite()) {
            return Err(PKError::UnrepresentableCurve(format!(
                "{} mg with Vd={} gives concentration {} at t={} h",
                dose,
                params.vd(),
                concentrations[i],
                self.time_points[i]
            )));
        }

        TimeSeries::new(self.time_points.clone(), concentrations)
    }
}

/// `samples` evenly spaced points from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (samples - 1) as f64;
            (0..samples)
                .map(|i| {
                    if i == samples - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
