use super::{PKModel, ParameterSet};
use log::debug;

/// Offset applied to Ka when it exactly equals Ke (h^-1).
pub const KA_PERTURBATION: f64 = 0.001;

/// One-compartment model with first-order absorption and elimination,
/// single extravascular dose at t = 0.
#[derive(Debug, Clone)]
pub struct OneCompartmentModel {
    params: ParameterSet,
    ka: f64,
}

impl OneCompartmentModel {
    pub fn new(params: ParameterSet) -> Self {
        let mut ka = params.ka();

        // Removable singularity at Ka == Ke: shift Ka, never switch to the
        // t*exp(-ke*t) limit.
        if ka == params.ke() {
            debug!(
                "Ka equals Ke ({}), perturbing Ka by {}",
                ka, KA_PERTURBATION
            );
            ka += KA_PERTURBATION;
        }

        Self { params, ka }
    }

    /// Absorption rate constant actually used in the formula.
    pub fn effective_ka(&self) -> f64 {
        self.ka
    }
}

impl PKModel for OneCompartmentModel {
    fn calculate_concentration(&self, time: f64, dose: f64) -> f64 {
        if time < 0.0 {
            return 0.0;
        }

        let ka = self.ka;
        let ke = self.params.ke();
        let vd = self.params.vd();

        let concentration =
            (dose * ka / (vd * (ka - ke))) * ((-ke * time).exp() - (-ka * time).exp());

        // Round-off below zero is clamped; NaN and infinities are left for
        // the caller to reject.
        if concentration.is_finite() && concentration < 0.0 {
            0.0
        } else {
            concentration
        }
    }
}
