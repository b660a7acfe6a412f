pub mod table;

use crate::error::PKError;
use crate::fallback::{run_chain, Attempt, ChainOutcome, Stage};
use crate::models::{ParameterSet, ParameterSource};
use crate::services::DrugLookupService;
use log::{info, warn};

pub use table::{ParameterTable, DEFAULT_PARAMETERS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub params: ParameterSet,
    pub source: ParameterSource,
}

pub struct LookupStage<'a> {
    service: &'a dyn DrugLookupService,
}

impl Stage<str, Resolution> for LookupStage<'_> {
    fn name(&self) -> &str {
        "drug lookup"
    }

    fn attempt(&self, drug_name: &str) -> Attempt<Resolution> {
        let record = match self.service.lookup(drug_name) {
            Ok(record) => record,
            Err(e) => return Attempt::Unavailable(e),
        };

        let (vd, ka, ke) = match (
            record.volume_of_distribution,
            record.absorption_rate_constant,
            record.elimination_rate_constant,
        ) {
            (Some(vd), Some(ka), Some(ke)) => (vd, ka, ke),
            _ => {
                return Attempt::Unavailable(PKError::LookupUnavailable(format!(
                    "incomplete record for '{}'",
                    drug_name
                )))
            }
        };

        // Bad values from the service mean "unknown here", not "reject the command"
        match ParameterSet::new(vd, ka, ke) {
            Ok(params) => Attempt::Resolved(Resolution {
                params,
                source: ParameterSource::Lookup,
            }),
            Err(e) => Attempt::Unavailable(PKError::LookupUnavailable(format!(
                "unusable record for '{}': {}",
                drug_name, e
            ))),
        }
    }
}

pub struct TableStage<'a> {
    table: &'a ParameterTable,
}

impl Stage<str, Resolution> for TableStage<'_> {
    fn name(&self) -> &str {
        "parameter table"
    }

    fn attempt(&self, drug_name: &str) -> Attempt<Resolution> {
        match self.table.get(drug_name) {
            Some(params) => Attempt::Resolved(Resolution {
                params: *params,
                source: ParameterSource::Table,
            }),
            None => Attempt::Unavailable(PKError::LookupUnavailable(format!(
                "'{}' is not in the parameter table",
                drug_name
            ))),
        }
    }
}

/// Drug name → parameters: remote lookup, then the table, then the generic
/// default. Never fails.
pub struct ParameterResolver<'a> {
    lookup: Option<&'a dyn DrugLookupService>,
    table: ParameterTable,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(lookup: Option<&'a dyn DrugLookupService>, table: ParameterTable) -> Self {
        Self { lookup, table }
    }

    pub fn resolve(&self, drug_name: &str) -> Resolution {
        let lookup = self.lookup.map(|service| LookupStage { service });
        let table = TableStage { table: &self.table };

        let mut stages: Vec<&dyn Stage<str, Resolution>> = Vec::with_capacity(2);
        if let Some(lookup) = &lookup {
            stages.push(lookup);
        }
        stages.push(&table);

        match run_chain(&stages, drug_name) {
            ChainOutcome::Resolved { value, stage } => {
                info!("Parameters for '{}' from {}", drug_name, stage);
                value
            }
            // No stage rejects; treat it like exhaustion all the same
            ChainOutcome::Rejected { .. } | ChainOutcome::Exhausted { .. } => {
                warn!(
                    "No parameters known for '{}', using generic default (known: {})",
                    drug_name,
                    self.table.drug_names().join(", ")
                );
                Resolution {
                    params: DEFAULT_PARAMETERS,
                    source: ParameterSource::Default,
                }
            }
        }
    }
}
