//! Remote collaborators: the natural-language parsing service and the
//! drug-information lookup. Both are blocking calls bounded by the timeout
//! in their configuration, and both are called at most once per command.

pub mod chat;
pub mod drug_lookup;

use crate::error::PKResult;

pub use chat::ChatCompletionParser;
pub use drug_lookup::HttpDrugLookup;

/// Turns a raw command into text that should contain one JSON object.
pub trait CommandParsingService {
    fn complete(&self, command: &str) -> PKResult<String>;
}

/// Raw pharmacokinetic values reported by a lookup. Any of them may be
/// missing; the resolver decides whether the record is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupRecord {
    pub volume_of_distribution: Option<f64>,
    pub absorption_rate_constant: Option<f64>,
    pub elimination_rate_constant: Option<f64>,
}

pub trait DrugLookupService {
    fn lookup(&self, drug_name: &str) -> PKResult<LookupRecord>;
}
