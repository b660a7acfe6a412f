use crate::dosing::normalize_drug_name;
use crate::models::ParameterSet;
use std::collections::HashMap;

/// Generic parameters used when a drug is known to nobody:
/// Vd 50 L, Ka 0.3 h^-1, Ke 0.08 h^-1.
pub const DEFAULT_PARAMETERS: ParameterSet = ParameterSet::from_constants(50.0, 0.3, 0.08);

const BUILTIN: &[(&str, ParameterSet)] = &[
    // Vd (L), Ka (h^-1), Ke (h^-1)
    ("metformin", ParameterSet::from_constants(100.0, 0.5, 0.0693)),
    ("wellbutrin xl", ParameterSet::from_constants(1750.0, 0.2, 0.033)),
];

/// Read-only drug name → parameters mapping, keyed by normalized name.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    entries: HashMap<String, ParameterSet>,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParameterTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, params)| (name.to_string(), *params))
            .collect();

        Self { entries }
    }

    /// Built-in entries with `overrides` layered on top.
    pub fn with_overrides(overrides: &HashMap<String, ParameterSet>) -> Self {
        let mut table = Self::builtin();
        for (name, params) in overrides {
            table.entries.insert(normalize_drug_name(name), *params);
        }
        table
    }

    pub fn get(&self, drug_name: &str) -> Option<&ParameterSet> {
        self.entries.get(drug_name)
    }

    pub fn drug_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_entries() {
        let table = ParameterTable::builtin();
        assert_eq!(table.drug_names(), ["metformin", "wellbutrin xl"]);

        let metformin = table.get("metformin").unwrap();
        assert_relative_eq!(metformin.vd(), 100.0);
        assert_relative_eq!(metformin.ka(), 0.5);
        assert_relative_eq!(metformin.ke(), 0.0693);
    }

    #[test]
    fn test_constants_satisfy_invariants() {
        for (_, params) in BUILTIN.iter().chain([("default", DEFAULT_PARAMETERS)].iter()) {
            assert!(ParameterSet::new(params.vd(), params.ka(), params.ke()).is_ok());
        }
    }

    #[test]
    fn test_exact_match_only() {
        let table = ParameterTable::builtin();
        assert!(table.get("Metformin").is_none());
        assert!(table.get("wellbutrin").is_none());
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "Metformin".to_string(),
            ParameterSet::new(654.0, 0.4, 0.1).unwrap(),
        );
        overrides.insert(
            "ibuprofen".to_string(),
            ParameterSet::new(10.0, 1.5, 0.35).unwrap(),
        );

        let table = ParameterTable::with_overrides(&overrides);
        assert_eq!(table.len(), 3);
        assert_relative_eq!(table.get("metformin").unwrap().vd(), 654.0);
        assert!(table.get("ibuprofen").is_some());
    }
}
