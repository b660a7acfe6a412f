//! Gate between untyped records (service output, local parses) and the
//! simulator. Nothing numeric reaches a [`DoseCommand`] without passing here.

use crate::dosing::{normalize_dose, normalize_dose_str, normalize_drug_name, DoseCommand};
use crate::error::{PKError, PKResult};
use crate::models::ParameterSet;
use serde_json::{Map, Value};

const DRUG_KEYS: &[&str] = &["drug", "drug_name", "drugname", "name"];
const DOSE_KEYS: &[&str] = &["dosage", "dose"];
const UNIT_KEYS: &[&str] = &["unit", "units"];

/// Validate a record that must carry the full parameter triple.
pub fn validate_record(record: &Value) -> PKResult<DoseCommand> {
    let fields = as_object(record)?;
    let mut command = validate_dose_fields(fields)?;
    command.parameters = Some(extract_parameters(fields)?);
    Ok(command)
}

/// Validate a record that only needs drug, dosage and unit. A parameter
/// triple is embedded when the record carries one; a partial triple is
/// rejected rather than silently dropped.
pub fn validate_dose_record(record: &Value) -> PKResult<DoseCommand> {
    let fields = as_object(record)?;

    let has_parameters = ["vd", "ka", "ke"]
        .iter()
        .any(|key| field(fields, &[*key]).is_some());

    if has_parameters {
        validate_record(record)
    } else {
        validate_dose_fields(fields)
    }
}

fn as_object(record: &Value) -> PKResult<&Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| PKError::MalformedRecord("expected a JSON object".to_string()))
}

fn validate_dose_fields(fields: &Map<String, Value>) -> PKResult<DoseCommand> {
    let drug = require_string(fields, DRUG_KEYS, "drug")?;
    let drug_name = normalize_drug_name(&drug);
    if drug_name.is_empty() {
        return Err(PKError::MalformedRecord("drug name is empty".to_string()));
    }

    let unit = require_string(fields, UNIT_KEYS, "unit")?;
    let (dose, unit) = match field(fields, DOSE_KEYS) {
        Some(Value::String(text)) => normalize_dose_str(text, &unit)?,
        _ => normalize_dose(require_number(fields, DOSE_KEYS, "dosage")?, &unit)?,
    };
    if dose <= 0.0 {
        return Err(PKError::non_positive("dosage", dose));
    }

    Ok(DoseCommand {
        drug_name,
        dose,
        unit: unit.to_string(),
        parameters: None,
    })
}

fn extract_parameters(fields: &Map<String, Value>) -> PKResult<ParameterSet> {
    let vd = require_number(fields, &["vd"], "Vd")?;
    let ka = require_number(fields, &["ka"], "Ka")?;
    let ke = require_number(fields, &["ke"], "Ke")?;
    ParameterSet::new(vd, ka, ke)
}

/// Case-insensitive lookup over a list of accepted key spellings. JSON
/// `null` counts as absent.
fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(name, value)| {
            !value.is_null() && keys.iter().any(|key| name.eq_ignore_ascii_case(key))
        })
        .map(|(_, value)| value)
}

fn require_string(fields: &Map<String, Value>, keys: &[&str], label: &str) -> PKResult<String> {
    match field(fields, keys) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(PKError::MalformedRecord(format!(
            "field '{}' must be a string, got {}",
            label, other
        ))),
        None => Err(PKError::MalformedRecord(format!(
            "missing required field '{}'",
            label
        ))),
    }
}

fn require_number(fields: &Map<String, Value>, keys: &[&str], label: &str) -> PKResult<f64> {
    let value = field(fields, keys).ok_or_else(|| {
        PKError::MalformedRecord(format!("missing required field '{}'", label))
    })?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|n| n.is_finite()).ok_or_else(|| {
        PKError::MalformedRecord(format!("field '{}' is not numeric: {}", label, value))
    })
}
