use crate::error::{PKError, PKResult};
use serde_json::Value;

/// Pull a single JSON object out of a service response.
///
/// A response that is exactly one JSON object is taken as is. Otherwise the
/// first `{ ... }` span up to the first closing brace is used, so prose or
/// code fences around the object are ignored. Objects with nested braces are
/// not recoverable from noisy text and fail closed.
pub fn extract_json_object(response: &str) -> PKResult<Value> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(PKError::MalformedRecord("empty response".to_string()));
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let start = trimmed
        .find('{')
        .ok_or_else(|| PKError::MalformedRecord(format!("no JSON object in '{}'", trimmed)))?;
    let end = trimmed[start..]
        .find('}')
        .map(|offset| start + offset)
        .ok_or_else(|| PKError::MalformedRecord(format!("unterminated object in '{}'", trimmed)))?;

    let candidate = &trimmed[start..=end];
    if candidate[1..].contains('{') {
        return Err(PKError::MalformedRecord(
            "nested objects are not supported".to_string(),
        ));
    }

    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(PKError::MalformedRecord(format!("'{}' is not an object", candidate))),
        Err(e) => Err(PKError::MalformedRecord(format!("invalid JSON '{}': {}", candidate, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_object() {
        let value =
            extract_json_object(r#"{"drug": "metformin", "dosage": 500, "unit": "mg"}"#).unwrap();
        assert_eq!(value, json!({"drug": "metformin", "dosage": 500, "unit": "mg"}));
    }

    #[test]
    fn test_clean_nested_object_is_accepted() {
        let value = extract_json_object(r#"{"drug": "x", "meta": {"a": 1}}"#).unwrap();
        assert_eq!(value["meta"]["a"], 1);
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let response = "Sure! Here is the result:\n```json\n{\"drug\": \"wellbutrin xl\", \"dosage\": 300, \"unit\": \"mg\"}\n```\nAnything else?";
        let value = extract_json_object(response).unwrap();
        assert_eq!(value["drug"], "wellbutrin xl");
        assert_eq!(value["dosage"], 300);
    }

    #[test]
    fn test_first_object_wins() {
        let value = extract_json_object(r#"a {"drug": "a"} b {"drug": "b"}"#).unwrap();
        assert_eq!(value["drug"], "a");
    }

    #[test]
    fn test_nested_object_in_prose_fails_closed() {
        let response = r#"Result: {"drug": "metformin", "extra": {"Vd": 100}} done"#;
        assert!(matches!(
            extract_json_object(response),
            Err(PKError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_unusable_responses() {
        for response in [
            "",
            "   ",
            "I could not understand that.",
            "{\"drug\": \"metformin\"",
            "{drug: metformin}",
            "[1, 2, 3]",
        ] {
            assert!(
                matches!(extract_json_object(response), Err(PKError::MalformedRecord(_))),
                "expected failure for {:?}",
                response
            );
        }
    }

    #[test]
    fn test_python_style_quotes_fail() {
        // Single-quoted pseudo-JSON is not valid JSON
        assert!(extract_json_object("{'drug': 'metformin', 'dosage': 500}").is_err());
    }
}
