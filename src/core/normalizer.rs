//! Flattens WSDOT JSON records into single-level rows for tabular output.
//!
//! Nested objects (e.g. `StartRoadwayLocation`) become prefixed columns
//! (`StartRoadwayLocationDescription`), `LocationID` is wrapped in braces to match the
//! GUID literal convention of the destination tables, and top-level strings are probed
//! for WSDOT dates. Lists have no tabular form and are rejected.

use crate::core::date_detector::normalize_string;
use crate::domain::model::{Dataset, FlatRecord, FlatValue};
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};

const LOCATION_ID_FIELD: &str = "LocationID";

pub fn flatten_record(record: &Map<String, Value>) -> Result<FlatRecord> {
    let mut output = FlatRecord::new();

    for (key, value) in record {
        match value {
            Value::Object(nested) => flatten_nested(key, nested, &mut output)?,
            _ if key == LOCATION_ID_FIELD => {
                output.insert(key.clone(), FlatValue::String(format!("{{{}}}", text_of(value))));
            }
            Value::String(s) => output.insert(key.clone(), normalize_string(s)),
            Value::Array(_) => return Err(unsupported(key, value)),
            scalar => output.insert(key.clone(), scalar_value(scalar)?),
        }
    }

    Ok(output)
}

// Nested values are copied as-is: no date parsing and no LocationID wrapping below the top level.
fn flatten_nested(prefix: &str, nested: &Map<String, Value>, output: &mut FlatRecord) -> Result<()> {
    for (child_key, child_value) in nested {
        let key = format!("{}{}", prefix, child_key);
        match child_value {
            Value::Object(deeper) => flatten_nested(&key, deeper, output)?,
            Value::Array(_) => return Err(unsupported(&key, child_value)),
            Value::String(s) => output.insert(key, FlatValue::String(s.clone())),
            scalar => output.insert(key, scalar_value(scalar)?),
        }
    }
    Ok(())
}

fn scalar_value(value: &Value) -> Result<FlatValue> {
    match value {
        Value::Null => Ok(FlatValue::Null),
        Value::Bool(b) => Ok(FlatValue::Bool(*b)),
        Value::Number(n) => Ok(FlatValue::Number(n.clone())),
        Value::String(s) => Ok(FlatValue::String(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(unsupported("<value>", value)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unsupported(field: &str, value: &Value) -> EtlError {
    EtlError::UnsupportedShape {
        field: field.to_string(),
        kind: kind_of(value).to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Flattens a parsed response: an array of records, or a single record object.
pub fn normalize_payload(payload: &Value) -> Result<Vec<FlatRecord>> {
    match payload {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => flatten_record(record),
                other => Err(unsupported(&format!("[{}]", index), other)),
            })
            .collect(),
        Value::Object(record) => Ok(vec![flatten_record(record)?]),
        other => Err(unsupported("<root>", other)),
    }
}

pub fn parse_and_normalize(dataset: Dataset, raw: &str) -> Result<Vec<FlatRecord>> {
    let payload: Value = serde_json::from_str(raw).map_err(|source| EtlError::MalformedJson {
        dataset: dataset.to_string(),
        source,
    })?;
    normalize_payload(&payload)
}
