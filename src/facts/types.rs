use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// One normalized fact with provenance metadata.
///
/// Field order here is the serialized column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub event_id: String,
    pub processing_timestamp: String,
    pub language: String,
    pub fact: String,
}

/// UTC now, ISO-8601 with microseconds and a trailing `Z`.
pub fn processing_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Pull the `data` array out of a response body.
///
/// Anything other than `{"data": [...]}` yields an empty list.
pub fn extract_facts(lang: &str, body: Value) -> Vec<Value> {
    let Value::Object(mut map) = body else {
        warn!(lang, "response is not a JSON object; treating as no facts");
        return vec![];
    };
    match map.remove("data") {
        Some(Value::Array(facts)) => facts,
        Some(other) => {
            warn!(lang, kind = json_kind(&other), "`data` is not an array; treating as no facts");
            vec![]
        }
        None => {
            warn!(lang, "response has no `data` field; treating as no facts");
            vec![]
        }
    }
}

/// Build one batch of records. All records share `timestamp`.
pub fn normalize(lang: &str, facts: Vec<Value>, timestamp: &str) -> Vec<Record> {
    facts
        .into_iter()
        .map(|fact| Record {
            event_id: Uuid::new_v4().to_string(),
            processing_timestamp: timestamp.to_string(),
            language: lang.to_string(),
            fact: fact_text(fact),
        })
        .collect()
}

fn fact_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
