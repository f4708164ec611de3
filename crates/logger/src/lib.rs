//! Structured JSON-line logging for the demo flows.
//!
//! Every record is one JSON object on stderr: timestamp, level, component
//! tag, message, and optional structured fields. Keeping it line-oriented
//! makes the demo's scripted sequences easy to follow and grep.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Builds the JSON record for one log line.
fn format_record(level: Level, component: &str, message: &str, fields: Option<Value>) -> Value {
    let mut record = Map::new();
    record.insert("ts".to_string(), json!(Utc::now().to_rfc3339()));
    record.insert("level".to_string(), json!(level.as_str()));
    record.insert("component".to_string(), json!(component));
    record.insert("message".to_string(), json!(message));
    if let Some(Value::Object(extra)) = fields {
        for (k, v) in extra {
            record.insert(k, v);
        }
    }
    Value::Object(record)
}

/// Writes one structured record to stderr.
pub fn log(level: Level, component: &str, message: &str, fields: Option<Value>) {
    let record = format_record(level, component, message, fields);
    eprintln!("{}", record);
}

pub fn debug(component: &str, message: &str) {
    log(Level::Debug, component, message, None);
}

pub fn info(component: &str, message: &str) {
    log(Level::Info, component, message, None);
}

pub fn warn(component: &str, message: &str) {
    log(Level::Warn, component, message, None);
}

pub fn error(component: &str, message: &str) {
    log(Level::Error, component, message, None);
}

/// Info-level record with structured fields.
pub fn event(component: &str, message: &str, fields: Value) {
    log(Level::Info, component, message, Some(fields));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_carries_component_and_message() {
        let record = format_record(Level::Info, "bank_connect", "phase change", None);
        assert_eq!(record["level"], "info");
        assert_eq!(record["component"], "bank_connect");
        assert_eq!(record["message"], "phase change");
        assert!(record["ts"].is_string());
    }

    #[test]
    fn test_record_merges_fields() {
        let record = format_record(
            Level::Warn,
            "view_state",
            "rejected period",
            Some(json!({"days": 45})),
        );
        assert_eq!(record["days"], 45);
        assert_eq!(record["level"], "warn");
    }

    #[test]
    fn test_non_object_fields_ignored() {
        let record = format_record(Level::Debug, "app", "tick", Some(json!("not-a-map")));
        assert!(record.get("not-a-map").is_none());
        assert_eq!(record["message"], "tick");
    }
}
