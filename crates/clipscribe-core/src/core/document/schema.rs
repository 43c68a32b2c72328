//! Document Schema Validation
//!
//! The schema-validation engine is an external collaborator: the engine only
//! depends on the [`SchemaValidator`] seam, which reports a list of violation
//! descriptors on failure. [`StructuralValidator`] is the built-in
//! implementation of the canonical document's structural rules, so the crate
//! is usable without wiring an external engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Violations
// =============================================================================

/// A single structural violation found while validating a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON-pointer-style location of the violation
    pub path: String,
    /// Human-readable message explaining the issue
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// =============================================================================
// Validator Seam
// =============================================================================

/// External schema-validation collaborator. Validation may suspend (the
/// engine behind the seam can be remote or lazily compiled); the import path
/// awaits exactly one validation call before constructing a transcript.
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// Returns `Ok(())` when the document is structurally valid, otherwise
    /// the full list of violations.
    async fn validate(&self, document: &Value) -> Result<(), Vec<SchemaViolation>>;
}

/// Built-in structural validator for the canonical document format.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralValidator;

#[async_trait]
impl SchemaValidator for StructuralValidator {
    async fn validate(&self, document: &Value) -> Result<(), Vec<SchemaViolation>> {
        let violations = check_document(document);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

// =============================================================================
// Structural Rules
// =============================================================================

fn is_duration_string(raw: &str) -> bool {
    let Some(inner) = raw.strip_prefix("PT").and_then(|rest| rest.strip_suffix('S')) else {
        return false;
    };
    !inner.is_empty()
        && inner.chars().all(|c| c.is_ascii_digit() || c == '.')
        && inner.split('.').count() <= 2
        && !inner.starts_with('.')
        && !inner.ends_with('.')
}

/// Collects every structural violation in a candidate document.
pub fn check_document(document: &Value) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    let Some(root) = document.as_object() else {
        violations.push(SchemaViolation::new("/", "expected an object"));
        return violations;
    };

    match root.get("language") {
        Some(Value::String(_)) => {}
        Some(_) => violations.push(SchemaViolation::new("/language", "expected a string")),
        None => violations.push(SchemaViolation::new("/language", "required field is missing")),
    }

    match root.get("about") {
        Some(Value::String(_)) => {}
        Some(_) => violations.push(SchemaViolation::new("/about", "expected a string")),
        None => violations.push(SchemaViolation::new("/about", "required field is missing")),
    }

    match root.get("text") {
        Some(Value::Array(items)) => {
            if items.is_empty() {
                violations.push(SchemaViolation::new("/text", "expected a non-empty array"));
            }
            for (index, item) in items.iter().enumerate() {
                check_item(&format!("/text/{index}"), item, &mut violations);
            }
        }
        Some(_) => violations.push(SchemaViolation::new("/text", "expected an array")),
        None => violations.push(SchemaViolation::new("/text", "required field is missing")),
    }

    if let Some(translation) = root.get("translation") {
        match translation {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    check_item(&format!("/translation/{index}"), item, &mut violations);
                }
            }
            _ => violations.push(SchemaViolation::new("/translation", "expected an array")),
        }
    }

    violations
}

fn check_item(path: &str, item: &Value, violations: &mut Vec<SchemaViolation>) {
    let Some(object) = item.as_object() else {
        violations.push(SchemaViolation::new(path, "expected an object"));
        return;
    };

    match object.get("text") {
        Some(text) => check_text(&format!("{path}/text"), text, violations),
        None => violations.push(SchemaViolation::new(
            format!("{path}/text"),
            "required field is missing",
        )),
    }

    for field in ["startTime", "endTime"] {
        if let Some(value) = object.get(field) {
            match value.as_str() {
                Some(raw) if is_duration_string(raw) => {}
                _ => violations.push(SchemaViolation::new(
                    format!("{path}/{field}"),
                    "expected a PT<seconds>S duration string",
                )),
            }
        }
    }

    if let Some(speaker) = object.get("speaker") {
        match speaker {
            Value::Array(names) => {
                for (index, name) in names.iter().enumerate() {
                    match name.as_str() {
                        Some(value) if !value.trim().is_empty() => {}
                        _ => violations.push(SchemaViolation::new(
                            format!("{path}/speaker/{index}"),
                            "expected a non-empty string",
                        )),
                    }
                }
            }
            _ => violations.push(SchemaViolation::new(
                format!("{path}/speaker"),
                "expected an array of names",
            )),
        }
    }

    if let Some(follows) = object.get("followsOnFromPrevious") {
        if !follows.is_boolean() {
            violations.push(SchemaViolation::new(
                format!("{path}/followsOnFromPrevious"),
                "expected a boolean",
            ));
        }
    }

    if let Some(settings) = object.get("cueSettings") {
        check_cue_settings(&format!("{path}/cueSettings"), settings, violations);
    }
}

fn check_text(path: &str, text: &Value, violations: &mut Vec<SchemaViolation>) {
    match text {
        Value::String(_) => {}
        Value::Array(segments) => {
            for (index, segment) in segments.iter().enumerate() {
                match segment {
                    Value::String(_) => {}
                    Value::Object(span) => {
                        if !span.get("text").is_some_and(Value::is_string) {
                            violations.push(SchemaViolation::new(
                                format!("{path}/{index}/text"),
                                "expected a string",
                            ));
                        }
                        if let Some(annotation) = span.get("annotation") {
                            if !annotation.is_string() {
                                violations.push(SchemaViolation::new(
                                    format!("{path}/{index}/annotation"),
                                    "expected a string",
                                ));
                            }
                        }
                    }
                    _ => violations.push(SchemaViolation::new(
                        format!("{path}/{index}"),
                        "expected a string or an annotated span",
                    )),
                }
            }
        }
        _ => violations.push(SchemaViolation::new(
            path,
            "expected a string or an array of spans",
        )),
    }
}

fn check_cue_settings(path: &str, settings: &Value, violations: &mut Vec<SchemaViolation>) {
    let Some(object) = settings.as_object() else {
        violations.push(SchemaViolation::new(path, "expected an object"));
        return;
    };

    for field in ["position", "line", "size"] {
        if let Some(value) = object.get(field) {
            if !value.is_u64() {
                violations.push(SchemaViolation::new(
                    format!("{path}/{field}"),
                    "expected a non-negative integer",
                ));
            }
        }
    }

    if let Some(align) = object.get("align") {
        match align.as_str() {
            Some("start") | Some("middle") | Some("end") => {}
            _ => violations.push(SchemaViolation::new(
                format!("{path}/align"),
                "expected one of: start, middle, end",
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
