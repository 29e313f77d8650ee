//! JSON Schema validation for catalyst and plan manifests.
//!
//! Manifests are authored as YAML but validated as JSON values against the
//! draft-07 documents under `schema/`. The documents are embedded at compile
//! time and compiled once per process. Validation never fails fast: every
//! violated field is collected so the caller can report them together.

use crate::error::{CatalystError, Result};
use jsonschema::JSONSchema;
use jsonschema::error::{ValidationError, ValidationErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::sync::OnceLock;

const CATALYST_MANIFEST_SCHEMA: &str = include_str!("../schema/catalyst_manifest.schema.json");
const PLAN_MANIFEST_SCHEMA: &str = include_str!("../schema/plan_manifest.schema.json");

/// Which manifest contract to validate against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ManifestSchema {
    Catalyst,
    Plan,
}

impl ManifestSchema {
    fn source(&self) -> &'static str {
        match self {
            ManifestSchema::Catalyst => CATALYST_MANIFEST_SCHEMA,
            ManifestSchema::Plan => PLAN_MANIFEST_SCHEMA,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ManifestSchema::Catalyst => "catalyst manifest",
            ManifestSchema::Plan => "plan manifest",
        }
    }

    /// Compiled validator for this contract.
    ///
    /// The schema documents ship inside the binary, so a compile failure is a
    /// build defect rather than bad input; the unit tests compile both.
    fn compiled(&self) -> &'static JSONSchema {
        static CATALYST: OnceLock<JSONSchema> = OnceLock::new();
        static PLAN: OnceLock<JSONSchema> = OnceLock::new();
        let cell = match self {
            ManifestSchema::Catalyst => &CATALYST,
            ManifestSchema::Plan => &PLAN,
        };
        cell.get_or_init(|| match compile_schema(self.source()) {
            Ok(compiled) => compiled,
            Err(reason) => panic!("embedded {} schema is invalid: {reason}", self.label()),
        })
    }
}

fn compile_schema(source: &str) -> std::result::Result<JSONSchema, String> {
    let raw: Value = serde_json::from_str(source).map_err(|err| err.to_string())?;
    JSONSchema::compile(&raw).map_err(|err| err.to_string())
}

/// One violated rule: a dotted field path plus a human-readable reason.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SchemaViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate `value` and return every violation (empty when valid).
pub fn validate_value(schema: ManifestSchema, value: &Value) -> Vec<SchemaViolation> {
    match schema.compiled().validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|err| violation_from(&err)).collect(),
    }
}

/// Validate and then deserialize into the typed manifest.
///
/// Returns the aggregated violations instead of erroring so callers decide
/// how to surface them.
pub fn validate_manifest<T: DeserializeOwned>(
    schema: ManifestSchema,
    value: Value,
) -> std::result::Result<T, Vec<SchemaViolation>> {
    let violations = validate_value(schema, &value);
    if !violations.is_empty() {
        return Err(violations);
    }
    serde_json::from_value(value).map_err(|err| {
        vec![SchemaViolation {
            field: ROOT_FIELD.to_string(),
            message: err.to_string(),
        }]
    })
}

/// Join violations into the single display message carried by `ManifestInvalid`.
pub fn format_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("  - {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a YAML manifest from disk, validate it, and decode it.
///
/// A missing file maps to `ManifestMissing`; YAML syntax errors map to
/// `ManifestUnreadable`; schema failures map to `ManifestInvalid` listing every
/// violated field.
pub(crate) fn load_manifest<T: DeserializeOwned>(path: &Path, schema: ManifestSchema) -> Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == IoErrorKind::NotFound => {
            return Err(CatalystError::ManifestMissing {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(CatalystError::io("reading", path, err)),
    };
    let value: Value =
        serde_yaml::from_str(&text).map_err(|err| CatalystError::ManifestUnreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    validate_manifest(schema, value).map_err(|violations| CatalystError::ManifestInvalid {
        path: path.to_path_buf(),
        message: format_violations(&violations),
    })
}

const ROOT_FIELD: &str = "(root)";

fn violation_from(err: &ValidationError<'_>) -> SchemaViolation {
    let base = field_path(&err.instance_path.to_string());
    match &err.kind {
        ValidationErrorKind::Required { property } => {
            let property = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            let field = if base == ROOT_FIELD {
                property
            } else {
                format!("{base}.{property}")
            };
            SchemaViolation {
                field,
                message: "is required".to_string(),
            }
        }
        ValidationErrorKind::MinLength { .. } => SchemaViolation {
            field: base,
            message: "must not be empty".to_string(),
        },
        ValidationErrorKind::Pattern { pattern } => SchemaViolation {
            field: base,
            message: format!("must match pattern {pattern}"),
        },
        _ => SchemaViolation {
            field: base,
            message: err.to_string(),
        },
    }
}

// JSON pointers ("/facets/questions") become dotted paths ("facets.questions").
fn field_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        ROOT_FIELD.to_string()
    } else {
        trimmed.replace('/', ".")
    }
}
