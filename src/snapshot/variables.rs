//! Variable snapshot codec
//!
//! Converts the interpreter's typed variable set into a flat, string-encoded
//! mapping and back. Restoring is tolerant: a variable the current script no
//! longer declares, or a value that no longer parses, is reported and skipped
//! while the remaining variables are still applied.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::Interpreter;

/// Closed set of variable types a script can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Boolean,
    Integer,
    Float,
    String,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Boolean => "boolean",
            VariableKind::Integer => "integer",
            VariableKind::Float => "float",
            VariableKind::String => "string",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live variable value as held by the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl VariableValue {
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValue::Boolean(_) => VariableKind::Boolean,
            VariableValue::Integer(_) => VariableKind::Integer,
            VariableValue::Float(_) => VariableKind::Float,
            VariableValue::String(_) => VariableKind::String,
        }
    }

    /// Canonical string form. `f64`'s `Display` is locale-independent and
    /// prints the shortest representation that parses back to the same bits.
    pub fn encode(&self) -> String {
        match self {
            VariableValue::Boolean(b) => b.to_string(),
            VariableValue::Integer(i) => i.to_string(),
            VariableValue::Float(f) => f.to_string(),
            VariableValue::String(s) => s.clone(),
        }
    }

    /// Parse a canonical string form back into a value of `kind`
    pub fn decode(kind: VariableKind, encoded: &str) -> Option<Self> {
        match kind {
            VariableKind::Boolean => match encoded {
                "true" => Some(VariableValue::Boolean(true)),
                "false" => Some(VariableValue::Boolean(false)),
                _ => None,
            },
            VariableKind::Integer => encoded.parse().ok().map(VariableValue::Integer),
            VariableKind::Float => encoded.parse().ok().map(VariableValue::Float),
            VariableKind::String => Some(VariableValue::String(encoded.to_string())),
        }
    }
}

/// One persisted variable: its type tag plus canonical encoded value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedVariable {
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub value: String,
}

impl EncodedVariable {
    pub fn new(kind: VariableKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl From<&VariableValue> for EncodedVariable {
    fn from(value: &VariableValue) -> Self {
        Self::new(value.kind(), value.encode())
    }
}

/// Flat variable mapping stored in a save record, ordered by key
pub type VariableSnapshot = BTreeMap<String, EncodedVariable>;

/// A single variable that could not be restored
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VariableRestoreIssue {
    #[error("variable '{key}' does not exist in the loaded script")]
    Missing { key: String },
    #[error("variable '{key}' was saved as {saved} but the script declares {declared}")]
    TypeMismatch {
        key: String,
        saved: VariableKind,
        declared: VariableKind,
    },
    #[error("variable '{key}': cannot parse '{value}' as {kind}")]
    Parse {
        key: String,
        kind: VariableKind,
        value: String,
    },
}

impl VariableRestoreIssue {
    pub fn key(&self) -> &str {
        match self {
            VariableRestoreIssue::Missing { key }
            | VariableRestoreIssue::TypeMismatch { key, .. }
            | VariableRestoreIssue::Parse { key, .. } => key,
        }
    }
}

/// Outcome of a tolerant restore pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRestoreReport {
    pub restored: usize,
    pub issues: Vec<VariableRestoreIssue>,
}

impl VariableRestoreReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Snapshot every variable the interpreter exposes
pub fn capture_variables(interpreter: &dyn Interpreter) -> VariableSnapshot {
    let mut snapshot = VariableSnapshot::new();
    for (key, value) in interpreter.variables() {
        if snapshot.insert(key.clone(), (&value).into()).is_some() {
            tracing::warn!(key = %key, "Interpreter reported a duplicate variable key");
        }
    }
    snapshot
}

/// Apply a snapshot onto the interpreter's current variable set
pub fn restore_variables(
    snapshot: &VariableSnapshot,
    interpreter: &dyn Interpreter,
) -> VariableRestoreReport {
    let mut report = VariableRestoreReport::default();

    for (key, encoded) in snapshot {
        match restore_one(key, encoded, interpreter) {
            Ok(()) => report.restored += 1,
            Err(issue) => {
                tracing::warn!(key = %key, error = %issue, "Skipping saved variable");
                report.issues.push(issue);
            }
        }
    }

    report
}

fn restore_one(
    key: &str,
    encoded: &EncodedVariable,
    interpreter: &dyn Interpreter,
) -> Result<(), VariableRestoreIssue> {
    let declared = interpreter
        .find_variable(key)
        .ok_or_else(|| VariableRestoreIssue::Missing {
            key: key.to_string(),
        })?;

    if declared != encoded.kind {
        return Err(VariableRestoreIssue::TypeMismatch {
            key: key.to_string(),
            saved: encoded.kind,
            declared,
        });
    }

    let value = VariableValue::decode(encoded.kind, &encoded.value).ok_or_else(|| {
        VariableRestoreIssue::Parse {
            key: key.to_string(),
            kind: encoded.kind,
            value: encoded.value.clone(),
        }
    })?;

    interpreter.assign_variable(key, value);
    Ok(())
}
