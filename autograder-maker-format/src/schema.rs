//! Declarative structural schema for the raw configuration document.
//!
//! The schema is data, not code: [`document_schema`] transcribes the
//! constraints of the external interface (required keys, types, enumerated
//! values, numeric ranges, array minimums) and [`check`] walks document and
//! schema together. Checking is fail-fast: the first violation is returned as
//! a single [`SchemaError`] carrying the dotted path of the offending node,
//! and no further structural errors are accumulated.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde_json::Value;

use autograder_maker_diagnostics::{Diagnostic, FieldPath};

/// The marking item kinds accepted by the `type` field.
pub const MARKING_ITEM_TYPES: &[&str] = &[
    "file_exists",
    "output_comparison",
    "signature_check",
    "function_test",
    "class_test",
];

/// The accepted `visibility` values.
pub const VISIBILITIES: &[&str] = &["visible", "hidden", "after_due_date", "after_published"];

/// The accepted `language` values.
pub const LANGUAGES: &[&str] = &["python"];

/// A node of the structural schema.
#[derive(Debug, Clone)]
pub enum Schema {
    /// A JSON object. Keys not listed are tolerated and left unchecked.
    Object {
        required: Vec<(&'static str, Schema)>,
        optional: Vec<(&'static str, Schema)>,
    },
    /// A JSON string, optionally constrained to a minimum length and to an
    /// enumerated set of values.
    Str {
        min_len: usize,
        values: &'static [&'static str],
    },
    /// A JSON integer inside an inclusive range.
    Int { min: i64, max: i64 },
    /// A JSON array with a minimum number of elements, each matching the
    /// item schema.
    Array { min_items: usize, items: Box<Schema> },
    /// Any JSON value.
    Any,
}

/// The first structural violation found in a document.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SchemaError {
    pub path: FieldPath,
    pub message: String,
}

impl SchemaError {
    fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.message).with_field_path(self.path)
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at path: {}", self.message, self.path)
    }
}

impl std::error::Error for SchemaError {}

/// The schema of the whole configuration document.
pub fn document_schema() -> Schema {
    Schema::Object {
        required: vec![
            ("version", string(0)),
            (
                "language",
                Schema::Str {
                    min_len: 1,
                    values: LANGUAGES,
                },
            ),
            (
                "questions",
                Schema::Array {
                    min_items: 1,
                    items: Box::new(question_schema()),
                },
            ),
        ],
        optional: vec![
            ("global_time_limit", Schema::Int { min: 1, max: 36000 }),
            (
                "setup_commands",
                Schema::Array {
                    min_items: 0,
                    items: Box::new(string(1)),
                },
            ),
            (
                "files_necessary",
                Schema::Array {
                    min_items: 0,
                    items: Box::new(string(1)),
                },
            ),
        ],
    }
}

fn question_schema() -> Schema {
    Schema::Object {
        required: vec![
            ("name", string(1)),
            (
                "marking_items",
                Schema::Array {
                    min_items: 1,
                    items: Box::new(marking_item_schema()),
                },
            ),
        ],
        optional: vec![],
    }
}

fn marking_item_schema() -> Schema {
    Schema::Object {
        required: vec![
            ("target_file", string(1)),
            (
                "total_mark",
                Schema::Int {
                    min: 0,
                    max: i64::MAX,
                },
            ),
            (
                "type",
                Schema::Str {
                    min_len: 1,
                    values: MARKING_ITEM_TYPES,
                },
            ),
        ],
        optional: vec![
            (
                "time_limit",
                Schema::Int {
                    min: 1,
                    max: i64::MAX,
                },
            ),
            (
                "visibility",
                Schema::Str {
                    min_len: 1,
                    values: VISIBILITIES,
                },
            ),
            ("name", string(0)),
            ("expected_input", string(0)),
            ("expected_output", string(0)),
            ("reference_file", string(0)),
            ("function_name", string(0)),
            ("expected_parameters", string(0)),
            (
                "test_cases",
                Schema::Array {
                    min_items: 0,
                    items: Box::new(test_case_schema()),
                },
            ),
        ],
    }
}

fn test_case_schema() -> Schema {
    // A case with neither `expected` nor `should_raise` is structurally fine,
    // the semantic layer warns about it.
    Schema::Object {
        required: vec![],
        optional: vec![
            (
                "args",
                Schema::Array {
                    min_items: 0,
                    items: Box::new(Schema::Any),
                },
            ),
            (
                "kwargs",
                Schema::Object {
                    required: vec![],
                    optional: vec![],
                },
            ),
            ("expected", string(0)),
            ("should_raise", string(0)),
        ],
    }
}

fn string(min_len: usize) -> Schema {
    Schema::Str {
        min_len,
        values: &[],
    }
}

/// Check a document against a schema node, failing at the first violation.
pub fn check(value: &Value, schema: &Schema, path: FieldPath) -> Result<(), SchemaError> {
    match schema {
        Schema::Object { required, optional } => {
            let Some(object) = value.as_object() else {
                return Err(SchemaError::new(path, "Expected an object"));
            };
            for (key, item_schema) in required {
                match object.get(*key) {
                    Some(item) => check(item, item_schema, path.clone().key(*key))?,
                    None => {
                        return Err(SchemaError::new(
                            path,
                            format!("Missing required field '{}'", key),
                        ));
                    }
                }
            }
            for (key, item_schema) in optional {
                if let Some(item) = object.get(*key) {
                    check(item, item_schema, path.clone().key(*key))?;
                }
            }
            Ok(())
        }
        Schema::Str { min_len, values } => {
            let Some(string) = value.as_str() else {
                return Err(SchemaError::new(path, "Expected a string"));
            };
            if string.len() < *min_len {
                return Err(SchemaError::new(
                    path,
                    if *min_len == 1 {
                        "String must not be empty".to_string()
                    } else {
                        format!("String shorter than {} characters", min_len)
                    },
                ));
            }
            if !values.is_empty() && !values.contains(&string) {
                return Err(SchemaError::new(
                    path,
                    format!(
                        "Invalid value '{}', expected one of: {}",
                        string,
                        values.iter().join(", ")
                    ),
                ));
            }
            Ok(())
        }
        Schema::Int { min, max } => {
            // as_i64 also accepts JSON floats with integral values; require a
            // real integer token like the original schema did.
            let number = match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => n.as_i64(),
                _ => None,
            };
            let Some(number) = number else {
                return Err(SchemaError::new(path, "Expected an integer"));
            };
            if number < *min || number > *max {
                return Err(SchemaError::new(
                    path,
                    if *max == i64::MAX {
                        format!("Value {} below the minimum of {}", number, min)
                    } else {
                        format!("Value {} out of range [{}, {}]", number, min, max)
                    },
                ));
            }
            Ok(())
        }
        Schema::Array { min_items, items } => {
            let Some(array) = value.as_array() else {
                return Err(SchemaError::new(path, "Expected an array"));
            };
            if array.len() < *min_items {
                return Err(SchemaError::new(
                    path,
                    format!("Array must contain at least {} element(s)", min_items),
                ));
            }
            for (index, item) in array.iter().enumerate() {
                check(item, items, path.clone().index(index))?;
            }
            Ok(())
        }
        Schema::Any => Ok(()),
    }
}

/// Check a whole document against [`document_schema`].
pub fn check_document(value: &Value) -> Result<(), SchemaError> {
    check(value, &document_schema(), FieldPath::root())
}
