//! The `validate` entry point: structural schema check, then semantic
//! sanity checks.
//!
//! Structural violations are fatal and fail-fast: the result carries exactly
//! one error naming the dotted path of the first offending node, and the
//! semantic layer does not run. Semantic findings are warnings, accumulated
//! exhaustively in one pass; they never block generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use autograder_maker_diagnostics::{Diagnostic, DiagnosticContext, DiagnosticLevel};

use crate::config::AutograderConfig;
use crate::sanity_checks::run_sanity_checks;
use crate::schema;

/// The outcome of validating a raw configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the document can be turned into a bundle.
    pub is_valid: bool,
    /// User-facing structural errors. At most one, see the fail-fast policy.
    pub errors: Vec<String>,
    /// User-facing semantic warnings, in deterministic order.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_context(ctx: &DiagnosticContext) -> Self {
        Self {
            is_valid: !ctx.has_errors(),
            errors: ctx.messages(DiagnosticLevel::Error),
            warnings: ctx.messages(DiagnosticLevel::Warning),
        }
    }
}

/// Validate a raw configuration document.
pub fn validate(raw: &Value) -> ValidationResult {
    let mut ctx = DiagnosticContext::new();
    if let Err(e) = schema::check_document(raw) {
        ctx.add_diagnostic(
            Diagnostic::error(format!("Schema validation error: {}", e.message))
                .with_field_path(e.path),
        );
        return ValidationResult::from_context(&ctx);
    }

    // The document matches the schema, so the model build cannot fail; guard
    // anyway so a schema/model mismatch shows up as an error, not a panic.
    let config = match AutograderConfig::from_value(raw) {
        Ok(config) => config,
        Err(e) => {
            ctx.add_diagnostic(Diagnostic::error(format!(
                "Configuration model error: {:#}",
                e
            )));
            return ValidationResult::from_context(&ctx);
        }
    };

    run_sanity_checks(&config, &mut ctx);
    ValidationResult::from_context(&ctx)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn test_structural_error_skips_semantic_layer() {
        // Missing `questions` and a bogus item type at once: only the
        // structural error about `questions` is reported.
        let result = validate(&json!({"version": "1.0", "language": "python"}));
        assert!(!result.is_valid);
        assert_that!(&result.errors).has_length(1);
        assert_eq!(
            result.errors[0],
            "Schema validation error: Missing required field 'questions' at path: <root>"
        );
        assert_that!(&result.warnings).is_empty();
    }

    #[test]
    fn test_soft_violation_is_valid_with_one_warning() {
        let result = validate(&json!({
            "version": "1.0",
            "language": "python",
            "files_necessary": [],
            "questions": [{
                "name": "Q1",
                "marking_items": [
                    {"target_file": "missing.py", "total_mark": 10, "type": "file_exists"}
                ]
            }]
        }));
        assert!(result.is_valid);
        assert_that!(&result.errors).is_empty();
        assert_that!(&result.warnings).has_length(1);
        assert!(result.warnings[0].contains("missing.py"));
        assert!(result.warnings[0].contains("Item 1"));
    }

    #[test]
    fn test_unsupported_type_rejected_structurally() {
        let result = validate(&json!({
            "version": "1.0",
            "language": "python",
            "questions": [{
                "name": "Q1",
                "marking_items": [
                    {"target_file": "a.py", "total_mark": 10, "type": "not_a_real_type"}
                ]
            }]
        }));
        assert!(!result.is_valid);
        assert_that!(&result.errors).has_length(1);
        assert!(result.errors[0].contains("not_a_real_type"));
        assert!(result.errors[0].contains("questions.0.marking_items.0.type"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let doc = json!({
            "version": "1.0",
            "language": "python",
            "global_time_limit": 7200,
            "files_necessary": [],
            "questions": [
                {"name": "Q", "marking_items": [
                    {"target_file": "a.py", "total_mark": 0, "type": "file_exists"}
                ]},
                {"name": "Q", "marking_items": [
                    {"target_file": "b.py", "total_mark": 200, "type": "file_exists"}
                ]},
            ]
        });
        let first = validate(&doc);
        let second = validate(&doc);
        assert!(first.is_valid);
        assert_eq!(first.warnings, second.warnings);
        assert_eq!(first.errors, second.errors);
    }
}
