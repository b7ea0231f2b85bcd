use anyhow::Error;

use autograder_maker_diagnostics::{Diagnostic, DiagnosticContext};

use crate::config::{AutograderConfig, MarkingItem, MarkingItemKind};
use crate::sanity_checks::SanityCheck;

/// Check that every `target_file` is listed in `files_necessary`, otherwise
/// the entry-point script never copies it and the check cannot pass.
#[derive(Debug, Default)]
pub struct TargetFileListed;

impl SanityCheck for TargetFileListed {
    fn name(&self) -> &'static str {
        "TargetFileListed"
    }

    fn check_item(
        &self,
        config: &AutograderConfig,
        item: &MarkingItem,
        context: &str,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if !item.target_file.is_empty() && !config.files_necessary.contains(&item.target_file) {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: Target file '{}' is not listed in 'files_necessary'",
                context, item.target_file
            )));
        }
        Ok(())
    }
}

/// Check the fields of `output_comparison` items.
#[derive(Debug, Default)]
pub struct OutputComparisonFields;

impl SanityCheck for OutputComparisonFields {
    fn name(&self) -> &'static str {
        "OutputComparisonFields"
    }

    fn check_item(
        &self,
        _config: &AutograderConfig,
        item: &MarkingItem,
        context: &str,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if item.kind != MarkingItemKind::OutputComparison {
            return Ok(());
        }
        if item.expected_output.is_empty() {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: Expected output is empty",
                context
            )));
        }
        if !item.expected_input.is_empty() && !item.reference_file.is_empty() {
            // Not a conflict: the inline input taking precedence is policy.
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: Both expected_input and reference_file provided. \
                 expected_input will be used.",
                context
            )));
        }
        Ok(())
    }
}

/// Check that `signature_check` items do not carry I/O fields, which are
/// meaningless for that kind.
#[derive(Debug, Default)]
pub struct SignatureCheckFields;

impl SanityCheck for SignatureCheckFields {
    fn name(&self) -> &'static str {
        "SignatureCheckFields"
    }

    fn check_item(
        &self,
        _config: &AutograderConfig,
        item: &MarkingItem,
        context: &str,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if item.kind != MarkingItemKind::SignatureCheck {
            return Ok(());
        }
        if !item.expected_input.is_empty() || !item.expected_output.is_empty() {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: expected_input/expected_output not needed for signature check",
                context
            )));
        }
        Ok(())
    }
}

/// Check the fields of `function_test` items.
#[derive(Debug, Default)]
pub struct FunctionTestFields;

impl SanityCheck for FunctionTestFields {
    fn name(&self) -> &'static str {
        "FunctionTestFields"
    }

    fn check_item(
        &self,
        _config: &AutograderConfig,
        item: &MarkingItem,
        context: &str,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if item.kind != MarkingItemKind::FunctionTest {
            return Ok(());
        }
        if item.function_name.is_empty() {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: function_name is required for function_test",
                context
            )));
        }
        if item.test_cases.is_empty() {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: No test cases provided for function testing",
                context
            )));
        }
        for (index, case) in item.test_cases.iter().enumerate() {
            if !case.has_expectation() {
                ctx.add_diagnostic(Diagnostic::warning(format!(
                    "{}: Test case {} has no expected value or exception",
                    context,
                    index + 1
                )));
            }
        }
        Ok(())
    }
}
