//! Semantic sanity checks for the autograder configuration.
//!
//! These run only after structural validation passed, and only ever produce
//! warnings: a suspicious configuration still generates a bundle. Each check
//! covers one concern and hooks into a single walk over the document, so the
//! warnings come out in document order: global ones first, then per question
//! its name, its marking items one by one, and finally its total marks.

use anyhow::Error;

use autograder_maker_diagnostics::{Diagnostic, DiagnosticContext};

use crate::config::{AutograderConfig, MarkingItem, Question};

mod items;
mod questions;
mod timing;

/// Trait that describes the behavior of a sanity check.
///
/// A check implements the hooks matching its scope; the runner fires them
/// while walking the configuration in document order.
pub trait SanityCheck: Send + Sync + std::fmt::Debug {
    /// The name of the sanity check.
    fn name(&self) -> &'static str;

    /// Called once, before the question walk.
    fn check_document(
        &self,
        _config: &AutograderConfig,
        _ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Called for the question at `index`, before its marking items.
    fn pre_question_hook(
        &self,
        _config: &AutograderConfig,
        _index: usize,
        _ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Called for every marking item. `context` is the `Question 'name',
    /// Item n` prefix of the item's warnings.
    fn check_item(
        &self,
        _config: &AutograderConfig,
        _item: &MarkingItem,
        _context: &str,
        _ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Called for every question, after its marking items.
    fn post_question_hook(
        &self,
        _question: &Question,
        _ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// The fixed, ordered list of sanity checks to run on a configuration.
pub fn get_sanity_checks() -> Vec<Box<dyn SanityCheck>> {
    vec![
        Box::new(timing::GlobalTimeLimit),
        Box::new(questions::DuplicateQuestionNames),
        Box::new(items::TargetFileListed),
        Box::new(timing::ItemTimeLimit),
        Box::new(items::OutputComparisonFields),
        Box::new(items::SignatureCheckFields),
        Box::new(items::FunctionTestFields),
        Box::new(questions::QuestionMarks),
    ]
}

/// Run every sanity check on the configuration, walking it in document
/// order and firing each check's hooks along the way.
///
/// A check that itself fails degrades to a warning naming the check; it never
/// aborts validation.
pub fn run_sanity_checks(config: &AutograderConfig, ctx: &mut DiagnosticContext) {
    let checks = get_sanity_checks();
    for check in &checks {
        let result = check.check_document(config, ctx);
        report_check_failure(check.name(), result, ctx);
    }
    for (index, question) in config.questions.iter().enumerate() {
        for check in &checks {
            let result = check.pre_question_hook(config, index, ctx);
            report_check_failure(check.name(), result, ctx);
        }
        for (item_index, item) in question.marking_items.iter().enumerate() {
            let context = item_context(&question.name, item_index + 1);
            for check in &checks {
                let result = check.check_item(config, item, &context, ctx);
                report_check_failure(check.name(), result, ctx);
            }
        }
        for check in &checks {
            let result = check.post_question_hook(question, ctx);
            report_check_failure(check.name(), result, ctx);
        }
    }
}

fn report_check_failure(name: &str, result: Result<(), Error>, ctx: &mut DiagnosticContext) {
    if let Err(e) = result {
        warn!("sanity check {} failed: {:?}", name, e);
        ctx.add_diagnostic(Diagnostic::warning(format!(
            "Sanity check {} failed: {}",
            name, e
        )));
    }
}

/// The `Question 'name', Item n` prefix shared by the per-item warnings.
fn item_context(question_name: &str, item_number: usize) -> String {
    format!("Question '{}', Item {}", question_name, item_number)
}
