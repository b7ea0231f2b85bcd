use anyhow::Error;

use autograder_maker_diagnostics::{Diagnostic, DiagnosticContext};

use crate::config::{AutograderConfig, Question};
use crate::sanity_checks::SanityCheck;

/// Per-question totals above this are suspicious.
const QUESTION_MARKS_THRESHOLD: u64 = 100;

/// Check that question names are unique. Duplicates only warn, the generated
/// test modules are keyed by index and never collide.
#[derive(Debug, Default)]
pub struct DuplicateQuestionNames;

impl SanityCheck for DuplicateQuestionNames {
    fn name(&self) -> &'static str {
        "DuplicateQuestionNames"
    }

    fn pre_question_hook(
        &self,
        config: &AutograderConfig,
        index: usize,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        let name = &config.questions[index].name;
        if config.questions[..index].iter().any(|q| &q.name == name) {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "Duplicate question name: '{}'",
                name
            )));
        }
        Ok(())
    }
}

/// Check that every question is worth a sensible number of points.
#[derive(Debug, Default)]
pub struct QuestionMarks;

impl SanityCheck for QuestionMarks {
    fn name(&self) -> &'static str {
        "QuestionMarks"
    }

    fn post_question_hook(
        &self,
        question: &Question,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        let total = question.total_marks();
        if total == 0 {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "Question '{}': Total marks is 0",
                question.name
            )));
        } else if total > QUESTION_MARKS_THRESHOLD {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "Question '{}': Total marks is very high ({})",
                question.name, total
            )));
        }
        Ok(())
    }
}
