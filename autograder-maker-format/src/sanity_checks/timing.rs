use anyhow::Error;

use autograder_maker_diagnostics::{Diagnostic, DiagnosticContext};

use crate::config::{AutograderConfig, MarkingItem};
use crate::sanity_checks::SanityCheck;

/// Global time limits above this are suspicious.
const GLOBAL_TIME_LIMIT_THRESHOLD: u32 = 3600;
/// Per-item time limits above this are suspicious.
const ITEM_TIME_LIMIT_THRESHOLD: u32 = 300;

/// Check that the global time limit is plausible.
#[derive(Debug, Default)]
pub struct GlobalTimeLimit;

impl SanityCheck for GlobalTimeLimit {
    fn name(&self) -> &'static str {
        "GlobalTimeLimit"
    }

    fn check_document(
        &self,
        config: &AutograderConfig,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if config.global_time_limit > GLOBAL_TIME_LIMIT_THRESHOLD {
            ctx.add_diagnostic(Diagnostic::warning(
                "Global time limit is very high (>1 hour)",
            ));
        }
        Ok(())
    }
}

/// Check that no marking item has an implausibly high time limit.
#[derive(Debug, Default)]
pub struct ItemTimeLimit;

impl SanityCheck for ItemTimeLimit {
    fn name(&self) -> &'static str {
        "ItemTimeLimit"
    }

    fn check_item(
        &self,
        _config: &AutograderConfig,
        item: &MarkingItem,
        context: &str,
        ctx: &mut DiagnosticContext,
    ) -> Result<(), Error> {
        if item.time_limit > ITEM_TIME_LIMIT_THRESHOLD {
            ctx.add_diagnostic(Diagnostic::warning(format!(
                "{}: Time limit is very high ({}s)",
                context, item.time_limit
            )));
        }
        Ok(())
    }
}
