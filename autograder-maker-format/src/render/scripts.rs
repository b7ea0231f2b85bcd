//! Templates of the non-test artifacts.
//!
//! The templates receive precomputed strings only, all the logic lives here.

use askama::Template;
use itertools::Itertools;

use crate::config::{AutograderConfig, MarkingItemKind};

/// Template for `setup.sh`, the environment preparation script.
#[derive(Template)]
#[template(path = "setup.sh", escape = "none")]
pub(super) struct SetupScriptTemplate {
    commands: Vec<String>,
}

impl SetupScriptTemplate {
    pub(super) fn new(config: &AutograderConfig) -> Self {
        Self {
            commands: config.setup_commands.clone(),
        }
    }
}

/// Template for `run_autograder`, the platform entry point.
#[derive(Template)]
#[template(path = "run_autograder", escape = "none")]
pub(super) struct RunAutograderTemplate {
    files: Vec<String>,
}

impl RunAutograderTemplate {
    pub(super) fn new(config: &AutograderConfig) -> Self {
        Self {
            files: config.files_necessary.clone(),
        }
    }
}

/// Template for `run_tests.py`, the suite driver.
#[derive(Template)]
#[template(path = "run_tests.py", escape = "none")]
pub(super) struct RunTestsTemplate {
    question_count: usize,
}

impl RunTestsTemplate {
    pub(super) fn new(config: &AutograderConfig) -> Self {
        Self {
            question_count: config.questions.len(),
        }
    }
}

/// Template for `requirements.txt`. The listed packages are what the
/// generated tests import, not what the submission needs.
#[derive(Template)]
#[template(path = "requirements.txt", escape = "none")]
pub(super) struct RequirementsTemplate;

/// One marking item row of the README summary.
pub(super) struct ItemSummary {
    number: usize,
    name: String,
    lines: Vec<String>,
}

/// One question section of the README summary.
pub(super) struct QuestionSummary {
    number: usize,
    name: String,
    points: u64,
    items: Vec<ItemSummary>,
}

/// Template for `README.md`, the human-readable bundle summary.
#[derive(Template)]
#[template(path = "README.md", escape = "none")]
pub(super) struct ReadmeTemplate {
    language: String,
    question_count: usize,
    item_count: usize,
    total_points: u64,
    global_time_limit: u32,
    files: String,
    questions: Vec<QuestionSummary>,
}

impl ReadmeTemplate {
    pub(super) fn new(config: &AutograderConfig) -> Self {
        let files = if config.files_necessary.is_empty() {
            "None specified".into()
        } else {
            config.files_necessary.iter().join(", ")
        };
        let questions = config
            .questions
            .iter()
            .enumerate()
            .map(|(q_index, question)| QuestionSummary {
                number: q_index + 1,
                name: question.name.clone(),
                points: question.total_marks(),
                items: question
                    .marking_items
                    .iter()
                    .enumerate()
                    .map(|(i_index, item)| ItemSummary {
                        number: i_index + 1,
                        name: item.label(i_index + 1),
                        lines: item_lines(item),
                    })
                    .collect(),
            })
            .collect();
        Self {
            language: config.language.to_string(),
            question_count: config.questions.len(),
            item_count: config.total_items(),
            total_points: config.total_marks(),
            global_time_limit: config.global_time_limit,
            files,
            questions,
        }
    }
}

fn item_lines(item: &crate::config::MarkingItem) -> Vec<String> {
    let mut lines = vec![
        format!("- **Type**: {}", title_case(item.kind.as_str())),
        format!("- **Target File**: {}", item.target_file),
        format!("- **Points**: {}", item.total_mark),
        format!("- **Time Limit**: {} seconds", item.time_limit),
        format!("- **Visibility**: {}", item.visibility.description()),
    ];
    match item.kind {
        MarkingItemKind::FunctionTest => {
            if !item.function_name.is_empty() {
                lines.push(format!("- **Function**: `{}()`", item.function_name));
            }
            if !item.test_cases.is_empty() {
                lines.push(format!("- **Test Cases**: {} case(s)", item.test_cases.len()));
            }
        }
        MarkingItemKind::SignatureCheck => {
            if !item.function_name.is_empty() {
                lines.push(format!("- **Function**: `{}()`", item.function_name));
            }
            if !item.expected_parameters.is_empty() {
                lines.push(format!(
                    "- **Expected Parameters**: `{}`",
                    item.expected_parameters
                ));
            }
        }
        MarkingItemKind::OutputComparison => {
            if !item.expected_input.is_empty() {
                let input_lines = item.expected_input.matches('\n').count() + 1;
                lines.push(format!("- **Input Lines**: {}", input_lines));
            }
            if !item.expected_output.is_empty() {
                let output_lines = item.expected_output.matches('\n').count() + 1;
                lines.push(format!("- **Expected Output Lines**: {}", output_lines));
            }
        }
        MarkingItemKind::FileExists | MarkingItemKind::ClassTest => {}
    }
    lines
}

/// `file_exists` becomes `File Exists`.
fn title_case(kind: &str) -> String {
    kind.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .join(" ")
}
