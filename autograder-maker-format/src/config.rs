//! The typed configuration model.
//!
//! The structs here are plain data-transfer structures: every optional field
//! carries its documented default, so the renderer never has to null-check
//! anything. Deserialization preserves the input order of `questions` and of
//! each question's `marking_items`; that order keys the generated
//! `tests/test_question_<n>.py` filenames.

use std::fmt::{Display, Formatter};

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The submission language the generated bundle targets.
///
/// This enum is the authoritative supported-language list of the external
/// interface: only `python` is accepted.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
        }
    }

    /// Whether the language's print primitive appends a trailing line
    /// terminator, making expected-output normalization meaningful.
    pub fn print_appends_newline(&self) -> bool {
        match self {
            Language::Python => true,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of check a marking item performs on the submission.
///
/// This textual snake_case representation is the authoritative external
/// interface for the `type` field.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingItemKind {
    FileExists,
    OutputComparison,
    SignatureCheck,
    FunctionTest,
    ClassTest,
}

impl MarkingItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkingItemKind::FileExists => "file_exists",
            MarkingItemKind::OutputComparison => "output_comparison",
            MarkingItemKind::SignatureCheck => "signature_check",
            MarkingItemKind::FunctionTest => "function_test",
            MarkingItemKind::ClassTest => "class_test",
        }
    }
}

impl Display for MarkingItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the result of a marking item is revealed to the student.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    AfterDueDate,
    AfterPublished,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
            Visibility::AfterDueDate => "after_due_date",
            Visibility::AfterPublished => "after_published",
        }
    }

    /// Student-facing description, used in the bundle summary.
    pub fn description(&self) -> &'static str {
        match self {
            Visibility::Visible => "Visible to students immediately",
            Visibility::Hidden => "Hidden from students",
            Visibility::AfterDueDate => "Visible after due date",
            Visibility::AfterPublished => "Visible after grades published",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation of the function under test in a `function_test` item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Positional arguments, as JSON values.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Keyword arguments, as JSON values.
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    /// The expected return value, compared against the textual
    /// representation of the actual result.
    #[serde(default)]
    pub expected: String,
    /// The name of the exception type the call is expected to raise.
    /// Empty when the call is expected to return normally.
    #[serde(default)]
    pub should_raise: String,
}

impl TestCase {
    /// Whether this test case asserts anything at all.
    pub fn has_expectation(&self) -> bool {
        !self.expected.is_empty() || !self.should_raise.is_empty()
    }
}

/// One independently scored check applied to a submission file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkingItem {
    /// Optional display label.
    #[serde(default)]
    pub name: String,
    /// The submission file this check applies to.
    pub target_file: String,
    /// Points awarded when the check passes.
    pub total_mark: u32,
    /// What the check does.
    #[serde(rename = "type")]
    pub kind: MarkingItemKind,
    /// Per-item time limit in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit: u32,
    /// When the result is revealed to the student.
    #[serde(default)]
    pub visibility: Visibility,

    /// `output_comparison`: text fed to the submission on stdin.
    #[serde(default)]
    pub expected_input: String,
    /// `output_comparison`: text compared against the captured stdout.
    #[serde(default)]
    pub expected_output: String,
    /// `output_comparison`: external reference file. When both this and
    /// `expected_input` are given the inline input wins.
    #[serde(default)]
    pub reference_file: String,

    /// `signature_check`/`function_test`: the function to inspect or call.
    #[serde(default)]
    pub function_name: String,
    /// `signature_check`: textual positional/keyword signature description.
    #[serde(default)]
    pub expected_parameters: String,
    /// `function_test`: the calls to perform.
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

fn default_time_limit() -> u32 {
    30
}

impl MarkingItem {
    /// The label shown in reports, falling back to a generated one.
    pub fn label(&self, item_number: usize) -> String {
        if self.name.is_empty() {
            format!("Marking item {}", item_number)
        } else {
            self.name.clone()
        }
    }
}

/// A named group of marking items sharing a logical grading unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The question name. Should be unique in the configuration, duplicates
    /// are only warned about.
    pub name: String,
    /// The checks of this question, in document order.
    #[serde(default)]
    pub marking_items: Vec<MarkingItem>,
}

impl Question {
    /// Sum of the marks of every item of this question. Widened to `u64` so
    /// the sum cannot overflow whatever per-item marks the schema admits.
    pub fn total_marks(&self) -> u64 {
        self.marking_items
            .iter()
            .map(|item| u64::from(item.total_mark))
            .sum()
    }
}

/// The complete autograder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutograderConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// The submission language.
    #[serde(default)]
    pub language: Language,
    /// Global time limit in seconds for the whole grading run.
    #[serde(default = "default_global_time_limit", rename = "global_time_limit")]
    pub global_time_limit: u32,
    /// Shell commands run in order while preparing the grading environment.
    #[serde(default)]
    pub setup_commands: Vec<String>,
    /// The files the student must submit.
    #[serde(default)]
    pub files_necessary: Vec<String>,
    /// The questions, in document order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_version() -> String {
    "0".into()
}

fn default_global_time_limit() -> u32 {
    300
}

impl AutograderConfig {
    /// Build the typed model from a raw document.
    ///
    /// Total for documents that passed structural validation. It can also be
    /// used in a tolerant mode without prior validation: every optional field
    /// is defaulted here, and only genuine type mismatches surface as errors.
    pub fn from_value(raw: &Value) -> Result<Self, Error> {
        serde_json::from_value(raw.clone()).context("Invalid autograder configuration")
    }

    /// Sum of the marks of every item of every question.
    pub fn total_marks(&self) -> u64 {
        self.questions.iter().map(Question::total_marks).sum()
    }

    /// Total number of marking items across all questions.
    pub fn total_items(&self) -> usize {
        self.questions.iter().map(|q| q.marking_items.len()).sum()
    }
}
