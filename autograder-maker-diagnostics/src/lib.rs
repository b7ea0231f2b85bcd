mod path;

use std::fmt::{Display, Formatter};

use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

pub use path::FieldPath;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

impl DiagnosticLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "Error",
            DiagnosticLevel::Warning => "Warning",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DiagnosticLevel::Warning => Color::BrightYellow,
            DiagnosticLevel::Error => Color::BrightRed,
        }
    }
}

impl Display for DiagnosticLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message produced while checking a configuration document.
///
/// Errors block the generation of the bundle, warnings never do.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    level: DiagnosticLevel,
    message: String,
    note: Option<String>,
    help: Option<String>,
    field_path: Option<FieldPath>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            message: message.into(),
            note: None,
            help: None,
            field_path: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            note: None,
            help: None,
            field_path: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_field_path(mut self, field_path: FieldPath) -> Self {
        self.field_path = Some(field_path);
        self
    }

    pub fn print(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let level = self.level.as_str();
        let pad = level.len();
        writeln!(
            f,
            "{}: {}",
            level.color(self.level.color()).bold(),
            self.message
        )?;
        if let Some(path) = &self.field_path {
            writeln!(f, "{:>pad$}: at path: {}", "Path".bold(), path, pad = pad)?;
        }
        if let Some(note) = &self.note {
            write!(f, "{:>pad$}: ", "Note".bold(), pad = pad)?;
            let mut lines = note.lines();
            if let Some(line) = lines.next() {
                writeln!(f, "{}", line)?;
            }
            for line in lines {
                writeln!(f, "{:>pad$}  {}", "", line, pad = pad)?;
            }
        }
        if let Some(help) = &self.help {
            writeln!(f, "{:>pad$}: {}", "Help".bold(), help, pad = pad)?;
        }
        Ok(())
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_path(&self) -> Option<&FieldPath> {
        self.field_path.as_ref()
    }

    /// Single-line rendering of the diagnostic, suitable for the
    /// structured error/warning lists returned to the caller.
    pub fn to_line(&self) -> String {
        match &self.field_path {
            Some(path) => format!("{} at path: {}", self.message, path),
            None => self.message.clone(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.print(f)
    }
}

/// An ordered collection of diagnostics, filled during validation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiagnosticContext {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level() == DiagnosticLevel::Error)
    }

    /// The messages of the diagnostics with the given level, in insertion order.
    pub fn messages(&self, level: DiagnosticLevel) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.level() == level)
            .map(Diagnostic::to_line)
            .collect()
    }
}
