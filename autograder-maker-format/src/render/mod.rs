//! Rendering of the bundle artifacts.
//!
//! `render` is pure: it turns a configuration into an in-memory set of
//! files and never touches the filesystem. The packager decides where the
//! bytes end up.

mod question;
mod scripts;

use anyhow::{Context, Error};
use askama::Template;
use indexmap::IndexMap;

use crate::config::AutograderConfig;

pub use question::render_question_module;

/// A single file of the bundle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Artifact {
    /// The raw file content.
    pub content: Vec<u8>,
    /// Whether the file is stored with executable permissions.
    pub executable: bool,
}

/// The files of a bundle, keyed by their forward-slash relative path.
///
/// Insertion order is preserved and determines the order of the entries in
/// the final archive.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    artifacts: IndexMap<String, Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular text file.
    pub fn add_text(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.artifacts.insert(
            path.into(),
            Artifact {
                content: content.into(),
                executable: false,
            },
        );
    }

    /// Add a file that must carry executable permissions in the archive.
    pub fn add_executable(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.artifacts.insert(
            path.into(),
            Artifact {
                content: content.into(),
                executable: true,
            },
        );
    }

    pub fn get(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Artifact)> {
        self.artifacts.iter().map(|(path, a)| (path.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// The paths in archive order.
    pub fn paths(&self) -> Vec<&str> {
        self.artifacts.keys().map(String::as_str).collect()
    }
}

/// Render every artifact of the bundle for the given configuration.
///
/// `original_json` is the raw configuration document; when present it is
/// embedded verbatim as `autograder_config.json` so the bundle stays
/// self-describing.
pub fn render(
    config: &AutograderConfig,
    original_json: Option<&str>,
) -> Result<ArtifactSet, Error> {
    let mut artifacts = ArtifactSet::new();

    let setup = scripts::SetupScriptTemplate::new(config)
        .render()
        .context("Failed to render setup.sh")?;
    artifacts.add_executable("setup.sh", setup);

    let run_autograder = scripts::RunAutograderTemplate::new(config)
        .render()
        .context("Failed to render run_autograder")?;
    artifacts.add_executable("run_autograder", run_autograder);

    let run_tests = scripts::RunTestsTemplate::new(config)
        .render()
        .context("Failed to render run_tests.py")?;
    artifacts.add_text("run_tests.py", run_tests);

    let requirements = scripts::RequirementsTemplate
        .render()
        .context("Failed to render requirements.txt")?;
    artifacts.add_text("requirements.txt", requirements);

    let readme = scripts::ReadmeTemplate::new(config)
        .render()
        .context("Failed to render README.md")?;
    artifacts.add_text("README.md", readme);

    if let Some(original) = original_json {
        artifacts.add_text("autograder_config.json", original);
    }

    // The tests directory is a package so `tests.test_question_<n>` resolves.
    artifacts.add_text("tests/__init__.py", "");
    for (index, question) in config.questions.iter().enumerate() {
        let number = index + 1;
        let module = question::render_question_module(config, question, number);
        artifacts.add_text(format!("tests/test_question_{}.py", number), module);
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample_config() -> AutograderConfig {
        AutograderConfig::from_value(&json!({
            "version": "1.0",
            "language": "python",
            "setup_commands": ["apt-get install -y graphviz"],
            "files_necessary": ["solution.py", "helpers.py"],
            "questions": [
                {
                    "name": "Basics",
                    "marking_items": [
                        {"target_file": "solution.py", "total_mark": 10, "type": "file_exists"}
                    ]
                },
                {
                    "name": "Output",
                    "marking_items": [
                        {
                            "target_file": "solution.py",
                            "total_mark": 20,
                            "type": "output_comparison",
                            "expected_output": "42"
                        }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn text(artifacts: &ArtifactSet, path: &str) -> String {
        String::from_utf8(artifacts.get(path).unwrap().content.clone()).unwrap()
    }

    #[test]
    fn test_artifact_paths_and_order() {
        let artifacts = render(&sample_config(), Some("{}")).unwrap();
        assert_eq!(
            artifacts.paths(),
            vec![
                "setup.sh",
                "run_autograder",
                "run_tests.py",
                "requirements.txt",
                "README.md",
                "autograder_config.json",
                "tests/__init__.py",
                "tests/test_question_1.py",
                "tests/test_question_2.py",
            ]
        );
    }

    #[test]
    fn test_original_config_embedded_verbatim() {
        let raw = "{\n  \"version\": \"1.0\"\n}";
        let artifacts = render(&sample_config(), Some(raw)).unwrap();
        assert_eq!(text(&artifacts, "autograder_config.json"), raw);
    }

    #[test]
    fn test_original_config_omitted_when_absent() {
        let artifacts = render(&sample_config(), None).unwrap();
        assert!(artifacts.get("autograder_config.json").is_none());
    }

    #[test]
    fn test_executable_bits() {
        let artifacts = render(&sample_config(), None).unwrap();
        assert!(artifacts.get("setup.sh").unwrap().executable);
        assert!(artifacts.get("run_autograder").unwrap().executable);
        assert!(!artifacts.get("run_tests.py").unwrap().executable);
        assert!(!artifacts.get("tests/test_question_1.py").unwrap().executable);
    }

    #[test]
    fn test_render_is_idempotent() {
        let config = sample_config();
        let first = render(&config, Some("{}")).unwrap();
        let second = render(&config, Some("{}")).unwrap();
        assert_eq!(first.paths(), second.paths());
        for (path, artifact) in first.iter() {
            assert_eq!(artifact, second.get(path).unwrap(), "mismatch in {}", path);
        }
    }

    #[test]
    fn test_setup_script_content() {
        let artifacts = render(&sample_config(), None).unwrap();
        let setup = text(&artifacts, "setup.sh");
        assert!(setup.starts_with("#!/usr/bin/env bash"));
        assert!(setup.contains("set -e"));
        assert!(setup.contains("apt-get install -y graphviz"));
        assert!(setup.contains("Setup completed successfully"));
    }

    #[test]
    fn test_run_autograder_content() {
        let artifacts = render(&sample_config(), None).unwrap();
        let script = text(&artifacts, "run_autograder");
        assert!(script.contains("Copying required submission files to source directory"));
        assert!(script.contains("solution.py"));
        assert!(script.contains("helpers.py"));
        assert!(script.contains("python3 run_tests.py"));
    }

    #[test]
    fn test_run_tests_loads_questions_in_numeric_order() {
        let artifacts = render(&sample_config(), None).unwrap();
        let runner = text(&artifacts, "run_tests.py");
        assert!(runner.contains("QUESTION_COUNT = 2"));
        assert!(runner.contains("tests.test_question_"));
        assert!(runner.contains("JSONTestRunner"));
    }

    #[test]
    fn test_requirements_content() {
        let artifacts = render(&sample_config(), None).unwrap();
        let requirements = text(&artifacts, "requirements.txt");
        assert!(requirements.contains("gradescope-utils"));
        assert!(requirements.contains("timeout-decorator"));
    }

    #[test]
    fn test_readme_summary() {
        let artifacts = render(&sample_config(), None).unwrap();
        let readme = text(&artifacts, "README.md");
        assert!(readme.contains("**Language**: python"));
        assert!(readme.contains("**Questions**: 2"));
        assert!(readme.contains("**Total Points**: 30"));
        assert!(readme.contains("solution.py, helpers.py"));
        assert!(readme.contains("### Question 1: Basics"));
        assert!(readme.contains("### Question 2: Output"));
    }
}
