//! The generation pipeline, from configuration file to archive.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use serde_json::Value;

use crate::archive;
use crate::config::AutograderConfig;
use crate::render;
use crate::validation::{validate, ValidationResult};

/// The result of a generation run.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// The validation findings for the configuration.
    pub validation: ValidationResult,
    /// The path of the produced archive. `None` when validation failed.
    pub archive: Option<PathBuf>,
}

fn read_document(config_path: &Path) -> Result<(String, Value), Error> {
    let raw = fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read the configuration file {}",
            config_path.display()
        )
    })?;
    let document: Value =
        serde_json::from_str(&raw).context("Invalid JSON in configuration file")?;
    Ok((raw, document))
}

/// Validate the configuration file without producing anything.
pub fn validate_file(config_path: &Path) -> Result<ValidationResult, Error> {
    let (_, document) = read_document(config_path)?;
    Ok(validate(&document))
}

/// Run the whole pipeline: validate, build the model, render the artifacts
/// and package them into `<output_dir>/autograder.zip`.
///
/// An invalid configuration is not an error of the pipeline: the outcome
/// carries the findings and no archive. I/O and rendering failures are.
pub fn generate(config_path: &Path, output_dir: &Path) -> Result<GenerationOutcome, Error> {
    let (raw, document) = read_document(config_path)?;

    let validation = validate(&document);
    if !validation.is_valid {
        return Ok(GenerationOutcome {
            validation,
            archive: None,
        });
    }

    let config = AutograderConfig::from_value(&document)
        .context("Failed to build the configuration model")?;
    debug!(
        "Rendering bundle for {} questions ({} marking items)",
        config.questions.len(),
        config.total_items()
    );
    let artifacts = render::render(&config, Some(raw.as_str()))
        .context("Failed to render the autograder artifacts")?;
    let archive_path = archive::package(&artifacts, output_dir)
        .context("Failed to package the autograder bundle")?;
    info!("Bundle written to {}", archive_path.display());

    Ok(GenerationOutcome {
        validation,
        archive: Some(archive_path),
    })
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;
    use zip::ZipArchive;

    use super::*;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const MINIMAL_CONFIG: &str = r#"{
        "version": "1.0",
        "language": "python",
        "files_necessary": ["solution.py"],
        "questions": [
            {
                "name": "Q1",
                "marking_items": [
                    {"target_file": "solution.py", "total_mark": 10, "type": "file_exists"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_generate_minimal_config() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, MINIMAL_CONFIG);
        let output_dir = dir.path().join("output");

        let outcome = generate(&config_path, &output_dir).unwrap();
        assert!(outcome.validation.is_valid);
        assert!(outcome.validation.warnings.is_empty());
        let archive_path = outcome.archive.unwrap();

        let mut archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        let names: Vec<_> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        for expected in [
            "setup.sh",
            "run_autograder",
            "run_tests.py",
            "requirements.txt",
            "README.md",
            "autograder_config.json",
            "tests/test_question_1.py",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn test_generate_embeds_original_document() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, MINIMAL_CONFIG);
        let output_dir = dir.path().join("output");

        let outcome = generate(&config_path, &output_dir).unwrap();
        let mut archive =
            ZipArchive::new(File::open(outcome.archive.unwrap()).unwrap()).unwrap();
        let mut embedded = String::new();
        use std::io::Read;
        archive
            .by_name("autograder_config.json")
            .unwrap()
            .read_to_string(&mut embedded)
            .unwrap();
        assert_eq!(embedded, MINIMAL_CONFIG);
    }

    #[test]
    fn test_invalid_config_produces_no_archive() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, r#"{"version": "1.0"}"#);
        let output_dir = dir.path().join("output");

        let outcome = generate(&config_path, &output_dir).unwrap();
        assert!(!outcome.validation.is_valid);
        assert!(outcome.archive.is_none());
        assert!(!output_dir.join(archive::ARCHIVE_NAME).exists());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = validate_file(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read the configuration file"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "{not json");
        let err = validate_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid JSON in configuration file"));
    }

    #[test]
    fn test_runs_are_reproducible() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, MINIMAL_CONFIG);
        let first_dir = dir.path().join("first");
        let second_dir = dir.path().join("second");

        let first = generate(&config_path, &first_dir).unwrap();
        let second = generate(&config_path, &second_dir).unwrap();

        let read_entries = |path: &Path| {
            let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
            let mut entries = Vec::new();
            for i in 0..archive.len() {
                use std::io::Read;
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                entries.push((file.name().to_string(), content));
            }
            entries
        };
        assert_eq!(
            read_entries(&first.archive.unwrap()),
            read_entries(&second.archive.unwrap())
        );
    }
}
