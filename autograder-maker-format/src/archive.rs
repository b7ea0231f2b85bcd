//! Packaging of the rendered artifacts into `autograder.zip`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::ArtifactSet;

/// The name of the archive inside the output directory, fixed by the
/// grading platform's upload format.
pub const ARCHIVE_NAME: &str = "autograder.zip";

/// Write the artifacts into `<output_dir>/autograder.zip` and return the
/// archive path.
///
/// The archive is first written to a temporary file in the destination
/// directory and renamed onto the final name only after it is complete, so
/// a failed run never leaves a truncated archive behind.
pub fn package(artifacts: &ArtifactSet, output_dir: &Path) -> Result<PathBuf, Error> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create the output directory {}",
            output_dir.display()
        )
    })?;

    let mut temp = NamedTempFile::new_in(output_dir)
        .context("Failed to create a temporary file for the archive")?;
    let mut zip = ZipWriter::new(temp.as_file_mut());

    for (path, artifact) in artifacts.iter() {
        let mode = if artifact.executable { 0o755 } else { 0o644 };
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(mode);
        zip.start_file(path, options)
            .with_context(|| format!("Failed to add {} to the archive", path))?;
        zip.write_all(&artifact.content)
            .with_context(|| format!("Failed to write {} into the archive", path))?;
    }
    zip.finish().context("Failed to finalize the archive")?;

    let archive_path = output_dir.join(ARCHIVE_NAME);
    temp.persist(&archive_path)
        .with_context(|| format!("Failed to move the archive to {}", archive_path.display()))?;
    Ok(archive_path)
}
