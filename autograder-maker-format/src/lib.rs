//! Parsing, validation and rendering of autograder configurations.
//!
//! This crate turns a JSON configuration document into a Gradescope-style
//! `autograder.zip` bundle. The pipeline is split in independent layers:
//! structural validation against a declarative schema, semantic sanity
//! checks on the typed model, pure in-memory rendering of the bundle
//! artifacts and atomic packaging into the archive.

#[macro_use]
extern crate log;

mod archive;
pub mod config;
mod pipeline;
pub mod render;
pub mod sanity_checks;
pub mod schema;
mod validation;

pub use archive::{package, ARCHIVE_NAME};
pub use pipeline::{generate, validate_file, GenerationOutcome};
pub use validation::{validate, ValidationResult};
