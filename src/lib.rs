//! Command line interface for generating Gradescope autograder bundles.
//!
//! The heavy lifting lives in the `autograder-maker-format` crate, this one
//! only parses the arguments, drives the pipeline and prints the findings.

#[macro_use]
extern crate log;

pub mod error;
pub mod opt;
