//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading, compiling, or writing forms.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to write file '{path}': {message}")]
    #[diagnostic(code(formgen::io::write_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Load Errors
    // =========================================================================
    #[error("Failed to load spec '{source_name}': {message}")]
    #[diagnostic(
        code(formgen::load::spec_load_failed),
        help("The input must be a file path or an http(s) URL to an OpenAPI v2/v3 document in JSON or YAML")
    )]
    SpecLoad {
        source_name: String,
        message: String,
    },

    #[error("Cannot resolve reference '{reference}': {message}")]
    #[diagnostic(
        code(formgen::load::unresolved_reference),
        help("Only local references such as '#/components/schemas/Pet' are supported")
    )]
    UnresolvedReference {
        reference: String,
        message: String,
    },

    #[error("Cyclic reference detected: {chain}")]
    #[diagnostic(
        code(formgen::load::cyclic_reference),
        help("Self-referencing schemas cannot be expanded into a finite form")
    )]
    CyclicReference {
        chain: String,
    },

    // =========================================================================
    // Compile Errors
    // =========================================================================
    #[error("Cannot find schemas/definitions")]
    #[diagnostic(
        code(formgen::compile::schema_location),
        help("OpenAPI v2 documents declare 'definitions', OpenAPI v3 documents declare 'components.schemas'")
    )]
    SchemaLocation,
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a spec load error.
    pub fn spec_load(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::SpecLoad {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}
