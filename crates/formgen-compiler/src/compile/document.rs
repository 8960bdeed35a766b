//! Whole-document compilation.

use tracing::debug;

use super::definition::compile_form;
use crate::diagnostic::CompilerError;
use crate::ir::FormDeclaration;
use crate::naming::to_camel_case;
use crate::rules::RuleRegistry;
use crate::schema::Document;

/// Compiles every named definition of `document`, in document order.
///
/// Fails with [`CompilerError::SchemaLocation`] when the document has no
/// non-empty `definitions` or `components.schemas`; no partial output is
/// produced in that case.
pub fn compile_document(document: &Document, rules: &RuleRegistry) -> Result<Vec<FormDeclaration>, CompilerError> {
    let schemas = document.schemas().ok_or(CompilerError::SchemaLocation)?;
    debug!(definitions = schemas.len(), "compiling document");

    Ok(schemas
        .iter()
        .map(|(name, definition)| compile_form(name, definition, rules))
        .collect())
}

/// Names of the definitions [`compile_document`] would compile.
pub fn definition_names(document: &Document) -> Result<Vec<&str>, CompilerError> {
    let schemas = document.schemas().ok_or(CompilerError::SchemaLocation)?;
    Ok(schemas.keys().map(String::as_str).collect())
}

/// Derives an output file name from `info.title`, e.g. `"Foo bar_baz"` with
/// extension `ts` → `fooBarBaz.ts`.
pub fn make_file_name(document: &Document, extension: &str) -> Option<String> {
    let stem = to_camel_case(document.title()?);
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}.{}", stem, extension))
}
