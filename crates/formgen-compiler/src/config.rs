//! Compiler configuration.

use std::path::PathBuf;

/// Configuration for the form compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Location of the OpenAPI spec: a file path or an http(s) URL.
    pub input: String,

    /// Directory to write generated forms to.
    pub out_dir: PathBuf,

    /// Output file name. Falls back to the camel-cased document title, then
    /// to `forms.<ext>`. In multi-file mode this is the base name each
    /// definition name is prefixed to.
    pub file_name: Option<String>,

    /// Generate one file per definition.
    pub multiple_files: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input: "swagger.json".to_string(),
            out_dir: PathBuf::from("."),
            file_name: None,
            multiple_files: false,
        }
    }
}
