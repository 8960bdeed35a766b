//! # formgen Compiler
//!
//! This crate compiles the schema objects of an OpenAPI v2/v3 document into
//! Angular reactive-form declarations: one `FormGroup` per named definition,
//! with `Validators` derived from the schema's constraints.
//!
//! ## Architecture
//!
//! ```text
//! Spec (file / URL, JSON / YAML)
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Loader    │  Parse + inline local $refs
//! │ (text → doc) │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Compile    │  Definitions → declaration tree,
//! │ (doc → IR)   │  validators from the RuleRegistry
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Declaration tree → TypeScript
//! │  (IR → TS)   │
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formgen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     input: "https://petstore.swagger.io/v2/swagger.json".into(),
//!     out_dir: "src/app/forms".into(),
//!     file_name: None,
//!     multiple_files: false,
//! };
//!
//! let compiler = Compiler::new(config);
//! compiler.compile().await?;
//! ```

pub mod codegen;
pub mod compile;
pub mod config;
pub mod diagnostic;
pub mod ir;
pub mod loader;
pub mod naming;
pub mod rules;
pub mod schema;

use std::path::{Component, Path, PathBuf};

use tracing::info;

pub use codegen::{AngularRenderer, GeneratedCode, OutputLayout, Renderer};
pub use config::CompilerConfig;
pub use diagnostic::CompilerError;
pub use ir::{FieldDeclaration, FormDeclaration, Validator};
pub use rules::{Rule, RuleRegistry};
pub use schema::{Document, Schema};

/// Orchestrates load → compile → render → write for one configuration.
///
/// Each compiler owns its rule registry, so compilers with different rule
/// sets can run side by side.
pub struct Compiler {
    config: CompilerConfig,
    rules: RuleRegistry,
    renderer: Box<dyn Renderer>,
}

impl Compiler {
    /// Creates a compiler with the built-in rules and the Angular renderer.
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            rules: RuleRegistry::new(),
            renderer: Box::new(AngularRenderer),
        }
    }

    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.rules
    }

    /// Loads the configured spec.
    pub async fn load(&self) -> Result<Document, CompilerError> {
        loader::load_spec(&self.config.input).await
    }

    /// Compiles every definition of `document` with this compiler's rules.
    pub fn forms(&self, document: &Document) -> Result<Vec<FormDeclaration>, CompilerError> {
        compile::compile_document(document, &self.rules)
    }

    /// Output layout for `document`: the configured file name, else the
    /// camel-cased title, else `forms.<ext>`.
    pub fn layout(&self, document: &Document) -> OutputLayout {
        let extension = self.renderer.extension();
        let file_name = self
            .config
            .file_name
            .clone()
            .or_else(|| compile::make_file_name(document, extension))
            .unwrap_or_else(|| format!("{}.{}", codegen::DEFAULT_BASE_NAME, extension));

        if self.config.multiple_files {
            OutputLayout::PerDefinition { base_name: file_name }
        } else {
            OutputLayout::SingleFile { file_name }
        }
    }

    /// Compiles and renders `document` without touching the file system.
    pub fn generate(&self, document: &Document) -> Result<GeneratedCode, CompilerError> {
        let forms = self.forms(document)?;
        Ok(codegen::generate(&forms, self.renderer.as_ref(), &self.layout(document)))
    }

    /// Runs the full pipeline and writes the generated files.
    pub async fn compile(&self) -> Result<CompileResult, CompilerError> {
        // Phase 1: Load and dereference
        let document = self.load().await?;

        // Phase 2: Compile to the declaration tree
        let forms = self.forms(&document)?;

        // Phase 3: Render
        let generated = codegen::generate(&forms, self.renderer.as_ref(), &self.layout(&document));

        // Phase 4: Write output
        let files = self.write_output(&generated)?;
        info!(forms = forms.len(), files = files.len(), "generation complete");

        Ok(CompileResult {
            forms: forms.len(),
            controls: forms.iter().map(FormDeclaration::control_count).sum(),
            files,
        })
    }

    /// Loads and compiles the spec without writing anything.
    pub async fn check(&self) -> Result<Vec<FormDeclaration>, CompilerError> {
        let document = self.load().await?;
        self.forms(&document)
    }

    /// Writes generated files under the output directory.
    pub fn write_output(&self, generated: &GeneratedCode) -> Result<Vec<PathBuf>, CompilerError> {
        // Validate every name before writing anything.
        let paths = generated
            .files
            .iter()
            .map(|(filename, _)| output_path(&self.config.out_dir, filename))
            .collect::<Result<Vec<_>, _>>()?;

        std::fs::create_dir_all(&self.config.out_dir).map_err(|e| CompilerError::IoError {
            path: self.config.out_dir.clone(),
            message: e.to_string(),
        })?;

        let mut written = Vec::with_capacity(generated.files.len());
        for (path, (_, content)) in paths.into_iter().zip(&generated.files) {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CompilerError::io(parent, e.to_string()))?;
            }
            std::fs::write(&path, content).map_err(|e| CompilerError::io(&path, e.to_string()))?;
            info!(path = %path.display(), "wrote file");
            written.push(path);
        }

        Ok(written)
    }
}

/// Joins a generated file name onto `out_dir`.
///
/// File names embed definition names taken from the document, so only plain
/// relative components are accepted; `..`, roots and prefixes are rejected.
fn output_path(out_dir: &Path, filename: &str) -> Result<PathBuf, CompilerError> {
    let relative = Path::new(filename);
    let plain = relative
        .components()
        .any(|component| matches!(component, Component::Normal(_)))
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

    if !plain {
        return Err(CompilerError::io(
            out_dir.join(filename),
            "generated file name must stay inside the output directory",
        ));
    }
    Ok(out_dir.join(relative))
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// Number of forms generated (one per definition).
    pub forms: usize,
    /// Leaf controls across all forms, counting each array template once.
    pub controls: usize,
    /// Paths of the files written.
    pub files: Vec<PathBuf>,
}
