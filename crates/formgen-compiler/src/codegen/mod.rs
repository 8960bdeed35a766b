//! Source generation from the declaration tree.
//!
//! A [`Renderer`] turns forms into target-language text; [`generate`] lays the
//! rendered forms out into files:
//! - single file: every form under one header
//! - per definition: one file per form, named `<definition><base name>`

mod angular;

pub use angular::AngularRenderer;

use crate::ir::FormDeclaration;

/// Fallback output name when neither a file name nor a document title is given.
pub const DEFAULT_BASE_NAME: &str = "forms";

/// Renders forms into the syntax of one form library.
pub trait Renderer: Send + Sync {
    /// Extension of generated files, without the dot.
    fn extension(&self) -> &str;

    /// Text placed at the top of every generated file.
    fn header(&self) -> String;

    /// Renders one top-level form.
    fn render_form(&self, form: &FormDeclaration) -> String;

    /// A complete file: header followed by `forms`.
    fn render_file(&self, forms: &[FormDeclaration]) -> String {
        let mut output = self.header();
        for form in forms {
            output.push('\n');
            output.push_str(&self.render_form(form));
        }
        output
    }
}

/// How generated forms are split into files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// All forms in `file_name`.
    SingleFile { file_name: String },
    /// One file per definition, named `<definition><base_name>`.
    PerDefinition { base_name: String },
}

/// Generated source files.
pub struct GeneratedCode {
    /// Map of filename to content.
    pub files: Vec<(String, String)>,
}

/// Renders `forms` with `renderer` into the files described by `layout`.
pub fn generate(forms: &[FormDeclaration], renderer: &dyn Renderer, layout: &OutputLayout) -> GeneratedCode {
    let files = match layout {
        OutputLayout::SingleFile { file_name } => {
            vec![(file_name.clone(), renderer.render_file(forms))]
        }
        OutputLayout::PerDefinition { base_name } => forms
            .iter()
            .map(|form| {
                (
                    format!("{}{}", form.definition, base_name),
                    renderer.render_file(std::slice::from_ref(form)),
                )
            })
            .collect(),
    };

    GeneratedCode { files }
}
