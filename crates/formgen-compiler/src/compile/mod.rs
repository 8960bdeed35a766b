//! Schema → declaration tree compilation.
//!
//! Pure functions over an already-dereferenced [`Document`](crate::schema::Document)
//! and a [`RuleRegistry`](crate::rules::RuleRegistry). Nothing in here performs I/O.
//!
//! ```text
//! Document ──▶ compile_document ──▶ compile_form ──▶ compile_definition
//!                                                     │        ▲
//!                                                     ▼        │ (objects, array items)
//!                                                   compile_field ──▶ RuleRegistry
//! ```

mod definition;
mod document;
mod field;

pub use definition::{compile_definition, compile_form};
pub use document::{compile_document, definition_names, make_file_name};
pub use field::{compile_field, MAX_REPEAT_COUNT};
