//! Definition walker: composition, nested groups, and repeated fields.

use tracing::debug;

use super::field::compile_field;
use crate::ir::{FieldDeclaration, FormDeclaration};
use crate::naming::form_ident;
use crate::rules::RuleRegistry;
use crate::schema::Schema;

/// Compiles a definition into its ordered field declarations.
///
/// `allOf` branches are flattened in listed order, then the definition's own
/// properties follow in declared order. Object properties recurse into nested
/// groups; everything else goes through [`compile_field`]. Duplicate names
/// across branches are kept as-is.
pub fn compile_definition(name: &str, definition: &Schema, rules: &RuleRegistry) -> Vec<FieldDeclaration> {
    let mut fields = Vec::new();

    for branch in &definition.all_of {
        fields.extend(compile_definition(name, branch, rules));
    }

    for (field_name, property) in &definition.properties {
        if property.is_object() {
            fields.push(FieldDeclaration::Group {
                name: field_name.clone(),
                children: compile_definition(field_name, property, rules),
            });
        } else {
            fields.push(compile_field(field_name, definition, rules));
        }
    }

    for dangling in definition
        .required
        .iter()
        .filter(|r| !definition.properties.contains_key(r.as_str()))
    {
        debug!(definition = name, field = %dangling, "required field has no matching property");
    }

    fields
}

/// Compiles a named definition into its top-level form.
pub fn compile_form(name: &str, definition: &Schema, rules: &RuleRegistry) -> FormDeclaration {
    let fields = compile_definition(name, definition, rules);
    debug!(definition = name, fields = fields.len(), "compiled definition");

    FormDeclaration {
        definition: name.to_string(),
        ident: form_ident(name),
        fields,
    }
}
