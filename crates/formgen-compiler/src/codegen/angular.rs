//! Angular Reactive Forms rendering.

use serde_json::Value;

use super::Renderer;
use crate::ir::{FieldDeclaration, FormDeclaration, Validator};
use crate::naming::is_identifier;

const HEADER: &str = "import { FormGroup, FormControl, Validators, FormArray } from '@angular/forms';\n";

/// Renders forms as `@angular/forms` TypeScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngularRenderer;

impl Renderer for AngularRenderer {
    fn extension(&self) -> &str {
        "ts"
    }

    fn header(&self) -> String {
        HEADER.to_string()
    }

    fn render_form(&self, form: &FormDeclaration) -> String {
        format!(
            "export const {} = {};\n",
            form.ident,
            render_group(&form.fields, 0)
        )
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// `name: <expression>`, quoting names that are not plain identifiers.
fn render_entry(field: &FieldDeclaration, level: usize) -> String {
    format!(
        "{}{}: {}",
        indent(level),
        property_key(field.name()),
        render_expression(field, level)
    )
}

fn render_expression(field: &FieldDeclaration, level: usize) -> String {
    match field {
        FieldDeclaration::Control { default, validators, .. } => format!(
            "new FormControl({}, [{}])",
            default.as_ref().map(render_literal).unwrap_or_else(|| "null".to_string()),
            render_validators(validators)
        ),
        FieldDeclaration::Group { children, .. } => render_group(children, level),
        FieldDeclaration::Repeated {
            repeat_count,
            template,
            validators,
            ..
        } => {
            let mut output = String::from("new FormArray([");
            if *repeat_count > 0 {
                let item = render_expression(template, level + 1);
                let items: Vec<String> = (0..*repeat_count)
                    .map(|_| format!("{}{}", indent(level + 1), item))
                    .collect();
                output.push('\n');
                output.push_str(&items.join(",\n"));
                output.push('\n');
                output.push_str(&indent(level));
            }
            output.push(']');
            if !validators.is_empty() {
                output.push_str(&format!(", [{}]", render_validators(validators)));
            }
            output.push(')');
            output
        }
    }
}

fn render_group(children: &[FieldDeclaration], level: usize) -> String {
    if children.is_empty() {
        return "new FormGroup({})".to_string();
    }

    let entries: Vec<String> = children
        .iter()
        .map(|child| render_entry(child, level + 1))
        .collect();

    format!("new FormGroup({{\n{}\n{}}})", entries.join(",\n"), indent(level))
}

fn render_validators(validators: &[Validator]) -> String {
    validators
        .iter()
        .map(render_validator)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_validator(validator: &Validator) -> String {
    match validator {
        Validator::Required => "Validators.required".to_string(),
        Validator::Pattern(pattern) => format!("Validators.pattern(/{}/)", pattern),
        // Angular's length validators count the entries of a FormArray.
        Validator::MinLength(n) | Validator::MinItems(n) => format!("Validators.minLength({})", n),
        Validator::MaxLength(n) | Validator::MaxItems(n) => format!("Validators.maxLength({})", n),
        Validator::Min(n) => format!("Validators.min({})", n),
        Validator::Max(n) => format!("Validators.max({})", n),
        Validator::Email => "Validators.email".to_string(),
        Validator::Custom(expression) => expression.clone(),
    }
}

/// A TypeScript literal for a schema `default`.
fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
