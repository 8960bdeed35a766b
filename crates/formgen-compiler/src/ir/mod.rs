//! Framework-independent declaration tree.
//!
//! This IR is produced by the definition compiler and consumed by renderers.
//! Nothing here knows about Angular or any other form library.

use serde_json::{Number, Value};

/// A validation expression contributed by one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Required,
    /// Regular expression, verbatim from the schema.
    Pattern(String),
    MinLength(u64),
    MaxLength(u64),
    Min(Number),
    Max(Number),
    /// Lower bound on the number of entries of a repeated control.
    MinItems(u64),
    /// Upper bound on the number of entries of a repeated control.
    MaxItems(u64),
    Email,
    /// Expression text supplied by a custom rule, emitted as-is.
    Custom(String),
}

/// One entry of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDeclaration {
    /// A single input.
    Control {
        name: String,
        default: Option<Value>,
        validators: Vec<Validator>,
    },
    /// A nested object.
    Group {
        name: String,
        children: Vec<FieldDeclaration>,
    },
    /// An array: `repeat_count` copies of `template`.
    Repeated {
        name: String,
        repeat_count: u64,
        template: Box<FieldDeclaration>,
        validators: Vec<Validator>,
    },
}

impl FieldDeclaration {
    pub fn name(&self) -> &str {
        match self {
            FieldDeclaration::Control { name, .. }
            | FieldDeclaration::Group { name, .. }
            | FieldDeclaration::Repeated { name, .. } => name,
        }
    }

    /// Validators attached directly to this declaration (groups carry none).
    pub fn validators(&self) -> &[Validator] {
        match self {
            FieldDeclaration::Control { validators, .. }
            | FieldDeclaration::Repeated { validators, .. } => validators,
            FieldDeclaration::Group { .. } => &[],
        }
    }

    /// Number of leaf controls in this subtree, counting each template once.
    pub fn control_count(&self) -> usize {
        match self {
            FieldDeclaration::Control { .. } => 1,
            FieldDeclaration::Group { children, .. } => {
                children.iter().map(FieldDeclaration::control_count).sum()
            }
            FieldDeclaration::Repeated { template, .. } => template.control_count(),
        }
    }
}

/// The top-level group generated for one named definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDeclaration {
    /// Definition name as written in the document.
    pub definition: String,
    /// Identifier of the exported form, e.g. `petForm`.
    pub ident: String,
    pub fields: Vec<FieldDeclaration>,
}

impl FormDeclaration {
    pub fn control_count(&self) -> usize {
        self.fields.iter().map(FieldDeclaration::control_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(name: &str) -> FieldDeclaration {
        FieldDeclaration::Control {
            name: name.to_string(),
            default: None,
            validators: vec![Validator::Required],
        }
    }

    #[test]
    fn test_control_count() {
        let form = FormDeclaration {
            definition: "Pet".into(),
            ident: "petForm".into(),
            fields: vec![
                control("id"),
                FieldDeclaration::Group {
                    name: "owner".into(),
                    children: vec![control("first"), control("last")],
                },
                FieldDeclaration::Repeated {
                    name: "tags".into(),
                    repeat_count: 3,
                    template: Box::new(control("tags")),
                    validators: vec![],
                },
            ],
        };
        assert_eq!(form.control_count(), 4);
    }

    #[test]
    fn test_group_has_no_validators() {
        let group = FieldDeclaration::Group { name: "g".into(), children: vec![] };
        assert!(group.validators().is_empty());
        assert_eq!(control("x").validators(), &[Validator::Required]);
        assert_eq!(group.name(), "g");
    }
}
