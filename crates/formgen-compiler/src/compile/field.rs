//! Single-field compilation.

use tracing::warn;

use super::definition::compile_definition;
use crate::ir::FieldDeclaration;
use crate::rules::RuleRegistry;
use crate::schema::Schema;

/// Upper bound on the template copies rendered for one array. The schema's
/// `minItems` still reaches the output as a validator.
pub const MAX_REPEAT_COUNT: u64 = 100;

/// Compiles `field_name` of `definition` into one declaration.
///
/// Arrays become repeated controls with `minItems` copies of their item
/// template (one copy when unbounded). Everything else becomes a plain
/// control carrying the declared default, if any.
pub fn compile_field(field_name: &str, definition: &Schema, rules: &RuleRegistry) -> FieldDeclaration {
    let validators = rules.apply(field_name, definition);

    let Some(property) = definition.property(field_name) else {
        return FieldDeclaration::Control {
            name: field_name.to_string(),
            default: None,
            validators,
        };
    };

    if property.is_array() {
        let template = compile_item(field_name, property.items.as_deref(), rules);
        return FieldDeclaration::Repeated {
            name: field_name.to_string(),
            repeat_count: repeat_count(field_name, property),
            template: Box::new(template),
            validators,
        };
    }

    FieldDeclaration::Control {
        name: field_name.to_string(),
        default: property.default.clone(),
        validators,
    }
}

fn repeat_count(field_name: &str, property: &Schema) -> u64 {
    let count = property.min_items.unwrap_or(1);
    if count > MAX_REPEAT_COUNT {
        warn!(
            field = field_name,
            min_items = count,
            max = MAX_REPEAT_COUNT,
            "minItems exceeds the repeat limit; rendering fewer copies"
        );
        return MAX_REPEAT_COUNT;
    }
    count
}

/// Compiles an array's `items` schema as if it were a lone property.
fn compile_item(field_name: &str, items: Option<&Schema>, rules: &RuleRegistry) -> FieldDeclaration {
    match items {
        None => {
            warn!(field = field_name, "array property has no 'items'; using a bare control template");
            FieldDeclaration::Control {
                name: field_name.to_string(),
                default: None,
                validators: Vec::new(),
            }
        }
        Some(item) if item.is_object() => FieldDeclaration::Group {
            name: field_name.to_string(),
            children: compile_definition(field_name, item, rules),
        },
        Some(item) => {
            let wrapper = Schema::wrapping(field_name, item.clone());
            compile_field(field_name, &wrapper, rules)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Validator;
    use serde_json::{json, Value};

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_required_field_without_default() {
        let def = schema(json!({ "required": ["bar"], "properties": { "bar": {} } }));
        let field = compile_field("bar", &def, &RuleRegistry::new());
        assert_eq!(
            field,
            FieldDeclaration::Control {
                name: "bar".into(),
                default: None,
                validators: vec![Validator::Required],
            }
        );
    }

    #[test]
    fn test_pattern_only() {
        let def = schema(json!({ "properties": { "bar": { "pattern": "baz" } } }));
        let field = compile_field("bar", &def, &RuleRegistry::new());
        assert_eq!(field.validators(), &[Validator::Pattern("baz".into())]);
    }

    #[test]
    fn test_default_value_is_kept() {
        let def = schema(json!({
            "required": ["country"],
            "properties": { "country": { "type": "string", "minLength": 1, "default": "Singapore" } }
        }));
        match compile_field("country", &def, &RuleRegistry::new()) {
            FieldDeclaration::Control { default, validators, .. } => {
                assert_eq!(default, Some(json!("Singapore")));
                assert_eq!(validators, vec![Validator::Required, Validator::MinLength(1)]);
            }
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_falsy_default_is_not_absent() {
        let def = schema(json!({ "properties": { "n": { "type": "integer", "default": 0 } } }));
        match compile_field("n", &def, &RuleRegistry::new()) {
            FieldDeclaration::Control { default, .. } => assert_eq!(default, Some(json!(0))),
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_array() {
        let def = schema(json!({
            "properties": {
                "bar": {
                    "type": "array",
                    "minItems": 2,
                    "maxItems": 5,
                    "items": { "type": "string", "minLength": 1, "maxLength": 5 }
                }
            }
        }));
        match compile_field("bar", &def, &RuleRegistry::new()) {
            FieldDeclaration::Repeated { repeat_count, template, validators, .. } => {
                assert_eq!(repeat_count, 2);
                assert_eq!(validators, vec![Validator::MinItems(2), Validator::MaxItems(5)]);
                assert_eq!(
                    *template,
                    FieldDeclaration::Control {
                        name: "bar".into(),
                        default: None,
                        validators: vec![Validator::MinLength(1), Validator::MaxLength(5)],
                    }
                );
            }
            other => panic!("expected repeated, got {:?}", other),
        }
    }

    #[test]
    fn test_array_defaults_to_one_copy() {
        let def = schema(json!({ "properties": { "tags": { "type": "array", "items": { "type": "string" } } } }));
        match compile_field("tags", &def, &RuleRegistry::new()) {
            FieldDeclaration::Repeated { repeat_count, .. } => assert_eq!(repeat_count, 1),
            other => panic!("expected repeated, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_min_items_is_clamped() {
        let def = schema(json!({
            "properties": { "bar": { "type": "array", "minItems": 1_000_000_000_000u64, "items": {} } }
        }));
        match compile_field("bar", &def, &RuleRegistry::new()) {
            FieldDeclaration::Repeated { repeat_count, validators, .. } => {
                assert_eq!(repeat_count, MAX_REPEAT_COUNT);
                assert_eq!(validators, vec![Validator::MinItems(1_000_000_000_000)]);
            }
            other => panic!("expected repeated, got {:?}", other),
        }
    }

    #[test]
    fn test_min_items_at_limit_is_kept() {
        let def = schema(json!({ "properties": { "bar": { "type": "array", "minItems": MAX_REPEAT_COUNT, "items": {} } } }));
        let FieldDeclaration::Repeated { repeat_count, .. } = compile_field("bar", &def, &RuleRegistry::new()) else {
            panic!("expected repeated");
        };
        assert_eq!(repeat_count, MAX_REPEAT_COUNT);
    }

    #[test]
    fn test_array_of_objects() {
        let def = schema(json!({
            "properties": {
                "lines": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["sku"],
                        "properties": { "sku": {}, "qty": { "minimum": 1 } }
                    }
                }
            }
        }));
        let FieldDeclaration::Repeated { template, .. } = compile_field("lines", &def, &RuleRegistry::new()) else {
            panic!("expected repeated");
        };
        let FieldDeclaration::Group { name, children } = *template else {
            panic!("expected group template");
        };
        assert_eq!(name, "lines");
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].validators(), &[Validator::Required]);
        assert_eq!(children[1].validators(), &[Validator::Min(1.into())]);
    }

    #[test]
    fn test_array_without_items() {
        let def = schema(json!({ "required": ["bar"], "properties": { "bar": { "type": "array" } } }));
        let FieldDeclaration::Repeated { template, validators, .. } = compile_field("bar", &def, &RuleRegistry::new()) else {
            panic!("expected repeated");
        };
        assert_eq!(validators, vec![Validator::Required]);
        assert_eq!(
            *template,
            FieldDeclaration::Control { name: "bar".into(), default: None, validators: vec![] }
        );
    }

    #[test]
    fn test_nested_arrays() {
        let def = schema(json!({
            "properties": {
                "grid": { "type": "array", "minItems": 2, "items": { "type": "array", "minItems": 3, "items": {} } }
            }
        }));
        let FieldDeclaration::Repeated { repeat_count, template, .. } = compile_field("grid", &def, &RuleRegistry::new()) else {
            panic!("expected repeated");
        };
        assert_eq!(repeat_count, 2);
        match *template {
            FieldDeclaration::Repeated { repeat_count, ref validators, .. } => {
                assert_eq!(repeat_count, 3);
                assert_eq!(validators, &vec![Validator::MinItems(3)]);
            }
            ref other => panic!("expected nested repeated, got {:?}", other),
        }
    }

    #[test]
    fn test_deterministic() {
        let def = schema(json!({ "required": ["a"], "properties": { "a": { "pattern": "x", "format": "email" } } }));
        let rules = RuleRegistry::new();
        assert_eq!(compile_field("a", &def, &rules), compile_field("a", &def, &rules));
    }
}
