//! The built-in rule set, one rule per supported schema keyword.

use std::sync::Arc;

use super::Rule;
use crate::ir::Validator;
use crate::schema::Schema;

/// A named rule backed by a plain function.
#[derive(Clone, Copy)]
pub struct BuiltinRule {
    pub name: &'static str,
    pub check: fn(&str, &Schema) -> Option<Validator>,
}

impl Rule for BuiltinRule {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, field_name: &str, definition: &Schema) -> Option<Validator> {
        (self.check)(field_name, definition)
    }
}

pub const REQUIRED: BuiltinRule = BuiltinRule { name: "required", check: required };
pub const PATTERN: BuiltinRule = BuiltinRule { name: "pattern", check: pattern };
pub const MIN_LENGTH: BuiltinRule = BuiltinRule { name: "minLength", check: min_length };
pub const MAX_LENGTH: BuiltinRule = BuiltinRule { name: "maxLength", check: max_length };
pub const MINIMUM: BuiltinRule = BuiltinRule { name: "minimum", check: minimum };
pub const MAXIMUM: BuiltinRule = BuiltinRule { name: "maximum", check: maximum };
pub const MIN_ITEMS: BuiltinRule = BuiltinRule { name: "minItems", check: min_items };
pub const MAX_ITEMS: BuiltinRule = BuiltinRule { name: "maxItems", check: max_items };
pub const EMAIL: BuiltinRule = BuiltinRule { name: "email", check: email };

/// The default rule sequence, in output order.
pub fn default_rules() -> Vec<Arc<dyn Rule>> {
    [
        REQUIRED, PATTERN, MIN_LENGTH, MAX_LENGTH, MINIMUM, MAXIMUM, MIN_ITEMS, MAX_ITEMS, EMAIL,
    ]
    .into_iter()
    .map(|rule| Arc::new(rule) as Arc<dyn Rule>)
    .collect()
}

fn required(field_name: &str, definition: &Schema) -> Option<Validator> {
    definition
        .is_required(field_name)
        .then_some(Validator::Required)
}

fn pattern(field_name: &str, definition: &Schema) -> Option<Validator> {
    let property = definition.property(field_name)?;
    property.pattern.clone().map(Validator::Pattern)
}

fn min_length(field_name: &str, definition: &Schema) -> Option<Validator> {
    definition.property(field_name)?.min_length.map(Validator::MinLength)
}

fn max_length(field_name: &str, definition: &Schema) -> Option<Validator> {
    definition.property(field_name)?.max_length.map(Validator::MaxLength)
}

fn minimum(field_name: &str, definition: &Schema) -> Option<Validator> {
    definition.property(field_name)?.minimum.clone().map(Validator::Min)
}

fn maximum(field_name: &str, definition: &Schema) -> Option<Validator> {
    definition.property(field_name)?.maximum.clone().map(Validator::Max)
}

// Item bounds only mean something on arrays.
fn min_items(field_name: &str, definition: &Schema) -> Option<Validator> {
    let property = definition.property(field_name).filter(|p| p.is_array())?;
    property.min_items.map(Validator::MinItems)
}

fn max_items(field_name: &str, definition: &Schema) -> Option<Validator> {
    let property = definition.property(field_name).filter(|p| p.is_array())?;
    property.max_items.map(Validator::MaxItems)
}

fn email(field_name: &str, definition: &Schema) -> Option<Validator> {
    let property = definition.property(field_name)?;
    (property.format.as_deref() == Some("email")).then_some(Validator::Email)
}
