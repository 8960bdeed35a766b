//! Constraint rules and the registry that orders them.
//!
//! A rule looks at one field of a definition and contributes at most one
//! validator. The registry runs its rules in registration order, so order
//! only affects the order of validators in the output.

mod builtin;

use std::fmt;
use std::sync::Arc;

use crate::ir::Validator;
use crate::schema::Schema;

pub use builtin::{
    default_rules, BuiltinRule, EMAIL, MAXIMUM, MAX_ITEMS, MAX_LENGTH, MINIMUM, MIN_ITEMS,
    MIN_LENGTH, PATTERN, REQUIRED,
};

/// Maps one field's schema keywords to a validator.
///
/// Implementations must not fail when the inspected keyword, or the property
/// itself, is absent; they return `None` instead.
pub trait Rule: Send + Sync {
    /// Name shown when listing the active rules.
    fn name(&self) -> &str {
        "custom"
    }

    fn apply(&self, field_name: &str, definition: &Schema) -> Option<Validator>;
}

impl<F> Rule for F
where
    F: Fn(&str, &Schema) -> Option<Validator> + Send + Sync,
{
    fn apply(&self, field_name: &str, definition: &Schema) -> Option<Validator> {
        self(field_name, definition)
    }
}

/// Ordered set of active rules.
///
/// Each compilation context owns its registry; there is no process-wide
/// rule list.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// A registry holding the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends `rule`; its validators come after those of earlier rules.
    pub fn add_rule(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    /// Restores the built-in rule set, dropping every added rule.
    pub fn reset_rules(&mut self) {
        self.rules = default_rules();
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule against `field_name`, keeping contributions in order.
    pub fn apply(&self, field_name: &str, definition: &Schema) -> Vec<Validator> {
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(field_name, definition))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
