//! Typed model of the OpenAPI document subset the compiler consumes.
//!
//! Every schema keyword the rules inspect is an explicit optional field, so a
//! rule's applicability is a presence check rather than key inspection.
//! Unknown keywords are ignored during deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Named schemas, in document order.
pub type Definitions = IndexMap<String, Schema>;

/// An OpenAPI v2 or v3 document, already dereferenced.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    /// OpenAPI v2 container.
    #[serde(default)]
    pub definitions: Option<Definitions>,

    /// OpenAPI v3 container.
    #[serde(default)]
    pub components: Option<Components>,

    #[serde(default)]
    pub info: Option<Info>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: Option<Definitions>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Option<String>,
}

impl Document {
    /// Resolves the definitions container.
    ///
    /// `definitions` wins when it holds at least one schema, otherwise
    /// `components.schemas` is used. Returns `None` when neither holds any.
    pub fn schemas(&self) -> Option<&Definitions> {
        let v2 = self.definitions.as_ref().filter(|defs| !defs.is_empty());
        let v3 = self
            .components
            .as_ref()
            .and_then(|components| components.schemas.as_ref())
            .filter(|defs| !defs.is_empty());
        v2.or(v3)
    }

    /// The document title, if declared and non-blank.
    pub fn title(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.title.as_deref())
            .filter(|title| !title.trim().is_empty())
    }
}

/// The `type` keyword: a single name, or a list of names (OpenAPI 3.1).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Union(Vec<String>),
}

impl SchemaType {
    /// Whether `name` is one of the declared types.
    pub fn is(&self, name: &str) -> bool {
        match self {
            SchemaType::Single(t) => t == name,
            SchemaType::Union(ts) => ts.iter().any(|t| t == name),
        }
    }
}

/// A schema object. Serves both as a named definition and as a property schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default)]
    pub typ: Option<SchemaType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub minimum: Option<Number>,
    #[serde(default)]
    pub maximum: Option<Number>,
    #[serde(default)]
    pub min_items: Option<u64>,
    #[serde(default)]
    pub max_items: Option<u64>,
    #[serde(default)]
    pub default: Option<Value>,

    /// Names of mandatory properties. Membership checks only; order is kept
    /// for display.
    #[serde(default, deserialize_with = "lenient_required")]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    #[serde(default)]
    pub all_of: Vec<Schema>,
}

impl Schema {
    /// Builds a single-property definition around `property`.
    ///
    /// Array items are compiled as if they were the only property of an
    /// anonymous definition with nothing required.
    pub fn wrapping(name: &str, property: Schema) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(name.to_string(), property);
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn is_array(&self) -> bool {
        self.typ.as_ref().is_some_and(|t| t.is("array"))
    }

    /// Whether this schema compiles to a nested group.
    ///
    /// Explicit `type: object` always does. An untyped schema does too when it
    /// carries `properties` or `allOf`, which is how composed schemas are
    /// usually written.
    pub fn is_object(&self) -> bool {
        match &self.typ {
            Some(t) => t.is("object"),
            None => !self.properties.is_empty() || !self.all_of.is_empty(),
        }
    }
}

/// Accepts a list of names; anything else (e.g. a stray boolean) is treated
/// as "nothing required".
fn lenient_required<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Required {
        Names(Vec<String>),
        Other(Value),
    }

    Ok(match Required::deserialize(deserializer)? {
        Required::Names(names) => names,
        Required::Other(_) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_v2_container() {
        let d = doc(json!({ "definitions": { "foo": { "properties": { "bar": {} } } } }));
        let schemas = d.schemas().unwrap();
        assert_eq!(schemas.keys().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn test_v3_container() {
        let d = doc(json!({ "components": { "schemas": { "foo": {} } } }));
        assert!(d.schemas().unwrap().contains_key("foo"));
    }

    #[test]
    fn test_empty_v2_falls_back_to_v3() {
        let d = doc(json!({
            "definitions": {},
            "components": { "schemas": { "foo": {} } }
        }));
        assert!(d.schemas().unwrap().contains_key("foo"));
    }

    #[test]
    fn test_missing_containers() {
        assert!(doc(json!({})).schemas().is_none());
        assert!(doc(json!({ "components": {} })).schemas().is_none());
        assert!(doc(json!({ "definitions": {} })).schemas().is_none());
    }

    #[test]
    fn test_property_order_is_preserved() {
        let s: Schema = serde_json::from_value(json!({
            "properties": { "zeta": {}, "alpha": {}, "mid": {} }
        }))
        .unwrap();
        let keys: Vec<_> = s.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_keywords_deserialize() {
        let s: Schema = serde_json::from_value(json!({
            "type": "string",
            "format": "email",
            "pattern": "^a+$",
            "minLength": 1,
            "maxLength": 5,
            "default": "x",
            "x-vendor": true
        }))
        .unwrap();
        assert_eq!(s.typ, Some(SchemaType::Single("string".into())));
        assert_eq!(s.format.as_deref(), Some("email"));
        assert_eq!(s.pattern.as_deref(), Some("^a+$"));
        assert_eq!(s.min_length, Some(1));
        assert_eq!(s.max_length, Some(5));
        assert_eq!(s.default, Some(json!("x")));
    }

    #[test]
    fn test_type_union() {
        let s: Schema = serde_json::from_value(json!({ "type": ["array", "null"] })).unwrap();
        assert!(s.is_array());
        assert!(!s.is_object());
    }

    #[test]
    fn test_untyped_composition_is_object() {
        let s: Schema = serde_json::from_value(json!({ "allOf": [{}] })).unwrap();
        assert!(s.is_object());
        assert!(!Schema::default().is_object());
    }

    #[test]
    fn test_non_list_required_is_ignored() {
        let s: Schema = serde_json::from_value(json!({ "required": true })).unwrap();
        assert!(s.required.is_empty());
    }

    #[test]
    fn test_title() {
        let d = doc(json!({ "info": { "title": "  " } }));
        assert_eq!(d.title(), None);
        let d = doc(json!({ "info": { "title": "Pet Store" } }));
        assert_eq!(d.title(), Some("Pet Store"));
    }
}
