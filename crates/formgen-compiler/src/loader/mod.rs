//! Spec loading: file or URL → parsed, dereferenced [`Document`].

mod resolve;

pub use resolve::dereference;

use serde_json::Value;
use tracing::{debug, info};

use crate::diagnostic::CompilerError;
use crate::schema::Document;

/// Serialization format of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
    /// No recognizable extension: try JSON, then YAML.
    Unknown,
}

impl SpecFormat {
    /// Guesses the format from the extension of a path or URL.
    pub fn detect(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            SpecFormat::Yaml
        } else if lower.ends_with(".json") {
            SpecFormat::Json
        } else {
            SpecFormat::Unknown
        }
    }
}

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Loads the spec at `location`, a file path or an `http(s)://` URL.
pub async fn load_spec(location: &str) -> Result<Document, CompilerError> {
    info!(source = location, "loading spec");

    let text = if is_url(location) {
        fetch(location).await?
    } else {
        std::fs::read_to_string(location).map_err(|e| CompilerError::spec_load(location, e))?
    };

    parse_spec(location, &text)
}

/// Parses and dereferences spec `text`; `location` picks the format and names
/// the source in errors.
pub fn parse_spec(location: &str, text: &str) -> Result<Document, CompilerError> {
    let raw = parse_value(location, text)?;
    let resolved = dereference(&raw)?;
    let document = decode(location, resolved)?;
    debug!(
        source = location,
        definitions = document.schemas().map_or(0, |s| s.len()),
        "spec parsed"
    );
    Ok(document)
}

async fn fetch(url: &str) -> Result<String, CompilerError> {
    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| CompilerError::spec_load(url, e))?;

    response.text().await.map_err(|e| CompilerError::spec_load(url, e))
}

fn parse_value(location: &str, text: &str) -> Result<Value, CompilerError> {
    match SpecFormat::detect(location) {
        SpecFormat::Json => serde_json::from_str(text).map_err(|e| CompilerError::spec_load(location, e)),
        SpecFormat::Yaml => serde_yaml::from_str(text).map_err(|e| CompilerError::spec_load(location, e)),
        SpecFormat::Unknown => serde_json::from_str(text)
            .or_else(|_| serde_yaml::from_str(text))
            .map_err(|e| CompilerError::spec_load(location, e)),
    }
}

fn decode(location: &str, value: Value) -> Result<Document, CompilerError> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        CompilerError::spec_load(location, format!("at '{}': {}", e.path(), e.inner()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_SPEC: &str = r##"{
        "info": { "title": "Pet Store" },
        "definitions": {
            "Pet": {
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "category": { "$ref": "#/definitions/Category" }
                }
            },
            "Category": { "type": "object", "properties": { "id": { "type": "integer" } } }
        }
    }"##;

    const YAML_SPEC: &str = r#"
info:
  title: Pet Store
definitions:
  Pet:
    required: [name]
    properties:
      name:
        type: string
      category:
        $ref: '#/definitions/Category'
  Category:
    type: object
    properties:
      id:
        type: integer
"#;

    #[test]
    fn test_detect_format() {
        assert_eq!(SpecFormat::detect("spec.yaml"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::detect("spec.YML"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::detect("https://x.io/v2/swagger.json?token=1"), SpecFormat::Json);
        assert_eq!(SpecFormat::detect("https://x.io/openapi"), SpecFormat::Unknown);
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://petstore.swagger.io/v2/swagger.json"));
        assert!(is_url("http://localhost/spec.yaml"));
        assert!(!is_url("specs/petstore.json"));
    }

    #[test]
    fn test_json_and_yaml_are_equal() {
        let json = parse_spec("spec.json", JSON_SPEC).unwrap();
        let yaml = parse_spec("spec.yaml", YAML_SPEC).unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_references_are_inlined() {
        let doc = parse_spec("spec.json", JSON_SPEC).unwrap();
        let pet = &doc.schemas().unwrap()["Pet"];
        assert!(pet.properties["category"].is_object());
        assert!(pet.properties["category"].properties.contains_key("id"));
    }

    #[test]
    fn test_unknown_format_falls_back_to_yaml() {
        let doc = parse_spec("openapi", YAML_SPEC).unwrap();
        assert_eq!(doc.title(), Some("Pet Store"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_spec("spec.json", "{ not json").unwrap_err();
        assert!(matches!(err, CompilerError::SpecLoad { .. }));
    }

    #[test]
    fn test_decode_error_names_path() {
        let err = parse_spec("spec.json", r#"{ "definitions": { "Pet": { "minLength": "x" } } }"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("definitions.Pet.minLength"), "{}", message);
    }
}
