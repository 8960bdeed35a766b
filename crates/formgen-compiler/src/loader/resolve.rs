//! Local `$ref` dereferencing.
//!
//! Every `{"$ref": "#/..."}` object is replaced by a copy of its target so the
//! compiler only ever sees a plain tree. Sibling keys of a `$ref` are dropped,
//! as OpenAPI 2/3.0 prescribe.

use serde_json::{Map, Value};

use crate::diagnostic::CompilerError;

/// Returns `root` with every local reference inlined.
///
/// Fails on references outside the document, on pointers that do not
/// resolve, and on reference cycles.
pub fn dereference(root: &Value) -> Result<Value, CompilerError> {
    let mut chain = Vec::new();
    inline(root, root, &mut chain)
}

fn inline(node: &Value, root: &Value, chain: &mut Vec<String>) -> Result<Value, CompilerError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                return inline_reference(reference, root, chain);
            }
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), inline(value, root, chain)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| inline(item, root, chain))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn inline_reference(reference: &str, root: &Value, chain: &mut Vec<String>) -> Result<Value, CompilerError> {
    if chain.iter().any(|seen| seen == reference) {
        let mut cycle = chain.clone();
        cycle.push(reference.to_string());
        return Err(CompilerError::CyclicReference {
            chain: cycle.join(" -> "),
        });
    }

    let target = lookup(reference, root)?;

    chain.push(reference.to_string());
    let resolved = inline(target, root, chain);
    chain.pop();
    resolved
}

fn lookup<'a>(reference: &str, root: &'a Value) -> Result<&'a Value, CompilerError> {
    let pointer = reference
        .strip_prefix('#')
        .ok_or_else(|| CompilerError::UnresolvedReference {
            reference: reference.to_string(),
            message: "external references are not supported".to_string(),
        })?;

    root.pointer(pointer)
        .ok_or_else(|| CompilerError::UnresolvedReference {
            reference: reference.to_string(),
            message: "no such location in the document".to_string(),
        })
}
