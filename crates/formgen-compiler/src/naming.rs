//! Identifier helpers shared by the compiler and the renderers.

/// Suffix appended to a definition's camel-cased name to form its identifier.
pub const FORM_SUFFIX: &str = "Form";

/// Splits a name into words on separators and case boundaries.
///
/// `"Foo bar_baz"` → `["Foo", "bar", "baz"]`, `"XMLHttpRequest"` →
/// `["XML", "Http", "Request"]`.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts a name to camelCase.
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Identifier of the form generated for `definition`, e.g. `Pet` → `petForm`.
pub fn form_ident(definition: &str) -> String {
    format!("{}{}", to_camel_case(definition), FORM_SUFFIX)
}

/// Whether `s` can be written as a bare JavaScript property key.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
