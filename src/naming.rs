//! # Naming
//!
//! Naming rules shared by the configuration record, the generated node
//! class and the registry. The generated Python re-applies
//! [`required_input_name`] at load time, so both sides must agree.

use crate::error::{GenerationError, Result};
use crate::types::PluginType;
use std::path::Path;

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// `In{ordinal}({type})`, with a 1-based ordinal
pub fn required_input_name(ordinal: usize, plugin_type: PluginType) -> String {
    format!("In{}({})", ordinal, plugin_type)
}

/// `{parameter}({type})`
pub fn optional_input_name(parameter: &str, plugin_type: PluginType) -> String {
    format!("{}({})", parameter, plugin_type)
}

pub fn config_file_name(class_name: &str) -> String {
    format!("{}_config.json", class_name)
}

pub fn node_file_name(class_name: &str) -> String {
    format!("{}_node.py", class_name)
}

pub fn node_module_name(class_name: &str) -> String {
    format!("{}_node", class_name)
}

/// Double-quoted Python string literal
pub fn python_str(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            // Control characters are all below U+00A0
            c if c.is_control() => literal.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Derive a class name from a component name or `.tox` path
///
/// `TOP_flip.tox` becomes `TOP_flip`; characters that cannot appear in an
/// identifier become `_` and a leading digit gets a `_` prefix.
pub fn class_name_for(component: &str) -> Result<String> {
    let stem = Path::new(component)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(component);

    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    validate_class_name(&name)?;
    Ok(name)
}

/// Reject names that are not legal Python identifiers
pub fn validate_class_name(name: &str) -> Result<()> {
    let invalid = |reason| GenerationError::InvalidClassName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("name is empty")),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid("must start with a letter or underscore"))
        }
        _ => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only letters, digits and underscores are allowed"));
    }
    if PYTHON_KEYWORDS.contains(&name) {
        return Err(invalid("reserved Python keyword"));
    }
    if name.chars().all(|c| c == '_') {
        return Err(invalid("name has no letters or digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_names_follow_ordinal_pattern() {
        assert_eq!(required_input_name(1, PluginType::Image), "In1(Image)");
        assert_eq!(optional_input_name("speed", PluginType::Float), "speed(Float)");
    }

    #[test]
    fn python_literals_are_escaped() {
        assert_eq!(python_str("TOP_flip Node"), "\"TOP_flip Node\"");
        assert_eq!(python_str("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(python_str("a\r\nb\tc"), "\"a\\r\\nb\\tc\"");
        assert_eq!(python_str("bell\u{7}\u{1b}\u{85}"), "\"bell\\x07\\x1b\\x85\"");
    }

    #[test]
    fn class_name_is_derived_from_tox_stem() {
        assert_eq!(class_name_for("TOP_flip.tox").unwrap(), "TOP_flip");
        assert_eq!(class_name_for("/projects/td/TOP_flip.tox").unwrap(), "TOP_flip");
        assert_eq!(class_name_for("blur-v2.tox").unwrap(), "blur_v2");
        assert_eq!(class_name_for("3d scene").unwrap(), "_3d_scene");
        assert_eq!(class_name_for("class.tox").unwrap(), "class_");
    }

    #[test]
    fn empty_component_name_is_rejected() {
        assert!(class_name_for("").is_err());
        assert!(class_name_for("---").is_err());
    }

    #[test]
    fn class_names_must_be_identifiers() {
        assert!(validate_class_name("TOP_flip").is_ok());
        assert!(validate_class_name("_private").is_ok());
        assert!(validate_class_name("9lives").is_err());
        assert!(validate_class_name("with space").is_err());
        assert!(validate_class_name("import").is_err());
        assert!(validate_class_name("").is_err());
    }
}
