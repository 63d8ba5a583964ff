//! Identifier translation.
//!
//! Every name goes through a per-file [`NameTable`], so the first decision
//! made for a source identifier is the one used at every later site.

use std::collections::HashMap;

/// Kotlin hard keywords that are ordinary identifiers in Swift.
const KOTLIN_KEYWORDS: &[&str] = &[
    "as",
    "fun",
    "in",
    "interface",
    "is",
    "null",
    "object",
    "package",
    "this",
    "typealias",
    "typeof",
    "val",
    "when",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// Enum class entries: `NORTH_EAST`.
    UpperSnake,
    /// Sealed class subclasses: `NorthEast`.
    UpperCamel,
}

#[derive(Debug, Default)]
pub struct NameTable {
    identifiers: HashMap<String, String>,
    cases: HashMap<String, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(&mut self, source: &str) -> String {
        self.identifiers
            .entry(source.to_string())
            .or_insert_with(|| escape(source))
            .clone()
    }

    /// Name of `case` in `enum_name`, keyed as `Enum.case`.
    pub fn enum_case(&mut self, enum_name: &str, case: &str, style: CaseStyle) -> String {
        self.cases
            .entry(format!("{enum_name}.{case}"))
            .or_insert_with(|| {
                let bare = case.trim_matches('`');
                match style {
                    CaseStyle::UpperSnake => upper_snake(bare),
                    CaseStyle::UpperCamel => upper_camel(bare),
                }
            })
            .clone()
    }
}

fn escape(source: &str) -> String {
    let bare = source.trim_matches('`');
    if bare == "self" {
        "this".to_string()
    } else if KOTLIN_KEYWORDS.contains(&bare) {
        format!("`{bare}`")
    } else {
        bare.to_string()
    }
}

pub fn upper_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}

pub fn upper_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_escaped() {
        let mut names = NameTable::new();
        assert_eq!(names.identifier("object"), "`object`");
        assert_eq!(names.identifier("when"), "`when`");
        assert_eq!(names.identifier("count"), "count");
        assert_eq!(names.identifier("`in`"), "`in`");
    }

    #[test]
    fn test_self_becomes_this() {
        let mut names = NameTable::new();
        assert_eq!(names.identifier("self"), "this");
    }

    #[test]
    fn test_same_name_same_translation() {
        let mut names = NameTable::new();
        let first = names.identifier("val");
        let second = names.identifier("val");
        assert_eq!(first, second);
    }

    #[test]
    fn test_enum_cases() {
        let mut names = NameTable::new();
        assert_eq!(names.enum_case("Direction", "northEast", CaseStyle::UpperSnake), "NORTH_EAST");
        assert_eq!(names.enum_case("Shape", "circle", CaseStyle::UpperCamel), "Circle");
        // Same case name in another enum is keyed separately.
        assert_eq!(names.enum_case("Other", "northEast", CaseStyle::UpperCamel), "NorthEast");
        // First decision wins.
        assert_eq!(names.enum_case("Direction", "northEast", CaseStyle::UpperCamel), "NORTH_EAST");
    }

    #[test]
    fn test_upper_snake_acronyms() {
        assert_eq!(upper_snake("httpURL"), "HTTP_URL");
        assert_eq!(upper_snake("URLSession"), "URL_SESSION");
        assert_eq!(upper_snake("v2Beta"), "V2_BETA");
        assert_eq!(upper_snake("north"), "NORTH");
    }
}
