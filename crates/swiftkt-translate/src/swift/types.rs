//! Swift type expressions as they appear in `type=` and `result=` attributes.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwiftType {
    /// `Int`, `Swift.Int`, `Set<String>`.
    Named { name: String, generics: Vec<SwiftType> },
    /// `T?` or `Optional<T>`.
    Optional(Box<SwiftType>),
    /// `T!`.
    ImplicitlyUnwrapped(Box<SwiftType>),
    /// `[T]` or `Array<T>`.
    Array(Box<SwiftType>),
    /// `[K: V]` or `Dictionary<K, V>`.
    Dictionary {
        key: Box<SwiftType>,
        value: Box<SwiftType>,
    },
    /// `(A, B)`; the empty tuple is `()`. Element labels are dropped.
    Tuple(Vec<SwiftType>),
    /// `(A, B) throws -> R`.
    Function {
        params: Vec<SwiftType>,
        result: Box<SwiftType>,
        throws: bool,
    },
}

impl SwiftType {
    pub fn named(name: impl Into<String>) -> Self {
        SwiftType::Named {
            name: name.into(),
            generics: Vec::new(),
        }
    }

    /// Name of a plain named type, without generic arguments.
    pub fn name(&self) -> Option<&str> {
        match self {
            SwiftType::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            SwiftType::Optional(_) | SwiftType::ImplicitlyUnwrapped(_)
        )
    }

    /// The wrapped type of `T?`/`T!`, or the type itself.
    pub fn non_optional(&self) -> &SwiftType {
        match self {
            SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrapped(inner) => {
                inner.non_optional()
            }
            other => other,
        }
    }

    pub fn is_string(&self) -> bool {
        self.non_optional().name() == Some("String")
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self.non_optional(),
            SwiftType::Array(_) | SwiftType::Dictionary { .. }
        ) || matches!(self.non_optional().name(), Some("Set"))
    }
}

impl fmt::Display for SwiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwiftType::Named { name, generics } => {
                f.write_str(name)?;
                if !generics.is_empty() {
                    f.write_str("<")?;
                    write_list(f, generics)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            SwiftType::Optional(inner) => write!(f, "{}?", Wrapped(inner)),
            SwiftType::ImplicitlyUnwrapped(inner) => write!(f, "{}!", Wrapped(inner)),
            SwiftType::Array(element) => write!(f, "[{element}]"),
            SwiftType::Dictionary { key, value } => write!(f, "[{key}: {value}]"),
            SwiftType::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                f.write_str(")")
            }
            SwiftType::Function {
                params,
                result,
                throws,
            } => {
                f.write_str("(")?;
                write_list(f, params)?;
                f.write_str(")")?;
                if *throws {
                    f.write_str(" throws")?;
                }
                write!(f, " -> {result}")
            }
        }
    }
}

/// Parenthesises function types under a postfix `?`/`!`.
struct Wrapped<'a>(&'a SwiftType);

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SwiftType::Function { .. } => write!(f, "({})", self.0),
            other => write!(f, "{other}"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[SwiftType]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type `{text}`: {reason}")]
pub struct TypeParseError {
    pub text: String,
    pub reason: String,
}

/// Parse a Swift type string.
pub fn parse_type(text: &str) -> Result<SwiftType, TypeParseError> {
    let mut parser = TypeParser { text, pos: 0 };
    let ty = parser
        .parse_type()
        .map_err(|reason| TypeParseError {
            text: text.to_string(),
            reason,
        })?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(TypeParseError {
            text: text.to_string(),
            reason: format!("unexpected `{}`", &text[parser.pos..]),
        });
    }
    Ok(ty)
}

struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), String> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(format!("expected `{token}`"))
        }
    }

    fn identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return None;
        }
        let ident = self.rest()[..len].to_string();
        self.pos += len;
        Some(ident)
    }

    /// Consumes `word` only when it is a whole identifier.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let start = self.pos;
        match self.identifier() {
            Some(ident) if ident == word => true,
            _ => {
                self.pos = start;
                false
            }
        }
    }

    fn skip_attributes(&mut self) {
        loop {
            if self.eat_keyword("inout") || self.eat_keyword("__owned") {
                continue;
            }
            if self.peek() == Some('@') {
                self.pos += 1;
                self.identifier();
                continue;
            }
            break;
        }
    }

    fn parse_type(&mut self) -> Result<SwiftType, String> {
        self.skip_attributes();
        let mut ty = match self.peek() {
            Some('[') => self.parse_bracketed()?,
            Some('(') => self.parse_parenthesized()?,
            Some(_) => self.parse_named()?,
            None => return Err("expected a type".to_string()),
        };
        loop {
            if self.eat("?") {
                ty = SwiftType::Optional(Box::new(ty));
            } else if self.eat("!") {
                ty = SwiftType::ImplicitlyUnwrapped(Box::new(ty));
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_bracketed(&mut self) -> Result<SwiftType, String> {
        self.expect("[")?;
        let first = self.parse_type()?;
        let ty = if self.eat(":") {
            let value = self.parse_type()?;
            SwiftType::Dictionary {
                key: Box::new(first),
                value: Box::new(value),
            }
        } else {
            SwiftType::Array(Box::new(first))
        };
        self.expect("]")?;
        Ok(ty)
    }

    fn parse_parenthesized(&mut self) -> Result<SwiftType, String> {
        self.expect("(")?;
        let mut elements = Vec::new();
        if !self.eat(")") {
            loop {
                self.skip_label();
                elements.push(self.parse_type()?);
                if self.eat(")") {
                    break;
                }
                self.expect(",")?;
            }
        }

        let throws = self.eat_keyword("throws") || self.eat_keyword("rethrows");
        if self.eat("->") {
            let result = self.parse_type()?;
            return Ok(SwiftType::Function {
                params: elements,
                result: Box::new(result),
                throws,
            });
        }
        if throws {
            return Err("expected `->` after `throws`".to_string());
        }
        if elements.len() == 1 {
            return Ok(elements.remove(0));
        }
        Ok(SwiftType::Tuple(elements))
    }

    /// Skips `name:` and `_ name:` element labels.
    fn skip_label(&mut self) {
        let start = self.pos;
        let mut idents = 0;
        while idents < 2 && self.identifier().is_some() {
            idents += 1;
            if self.peek() == Some(':') {
                self.pos += 1;
                return;
            }
        }
        self.pos = start;
    }

    fn parse_named(&mut self) -> Result<SwiftType, String> {
        let mut name = self
            .identifier()
            .ok_or_else(|| format!("unexpected `{}`", self.rest()))?;
        while self.rest().starts_with('.') {
            self.pos += 1;
            let part = self
                .identifier()
                .ok_or_else(|| "expected a name after `.`".to_string())?;
            name.push('.');
            name.push_str(&part);
        }

        let mut generics = Vec::new();
        if self.eat("<") {
            loop {
                generics.push(self.parse_type()?);
                if self.eat(">") {
                    break;
                }
                self.expect(",")?;
            }
        }

        let short = name.strip_prefix("Swift.").unwrap_or(&name).to_string();
        Ok(match (short.as_str(), generics.len()) {
            ("Array", 1) => SwiftType::Array(Box::new(generics.remove(0))),
            ("Optional", 1) => SwiftType::Optional(Box::new(generics.remove(0))),
            ("Dictionary", 2) => {
                let value = generics.remove(1);
                let key = generics.remove(0);
                SwiftType::Dictionary {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            _ => SwiftType::Named { name, generics },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> String {
        parse_type(text).unwrap().to_string()
    }

    #[test]
    fn test_named_and_generic() {
        assert_eq!(parse_type("Int").unwrap(), SwiftType::named("Int"));
        assert_eq!(roundtrip("Set<String>"), "Set<String>");
        assert_eq!(roundtrip("Swift.Int"), "Swift.Int");
    }

    #[test]
    fn test_collections() {
        assert_eq!(roundtrip("[Int]"), "[Int]");
        assert_eq!(roundtrip("Array<Int>"), "[Int]");
        assert_eq!(roundtrip("[String : [Int]]"), "[String: [Int]]");
        assert_eq!(roundtrip("Dictionary<String, Int>"), "[String: Int]");
    }

    #[test]
    fn test_optionals() {
        let ty = parse_type("Int?").unwrap();
        assert!(ty.is_optional());
        assert_eq!(ty.non_optional(), &SwiftType::named("Int"));
        assert_eq!(roundtrip("String!"), "String!");
        assert_eq!(roundtrip("Optional<[Int]>"), "[Int]?");
    }

    #[test]
    fn test_function_types() {
        assert_eq!(roundtrip("(Int, String) -> Bool"), "(Int, String) -> Bool");
        assert_eq!(roundtrip("@escaping (Int) throws -> ()"), "(Int) throws -> ()");
        assert_eq!(roundtrip("((Int) -> Int)?"), "((Int) -> Int)?");
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse_type("()").unwrap(), SwiftType::Tuple(Vec::new()));
        assert_eq!(roundtrip("(x: Int, y: Double)"), "(Int, Double)");
        assert_eq!(roundtrip("(Int)"), "Int");
    }

    #[test]
    fn test_inout_is_skipped() {
        assert_eq!(roundtrip("inout Int"), "Int");
    }

    #[test]
    fn test_invalid_types() {
        assert!(parse_type("").is_err());
        assert!(parse_type("[Int").is_err());
        assert!(parse_type("Int Int").is_err());
        assert!(parse_type("(Int) throws").is_err());
        let err = parse_type("<>").unwrap_err();
        assert_eq!(err.text, "<>");
    }
}
