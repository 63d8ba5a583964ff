//! Parser for the S-expression AST dump.
//!
//! ```text
//! (source_file
//!   (func_decl name="foo" range=[main.swift:1:1 - line:2:1]
//!     (parameter_list)
//!     (brace_stmt)))
//! ```
//!
//! Every node is `(kind item*)` where an item is an attribute (`key=value`),
//! a flag (a bare word, stored with an empty value), a source range in
//! brackets, or a child node. The parser keeps no state between calls.

use crate::range::SourceRange;
use crate::tree::{PrintableAsTree, PrintableTree};
use serde::Serialize;

/// File name used for ranges that do not name their file.
pub const UNKNOWN_FILE: &str = "<dump>";

/// Deepest node nesting accepted, counting the root as one.
pub const MAX_DEPTH: usize = 256;

/// A generic labelled node exactly as it appeared in the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawNode {
    pub kind: String,
    /// Attributes in dump order. Unknown keys are kept verbatim.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<RawNode>,
    pub range: Option<SourceRange>,
}

impl RawNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            range: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    /// First attribute with the given key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute or flag is present at all.
    pub fn has(&self, key: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == key)
    }
}

impl PrintableAsTree for RawNode {
    fn tree_label(&self) -> String {
        self.kind.clone()
    }

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>> {
        let attributes = self.attributes.iter().map(|(key, value)| {
            Some(if value.is_empty() {
                PrintableTree::leaf(key.clone())
            } else {
                PrintableTree::field(key, value)
            })
        });
        let range = self
            .range
            .as_ref()
            .map(|range| PrintableTree::field("range", range));
        let children = self.children.iter().map(|child| Some(PrintableTree::of(child)));
        attributes.chain(std::iter::once(range)).chain(children).collect()
    }
}

/// The dump could not be parsed. Fatal for the file being translated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column} (offset {offset})")]
pub struct DumpSyntaxError {
    pub message: String,
    /// Byte offset into the dump text.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl DumpSyntaxError {
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count() + 1;
        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

/// Parse a dump whose ranges may omit their file name.
pub fn parse_dump(source: &str, file: &str) -> Result<RawNode, DumpSyntaxError> {
    DumpParser::new(source).with_file(file).parse()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Equals,
    Word(String),
    Str(String),
    Range(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Open => "`(`".to_string(),
            Token::Close => "`)`".to_string(),
            Token::Equals => "`=`".to_string(),
            Token::Word(word) => format!("`{word}`"),
            Token::Str(_) => "a string".to_string(),
            Token::Range(_) => "a range".to_string(),
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> DumpSyntaxError {
        DumpSyntaxError::at(self.source, offset, message)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>, DumpSyntaxError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '=' => Token::Equals,
            '"' | '\'' => Token::Str(self.string_body(start, c)?),
            '[' => {
                let rest = &self.source[self.pos..];
                let end = rest
                    .find(']')
                    .ok_or_else(|| self.error(start, "unterminated range: expected `]`"))?;
                let text = rest[..end].to_string();
                self.pos += end + 1;
                Token::Range(text)
            }
            ']' => return Err(self.error(start, "unexpected `]`")),
            _ => {
                while self.peek_char().is_some_and(is_word_char) {
                    self.bump();
                }
                Token::Word(self.source[start..self.pos].to_string())
            }
        };
        Ok(Some((start, token)))
    }

    fn string_body(&mut self, start: usize, quote: char) -> Result<String, DumpSyntaxError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(start, "unterminated string")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c @ ('"' | '\'' | '\\')) => value.push(c),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(self.error(start, "unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '=' | '"' | '\'')
}

/// Recursive-descent parser with one token of lookahead.
pub struct DumpParser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(usize, Token)>,
    file: String,
    /// Nesting of the node being parsed; the root is 0.
    depth: usize,
}

impl<'a> DumpParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
            file: UNKNOWN_FILE.to_string(),
            depth: 0,
        }
    }

    /// File name given to ranges written without one (`[1:1 - 1:4]`).
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn parse(mut self) -> Result<RawNode, DumpSyntaxError> {
        let root = match self.peek()? {
            None => return Err(self.lexer.error(0, "empty dump: expected `(`")),
            Some(_) => self.parse_node()?,
        };
        if let Some((offset, token)) = self.next()? {
            return Err(self.lexer.error(
                offset,
                format!("unexpected {} after the root node", token.describe()),
            ));
        }
        Ok(root)
    }

    fn peek(&mut self) -> Result<Option<&(usize, Token)>, DumpSyntaxError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn next(&mut self) -> Result<Option<(usize, Token)>, DumpSyntaxError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn unclosed(&self, open_offset: usize) -> DumpSyntaxError {
        self.lexer.error(
            self.lexer.source.len(),
            format!("unclosed `(` opened at offset {open_offset}: expected `)`"),
        )
    }

    fn parse_node(&mut self) -> Result<RawNode, DumpSyntaxError> {
        let open_offset = match self.next()? {
            Some((offset, Token::Open)) => offset,
            Some((offset, token)) => {
                return Err(self.lexer.error(
                    offset,
                    format!("expected `(`, found {}", token.describe()),
                ));
            }
            None => {
                let end = self.lexer.source.len();
                return Err(self.lexer.error(end, "expected `(`"));
            }
        };

        let mut node = match self.next()? {
            Some((_, Token::Word(kind))) => RawNode::new(kind),
            Some((offset, token)) => {
                return Err(self.lexer.error(
                    offset,
                    format!("expected a node kind, found {}", token.describe()),
                ));
            }
            None => return Err(self.unclosed(open_offset)),
        };

        loop {
            let Some((offset, token)) = self.peek()?.cloned() else {
                return Err(self.unclosed(open_offset));
            };
            match token {
                Token::Close => {
                    self.next()?;
                    return Ok(node);
                }
                Token::Open => {
                    if self.depth + 1 >= MAX_DEPTH {
                        return Err(self
                            .lexer
                            .error(offset, format!("nodes nested more than {MAX_DEPTH} deep")));
                    }
                    self.depth += 1;
                    let child = self.parse_node();
                    self.depth -= 1;
                    node.children.push(child?);
                }
                Token::Range(text) => {
                    self.next()?;
                    node.range = Some(self.parse_range(&text, offset)?);
                }
                Token::Word(name) => {
                    self.next()?;
                    self.parse_attribute(&mut node, name)?;
                }
                Token::Str(_) => {
                    return Err(self
                        .lexer
                        .error(offset, "expected an attribute name, found a string"));
                }
                Token::Equals => {
                    return Err(self.lexer.error(offset, "unexpected `=`"));
                }
            }
        }
    }

    fn parse_attribute(&mut self, node: &mut RawNode, name: String) -> Result<(), DumpSyntaxError> {
        if !matches!(self.peek()?, Some((_, Token::Equals))) {
            node.attributes.push((name, String::new()));
            return Ok(());
        }
        let (equals_offset, _) = self.next()?.unwrap_or((self.lexer.source.len(), Token::Equals));

        match self.next()? {
            Some((_, Token::Str(value) | Token::Word(value))) => {
                node.attributes.push((name, value));
                Ok(())
            }
            Some((offset, Token::Range(text))) => {
                if name == "range" {
                    node.range = Some(self.parse_range(&text, offset)?);
                } else {
                    node.attributes.push((name, format!("[{text}]")));
                }
                Ok(())
            }
            Some((offset, token)) => Err(self.lexer.error(
                offset,
                format!("expected a value after `{name}=`, found {}", token.describe()),
            )),
            None => Err(self
                .lexer
                .error(equals_offset, format!("expected a value after `{name}=`"))),
        }
    }

    /// `file:line:col - line:line:col`, `file:l:c - file:l:c` or `l:c - l:c`.
    fn parse_range(&self, text: &str, offset: usize) -> Result<SourceRange, DumpSyntaxError> {
        let malformed = || self.lexer.error(offset, format!("malformed range `[{text}]`"));

        let (start, end) = text.rsplit_once(" - ").ok_or_else(malformed)?;
        let (start_file, start_line, start_column) =
            split_location(start.trim()).ok_or_else(malformed)?;
        let (_, end_line, end_column) = split_location(end.trim()).ok_or_else(malformed)?;

        let file = match start_file {
            Some(file) if !file.is_empty() => file.to_string(),
            _ => self.file.clone(),
        };
        Ok(SourceRange::new(
            file,
            start_line,
            start_column,
            end_line,
            end_column,
        ))
    }
}

fn split_location(text: &str) -> Option<(Option<&str>, usize, usize)> {
    let mut parts = text.rsplitn(3, ':');
    let column = parts.next()?.parse().ok()?;
    let line = parts.next()?.parse().ok()?;
    Some((parts.next(), line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<RawNode, DumpSyntaxError> {
        parse_dump(source, "test.swift")
    }

    #[test]
    fn test_single_node() {
        let node = parse("(func_decl name=\"foo\")").unwrap();
        assert_eq!(node.kind, "func_decl");
        assert_eq!(node.attr("name"), Some("foo"));
        assert!(node.children.is_empty());
        assert!(node.range.is_none());
    }

    #[test]
    fn test_children_keep_order() {
        let node = parse("(brace_stmt (a) (b)\n  (c))").unwrap();
        let kinds: Vec<_> = node.children.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_attributes_and_flags_are_kept() {
        let node = parse("(var_decl let zzz=\"1\" name=x implicit)").unwrap();
        assert_eq!(
            node.attributes,
            vec![
                ("let".to_string(), String::new()),
                ("zzz".to_string(), "1".to_string()),
                ("name".to_string(), "x".to_string()),
                ("implicit".to_string(), String::new()),
            ]
        );
        assert!(node.has("implicit"));
    }

    #[test]
    fn test_escaped_strings() {
        let node = parse(r#"(string_literal_expr value="say \"hi\"\n" type='[String: Int]')"#).unwrap();
        assert_eq!(node.attr("value"), Some("say \"hi\"\n"));
        assert_eq!(node.attr("type"), Some("[String: Int]"));
    }

    #[test]
    fn test_ranges() {
        let node = parse("(func_decl range=[/src/main.swift:1:1 - line:3:2] (brace_stmt [4:5 - 4:7]))")
            .unwrap();
        assert_eq!(
            node.range,
            Some(SourceRange::new("/src/main.swift", 1, 1, 3, 2))
        );
        assert_eq!(
            node.children[0].range,
            Some(SourceRange::new("test.swift", 4, 5, 4, 7))
        );
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let source = "(source_file (func_decl name=\"foo\" [1:1 - 1:15] (brace_stmt)))";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_missing_close_paren() {
        let source = "(source_file\n  (func_decl name=\"foo\")";
        let err = parse(source).unwrap_err();
        assert_eq!(err.offset, source.len());
        assert_eq!(err.line, 2);
        assert!(err.message.contains("unclosed `(` opened at offset 0"));
    }

    #[test]
    fn test_extra_close_paren() {
        let err = parse("(a))").unwrap_err();
        assert_eq!(err.offset, 3);
        assert!(err.message.contains("after the root node"));
    }

    #[test]
    fn test_empty_input() {
        let err = parse("   \n").unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse("(a name=\"oops)").unwrap_err();
        assert_eq!(err.offset, 8);
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn test_bare_string_is_rejected() {
        let err = parse("(a \"loose\")").unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_malformed_range() {
        let err = parse("(a [nowhere])").unwrap_err();
        assert_eq!(err.offset, 3);
        assert!(err.message.starts_with("malformed range"));
    }

    #[test]
    fn test_nesting_at_the_limit() {
        let source = format!("{}{}", "(a ".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        let mut node = &parse(&source).unwrap();
        let mut depth = 1;
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_DEPTH);
    }

    #[test]
    fn test_nesting_past_the_limit() {
        let too_deep = MAX_DEPTH + 1;
        let source = format!("{}{}", "(a ".repeat(too_deep), ")".repeat(too_deep));
        let err = parse(&source).unwrap_err();
        assert_eq!(err.offset, 3 * MAX_DEPTH);
        assert!(err.message.contains("nested more than 256 deep"));
    }

    #[test]
    fn test_pathological_nesting_is_an_error() {
        let source = "(a ".repeat(100_000);
        let err = parse(&source).unwrap_err();
        assert_eq!(err.offset, 3 * MAX_DEPTH);
    }

    #[test]
    fn test_error_display() {
        let err = parse("(a\n(b)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unclosed `(` opened at offset 0: expected `)` at 2:4 (offset 6)"
        );
    }
}
