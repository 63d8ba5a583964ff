//! Readable names for dump node kinds.

use swiftkt_translate::RawNode;

/// `func_decl` becomes `Function Declaration`.
///
/// Each `_`-separated word is capitalized, then the front end's usual
/// abbreviations are spelled out. Unknown words are kept as capitalized.
pub fn expand_abbreviation(kind: &str) -> String {
    kind.split('_')
        .map(|word| {
            let word = capitalize(word);
            match word.as_str() {
                "Decl" => "Declaration".to_string(),
                "Declref" => "Declaration Reference".to_string(),
                "Expr" => "Expression".to_string(),
                "Func" => "Function".to_string(),
                "Ident" => "Identity".to_string(),
                "Paren" => "Parentheses".to_string(),
                "Ref" => "Reference".to_string(),
                "Stmt" => "Statement".to_string(),
                "Var" => "Variable".to_string(),
                _ => word,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrite every kind in a raw tree with [`expand_abbreviation`].
pub fn expand_kinds(mut node: RawNode) -> RawNode {
    node.kind = expand_abbreviation(&node.kind);
    node.children = node.children.into_iter().map(expand_kinds).collect();
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_abbreviation() {
        assert_eq!(expand_abbreviation("func_decl"), "Function Declaration");
        assert_eq!(expand_abbreviation("declref_expr"), "Declaration Reference Expression");
        assert_eq!(expand_abbreviation("paren_expr"), "Parentheses Expression");
        assert_eq!(expand_abbreviation("brace_stmt"), "Brace Statement");
        assert_eq!(expand_abbreviation("source_file"), "Source File");
    }

    #[test]
    fn test_unknown_words_are_capitalized() {
        assert_eq!(expand_abbreviation("FutureConstruct"), "FutureConstruct");
        assert_eq!(expand_abbreviation("open_existential"), "Open Existential");
    }

    #[test]
    fn test_expand_kinds_recurses() {
        let tree = RawNode::new("func_decl").with_child(RawNode::new("brace_stmt"));
        let expanded = expand_kinds(tree);
        assert_eq!(expanded.kind, "Function Declaration");
        assert_eq!(expanded.children[0].kind, "Brace Statement");
    }
}
