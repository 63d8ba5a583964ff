//! Text rendering of tree-shaped values for inspection and diffing.
//!
//! Any value that can describe itself as a label plus an ordered list of
//! optional subtrees implements [`PrintableAsTree`]; [`render_tree`] turns it
//! into an indented drawing:
//!
//! ```text
//! File
//!  ├─ Function
//!  │   └─ name: foo
//!  └─ Import
//! ```
//!
//! Absent subtrees are skipped, so implementors can return `None` for
//! optional fields without special-casing them.

use std::fmt::Display;

/// Capability shared by raw, Swift and Kotlin nodes.
pub trait PrintableAsTree {
    fn tree_label(&self) -> String;

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>>;
}

/// An owned, already-projected tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableTree {
    pub label: String,
    pub subtrees: Vec<Option<PrintableTree>>,
}

impl PrintableTree {
    pub fn new(label: impl Into<String>, subtrees: Vec<Option<PrintableTree>>) -> Self {
        Self {
            label: label.into(),
            subtrees,
        }
    }

    pub fn leaf(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    /// A `name: value` leaf.
    pub fn field(name: &str, value: impl Display) -> Self {
        Self::leaf(format!("{name}: {value}"))
    }

    /// Returns `None` when every subtree is absent.
    pub fn or_none(label: impl Into<String>, subtrees: Vec<Option<PrintableTree>>) -> Option<Self> {
        if subtrees.iter().all(Option::is_none) {
            None
        } else {
            Some(Self::new(label, subtrees))
        }
    }

    /// A labelled group of items, or `None` when there are no items.
    pub fn list<'a, T, I>(label: impl Into<String>, items: I) -> Option<Self>
    where
        T: PrintableAsTree + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let subtrees: Vec<_> = items.into_iter().map(|item| Some(Self::of(item))).collect();
        Self::or_none(label, subtrees)
    }

    /// Materialise any printable value.
    pub fn of(node: &dyn PrintableAsTree) -> Self {
        Self::new(node.tree_label(), node.printable_subtrees())
    }
}

impl PrintableAsTree for PrintableTree {
    fn tree_label(&self) -> String {
        self.label.clone()
    }

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>> {
        self.subtrees.clone()
    }
}

/// Render a tree with no line-length limit.
pub fn render_tree(node: &dyn PrintableAsTree) -> String {
    render(node, None)
}

/// Render a tree, truncating every line to `limit` characters.
pub fn render_tree_with_limit(node: &dyn PrintableAsTree, limit: usize) -> String {
    render(node, Some(limit))
}

fn render(node: &dyn PrintableAsTree, limit: Option<usize>) -> String {
    let mut out = String::new();
    push_line(&mut out, &node.tree_label(), limit);
    write_subtrees(&mut out, &node.printable_subtrees(), " ", limit);
    out
}

fn write_subtrees(
    out: &mut String,
    subtrees: &[Option<PrintableTree>],
    prefix: &str,
    limit: Option<usize>,
) {
    let present: Vec<&PrintableTree> = subtrees.iter().flatten().collect();
    let last = present.len().saturating_sub(1);

    for (index, child) in present.iter().enumerate() {
        let (connector, continuation) = if index == last {
            ("└─ ", "    ")
        } else {
            ("├─ ", "│   ")
        };
        push_line(out, &format!("{prefix}{connector}{}", child.label), limit);
        write_subtrees(
            out,
            &child.subtrees,
            &format!("{prefix}{continuation}"),
            limit,
        );
    }
}

fn push_line(out: &mut String, line: &str, limit: Option<usize>) {
    match limit {
        Some(limit) if line.chars().count() > limit => {
            out.extend(line.chars().take(limit.saturating_sub(1)));
            out.push('…');
        }
        _ => out.push_str(line),
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrintableTree {
        PrintableTree::new(
            "root",
            vec![
                Some(PrintableTree::new(
                    "a",
                    vec![None, Some(PrintableTree::leaf("a1"))],
                )),
                None,
                Some(PrintableTree::leaf("b")),
                None,
            ],
        )
    }

    #[test]
    fn test_connectors_and_skipped_subtrees() {
        let rendered = render_tree(&sample());
        assert_eq!(rendered, "root\n ├─ a\n │   └─ a1\n └─ b\n");
    }

    #[test]
    fn test_deep_nesting() {
        let mut tree = PrintableTree::leaf("leaf");
        for depth in 0..3 {
            tree = PrintableTree::new(format!("level{depth}"), vec![Some(tree)]);
        }
        let rendered = render_tree(&tree);
        assert_eq!(
            rendered,
            "level2\n └─ level1\n     └─ level0\n         └─ leaf\n"
        );
    }

    #[test]
    fn test_horizontal_limit() {
        let tree = PrintableTree::new("abcdefghij", vec![Some(PrintableTree::leaf("xy"))]);
        let rendered = render_tree_with_limit(&tree, 6);
        assert_eq!(rendered, "abcde…\n └─ xy\n");
    }

    #[test]
    fn test_or_none() {
        assert!(PrintableTree::or_none("empty", vec![None, None]).is_none());
        assert!(PrintableTree::or_none("some", vec![None, Some(PrintableTree::leaf("x"))]).is_some());
    }

    #[test]
    fn test_rendering_does_not_consume_tree() {
        let tree = sample();
        let first = render_tree(&tree);
        let second = render_tree(&tree);
        assert_eq!(first, second);
        assert_eq!(tree, sample());
    }
}
