//! Swift AST to Kotlin AST rewriting.
//!
//! [`translate_node`](Translator::translate_node) is one exhaustive match over
//! [`SourceKind`]; the handlers live in [`decls`], [`stmts`] and [`exprs`].
//! A handler either maps its node, expands it into a few Kotlin nodes, or
//! reports it as untranslatable and leaves a comment in its place.
//!
//! Before rewriting, [`TypeRegistry::collect`] records every declared type
//! and fixes struct/enum representations, and every identifier goes through
//! one [`NameTable`].

mod decls;
mod exprs;
pub mod names;
pub mod registry;
pub mod rules;
mod stmts;
pub mod types;

pub use names::{CaseStyle, NameTable};
pub use registry::TypeRegistry;

use crate::config::TranslateOptions;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::kotlin::{KotlinType, TargetKind, TargetNode};
use crate::range::SourceRange;
use crate::swift::{SourceKind, SourceNode, SwiftType};
use std::collections::HashMap;

/// Translate a whole tree, appending to `diagnostics`.
pub fn translate_ast(
    root: &SourceNode,
    options: &TranslateOptions,
    diagnostics: &mut Diagnostics,
) -> TargetNode {
    let mut translator = Translator::new(root, options, std::mem::take(diagnostics));
    let mut nodes = translator.translate_node(root);
    *diagnostics = translator.into_diagnostics();

    if nodes.len() == 1 && matches!(nodes[0].kind, TargetKind::File(_)) {
        nodes.remove(0)
    } else {
        TargetNode::new(TargetKind::File(nodes), root.range.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Scope {
    TopLevel,
    /// Inside a struct, class or enum body.
    Type { name: String },
    Protocol,
    Extension { receiver: KotlinType, name: String },
}

/// Locals declared in one lexical block.
#[derive(Debug, Default)]
struct LocalScope {
    /// Declared type of each local; `None` when it cannot be inferred.
    types: HashMap<String, Option<SwiftType>>,
    /// Swift names emitted under another Kotlin name from here on.
    renames: HashMap<String, String>,
}

pub struct Translator<'a> {
    options: &'a TranslateOptions,
    names: NameTable,
    registry: TypeRegistry,
    diagnostics: Diagnostics,
    scope: Scope,
    /// Nesting depth of closures around the current node.
    closure_depth: usize,
    /// Highest `$N` referenced in the innermost closure.
    anonymous_max: Option<usize>,
    /// Enum that `.case` shorthand resolves against, set by `switch`.
    expected_enum: Option<String>,
    /// Innermost block last.
    locals: Vec<LocalScope>,
    /// Inside a switch case and outside any loop or closure in it.
    in_case_body: bool,
}

impl<'a> Translator<'a> {
    pub fn new(root: &SourceNode, options: &'a TranslateOptions, diagnostics: Diagnostics) -> Self {
        Self {
            options,
            names: NameTable::new(),
            registry: TypeRegistry::collect(root),
            diagnostics,
            scope: Scope::TopLevel,
            closure_depth: 0,
            anonymous_max: None,
            expected_enum: None,
            locals: Vec::new(),
            in_case_body: false,
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Translate a node in statement or declaration position.
    pub fn translate_node(&mut self, node: &SourceNode) -> Vec<TargetNode> {
        tracing::trace!(kind = node.tag().label(), "translating node");
        let range = node.range.clone();
        match &node.kind {
            SourceKind::File(items) => {
                let items = self.statements(items);
                vec![TargetNode::new(TargetKind::File(items), range)]
            }
            SourceKind::Import { module } => self.translate_import(module, range),
            SourceKind::Function(func) => vec![self.translate_function(func, range)],
            SourceKind::Initializer { params, body } => {
                vec![self.translate_initializer(params, body.as_deref(), range)]
            }
            SourceKind::Variable(var) => self.translate_variable(var, range),
            SourceKind::Struct(decl) => vec![self.translate_struct(decl, range)],
            SourceKind::Class(decl) => vec![self.translate_class(decl, range)],
            SourceKind::Protocol(decl) => vec![self.translate_protocol(decl, range)],
            SourceKind::Enum(decl) => vec![self.translate_enum(decl, range)],
            SourceKind::EnumCase(case) => vec![self.untranslatable(
                &format!("enum case `{}`", case.name),
                "cases are only valid inside an enum",
                range,
            )],
            SourceKind::Extension { extended, members } => {
                self.translate_extension(extended, members, range)
            }
            SourceKind::TypeAlias { name, ty } => {
                let ty = self.kotlin_type(ty, range.as_ref());
                let kind = TargetKind::TypeAlias {
                    name: self.names.identifier(name),
                    ty,
                };
                vec![TargetNode::new(kind, range)]
            }

            SourceKind::Block(items) => vec![self.translate_block(items, range)],
            SourceKind::Return(value) => vec![self.translate_return(value.as_deref(), range)],
            SourceKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.translate_if(condition, then_branch, else_branch.as_deref(), range),
            SourceKind::Guard {
                condition,
                else_branch,
            } => self.translate_guard(condition, else_branch, range),
            SourceKind::While { condition, body } => {
                vec![self.translate_while(condition, body, range)]
            }
            SourceKind::RepeatWhile { body, condition } => {
                vec![self.translate_repeat_while(body, condition, range)]
            }
            SourceKind::ForEach {
                variable,
                sequence,
                body,
            } => vec![self.translate_for_each(variable, sequence, body, range)],
            SourceKind::Switch { subject, cases } => {
                vec![self.translate_switch(subject, cases, range)]
            }
            SourceKind::Break if self.in_case_body => vec![self.untranslatable(
                "`break` before the end of a switch case",
                "a Kotlin `when` branch cannot be left early",
                range,
            )],
            SourceKind::Break => vec![TargetNode::new(TargetKind::Break, range)],
            SourceKind::Continue => vec![TargetNode::new(TargetKind::Continue, range)],
            SourceKind::Throw(value) => {
                let value = self.translate_expr(value);
                vec![TargetNode::new(TargetKind::Throw(Box::new(value)), range)]
            }
            SourceKind::Defer(_) => vec![self.untranslatable(
                "defer",
                "Kotlin has no scope-exit statement; use try/finally",
                range,
            )],
            SourceKind::DoCatch { body, catches } => {
                vec![self.translate_do_catch(body, catches, range)]
            }

            SourceKind::Assign { target, value } => vec![self.translate_assign(target, value, range)],
            SourceKind::Binary { operator, lhs, rhs } if is_assignment_operator(operator) => {
                vec![self.translate_compound_assign(operator, lhs, rhs, range)]
            }
            SourceKind::IntegerLiteral(_)
            | SourceKind::FloatLiteral(_)
            | SourceKind::BooleanLiteral(_)
            | SourceKind::StringLiteral(_)
            | SourceKind::InterpolatedString(_)
            | SourceKind::NilLiteral
            | SourceKind::DeclRef { .. }
            | SourceKind::Binary { .. }
            | SourceKind::PrefixUnary { .. }
            | SourceKind::Call { .. }
            | SourceKind::Member { .. }
            | SourceKind::ImplicitMember { .. }
            | SourceKind::Subscript { .. }
            | SourceKind::ArrayLiteral(_)
            | SourceKind::DictionaryLiteral(_)
            | SourceKind::Tuple(_)
            | SourceKind::Paren(_)
            | SourceKind::Closure { .. }
            | SourceKind::Ternary { .. }
            | SourceKind::ForceUnwrap(_)
            | SourceKind::BindOptional(_)
            | SourceKind::OptionalEvaluation(_)
            | SourceKind::Cast { .. }
            | SourceKind::Try(_)
            | SourceKind::OptionalTry(_) => vec![self.translate_expr(node)],

            SourceKind::Invalid { kind, reason } => {
                vec![TargetNode::comment(format!("invalid `{kind}`: {reason}"), range)]
            }
            SourceKind::Unknown { kind, children } => {
                let mut out = vec![TargetNode::comment(
                    format!("unrecognized construct: {kind}"),
                    range,
                )];
                for child in children.iter().filter(|child| !child.is_expression()) {
                    out.extend(self.translate_node(child));
                }
                out
            }
        }
    }

    /// Translate a statement list in its own block scope, flattening expansions.
    fn statements(&mut self, nodes: &[SourceNode]) -> Vec<TargetNode> {
        self.with_scope(|this| {
            nodes
                .iter()
                .flat_map(|node| this.translate_node(node))
                .collect()
        })
    }

    fn enter_scope(&mut self) {
        self.locals.push(LocalScope::default());
    }

    fn exit_scope(&mut self) {
        self.locals.pop();
    }

    fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter_scope();
        let out = f(self);
        self.exit_scope();
        out
    }

    /// Record a local in the innermost scope, shadowing outer ones.
    fn declare(&mut self, name: &str, ty: Option<SwiftType>) {
        if let Some(scope) = self.locals.last_mut() {
            scope.renames.remove(name);
            scope.types.insert(name.to_string(), ty);
        }
    }

    /// Record a narrower type for an existing local, keeping its Kotlin name.
    fn narrow(&mut self, name: &str, ty: Option<SwiftType>) {
        let rename = self.local_rename(name).map(str::to_string);
        self.declare(name, ty);
        if let (Some(rename), Some(scope)) = (rename, self.locals.last_mut()) {
            scope.renames.insert(name.to_string(), rename);
        }
    }

    /// Declare `name` for a hoisted binding, renaming it when the innermost
    /// scope already has a local of that name. Returns the Kotlin name.
    fn declare_fresh(&mut self, name: &str, ty: Option<SwiftType>) -> String {
        let taken = |this: &Self, candidate: &str| {
            this.locals.iter().any(|scope| {
                scope.types.contains_key(candidate)
                    || scope.renames.values().any(|renamed| renamed == candidate)
            })
        };
        let already_here = self
            .locals
            .last()
            .is_some_and(|scope| scope.types.contains_key(name));
        if !already_here {
            self.declare(name, ty);
            return self.names.identifier(name);
        }
        let mut suffix = 2;
        let mut candidate = format!("{name}{suffix}");
        while taken(self, &candidate) {
            suffix += 1;
            candidate = format!("{name}{suffix}");
        }
        tracing::debug!(name, renamed = %candidate, "renaming redeclared binding");
        if let Some(scope) = self.locals.last_mut() {
            scope.types.insert(name.to_string(), ty);
            scope.renames.insert(name.to_string(), candidate.clone());
        }
        self.names.identifier(&candidate)
    }

    /// Type of the nearest local called `name`.
    fn local_type(&self, name: &str) -> Option<SwiftType> {
        self.locals
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(name))
            .cloned()
            .flatten()
    }

    /// The renamed Swift name a reference to `name` resolves to, if any.
    fn local_rename(&self, name: &str) -> Option<&str> {
        for scope in self.locals.iter().rev() {
            if let Some(renamed) = scope.renames.get(name) {
                return Some(renamed);
            }
            if scope.types.contains_key(name) {
                return None;
            }
        }
        None
    }

    /// Report `construct` and return the comment that stands in for it.
    fn untranslatable(
        &mut self,
        construct: &str,
        reason: &str,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let diagnostic = Diagnostic::untranslatable(construct, reason, range.clone());
        let text = diagnostic.message.clone();
        self.diagnostics.push(diagnostic);
        TargetNode::comment(text, range)
    }

    fn mismatch(&mut self, message: String, range: Option<SourceRange>) {
        self.diagnostics.push(Diagnostic::mismatch(message, range));
    }

    /// Map a type, reporting failures and falling back to `Any`.
    fn kotlin_type(&mut self, ty: &SwiftType, range: Option<&SourceRange>) -> KotlinType {
        match types::kotlin_type(ty) {
            Ok(mapped) => mapped,
            Err(reason) => {
                self.diagnostics.push(Diagnostic::untranslatable(
                    &format!("type `{ty}`"),
                    &reason,
                    range.cloned(),
                ));
                KotlinType::named("Any")
            }
        }
    }

    /// Best-effort static type of an expression.
    fn type_of(&self, node: &SourceNode) -> Option<SwiftType> {
        match &node.kind {
            SourceKind::DeclRef { name, ty } => ty.clone().or_else(|| self.local_type(name)),
            SourceKind::StringLiteral(_) | SourceKind::InterpolatedString(_) => {
                Some(SwiftType::named("String"))
            }
            SourceKind::IntegerLiteral(_) => Some(SwiftType::named("Int")),
            SourceKind::FloatLiteral(_) => Some(SwiftType::named("Double")),
            SourceKind::BooleanLiteral(_) => Some(SwiftType::named("Bool")),
            SourceKind::ArrayLiteral(_) => {
                Some(SwiftType::Array(Box::new(SwiftType::named("Any"))))
            }
            SourceKind::DictionaryLiteral(_) => Some(SwiftType::Dictionary {
                key: Box::new(SwiftType::named("AnyHashable")),
                value: Box::new(SwiftType::named("Any")),
            }),
            SourceKind::Paren(inner)
            | SourceKind::Try(inner)
            | SourceKind::ForceUnwrap(inner)
            | SourceKind::OptionalEvaluation(inner)
            | SourceKind::BindOptional(inner) => self.type_of(inner),
            SourceKind::Call { callee, .. } => match &callee.kind {
                SourceKind::DeclRef { name, .. } if self.registry.is_constructible(name) => {
                    Some(SwiftType::named(name.clone()))
                }
                _ => None,
            },
            SourceKind::Cast { ty, .. } => Some(ty.clone()),
            _ => None,
        }
    }

    /// Name of the enum a Swift type refers to, if it is one declared here.
    fn enum_name_of(&self, ty: &SwiftType) -> Option<String> {
        let name = ty.non_optional().name()?;
        let resolved = self.registry.resolve(name);
        self.registry
            .enum_info(resolved)
            .map(|_| resolved.to_string())
    }
}

pub(crate) fn is_assignment_operator(operator: &str) -> bool {
    matches!(
        operator,
        "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>="
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{build_ast, parse_dump};

    fn translate(source: &str) -> (TargetNode, Diagnostics) {
        let raw = parse_dump(source, "main.swift").unwrap();
        let mut diagnostics = Diagnostics::new();
        let ast = build_ast(raw, &mut diagnostics);
        let target = translate_ast(&ast, &TranslateOptions::default(), &mut diagnostics);
        (target, diagnostics)
    }

    fn items(node: TargetNode) -> Vec<TargetNode> {
        match node.kind {
            TargetKind::File(items) => items,
            other => panic!("expected a file, got {other:?}"),
        }
    }

    #[test]
    fn test_default_imports_are_dropped() {
        let (node, diagnostics) = translate(
            r#"(source_file (import_decl module="Foundation") (import_decl module="Combine"))"#,
        );
        assert!(diagnostics.is_empty());
        let items = items(node);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, TargetKind::Import("Combine".to_string()));
    }

    #[test]
    fn test_defer_is_untranslatable() {
        let (node, diagnostics) =
            translate("(source_file (defer_stmt [main.swift:4:3 - line:4:20] (brace_stmt)))");
        assert_eq!(diagnostics.error_count(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert!(diagnostic.message.starts_with("no Kotlin equivalent for defer"));
        let items = items(node);
        assert!(items[0].is_comment());
        assert_eq!(items[0].range.as_ref().map(|r| r.start_line), Some(4));
    }

    #[test]
    fn test_unknown_keeps_statement_children() {
        let (node, diagnostics) =
            translate("(source_file (FutureConstruct (break_stmt) (integer_literal_expr value=1)))");
        assert_eq!(diagnostics.warning_count(), 1);
        let items = items(node);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].kind,
            TargetKind::Comment("unrecognized construct: FutureConstruct".to_string())
        );
        assert_eq!(items[1].kind, TargetKind::Break);
    }

    #[test]
    fn test_synthesized_raw_values_carry_the_case_range() {
        let (node, diagnostics) = translate(
            r#"(source_file
                 (enum_decl name="Level" inherits="Int"
                   (enum_element_decl name="low" [main.swift:2:8 - line:2:11])
                   (enum_element_decl name="high" [main.swift:3:8 - line:3:12]))
                 (enum_decl name="Mode" inherits="String"
                   (enum_element_decl name="fast" [main.swift:6:8 - line:6:12])))"#,
        );
        assert!(diagnostics.is_empty());
        let lines: Vec<Vec<Option<usize>>> = items(node)
            .iter()
            .map(|item| match &item.kind {
                TargetKind::Class(class) => class
                    .entries
                    .iter()
                    .map(|entry| entry.args[0].range.as_ref().map(|r| r.start_line))
                    .collect(),
                other => panic!("expected an enum class, got {other:?}"),
            })
            .collect();
        assert_eq!(lines, vec![vec![Some(2), Some(3)], vec![Some(6)]]);
    }

    #[test]
    fn test_invalid_adds_no_diagnostic() {
        let (node, diagnostics) = translate("(source_file (func_decl))");
        assert_eq!(diagnostics.len(), 1);
        assert!(items(node)[0].is_comment());
    }
}
