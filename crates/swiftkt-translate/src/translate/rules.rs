//! Priority tables for Swift idioms with more than one Kotlin rendering.
//!
//! Each table is an ordered slice of rules. The first rule whose predicate
//! holds wins; the table's fallback applies when none does. Order in the
//! slice is the priority, nothing else.
//!
//! | Swift idiom          | Tried in order                                  | Fallback           |
//! |----------------------|-------------------------------------------------|--------------------|
//! | `if let x = e {A}`   | smart cast (`e` is `x`), `e?.let { x -> A }`    | `when (val x = e)` |
//! | struct declaration   | `data class`                                    | class + equality   |
//! | enum declaration     | `enum class`                                    | `sealed class`     |
//! | call argument labels | named after the callee's parameters             | positional         |

use crate::swift::{SourceKind, SourceNode, TypeDecl, VariableDecl};

pub struct Rule<C, P> {
    pub choice: C,
    pub description: &'static str,
    pub applies: P,
}

pub fn first_applicable<C, S, P>(rules: &[Rule<C, P>], subject: &S) -> Option<C>
where
    C: Copy,
    S: ?Sized,
    P: Fn(&S) -> bool,
{
    rules.iter().find(|rule| (rule.applies)(subject)).map(|rule| {
        tracing::trace!(rule = rule.description, "rewrite rule selected");
        rule.choice
    })
}

// Optional binding

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStyle {
    /// `if let x = x`: Kotlin smart-casts `x` after `x != null`.
    SmartCast,
    /// `e?.let { x -> ... }`.
    SafeLet,
    /// `when (val x = e) { null -> .. else -> .. }`, keeping `x` in the branch.
    ScopedVal,
}

pub struct BindingSite<'a> {
    pub name: &'a str,
    pub value: &'a SourceNode,
    pub then_branch: &'a [SourceNode],
    pub has_else: bool,
}

pub static BINDING_RULES: &[Rule<BindingStyle, fn(&BindingSite<'_>) -> bool>] = &[
    Rule {
        choice: BindingStyle::SmartCast,
        description: "rebinding the same name",
        applies: rebinds_same_name,
    },
    Rule {
        choice: BindingStyle::SafeLet,
        description: "no else branch and no early exit",
        applies: is_straight_line,
    },
];

fn rebinds_same_name(site: &BindingSite<'_>) -> bool {
    rebinds(site.name, site.value)
}

/// `value` is a plain reference to `name`.
pub fn rebinds(name: &str, value: &SourceNode) -> bool {
    matches!(&value.kind, SourceKind::DeclRef { name: target, .. } if target == name)
}

fn is_straight_line(site: &BindingSite<'_>) -> bool {
    !site.has_else && !has_jump(site.then_branch)
}

pub fn binding_style(site: &BindingSite<'_>) -> BindingStyle {
    first_applicable(BINDING_RULES, site).unwrap_or(BindingStyle::ScopedVal)
}

/// `return`, `break` or `continue` anywhere in `stmts`, outside closures.
pub fn has_jump(stmts: &[SourceNode]) -> bool {
    stmts.iter().any(|stmt| match &stmt.kind {
        SourceKind::Return(_) | SourceKind::Break | SourceKind::Continue => true,
        SourceKind::Block(body) | SourceKind::Defer(body) => has_jump(body),
        SourceKind::If {
            then_branch,
            else_branch,
            ..
        } => has_jump(then_branch) || else_branch.as_deref().is_some_and(|e| has_jump(std::slice::from_ref(e))),
        SourceKind::Guard { else_branch, .. } => has_jump(else_branch),
        SourceKind::While { body, .. }
        | SourceKind::RepeatWhile { body, .. }
        | SourceKind::ForEach { body, .. } => has_jump(body),
        SourceKind::Switch { cases, .. } => cases.iter().any(|case| has_jump(&case.body)),
        SourceKind::DoCatch { body, catches } => {
            has_jump(body) || catches.iter().any(|c| has_jump(&c.body))
        }
        _ => false,
    })
}

// Structs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructRepresentation {
    DataClass,
    /// Plain class with generated `equals`/`hashCode`.
    ClassWithEquality,
}

pub static STRUCT_RULES: &[Rule<StructRepresentation, fn(&TypeDecl) -> bool>] = &[Rule {
    choice: StructRepresentation::DataClass,
    description: "no explicit initializer and at least one typed stored property",
    applies: fits_data_class,
}];

fn fits_data_class(decl: &TypeDecl) -> bool {
    let has_init = decl
        .members
        .iter()
        .any(|m| matches!(m.kind, SourceKind::Initializer { .. }));
    let stored = stored_properties(decl);
    !has_init
        && !stored.is_empty()
        && stored
            .iter()
            .all(|var| var.ty.is_some() || var.init.as_deref().is_some_and(is_literal))
}

pub fn struct_representation(decl: &TypeDecl) -> StructRepresentation {
    first_applicable(STRUCT_RULES, decl).unwrap_or(StructRepresentation::ClassWithEquality)
}

/// Instance stored properties in declaration order.
pub fn stored_properties(decl: &TypeDecl) -> Vec<&VariableDecl> {
    decl.members
        .iter()
        .filter_map(|member| match &member.kind {
            SourceKind::Variable(var) if var.is_stored() && !var.is_static => Some(var),
            _ => None,
        })
        .collect()
}

pub fn is_literal(node: &SourceNode) -> bool {
    matches!(
        node.kind,
        SourceKind::IntegerLiteral(_)
            | SourceKind::FloatLiteral(_)
            | SourceKind::BooleanLiteral(_)
            | SourceKind::StringLiteral(_)
    )
}

// Enums

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepresentation {
    EnumClass,
    SealedClass,
}

pub static ENUM_RULES: &[Rule<EnumRepresentation, fn(&TypeDecl) -> bool>] = &[Rule {
    choice: EnumRepresentation::EnumClass,
    description: "no associated values",
    applies: has_no_associated_values,
}];

fn has_no_associated_values(decl: &TypeDecl) -> bool {
    decl.members.iter().all(|member| match &member.kind {
        SourceKind::EnumCase(case) => case.params.is_empty(),
        _ => true,
    })
}

pub fn enum_representation(decl: &TypeDecl) -> EnumRepresentation {
    first_applicable(ENUM_RULES, decl).unwrap_or(EnumRepresentation::SealedClass)
}

// Call arguments

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentStyle {
    Named,
    Positional,
}

pub struct CallSite {
    /// The callee's parameter names were resolved for this argument list.
    pub params_known: bool,
    pub has_labels: bool,
}

pub static ARGUMENT_RULES: &[Rule<ArgumentStyle, fn(&CallSite) -> bool>] = &[Rule {
    choice: ArgumentStyle::Named,
    description: "labelled call with known parameters",
    applies: is_resolved_labelled_call,
}];

fn is_resolved_labelled_call(site: &CallSite) -> bool {
    site.params_known && site.has_labels
}

pub fn argument_style(site: &CallSite) -> ArgumentStyle {
    first_applicable(ARGUMENT_RULES, site).unwrap_or(ArgumentStyle::Positional)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swift::{EnumCaseDecl, Param, SwiftType};

    fn node(kind: SourceKind) -> SourceNode {
        SourceNode::new(kind, None)
    }

    fn declref(name: &str) -> SourceNode {
        node(SourceKind::DeclRef {
            name: name.to_string(),
            ty: None,
        })
    }

    fn stored(name: &str, ty: Option<SwiftType>) -> SourceNode {
        node(SourceKind::Variable(VariableDecl {
            name: name.to_string(),
            ty,
            is_let: true,
            is_static: false,
            init: None,
            accessors: Vec::new(),
        }))
    }

    #[test]
    fn test_binding_priority() {
        let value = declref("maybe");
        let body = vec![node(SourceKind::Break)];

        let site = BindingSite {
            name: "x",
            value: &value,
            then_branch: &[],
            has_else: false,
        };
        assert_eq!(binding_style(&site), BindingStyle::SafeLet);

        let site = BindingSite {
            then_branch: &body,
            ..site
        };
        assert_eq!(binding_style(&site), BindingStyle::ScopedVal);

        let site = BindingSite {
            name: "maybe",
            then_branch: &body,
            has_else: true,
            value: &value,
        };
        assert_eq!(binding_style(&site), BindingStyle::SmartCast);
    }

    #[test]
    fn test_jump_inside_closure_does_not_count() {
        let closure = node(SourceKind::Closure {
            params: Vec::new(),
            body: vec![node(SourceKind::Return(None))],
        });
        assert!(!has_jump(&[closure]));
        assert!(has_jump(&[node(SourceKind::Block(vec![node(SourceKind::Continue)]))]));
    }

    #[test]
    fn test_struct_representation() {
        let point = TypeDecl {
            name: "Point".to_string(),
            inherits: Vec::new(),
            members: vec![stored("x", Some(SwiftType::named("Int")))],
        };
        assert_eq!(struct_representation(&point), StructRepresentation::DataClass);

        let empty = TypeDecl {
            members: Vec::new(),
            ..point.clone()
        };
        assert_eq!(struct_representation(&empty), StructRepresentation::ClassWithEquality);

        let mut with_init = point;
        with_init.members.push(node(SourceKind::Initializer {
            params: Vec::new(),
            body: Some(Vec::new()),
        }));
        assert_eq!(struct_representation(&with_init), StructRepresentation::ClassWithEquality);
    }

    #[test]
    fn test_enum_representation() {
        let case = |name: &str, params: Vec<Param>| {
            node(SourceKind::EnumCase(EnumCaseDecl {
                name: name.to_string(),
                params,
                raw_value: None,
            }))
        };
        let mut decl = TypeDecl {
            name: "Shape".to_string(),
            inherits: Vec::new(),
            members: vec![case("empty", Vec::new())],
        };
        assert_eq!(enum_representation(&decl), EnumRepresentation::EnumClass);

        decl.members.push(case(
            "circle",
            vec![Param {
                label: Some("radius".to_string()),
                name: "radius".to_string(),
                ty: SwiftType::named("Double"),
                default: None,
            }],
        ));
        assert_eq!(enum_representation(&decl), EnumRepresentation::SealedClass);
    }

    #[test]
    fn test_argument_style() {
        let site = CallSite {
            params_known: true,
            has_labels: true,
        };
        assert_eq!(argument_style(&site), ArgumentStyle::Named);
        let site = CallSite {
            params_known: false,
            has_labels: true,
        };
        assert_eq!(argument_style(&site), ArgumentStyle::Positional);
        let site = CallSite {
            params_known: true,
            has_labels: false,
        };
        assert_eq!(argument_style(&site), ArgumentStyle::Positional);
    }
}
