//! Typed Swift AST.
//!
//! One closed enum ([`SourceKind`]) covers every construct the builder
//! understands, plus two placeholders: [`SourceKind::Invalid`] for nodes the
//! builder recognised but could not validate, and [`SourceKind::Unknown`] for
//! node kinds it has never heard of. Nodes own their children; nothing points
//! back up the tree.

pub mod types;

pub use types::{SwiftType, TypeParseError, parse_type};

use crate::range::SourceRange;
use crate::tree::{PrintableAsTree, PrintableTree};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceNode {
    pub kind: SourceKind,
    pub range: Option<SourceRange>,
}

impl SourceNode {
    pub fn new(kind: SourceKind, range: Option<SourceRange>) -> Self {
        Self { kind, range }
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    pub fn is_expression(&self) -> bool {
        self.tag().is_expression()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// External argument label; `None` for `_`.
    pub label: Option<String>,
    pub name: String,
    pub ty: SwiftType,
    pub default: Option<Box<SourceNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub result: Option<SwiftType>,
    /// `None` for protocol requirements.
    pub body: Option<Vec<SourceNode>>,
    pub is_static: bool,
    pub is_mutating: bool,
    pub throws: bool,
    pub is_override: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub body: Option<Vec<SourceNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Option<SwiftType>,
    pub is_let: bool,
    pub is_static: bool,
    pub init: Option<Box<SourceNode>>,
    pub accessors: Vec<Accessor>,
}

impl VariableDecl {
    /// Stored properties have no accessors.
    pub fn is_stored(&self) -> bool {
        self.accessors.is_empty()
    }
}

/// Shared shape of struct, class, protocol and enum declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub name: String,
    pub inherits: Vec<String>,
    pub members: Vec<SourceNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumCaseDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub raw_value: Option<Box<SourceNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Expr(Box<SourceNode>),
    /// `if let name = value`.
    Binding {
        name: String,
        value: Box<SourceNode>,
        range: Option<SourceRange>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    /// Empty for `default`.
    pub patterns: Vec<SourceNode>,
    pub body: Vec<SourceNode>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub name: Option<String>,
    pub ty: Option<SwiftType>,
    pub body: Vec<SourceNode>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub label: Option<String>,
    pub value: SourceNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    /// `as`
    Coerce,
    /// `as?`
    Conditional,
    /// `as!`
    Forced,
    /// `is`
    Check,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    // Declarations
    File(Vec<SourceNode>),
    Import {
        module: String,
    },
    Function(FunctionDecl),
    Initializer {
        params: Vec<Param>,
        body: Option<Vec<SourceNode>>,
    },
    Variable(VariableDecl),
    Struct(TypeDecl),
    Class(TypeDecl),
    Protocol(TypeDecl),
    Enum(TypeDecl),
    EnumCase(EnumCaseDecl),
    Extension {
        extended: String,
        members: Vec<SourceNode>,
    },
    TypeAlias {
        name: String,
        ty: SwiftType,
    },

    // Statements
    Block(Vec<SourceNode>),
    Return(Option<Box<SourceNode>>),
    If {
        condition: Condition,
        then_branch: Vec<SourceNode>,
        /// A `Block` or a nested `If`.
        else_branch: Option<Box<SourceNode>>,
    },
    Guard {
        condition: Condition,
        else_branch: Vec<SourceNode>,
    },
    While {
        condition: Box<SourceNode>,
        body: Vec<SourceNode>,
    },
    RepeatWhile {
        body: Vec<SourceNode>,
        condition: Box<SourceNode>,
    },
    ForEach {
        variable: String,
        sequence: Box<SourceNode>,
        body: Vec<SourceNode>,
    },
    Switch {
        subject: Box<SourceNode>,
        cases: Vec<SwitchCase>,
    },
    Break,
    Continue,
    Throw(Box<SourceNode>),
    Defer(Vec<SourceNode>),
    DoCatch {
        body: Vec<SourceNode>,
        catches: Vec<CatchClause>,
    },

    // Expressions
    IntegerLiteral(String),
    FloatLiteral(String),
    BooleanLiteral(bool),
    StringLiteral(String),
    /// Alternating literal text and interpolated expressions.
    InterpolatedString(Vec<SourceNode>),
    NilLiteral,
    DeclRef {
        name: String,
        ty: Option<SwiftType>,
    },
    Binary {
        operator: String,
        lhs: Box<SourceNode>,
        rhs: Box<SourceNode>,
    },
    PrefixUnary {
        operator: String,
        operand: Box<SourceNode>,
    },
    Assign {
        target: Box<SourceNode>,
        value: Box<SourceNode>,
    },
    Call {
        callee: Box<SourceNode>,
        arguments: Vec<Argument>,
    },
    Member {
        base: Box<SourceNode>,
        name: String,
    },
    /// `.north`, resolved against `ty` or the surrounding context.
    ImplicitMember {
        name: String,
        ty: Option<SwiftType>,
    },
    Subscript {
        base: Box<SourceNode>,
        index: Box<SourceNode>,
    },
    ArrayLiteral(Vec<SourceNode>),
    DictionaryLiteral(Vec<(SourceNode, SourceNode)>),
    Tuple(Vec<SourceNode>),
    Paren(Box<SourceNode>),
    Closure {
        params: Vec<String>,
        body: Vec<SourceNode>,
    },
    Ternary {
        condition: Box<SourceNode>,
        then_value: Box<SourceNode>,
        else_value: Box<SourceNode>,
    },
    ForceUnwrap(Box<SourceNode>),
    BindOptional(Box<SourceNode>),
    OptionalEvaluation(Box<SourceNode>),
    Cast {
        kind: CastKind,
        value: Box<SourceNode>,
        ty: SwiftType,
    },
    Try(Box<SourceNode>),
    OptionalTry(Box<SourceNode>),

    // Placeholders
    Invalid {
        kind: String,
        reason: String,
    },
    Unknown {
        kind: String,
        children: Vec<SourceNode>,
    },
}

impl SourceKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            SourceKind::File(_) => NodeTag::File,
            SourceKind::Import { .. } => NodeTag::Import,
            SourceKind::Function(_) => NodeTag::Function,
            SourceKind::Initializer { .. } => NodeTag::Initializer,
            SourceKind::Variable(_) => NodeTag::Variable,
            SourceKind::Struct(_) => NodeTag::Struct,
            SourceKind::Class(_) => NodeTag::Class,
            SourceKind::Protocol(_) => NodeTag::Protocol,
            SourceKind::Enum(_) => NodeTag::Enum,
            SourceKind::EnumCase(_) => NodeTag::EnumCase,
            SourceKind::Extension { .. } => NodeTag::Extension,
            SourceKind::TypeAlias { .. } => NodeTag::TypeAlias,
            SourceKind::Block(_) => NodeTag::Block,
            SourceKind::Return(_) => NodeTag::Return,
            SourceKind::If { .. } => NodeTag::If,
            SourceKind::Guard { .. } => NodeTag::Guard,
            SourceKind::While { .. } => NodeTag::While,
            SourceKind::RepeatWhile { .. } => NodeTag::RepeatWhile,
            SourceKind::ForEach { .. } => NodeTag::ForEach,
            SourceKind::Switch { .. } => NodeTag::Switch,
            SourceKind::Break => NodeTag::Break,
            SourceKind::Continue => NodeTag::Continue,
            SourceKind::Throw(_) => NodeTag::Throw,
            SourceKind::Defer(_) => NodeTag::Defer,
            SourceKind::DoCatch { .. } => NodeTag::DoCatch,
            SourceKind::IntegerLiteral(_) => NodeTag::IntegerLiteral,
            SourceKind::FloatLiteral(_) => NodeTag::FloatLiteral,
            SourceKind::BooleanLiteral(_) => NodeTag::BooleanLiteral,
            SourceKind::StringLiteral(_) => NodeTag::StringLiteral,
            SourceKind::InterpolatedString(_) => NodeTag::InterpolatedString,
            SourceKind::NilLiteral => NodeTag::NilLiteral,
            SourceKind::DeclRef { .. } => NodeTag::DeclRef,
            SourceKind::Binary { .. } => NodeTag::Binary,
            SourceKind::PrefixUnary { .. } => NodeTag::PrefixUnary,
            SourceKind::Assign { .. } => NodeTag::Assign,
            SourceKind::Call { .. } => NodeTag::Call,
            SourceKind::Member { .. } => NodeTag::Member,
            SourceKind::ImplicitMember { .. } => NodeTag::ImplicitMember,
            SourceKind::Subscript { .. } => NodeTag::Subscript,
            SourceKind::ArrayLiteral(_) => NodeTag::ArrayLiteral,
            SourceKind::DictionaryLiteral(_) => NodeTag::DictionaryLiteral,
            SourceKind::Tuple(_) => NodeTag::Tuple,
            SourceKind::Paren(_) => NodeTag::Paren,
            SourceKind::Closure { .. } => NodeTag::Closure,
            SourceKind::Ternary { .. } => NodeTag::Ternary,
            SourceKind::ForceUnwrap(_) => NodeTag::ForceUnwrap,
            SourceKind::BindOptional(_) => NodeTag::BindOptional,
            SourceKind::OptionalEvaluation(_) => NodeTag::OptionalEvaluation,
            SourceKind::Cast { .. } => NodeTag::Cast,
            SourceKind::Try(_) => NodeTag::Try,
            SourceKind::OptionalTry(_) => NodeTag::OptionalTry,
            SourceKind::Invalid { .. } => NodeTag::Invalid,
            SourceKind::Unknown { .. } => NodeTag::Unknown,
        }
    }
}

/// Fieldless mirror of [`SourceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeTag {
    File,
    Import,
    Function,
    Initializer,
    Variable,
    Struct,
    Class,
    Protocol,
    Enum,
    EnumCase,
    Extension,
    TypeAlias,
    Block,
    Return,
    If,
    Guard,
    While,
    RepeatWhile,
    ForEach,
    Switch,
    Break,
    Continue,
    Throw,
    Defer,
    DoCatch,
    IntegerLiteral,
    FloatLiteral,
    BooleanLiteral,
    StringLiteral,
    InterpolatedString,
    NilLiteral,
    DeclRef,
    Binary,
    PrefixUnary,
    Assign,
    Call,
    Member,
    ImplicitMember,
    Subscript,
    ArrayLiteral,
    DictionaryLiteral,
    Tuple,
    Paren,
    Closure,
    Ternary,
    ForceUnwrap,
    BindOptional,
    OptionalEvaluation,
    Cast,
    Try,
    OptionalTry,
    Invalid,
    Unknown,
}

impl NodeTag {
    pub const ALL: &'static [NodeTag] = &[
        NodeTag::File,
        NodeTag::Import,
        NodeTag::Function,
        NodeTag::Initializer,
        NodeTag::Variable,
        NodeTag::Struct,
        NodeTag::Class,
        NodeTag::Protocol,
        NodeTag::Enum,
        NodeTag::EnumCase,
        NodeTag::Extension,
        NodeTag::TypeAlias,
        NodeTag::Block,
        NodeTag::Return,
        NodeTag::If,
        NodeTag::Guard,
        NodeTag::While,
        NodeTag::RepeatWhile,
        NodeTag::ForEach,
        NodeTag::Switch,
        NodeTag::Break,
        NodeTag::Continue,
        NodeTag::Throw,
        NodeTag::Defer,
        NodeTag::DoCatch,
        NodeTag::IntegerLiteral,
        NodeTag::FloatLiteral,
        NodeTag::BooleanLiteral,
        NodeTag::StringLiteral,
        NodeTag::InterpolatedString,
        NodeTag::NilLiteral,
        NodeTag::DeclRef,
        NodeTag::Binary,
        NodeTag::PrefixUnary,
        NodeTag::Assign,
        NodeTag::Call,
        NodeTag::Member,
        NodeTag::ImplicitMember,
        NodeTag::Subscript,
        NodeTag::ArrayLiteral,
        NodeTag::DictionaryLiteral,
        NodeTag::Tuple,
        NodeTag::Paren,
        NodeTag::Closure,
        NodeTag::Ternary,
        NodeTag::ForceUnwrap,
        NodeTag::BindOptional,
        NodeTag::OptionalEvaluation,
        NodeTag::Cast,
        NodeTag::Try,
        NodeTag::OptionalTry,
        NodeTag::Invalid,
        NodeTag::Unknown,
    ];

    /// Dump labels that build this variant. Empty for placeholders.
    pub fn dump_kinds(self) -> &'static [&'static str] {
        match self {
            NodeTag::File => &["source_file"],
            NodeTag::Import => &["import_decl"],
            NodeTag::Function => &["func_decl"],
            NodeTag::Initializer => &["constructor_decl"],
            NodeTag::Variable => &["var_decl"],
            NodeTag::Struct => &["struct_decl"],
            NodeTag::Class => &["class_decl"],
            NodeTag::Protocol => &["protocol_decl"],
            NodeTag::Enum => &["enum_decl"],
            NodeTag::EnumCase => &["enum_element_decl"],
            NodeTag::Extension => &["extension_decl"],
            NodeTag::TypeAlias => &["typealias_decl"],
            NodeTag::Block => &["brace_stmt"],
            NodeTag::Return => &["return_stmt"],
            NodeTag::If => &["if_stmt"],
            NodeTag::Guard => &["guard_stmt"],
            NodeTag::While => &["while_stmt"],
            NodeTag::RepeatWhile => &["repeat_while_stmt"],
            NodeTag::ForEach => &["for_each_stmt"],
            NodeTag::Switch => &["switch_stmt"],
            NodeTag::Break => &["break_stmt"],
            NodeTag::Continue => &["continue_stmt"],
            NodeTag::Throw => &["throw_stmt"],
            NodeTag::Defer => &["defer_stmt"],
            NodeTag::DoCatch => &["do_catch_stmt"],
            NodeTag::IntegerLiteral => &["integer_literal_expr"],
            NodeTag::FloatLiteral => &["float_literal_expr"],
            NodeTag::BooleanLiteral => &["boolean_literal_expr"],
            NodeTag::StringLiteral => &["string_literal_expr"],
            NodeTag::InterpolatedString => &["interpolated_string_literal_expr"],
            NodeTag::NilLiteral => &["nil_literal_expr"],
            NodeTag::DeclRef => &["declref_expr"],
            NodeTag::Binary => &["binary_expr"],
            NodeTag::PrefixUnary => &["prefix_unary_expr"],
            NodeTag::Assign => &["assign_expr"],
            NodeTag::Call => &["call_expr"],
            NodeTag::Member => &["member_ref_expr"],
            NodeTag::ImplicitMember => &["implicit_member_expr"],
            NodeTag::Subscript => &["subscript_expr"],
            NodeTag::ArrayLiteral => &["array_expr"],
            NodeTag::DictionaryLiteral => &["dictionary_expr"],
            NodeTag::Tuple => &["tuple_expr"],
            NodeTag::Paren => &["paren_expr"],
            NodeTag::Closure => &["closure_expr"],
            NodeTag::Ternary => &["ternary_expr"],
            NodeTag::ForceUnwrap => &["force_value_expr"],
            NodeTag::BindOptional => &["bind_optional_expr"],
            NodeTag::OptionalEvaluation => &["optional_evaluation_expr"],
            NodeTag::Cast => &[
                "coerce_expr",
                "conditional_checked_cast_expr",
                "forced_checked_cast_expr",
                "is_expr",
            ],
            NodeTag::Try => &["try_expr"],
            NodeTag::OptionalTry => &["optional_try_expr"],
            NodeTag::Invalid | NodeTag::Unknown => &[],
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, NodeTag::Invalid | NodeTag::Unknown)
    }

    pub fn is_expression(self) -> bool {
        (NodeTag::IntegerLiteral..=NodeTag::OptionalTry).contains(&self)
    }

    pub fn is_declaration(self) -> bool {
        (NodeTag::File..=NodeTag::TypeAlias).contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeTag::File => "File",
            NodeTag::Import => "Import",
            NodeTag::Function => "Function",
            NodeTag::Initializer => "Initializer",
            NodeTag::Variable => "Variable",
            NodeTag::Struct => "Struct",
            NodeTag::Class => "Class",
            NodeTag::Protocol => "Protocol",
            NodeTag::Enum => "Enum",
            NodeTag::EnumCase => "Enum Case",
            NodeTag::Extension => "Extension",
            NodeTag::TypeAlias => "Type Alias",
            NodeTag::Block => "Block",
            NodeTag::Return => "Return",
            NodeTag::If => "If",
            NodeTag::Guard => "Guard",
            NodeTag::While => "While",
            NodeTag::RepeatWhile => "Repeat While",
            NodeTag::ForEach => "For Each",
            NodeTag::Switch => "Switch",
            NodeTag::Break => "Break",
            NodeTag::Continue => "Continue",
            NodeTag::Throw => "Throw",
            NodeTag::Defer => "Defer",
            NodeTag::DoCatch => "Do Catch",
            NodeTag::IntegerLiteral => "Integer Literal",
            NodeTag::FloatLiteral => "Float Literal",
            NodeTag::BooleanLiteral => "Boolean Literal",
            NodeTag::StringLiteral => "String Literal",
            NodeTag::InterpolatedString => "Interpolated String",
            NodeTag::NilLiteral => "Nil Literal",
            NodeTag::DeclRef => "Declaration Reference",
            NodeTag::Binary => "Binary",
            NodeTag::PrefixUnary => "Prefix Unary",
            NodeTag::Assign => "Assign",
            NodeTag::Call => "Call",
            NodeTag::Member => "Member",
            NodeTag::ImplicitMember => "Implicit Member",
            NodeTag::Subscript => "Subscript",
            NodeTag::ArrayLiteral => "Array Literal",
            NodeTag::DictionaryLiteral => "Dictionary Literal",
            NodeTag::Tuple => "Tuple",
            NodeTag::Paren => "Parentheses",
            NodeTag::Closure => "Closure",
            NodeTag::Ternary => "Ternary",
            NodeTag::ForceUnwrap => "Force Unwrap",
            NodeTag::BindOptional => "Bind Optional",
            NodeTag::OptionalEvaluation => "Optional Evaluation",
            NodeTag::Cast => "Cast",
            NodeTag::Try => "Try",
            NodeTag::OptionalTry => "Optional Try",
            NodeTag::Invalid => "Invalid",
            NodeTag::Unknown => "Unknown",
        }
    }
}

fn leaf(name: &str, value: impl std::fmt::Display) -> Option<PrintableTree> {
    Some(PrintableTree::field(name, value))
}

fn flag(name: &str, set: bool) -> Option<PrintableTree> {
    set.then(|| PrintableTree::leaf(name))
}

fn child(label: &str, node: &SourceNode) -> Option<PrintableTree> {
    Some(PrintableTree::new(label, vec![Some(PrintableTree::of(node))]))
}

fn optional_child(label: &str, node: Option<&SourceNode>) -> Option<PrintableTree> {
    node.and_then(|node| child(label, node))
}

fn nodes(label: &str, nodes: &[SourceNode]) -> Option<PrintableTree> {
    PrintableTree::list(label, nodes)
}

fn params(params: &[Param]) -> Option<PrintableTree> {
    let subtrees = params
        .iter()
        .map(|param| {
            let label = match &param.label {
                Some(label) if label != &param.name => format!("{label} {}: {}", param.name, param.ty),
                Some(_) => format!("{}: {}", param.name, param.ty),
                None => format!("_ {}: {}", param.name, param.ty),
            };
            Some(PrintableTree::new(
                label,
                vec![optional_child("default", param.default.as_deref())],
            ))
        })
        .collect();
    PrintableTree::or_none("parameters", subtrees)
}

fn condition(condition: &Condition) -> Option<PrintableTree> {
    match condition {
        Condition::Expr(expr) => child("condition", expr),
        Condition::Binding { name, value, .. } => Some(PrintableTree::new(
            "optional binding",
            vec![leaf("name", name), Some(PrintableTree::of(&**value))],
        )),
    }
}

fn type_decl(decl: &TypeDecl) -> Vec<Option<PrintableTree>> {
    vec![
        leaf("name", &decl.name),
        (!decl.inherits.is_empty()).then(|| PrintableTree::field("inherits", decl.inherits.join(", "))),
        nodes("members", &decl.members),
    ]
}

impl PrintableAsTree for SourceNode {
    fn tree_label(&self) -> String {
        self.tag().label().to_string()
    }

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>> {
        match &self.kind {
            SourceKind::File(items) | SourceKind::Block(items) | SourceKind::Defer(items) => {
                items.iter().map(|item| Some(PrintableTree::of(item))).collect()
            }
            SourceKind::Import { module } => vec![leaf("module", module)],
            SourceKind::Function(func) => vec![
                leaf("name", &func.name),
                flag("static", func.is_static),
                flag("mutating", func.is_mutating),
                flag("throws", func.throws),
                flag("override", func.is_override),
                params(&func.params),
                func.result.as_ref().map(|ty| PrintableTree::field("result", ty)),
                func.body.as_deref().and_then(|body| nodes("body", body)),
            ],
            SourceKind::Initializer { params: list, body } => vec![
                params(list),
                body.as_deref().and_then(|body| nodes("body", body)),
            ],
            SourceKind::Variable(var) => {
                let mut subtrees = vec![
                    leaf("name", &var.name),
                    flag("let", var.is_let),
                    flag("static", var.is_static),
                    var.ty.as_ref().map(|ty| PrintableTree::field("type", ty)),
                    optional_child("initializer", var.init.as_deref()),
                ];
                subtrees.extend(var.accessors.iter().map(|accessor| {
                    let label = match accessor.kind {
                        AccessorKind::Get => "get",
                        AccessorKind::Set => "set",
                    };
                    Some(PrintableTree::new(
                        label,
                        accessor
                            .body
                            .iter()
                            .flatten()
                            .map(|stmt| Some(PrintableTree::of(stmt)))
                            .collect(),
                    ))
                }));
                subtrees
            }
            SourceKind::Struct(decl)
            | SourceKind::Class(decl)
            | SourceKind::Protocol(decl)
            | SourceKind::Enum(decl) => type_decl(decl),
            SourceKind::EnumCase(case) => vec![
                leaf("name", &case.name),
                params(&case.params),
                optional_child("raw value", case.raw_value.as_deref()),
            ],
            SourceKind::Extension { extended, members } => {
                vec![leaf("type", extended), nodes("members", members)]
            }
            SourceKind::TypeAlias { name, ty } => vec![leaf("name", name), leaf("type", ty)],
            SourceKind::Return(value) => vec![value.as_deref().map(|value| PrintableTree::of(value))],
            SourceKind::If {
                condition: cond,
                then_branch,
                else_branch,
            } => vec![
                condition(cond),
                nodes("then", then_branch),
                optional_child("else", else_branch.as_deref()),
            ],
            SourceKind::Guard {
                condition: cond,
                else_branch,
            } => vec![condition(cond), nodes("else", else_branch)],
            SourceKind::While {
                condition: cond,
                body,
            }
            | SourceKind::RepeatWhile {
                body,
                condition: cond,
            } => vec![child("condition", cond), nodes("body", body)],
            SourceKind::ForEach {
                variable,
                sequence,
                body,
            } => vec![
                leaf("variable", variable),
                child("sequence", sequence),
                nodes("body", body),
            ],
            SourceKind::Switch { subject, cases } => {
                let mut subtrees = vec![child("subject", subject)];
                subtrees.extend(cases.iter().map(|case| {
                    let label = if case.patterns.is_empty() { "default" } else { "case" };
                    Some(PrintableTree::new(
                        label,
                        vec![nodes("patterns", &case.patterns), nodes("body", &case.body)],
                    ))
                }));
                subtrees
            }
            SourceKind::Break | SourceKind::Continue | SourceKind::NilLiteral => Vec::new(),
            SourceKind::Throw(value)
            | SourceKind::Paren(value)
            | SourceKind::ForceUnwrap(value)
            | SourceKind::BindOptional(value)
            | SourceKind::OptionalEvaluation(value)
            | SourceKind::Try(value)
            | SourceKind::OptionalTry(value) => vec![Some(PrintableTree::of(&**value))],
            SourceKind::DoCatch { body, catches } => {
                let mut subtrees = vec![nodes("do", body)];
                subtrees.extend(catches.iter().map(|clause| {
                    Some(PrintableTree::new(
                        "catch",
                        vec![
                            clause.name.as_ref().map(|name| PrintableTree::field("name", name)),
                            clause.ty.as_ref().map(|ty| PrintableTree::field("type", ty)),
                            nodes("body", &clause.body),
                        ],
                    ))
                }));
                subtrees
            }
            SourceKind::IntegerLiteral(value) | SourceKind::FloatLiteral(value) => {
                vec![leaf("value", value)]
            }
            SourceKind::BooleanLiteral(value) => vec![leaf("value", value)],
            SourceKind::StringLiteral(value) => vec![leaf("value", format!("{value:?}"))],
            SourceKind::InterpolatedString(segments) => segments
                .iter()
                .map(|segment| Some(PrintableTree::of(segment)))
                .collect(),
            SourceKind::DeclRef { name, ty } => vec![
                leaf("name", name),
                ty.as_ref().map(|ty| PrintableTree::field("type", ty)),
            ],
            SourceKind::Binary { operator, lhs, rhs } => vec![
                leaf("operator", operator),
                Some(PrintableTree::of(&**lhs)),
                Some(PrintableTree::of(&**rhs)),
            ],
            SourceKind::PrefixUnary { operator, operand } => vec![
                leaf("operator", operator),
                Some(PrintableTree::of(&**operand)),
            ],
            SourceKind::Assign { target, value } => {
                vec![child("target", target), child("value", value)]
            }
            SourceKind::Call { callee, arguments } => {
                let mut subtrees = vec![child("callee", callee)];
                subtrees.extend(arguments.iter().map(|arg| {
                    let label = match &arg.label {
                        Some(label) => format!("argument {label}"),
                        None => "argument".to_string(),
                    };
                    child(&label, &arg.value)
                }));
                subtrees
            }
            SourceKind::Member { base, name } => {
                vec![leaf("name", name), child("base", base)]
            }
            SourceKind::ImplicitMember { name, ty } => vec![
                leaf("name", name),
                ty.as_ref().map(|ty| PrintableTree::field("type", ty)),
            ],
            SourceKind::Subscript { base, index } => {
                vec![child("base", base), child("index", index)]
            }
            SourceKind::ArrayLiteral(items) | SourceKind::Tuple(items) => items
                .iter()
                .map(|item| Some(PrintableTree::of(item)))
                .collect(),
            SourceKind::DictionaryLiteral(pairs) => pairs
                .iter()
                .map(|(key, value)| {
                    Some(PrintableTree::new(
                        "entry",
                        vec![child("key", key), child("value", value)],
                    ))
                })
                .collect(),
            SourceKind::Closure { params: list, body } => vec![
                (!list.is_empty()).then(|| PrintableTree::field("parameters", list.join(", "))),
                nodes("body", body),
            ],
            SourceKind::Ternary {
                condition: cond,
                then_value,
                else_value,
            } => vec![
                child("condition", cond),
                child("then", then_value),
                child("else", else_value),
            ],
            SourceKind::Cast { kind, value, ty } => vec![
                leaf(
                    "operator",
                    match kind {
                        CastKind::Coerce => "as",
                        CastKind::Conditional => "as?",
                        CastKind::Forced => "as!",
                        CastKind::Check => "is",
                    },
                ),
                leaf("type", ty),
                Some(PrintableTree::of(&**value)),
            ],
            SourceKind::Invalid { kind, reason } => {
                vec![leaf("kind", kind), leaf("reason", reason)]
            }
            SourceKind::Unknown { kind, children } => {
                let mut subtrees = vec![leaf("kind", kind)];
                subtrees.extend(children.iter().map(|c| Some(PrintableTree::of(c))));
                subtrees
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::render_tree;

    #[test]
    fn test_all_tags_are_listed_once() {
        let mut seen = std::collections::HashSet::new();
        for tag in NodeTag::ALL {
            assert!(seen.insert(*tag), "{tag:?} listed twice");
        }
        assert_eq!(NodeTag::ALL.first(), Some(&NodeTag::File));
        assert_eq!(NodeTag::ALL.last(), Some(&NodeTag::Unknown));
    }

    #[test]
    fn test_tag_classification() {
        assert!(NodeTag::Function.is_declaration());
        assert!(NodeTag::Call.is_expression());
        assert!(!NodeTag::Return.is_expression());
        assert!(NodeTag::Unknown.is_placeholder());
        assert!(NodeTag::Unknown.dump_kinds().is_empty());
    }

    #[test]
    fn test_tree_rendering() {
        let node = SourceNode::new(
            SourceKind::Function(FunctionDecl {
                name: "foo".to_string(),
                params: Vec::new(),
                result: None,
                body: Some(vec![SourceNode::new(SourceKind::Return(None), None)]),
                is_static: false,
                is_mutating: false,
                throws: false,
                is_override: false,
            }),
            None,
        );
        assert_eq!(
            render_tree(&node),
            "Function\n ├─ name: foo\n └─ body\n     └─ Return\n"
        );
    }
}
