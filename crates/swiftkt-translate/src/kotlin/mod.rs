//! Typed Kotlin AST produced by the translator and consumed by
//! [`KotlinWriter`](crate::output::KotlinWriter).
//!
//! The tree is deliberately close to Kotlin's surface syntax: every variant
//! prints as one recognisable construct, so the writer never has to invent
//! structure, only layout and parentheses.

use crate::range::SourceRange;
use crate::tree::{PrintableAsTree, PrintableTree};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetNode {
    pub kind: TargetKind,
    pub range: Option<SourceRange>,
}

impl TargetNode {
    pub fn new(kind: TargetKind, range: Option<SourceRange>) -> Self {
        Self { kind, range }
    }

    pub fn name(name: impl Into<String>, range: Option<SourceRange>) -> Self {
        Self::new(TargetKind::Name(name.into()), range)
    }

    pub fn comment(text: impl Into<String>, range: Option<SourceRange>) -> Self {
        Self::new(TargetKind::Comment(text.into()), range)
    }

    pub fn literal(literal: Literal, range: Option<SourceRange>) -> Self {
        Self::new(TargetKind::Literal(literal), range)
    }

    pub fn member(base: TargetNode, name: impl Into<String>, range: Option<SourceRange>) -> Self {
        Self::new(
            TargetKind::Member {
                base: Box::new(base),
                name: name.into(),
                safe: false,
            },
            range,
        )
    }

    /// A call with positional arguments.
    pub fn call(callee: TargetNode, args: Vec<TargetNode>, range: Option<SourceRange>) -> Self {
        Self::new(
            TargetKind::Call {
                callee: Box::new(callee),
                args: args.into_iter().map(Argument::positional).collect(),
                trailing_lambda: None,
            },
            range,
        )
    }

    pub fn binary(op: BinaryOp, lhs: TargetNode, rhs: TargetNode, range: Option<SourceRange>) -> Self {
        Self::new(
            TargetKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            range,
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TargetKind::Comment(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KotlinType {
    Named { name: String, args: Vec<KotlinType> },
    Nullable(Box<KotlinType>),
    Function {
        params: Vec<KotlinType>,
        result: Box<KotlinType>,
    },
}

impl KotlinType {
    pub fn named(name: impl Into<String>) -> Self {
        KotlinType::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<KotlinType>) -> Self {
        KotlinType::Named {
            name: name.into(),
            args,
        }
    }

    /// `T?`; already-nullable types are left alone.
    pub fn nullable(self) -> Self {
        match self {
            KotlinType::Nullable(_) => self,
            other => KotlinType::Nullable(Box::new(other)),
        }
    }
}

impl fmt::Display for KotlinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KotlinType::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            KotlinType::Nullable(inner) => match inner.as_ref() {
                KotlinType::Function { .. } => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
            KotlinType::Function { params, result } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {result}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Private,
    Abstract,
    Open,
    Override,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Open => "open",
            Modifier::Override => "override",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    Val,
    Var,
}

impl Binding {
    pub fn keyword(self) -> &'static str {
        match self {
            Binding::Val => "val",
            Binding::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: KotlinType,
    pub default: Option<Box<TargetNode>>,
    /// Set for primary-constructor properties.
    pub binding: Option<Binding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    /// Extension receiver (`fun Int.double()`).
    pub receiver: Option<KotlinType>,
    pub params: Vec<Parameter>,
    pub return_type: Option<KotlinType>,
    /// `None` for abstract members.
    pub body: Option<Vec<TargetNode>>,
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDef {
    pub name: String,
    pub binding: Binding,
    pub ty: Option<KotlinType>,
    pub receiver: Option<KotlinType>,
    pub init: Option<Box<TargetNode>>,
    pub getter: Option<Vec<TargetNode>>,
    pub setter: Option<Vec<TargetNode>>,
    pub modifiers: Vec<Modifier>,
}

impl PropertyDef {
    /// A local or member `val`/`var` with an optional type and initializer.
    pub fn simple(
        name: impl Into<String>,
        binding: Binding,
        ty: Option<KotlinType>,
        init: Option<TargetNode>,
    ) -> Self {
        Self {
            name: name.into(),
            binding,
            ty,
            receiver: None,
            init: init.map(Box::new),
            getter: None,
            setter: None,
            modifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    DataClass,
    EnumClass,
    SealedClass,
    Interface,
    Object,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::DataClass => "data class",
            ClassKind::EnumClass => "enum class",
            ClassKind::SealedClass => "sealed class",
            ClassKind::Interface => "interface",
            ClassKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supertype {
    pub name: String,
    /// `: Shape()` rather than `: Shape`.
    pub constructor_call: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumEntry {
    pub name: String,
    pub args: Vec<TargetNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    /// Primary constructor parameters.
    pub params: Vec<Parameter>,
    pub supertypes: Vec<Supertype>,
    pub entries: Vec<EnumEntry>,
    pub members: Vec<TargetNode>,
    pub modifiers: Vec<Modifier>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            supertypes: Vec::new(),
            entries: Vec::new(),
            members: Vec::new(),
            modifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhenCondition {
    Value(TargetNode),
    Is(KotlinType),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenBranch {
    /// Empty for `else`.
    pub conditions: Vec<WhenCondition>,
    pub body: Vec<TargetNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchBlock {
    pub name: String,
    pub ty: KotlinType,
    pub body: Vec<TargetNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    RangeTo,
    Until,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    To,
    Elvis,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Identical,
    NotIdentical,
    Conj,
    Disj,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::RangeTo => "..",
            BinaryOp::Until => "until",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::To => "to",
            BinaryOp::Elvis => "?:",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Identical => "===",
            BinaryOp::NotIdentical => "!==",
            BinaryOp::Conj => "&&",
            BinaryOp::Disj => "||",
        }
    }

    /// Kotlin grammar precedence; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::RangeTo => 8,
            BinaryOp::Until
            | BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::Xor
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::To => 7,
            BinaryOp::Elvis => 6,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Identical | BinaryOp::NotIdentical => 3,
            BinaryOp::Conj => 2,
            BinaryOp::Disj => 1,
        }
    }

    /// Comparison and equality operators do not chain.
    pub fn is_non_associative(self) -> bool {
        matches!(self.precedence(), 3 | 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    As,
    SafeAs,
    Is,
}

impl CastKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CastKind::As => "as",
            CastKind::SafeAs => "as?",
            CastKind::Is => "is",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(String),
    Double(String),
    Bool(bool),
    String(String),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePart {
    Text(String),
    Expr(TargetNode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    /// Named argument label (`x = 1`).
    pub name: Option<String>,
    pub value: TargetNode,
}

impl Argument {
    pub fn positional(value: TargetNode) -> Self {
        Self { name: None, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    File(Vec<TargetNode>),
    /// Placeholder text for constructs that could not be translated.
    Comment(String),
    Import(String),
    Function(FunctionDef),
    Property(PropertyDef),
    Class(ClassDef),
    /// Secondary constructor.
    Constructor {
        params: Vec<Parameter>,
        body: Vec<TargetNode>,
    },
    CompanionObject(Vec<TargetNode>),
    TypeAlias {
        name: String,
        ty: KotlinType,
    },
    Return(Option<Box<TargetNode>>),
    If {
        condition: Box<TargetNode>,
        then_branch: Vec<TargetNode>,
        /// A single nested `If` prints as `else if`.
        else_branch: Option<Vec<TargetNode>>,
    },
    While {
        condition: Box<TargetNode>,
        body: Vec<TargetNode>,
    },
    DoWhile {
        body: Vec<TargetNode>,
        condition: Box<TargetNode>,
    },
    For {
        variable: String,
        iterable: Box<TargetNode>,
        body: Vec<TargetNode>,
    },
    When {
        subject: Option<Box<TargetNode>>,
        branches: Vec<WhenBranch>,
    },
    Break,
    Continue,
    Throw(Box<TargetNode>),
    Try {
        body: Vec<TargetNode>,
        catches: Vec<CatchBlock>,
    },
    Assign {
        op: AssignOp,
        target: Box<TargetNode>,
        value: Box<TargetNode>,
    },
    Literal(Literal),
    Template(Vec<TemplatePart>),
    Name(String),
    Binary {
        op: BinaryOp,
        lhs: Box<TargetNode>,
        rhs: Box<TargetNode>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TargetNode>,
    },
    NotNullAssert(Box<TargetNode>),
    Call {
        callee: Box<TargetNode>,
        args: Vec<Argument>,
        trailing_lambda: Option<Box<TargetNode>>,
    },
    Member {
        base: Box<TargetNode>,
        name: String,
        /// `?.` instead of `.`.
        safe: bool,
    },
    Index {
        base: Box<TargetNode>,
        index: Box<TargetNode>,
    },
    Lambda {
        params: Vec<String>,
        body: Vec<TargetNode>,
    },
    IfExpr {
        condition: Box<TargetNode>,
        then_value: Box<TargetNode>,
        else_value: Box<TargetNode>,
    },
    Cast {
        kind: CastKind,
        value: Box<TargetNode>,
        ty: KotlinType,
    },
}

impl TargetKind {
    /// Kinds that produce a value and may appear as operands.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            TargetKind::Literal(_)
                | TargetKind::Template(_)
                | TargetKind::Name(_)
                | TargetKind::Binary { .. }
                | TargetKind::Unary { .. }
                | TargetKind::NotNullAssert(_)
                | TargetKind::Call { .. }
                | TargetKind::Member { .. }
                | TargetKind::Index { .. }
                | TargetKind::Lambda { .. }
                | TargetKind::IfExpr { .. }
                | TargetKind::Cast { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::File(_) => "File",
            TargetKind::Comment(_) => "Comment",
            TargetKind::Import(_) => "Import",
            TargetKind::Function(_) => "Function",
            TargetKind::Property(_) => "Property",
            TargetKind::Class(_) => "Class",
            TargetKind::Constructor { .. } => "Constructor",
            TargetKind::CompanionObject(_) => "Companion Object",
            TargetKind::TypeAlias { .. } => "Type Alias",
            TargetKind::Return(_) => "Return",
            TargetKind::If { .. } => "If",
            TargetKind::While { .. } => "While",
            TargetKind::DoWhile { .. } => "Do While",
            TargetKind::For { .. } => "For",
            TargetKind::When { .. } => "When",
            TargetKind::Break => "Break",
            TargetKind::Continue => "Continue",
            TargetKind::Throw(_) => "Throw",
            TargetKind::Try { .. } => "Try",
            TargetKind::Assign { .. } => "Assign",
            TargetKind::Literal(_) => "Literal",
            TargetKind::Template(_) => "Template",
            TargetKind::Name(_) => "Name",
            TargetKind::Binary { .. } => "Binary",
            TargetKind::Unary { .. } => "Unary",
            TargetKind::NotNullAssert(_) => "Not Null Assert",
            TargetKind::Call { .. } => "Call",
            TargetKind::Member { .. } => "Member",
            TargetKind::Index { .. } => "Index",
            TargetKind::Lambda { .. } => "Lambda",
            TargetKind::IfExpr { .. } => "If Expression",
            TargetKind::Cast { .. } => "Cast",
        }
    }
}

fn leaf(name: &str, value: impl fmt::Display) -> Option<PrintableTree> {
    Some(PrintableTree::field(name, value))
}

fn node(node: &TargetNode) -> Option<PrintableTree> {
    Some(PrintableTree::of(node))
}

fn labelled(label: &str, target: &TargetNode) -> Option<PrintableTree> {
    Some(PrintableTree::new(label, vec![node(target)]))
}

fn nodes(label: &str, items: &[TargetNode]) -> Option<PrintableTree> {
    PrintableTree::list(label, items)
}

fn modifiers(list: &[Modifier]) -> Option<PrintableTree> {
    (!list.is_empty()).then(|| {
        let words: Vec<_> = list.iter().map(|m| m.keyword()).collect();
        PrintableTree::field("modifiers", words.join(" "))
    })
}

fn parameters(params: &[Parameter]) -> Option<PrintableTree> {
    let subtrees = params
        .iter()
        .map(|param| {
            let label = match param.binding {
                Some(binding) => format!("{} {}: {}", binding.keyword(), param.name, param.ty),
                None => format!("{}: {}", param.name, param.ty),
            };
            Some(PrintableTree::new(
                label,
                vec![param.default.as_deref().and_then(|d| labelled("default", d))],
            ))
        })
        .collect();
    PrintableTree::or_none("parameters", subtrees)
}

impl PrintableAsTree for TargetNode {
    fn tree_label(&self) -> String {
        self.kind.label().to_string()
    }

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>> {
        match &self.kind {
            TargetKind::File(items) | TargetKind::CompanionObject(items) => {
                items.iter().map(node).collect()
            }
            TargetKind::Comment(text) => vec![leaf("text", text)],
            TargetKind::Import(module) => vec![leaf("module", module)],
            TargetKind::Function(func) => vec![
                leaf("name", &func.name),
                func.receiver.as_ref().map(|ty| PrintableTree::field("receiver", ty)),
                modifiers(&func.modifiers),
                parameters(&func.params),
                func.return_type
                    .as_ref()
                    .map(|ty| PrintableTree::field("return type", ty)),
                func.body.as_deref().and_then(|body| nodes("body", body)),
            ],
            TargetKind::Property(prop) => vec![
                leaf("name", &prop.name),
                leaf("binding", prop.binding.keyword()),
                prop.receiver.as_ref().map(|ty| PrintableTree::field("receiver", ty)),
                modifiers(&prop.modifiers),
                prop.ty.as_ref().map(|ty| PrintableTree::field("type", ty)),
                prop.init.as_deref().and_then(|init| labelled("initializer", init)),
                prop.getter.as_deref().and_then(|body| nodes("get", body)),
                prop.setter.as_deref().and_then(|body| nodes("set", body)),
            ],
            TargetKind::Class(class) => {
                let supertypes: Vec<_> = class.supertypes.iter().map(|s| s.name.as_str()).collect();
                let entries = class
                    .entries
                    .iter()
                    .map(|entry| Some(PrintableTree::new(&entry.name, entry.args.iter().map(node).collect())))
                    .collect();
                vec![
                    leaf("name", &class.name),
                    leaf("kind", class.kind.keyword()),
                    modifiers(&class.modifiers),
                    parameters(&class.params),
                    (!supertypes.is_empty()).then(|| PrintableTree::field("supertypes", supertypes.join(", "))),
                    PrintableTree::or_none("entries", entries),
                    nodes("members", &class.members),
                ]
            }
            TargetKind::Constructor { params, body } => {
                vec![parameters(params), nodes("body", body)]
            }
            TargetKind::TypeAlias { name, ty } => vec![leaf("name", name), leaf("type", ty)],
            TargetKind::Return(value) => vec![value.as_deref().and_then(node)],
            TargetKind::If {
                condition,
                then_branch,
                else_branch,
            } => vec![
                labelled("condition", condition),
                nodes("then", then_branch),
                else_branch.as_deref().and_then(|branch| nodes("else", branch)),
            ],
            TargetKind::While { condition, body } | TargetKind::DoWhile { body, condition } => {
                vec![labelled("condition", condition), nodes("body", body)]
            }
            TargetKind::For {
                variable,
                iterable,
                body,
            } => vec![
                leaf("variable", variable),
                labelled("iterable", iterable),
                nodes("body", body),
            ],
            TargetKind::When { subject, branches } => {
                let mut subtrees = vec![subject.as_deref().and_then(|s| labelled("subject", s))];
                subtrees.extend(branches.iter().map(|branch| {
                    let conditions = branch
                        .conditions
                        .iter()
                        .map(|condition| match condition {
                            WhenCondition::Value(value) => node(value),
                            WhenCondition::Is(ty) => Some(PrintableTree::field("is", ty)),
                        })
                        .collect();
                    let label = if branch.conditions.is_empty() { "else" } else { "branch" };
                    Some(PrintableTree::new(
                        label,
                        vec![
                            PrintableTree::or_none("conditions", conditions),
                            nodes("body", &branch.body),
                        ],
                    ))
                }));
                subtrees
            }
            TargetKind::Break | TargetKind::Continue => Vec::new(),
            TargetKind::Throw(value) | TargetKind::NotNullAssert(value) => vec![node(value)],
            TargetKind::Try { body, catches } => {
                let mut subtrees = vec![nodes("try", body)];
                subtrees.extend(catches.iter().map(|catch| {
                    Some(PrintableTree::new(
                        format!("catch {}: {}", catch.name, catch.ty),
                        catch.body.iter().map(node).collect(),
                    ))
                }));
                subtrees
            }
            TargetKind::Assign { op, target, value } => vec![
                leaf("operator", op.symbol()),
                labelled("target", target),
                labelled("value", value),
            ],
            TargetKind::Literal(literal) => vec![Some(PrintableTree::leaf(match literal {
                Literal::Int(value) | Literal::Double(value) => value.clone(),
                Literal::Bool(value) => value.to_string(),
                Literal::String(value) => format!("{value:?}"),
                Literal::Null => "null".to_string(),
            }))],
            TargetKind::Template(parts) => parts
                .iter()
                .map(|part| match part {
                    TemplatePart::Text(text) => leaf("text", format!("{text:?}")),
                    TemplatePart::Expr(expr) => node(expr),
                })
                .collect(),
            TargetKind::Name(name) => vec![leaf("name", name)],
            TargetKind::Binary { op, lhs, rhs } => {
                vec![leaf("operator", op.symbol()), node(lhs), node(rhs)]
            }
            TargetKind::Unary { op, operand } => vec![leaf("operator", op.symbol()), node(operand)],
            TargetKind::Call {
                callee,
                args,
                trailing_lambda,
            } => {
                let mut subtrees = vec![labelled("callee", callee)];
                subtrees.extend(args.iter().map(|arg| match &arg.name {
                    Some(name) => labelled(&format!("argument {name}"), &arg.value),
                    None => labelled("argument", &arg.value),
                }));
                subtrees.push(trailing_lambda.as_deref().and_then(|l| labelled("trailing lambda", l)));
                subtrees
            }
            TargetKind::Member { base, name, safe } => vec![
                leaf("name", name),
                safe.then(|| PrintableTree::leaf("safe")),
                labelled("base", base),
            ],
            TargetKind::Index { base, index } => {
                vec![labelled("base", base), labelled("index", index)]
            }
            TargetKind::Lambda { params, body } => vec![
                (!params.is_empty()).then(|| PrintableTree::field("parameters", params.join(", "))),
                nodes("body", body),
            ],
            TargetKind::IfExpr {
                condition,
                then_value,
                else_value,
            } => vec![
                labelled("condition", condition),
                labelled("then", then_value),
                labelled("else", else_value),
            ],
            TargetKind::Cast { kind, value, ty } => {
                vec![leaf("operator", kind.keyword()), leaf("type", ty), node(value)]
            }
        }
    }
}
