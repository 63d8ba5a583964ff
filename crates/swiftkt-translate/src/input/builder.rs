//! Maps generic [`RawNode`]s onto the typed Swift AST.
//!
//! Every known dump kind has one [`Constructor`] in a static table. Before a
//! constructor runs, [`validate`] checks the table's declared shape (required
//! attributes, child-count bounds). Constructors then check the finer
//! structure of their children *before* building any of them, so a broken
//! node yields exactly one diagnostic no matter how large its subtree is.
//!
//! The builder never fails: unknown kinds become [`SourceKind::Unknown`]
//! (warning), broken known kinds become [`SourceKind::Invalid`] (error).

use super::dump::RawNode;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::range::SourceRange;
use crate::swift::{
    Accessor, AccessorKind, Argument, CastKind, CatchClause, Condition, EnumCaseDecl, FunctionDecl,
    NodeTag, Param, SourceKind, SourceNode, SwiftType, SwitchCase, TypeDecl, VariableDecl,
    parse_type,
};
use std::collections::HashMap;
use std::sync::OnceLock;

type BuildFn = fn(&mut AstBuilder, RawNode) -> Result<SourceKind, String>;

/// One entry of the dispatch table.
pub struct Constructor {
    pub kind: &'static str,
    /// `None` for helper kinds that only appear inside a specific parent.
    pub tag: Option<NodeTag>,
    pub min_children: usize,
    pub max_children: Option<usize>,
    pub required: &'static [&'static str],
    pub build: BuildFn,
}

const fn entry(
    kind: &'static str,
    tag: Option<NodeTag>,
    min_children: usize,
    max_children: Option<usize>,
    required: &'static [&'static str],
    build: BuildFn,
) -> Constructor {
    Constructor {
        kind,
        tag,
        min_children,
        max_children,
        required,
        build,
    }
}

const ANY: Option<usize> = None;

static CONSTRUCTORS: &[Constructor] = &[
    // Declarations
    entry("source_file", Some(NodeTag::File), 0, ANY, &[], AstBuilder::build_file),
    entry("import_decl", Some(NodeTag::Import), 0, Some(0), &["module"], AstBuilder::build_import),
    entry("func_decl", Some(NodeTag::Function), 0, Some(2), &["name"], AstBuilder::build_function),
    entry("constructor_decl", Some(NodeTag::Initializer), 0, Some(2), &[], AstBuilder::build_initializer),
    entry("var_decl", Some(NodeTag::Variable), 0, Some(3), &["name"], AstBuilder::build_variable),
    entry("struct_decl", Some(NodeTag::Struct), 0, ANY, &["name"], AstBuilder::build_struct),
    entry("class_decl", Some(NodeTag::Class), 0, ANY, &["name"], AstBuilder::build_class),
    entry("protocol_decl", Some(NodeTag::Protocol), 0, ANY, &["name"], AstBuilder::build_protocol),
    entry("enum_decl", Some(NodeTag::Enum), 0, ANY, &["name"], AstBuilder::build_enum),
    entry("enum_element_decl", Some(NodeTag::EnumCase), 0, Some(2), &["name"], AstBuilder::build_enum_case),
    entry("extension_decl", Some(NodeTag::Extension), 0, ANY, &["type"], AstBuilder::build_extension),
    entry("typealias_decl", Some(NodeTag::TypeAlias), 0, Some(0), &["name", "type"], AstBuilder::build_typealias),
    // Statements
    entry("brace_stmt", Some(NodeTag::Block), 0, ANY, &[], AstBuilder::build_block),
    entry("return_stmt", Some(NodeTag::Return), 0, Some(1), &[], AstBuilder::build_return),
    entry("if_stmt", Some(NodeTag::If), 2, Some(3), &[], AstBuilder::build_if),
    entry("guard_stmt", Some(NodeTag::Guard), 2, Some(2), &[], AstBuilder::build_guard),
    entry("while_stmt", Some(NodeTag::While), 2, Some(2), &[], AstBuilder::build_while),
    entry("repeat_while_stmt", Some(NodeTag::RepeatWhile), 2, Some(2), &[], AstBuilder::build_repeat_while),
    entry("for_each_stmt", Some(NodeTag::ForEach), 2, Some(2), &["variable"], AstBuilder::build_for_each),
    entry("switch_stmt", Some(NodeTag::Switch), 1, ANY, &[], AstBuilder::build_switch),
    entry("break_stmt", Some(NodeTag::Break), 0, Some(0), &[], AstBuilder::build_break),
    entry("continue_stmt", Some(NodeTag::Continue), 0, Some(0), &[], AstBuilder::build_continue),
    entry("throw_stmt", Some(NodeTag::Throw), 1, Some(1), &[], AstBuilder::build_throw),
    entry("defer_stmt", Some(NodeTag::Defer), 1, Some(1), &[], AstBuilder::build_defer),
    entry("do_catch_stmt", Some(NodeTag::DoCatch), 1, ANY, &[], AstBuilder::build_do_catch),
    // Expressions
    entry("integer_literal_expr", Some(NodeTag::IntegerLiteral), 0, Some(0), &["value"], AstBuilder::build_integer),
    entry("float_literal_expr", Some(NodeTag::FloatLiteral), 0, Some(0), &["value"], AstBuilder::build_float),
    entry("boolean_literal_expr", Some(NodeTag::BooleanLiteral), 0, Some(0), &["value"], AstBuilder::build_boolean),
    entry("string_literal_expr", Some(NodeTag::StringLiteral), 0, Some(0), &["value"], AstBuilder::build_string),
    entry("interpolated_string_literal_expr", Some(NodeTag::InterpolatedString), 0, ANY, &[], AstBuilder::build_interpolated),
    entry("nil_literal_expr", Some(NodeTag::NilLiteral), 0, Some(0), &[], AstBuilder::build_nil),
    entry("declref_expr", Some(NodeTag::DeclRef), 0, Some(0), &["name"], AstBuilder::build_declref),
    entry("binary_expr", Some(NodeTag::Binary), 2, Some(2), &["operator"], AstBuilder::build_binary),
    entry("prefix_unary_expr", Some(NodeTag::PrefixUnary), 1, Some(1), &["operator"], AstBuilder::build_prefix_unary),
    entry("assign_expr", Some(NodeTag::Assign), 2, Some(2), &[], AstBuilder::build_assign),
    entry("call_expr", Some(NodeTag::Call), 1, ANY, &[], AstBuilder::build_call),
    entry("member_ref_expr", Some(NodeTag::Member), 1, Some(1), &["name"], AstBuilder::build_member),
    entry("implicit_member_expr", Some(NodeTag::ImplicitMember), 0, Some(0), &["name"], AstBuilder::build_implicit_member),
    entry("subscript_expr", Some(NodeTag::Subscript), 2, Some(2), &[], AstBuilder::build_subscript),
    entry("array_expr", Some(NodeTag::ArrayLiteral), 0, ANY, &[], AstBuilder::build_array),
    entry("dictionary_expr", Some(NodeTag::DictionaryLiteral), 0, ANY, &[], AstBuilder::build_dictionary),
    entry("tuple_expr", Some(NodeTag::Tuple), 0, ANY, &[], AstBuilder::build_tuple),
    entry("paren_expr", Some(NodeTag::Paren), 1, Some(1), &[], AstBuilder::build_paren),
    entry("closure_expr", Some(NodeTag::Closure), 1, Some(2), &[], AstBuilder::build_closure),
    entry("ternary_expr", Some(NodeTag::Ternary), 3, Some(3), &[], AstBuilder::build_ternary),
    entry("force_value_expr", Some(NodeTag::ForceUnwrap), 1, Some(1), &[], AstBuilder::build_force_unwrap),
    entry("bind_optional_expr", Some(NodeTag::BindOptional), 1, Some(1), &[], AstBuilder::build_bind_optional),
    entry("optional_evaluation_expr", Some(NodeTag::OptionalEvaluation), 1, Some(1), &[], AstBuilder::build_optional_evaluation),
    entry("coerce_expr", Some(NodeTag::Cast), 1, Some(1), &["type"], AstBuilder::build_coerce),
    entry("conditional_checked_cast_expr", Some(NodeTag::Cast), 1, Some(1), &["type"], AstBuilder::build_conditional_cast),
    entry("forced_checked_cast_expr", Some(NodeTag::Cast), 1, Some(1), &["type"], AstBuilder::build_forced_cast),
    entry("is_expr", Some(NodeTag::Cast), 1, Some(1), &["type"], AstBuilder::build_is),
    entry("try_expr", Some(NodeTag::Try), 1, Some(1), &[], AstBuilder::build_try),
    entry("optional_try_expr", Some(NodeTag::OptionalTry), 1, Some(1), &[], AstBuilder::build_optional_try),
    // Helper kinds, consumed by their parents
    entry("parameter_list", None, 0, ANY, &[], AstBuilder::build_misplaced),
    entry("parameter", None, 0, Some(1), &["name", "type"], AstBuilder::build_misplaced),
    entry("accessor_decl", None, 0, Some(1), &["kind"], AstBuilder::build_misplaced),
    entry("case_stmt", None, 1, ANY, &[], AstBuilder::build_misplaced),
    entry("catch_stmt", None, 1, Some(1), &[], AstBuilder::build_misplaced),
    entry("optional_binding", None, 1, Some(1), &["name"], AstBuilder::build_misplaced),
    entry("argument", None, 1, Some(1), &[], AstBuilder::build_misplaced),
];

/// The full dispatch table, in declaration order.
pub fn constructors() -> &'static [Constructor] {
    CONSTRUCTORS
}

/// Look up the constructor for a dump kind.
///
/// # Panics
///
/// On first use, if two table entries share a kind.
pub fn constructor_for(kind: &str) -> Option<&'static Constructor> {
    static INDEX: OnceLock<HashMap<&'static str, &'static Constructor>> = OnceLock::new();
    let index = INDEX.get_or_init(|| {
        let mut index = HashMap::with_capacity(CONSTRUCTORS.len());
        for constructor in CONSTRUCTORS {
            if index.insert(constructor.kind, constructor).is_some() {
                panic!("duplicate constructor for dump kind `{}`", constructor.kind);
            }
        }
        index
    });
    index.get(kind).copied()
}

/// Check required attributes and child-count bounds.
pub fn validate(constructor: &Constructor, raw: &RawNode) -> Result<(), String> {
    for key in constructor.required {
        if !raw.has(key) {
            return Err(format!("missing required attribute `{key}`"));
        }
    }
    let count = raw.children.len();
    if count < constructor.min_children {
        return Err(format!(
            "expected at least {} children, found {count}",
            constructor.min_children
        ));
    }
    if let Some(max) = constructor.max_children {
        if count > max {
            return Err(format!("expected at most {max} children, found {count}"));
        }
    }
    Ok(())
}

/// Build a typed tree, appending to `diagnostics`.
pub fn build_ast(raw: RawNode, diagnostics: &mut Diagnostics) -> SourceNode {
    let mut builder = AstBuilder::with_diagnostics(std::mem::take(diagnostics));
    let node = builder.build(raw);
    *diagnostics = builder.into_diagnostics();
    node
}

/// Owns the diagnostics list for the duration of a build.
#[derive(Default)]
pub struct AstBuilder {
    diagnostics: Diagnostics,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn build(&mut self, raw: RawNode) -> SourceNode {
        let range = raw.range.clone();
        tracing::trace!(kind = %raw.kind, "building node");

        let Some(constructor) = constructor_for(&raw.kind) else {
            self.diagnostics
                .push(Diagnostic::unrecognized(&raw.kind, range.clone()));
            let children = self.build_all(raw.children);
            let kind = SourceKind::Unknown {
                kind: raw.kind,
                children,
            };
            return SourceNode::new(kind, range);
        };

        if let Err(reason) = validate(constructor, &raw) {
            return self.invalid(raw.kind, reason, range);
        }
        let kind_name = raw.kind.clone();
        match (constructor.build)(self, raw) {
            Ok(kind) => SourceNode::new(kind, range),
            Err(reason) => self.invalid(kind_name, reason, range),
        }
    }

    fn invalid(&mut self, kind: String, reason: String, range: Option<SourceRange>) -> SourceNode {
        self.diagnostics
            .push(Diagnostic::malformed(&kind, &reason, range.clone()));
        SourceNode::new(SourceKind::Invalid { kind, reason }, range)
    }

    fn build_all(&mut self, children: Vec<RawNode>) -> Vec<SourceNode> {
        children.into_iter().map(|child| self.build(child)).collect()
    }

    fn build_boxed(&mut self, raw: RawNode) -> Box<SourceNode> {
        Box::new(self.build(raw))
    }

    // Declarations

    fn build_file(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::File(self.build_all(raw.children)))
    }

    fn build_import(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::Import {
            module: attr(&raw, "module")?,
        })
    }

    fn build_function(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let name = attr(&raw, "name")?;
        let result = optional_type(&raw, "result")?;
        let (is_static, is_mutating, throws, is_override) = (
            raw.has("static"),
            raw.has("mutating"),
            raw.has("throws"),
            raw.has("override"),
        );
        let (params, body) = self.signature(raw.children)?;
        Ok(SourceKind::Function(FunctionDecl {
            name,
            params,
            result,
            body,
            is_static,
            is_mutating,
            throws,
            is_override,
        }))
    }

    fn build_initializer(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let (params, body) = self.signature(raw.children)?;
        Ok(SourceKind::Initializer { params, body })
    }

    /// `parameter_list`? `brace_stmt`?, shared by functions and initializers.
    fn signature(
        &mut self,
        children: Vec<RawNode>,
    ) -> Result<(Vec<Param>, Option<Vec<SourceNode>>), String> {
        let mut list = None;
        let mut body = None;
        for child in children {
            match child.kind.as_str() {
                "parameter_list" if list.is_none() && body.is_none() => list = Some(child),
                "brace_stmt" if body.is_none() => body = Some(child),
                other => return Err(format!("unexpected child `{other}`")),
            }
        }
        let params = match list {
            Some(list) => self.parameters(list)?,
            None => Vec::new(),
        };
        Ok((params, body.map(|body| self.build_all(body.children))))
    }

    fn parameters(&mut self, list: RawNode) -> Result<Vec<Param>, String> {
        let mut shapes = Vec::with_capacity(list.children.len());
        for param in &list.children {
            if param.kind != "parameter" {
                return Err(format!("parameter list contains `{}`", param.kind));
            }
            let name = attr(param, "name")?;
            let ty = required_type(param, "type")?;
            let label = match param.attr("label") {
                Some("_") => None,
                Some(label) => Some(label.to_string()),
                None => Some(name.clone()),
            };
            if param.children.len() > 1 {
                return Err(format!("parameter `{name}` has more than one default value"));
            }
            if let Some(default) = param.children.first() {
                expect_expression(default)?;
            }
            shapes.push((label, name, ty));
        }

        Ok(shapes
            .into_iter()
            .zip(list.children)
            .map(|((label, name, ty), param)| Param {
                label,
                name,
                ty,
                default: param
                    .children
                    .into_iter()
                    .next()
                    .map(|default| self.build_boxed(default)),
            })
            .collect())
    }

    fn build_variable(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let name = attr(&raw, "name")?;
        let ty = optional_type(&raw, "type")?;
        let (is_let, is_static) = (raw.has("let"), raw.has("static"));

        let (accessors, rest): (Vec<RawNode>, Vec<RawNode>) = raw
            .children
            .into_iter()
            .partition(|child| child.kind == "accessor_decl");
        if rest.len() > 1 {
            return Err("more than one initializer".to_string());
        }
        if let Some(init) = rest.first() {
            expect_expression(init)?;
        }
        let mut kinds = Vec::with_capacity(accessors.len());
        for accessor in &accessors {
            let kind = match accessor.attr("kind") {
                Some("get") => AccessorKind::Get,
                Some("set") => AccessorKind::Set,
                Some(other) => return Err(format!("unknown accessor kind `{other}`")),
                None => return Err("accessor without `kind`".to_string()),
            };
            if kinds.contains(&kind) {
                return Err("duplicate accessor".to_string());
            }
            match accessor.children.as_slice() {
                [] => {}
                [body] if body.kind == "brace_stmt" => {}
                _ => return Err("accessor body must be a single `brace_stmt`".to_string()),
            }
            kinds.push(kind);
        }

        let init = rest.into_iter().next().map(|init| self.build_boxed(init));
        let accessors = kinds
            .into_iter()
            .zip(accessors)
            .map(|(kind, accessor)| Accessor {
                kind,
                body: accessor
                    .children
                    .into_iter()
                    .next()
                    .map(|body| self.build_all(body.children)),
            })
            .collect();
        Ok(SourceKind::Variable(VariableDecl {
            name,
            ty,
            is_let,
            is_static,
            init,
            accessors,
        }))
    }

    fn type_decl(&mut self, raw: RawNode) -> Result<TypeDecl, String> {
        let name = attr(&raw, "name")?;
        let inherits = raw
            .attr("inherits")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(TypeDecl {
            name,
            inherits,
            members: self.build_all(raw.children),
        })
    }

    fn build_struct(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.type_decl(raw).map(SourceKind::Struct)
    }

    fn build_class(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.type_decl(raw).map(SourceKind::Class)
    }

    fn build_protocol(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.type_decl(raw).map(SourceKind::Protocol)
    }

    fn build_enum(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.type_decl(raw).map(SourceKind::Enum)
    }

    fn build_enum_case(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let name = attr(&raw, "name")?;
        let mut list = None;
        let mut raw_value = None;
        for child in raw.children {
            if child.kind == "parameter_list" && list.is_none() {
                list = Some(child);
            } else if raw_value.is_none() {
                expect_expression(&child)?;
                raw_value = Some(child);
            } else {
                return Err(format!("unexpected child `{}`", child.kind));
            }
        }
        if list.is_some() && raw_value.is_some() {
            return Err("a case cannot have both associated and raw values".to_string());
        }
        let params = match list {
            Some(list) => self.parameters(list)?,
            None => Vec::new(),
        };
        Ok(SourceKind::EnumCase(EnumCaseDecl {
            name,
            params,
            raw_value: raw_value.map(|value| self.build_boxed(value)),
        }))
    }

    fn build_extension(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let extended = attr(&raw, "type")?;
        Ok(SourceKind::Extension {
            extended,
            members: self.build_all(raw.children),
        })
    }

    fn build_typealias(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::TypeAlias {
            name: attr(&raw, "name")?,
            ty: required_type(&raw, "type")?,
        })
    }

    // Statements

    fn build_block(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::Block(self.build_all(raw.children)))
    }

    fn build_return(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let mut children = raw.children.into_iter();
        let value = match children.next() {
            Some(value) => {
                expect_expression(&value)?;
                Some(self.build_boxed(value))
            }
            None => None,
        };
        Ok(SourceKind::Return(value))
    }

    fn build_if(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [condition, then_branch, rest @ ..] = raw.children.as_slice() else {
            return Err("expected a condition and a body".to_string());
        };
        check_condition(condition)?;
        expect_kind(then_branch, "brace_stmt")?;
        if let [else_branch] = rest {
            if !matches!(else_branch.kind.as_str(), "brace_stmt" | "if_stmt") {
                return Err(format!(
                    "else branch must be `brace_stmt` or `if_stmt`, found `{}`",
                    else_branch.kind
                ));
            }
        }

        let mut children = raw.children.into_iter();
        let (Some(condition), Some(then_branch)) = (children.next(), children.next()) else {
            return Err("expected a condition and a body".to_string());
        };
        let condition = self.condition(condition)?;
        let then_branch = self.build_all(then_branch.children);
        let else_branch = children.next().map(|branch| self.build_boxed(branch));
        Ok(SourceKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn build_guard(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [condition, else_branch] = raw.children.as_slice() else {
            return Err("expected a condition and an else body".to_string());
        };
        check_condition(condition)?;
        expect_kind(else_branch, "brace_stmt")?;

        let [condition, else_branch] = take_pair(raw.children)?;
        Ok(SourceKind::Guard {
            condition: self.condition(condition)?,
            else_branch: self.build_all(else_branch.children),
        })
    }

    fn build_while(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [condition, body] = raw.children.as_slice() else {
            return Err("expected a condition and a body".to_string());
        };
        expect_expression(condition)?;
        expect_kind(body, "brace_stmt")?;

        let [condition, body] = take_pair(raw.children)?;
        Ok(SourceKind::While {
            condition: self.build_boxed(condition),
            body: self.build_all(body.children),
        })
    }

    fn build_repeat_while(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [body, condition] = raw.children.as_slice() else {
            return Err("expected a body and a condition".to_string());
        };
        expect_kind(body, "brace_stmt")?;
        expect_expression(condition)?;

        let [body, condition] = take_pair(raw.children)?;
        Ok(SourceKind::RepeatWhile {
            body: self.build_all(body.children),
            condition: self.build_boxed(condition),
        })
    }

    fn build_for_each(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let variable = attr(&raw, "variable")?;
        let [sequence, body] = raw.children.as_slice() else {
            return Err("expected a sequence and a body".to_string());
        };
        expect_expression(sequence)?;
        expect_kind(body, "brace_stmt")?;

        let [sequence, body] = take_pair(raw.children)?;
        Ok(SourceKind::ForEach {
            variable,
            sequence: self.build_boxed(sequence),
            body: self.build_all(body.children),
        })
    }

    fn build_switch(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [subject, cases @ ..] = raw.children.as_slice() else {
            return Err("expected a subject".to_string());
        };
        expect_expression(subject)?;
        let mut seen_default = false;
        for case in cases {
            expect_kind(case, "case_stmt")?;
            let is_default = case.has("default");
            if is_default && seen_default {
                return Err("more than one `default` case".to_string());
            }
            seen_default |= is_default;
            let [patterns @ .., body] = case.children.as_slice() else {
                return Err("case without a body".to_string());
            };
            expect_kind(body, "brace_stmt")?;
            if patterns.is_empty() && !is_default {
                return Err("case without patterns".to_string());
            }
            for pattern in patterns {
                expect_expression(pattern)?;
            }
        }

        let mut children = raw.children.into_iter();
        let subject = match children.next() {
            Some(subject) => self.build_boxed(subject),
            None => return Err("expected a subject".to_string()),
        };
        let cases = children
            .map(|case| {
                let range = case.range;
                let mut parts = case.children;
                let body = parts.pop().map(|body| body.children).unwrap_or_default();
                SwitchCase {
                    patterns: self.build_all(parts),
                    body: self.build_all(body),
                    range,
                }
            })
            .collect();
        Ok(SourceKind::Switch { subject, cases })
    }

    fn build_break(&mut self, _raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::Break)
    }

    fn build_continue(&mut self, _raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::Continue)
    }

    fn build_throw(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::Throw)
    }

    fn build_defer(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let body = single_child(raw)?;
        expect_kind(&body, "brace_stmt")?;
        Ok(SourceKind::Defer(self.build_all(body.children)))
    }

    fn build_do_catch(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [body, catches @ ..] = raw.children.as_slice() else {
            return Err("expected a body".to_string());
        };
        expect_kind(body, "brace_stmt")?;
        if catches.is_empty() {
            return Err("expected at least one `catch_stmt`".to_string());
        }
        let mut types = Vec::with_capacity(catches.len());
        for clause in catches {
            expect_kind(clause, "catch_stmt")?;
            match clause.children.as_slice() {
                [body] => expect_kind(body, "brace_stmt")?,
                _ => return Err("catch clause must have exactly one body".to_string()),
            }
            types.push(optional_type(clause, "type")?);
        }

        let mut children = raw.children.into_iter();
        let body = children.next().map(|b| b.children).unwrap_or_default();
        let body = self.build_all(body);
        let catches = children
            .zip(types)
            .map(|(clause, ty)| {
                let name = clause.attr("name").map(String::from);
                let range = clause.range;
                let body = clause
                    .children
                    .into_iter()
                    .next()
                    .map(|body| body.children)
                    .unwrap_or_default();
                CatchClause {
                    name,
                    ty,
                    body: self.build_all(body),
                    range,
                }
            })
            .collect();
        Ok(SourceKind::DoCatch { body, catches })
    }

    fn condition(&mut self, raw: RawNode) -> Result<Condition, String> {
        if raw.kind != "optional_binding" {
            return Ok(Condition::Expr(self.build_boxed(raw)));
        }
        let name = attr(&raw, "name")?;
        let range = raw.range.clone();
        let value = single_child(raw)?;
        Ok(Condition::Binding {
            name,
            value: self.build_boxed(value),
            range,
        })
    }

    // Expressions

    fn single_expression(&mut self, raw: RawNode) -> Result<Box<SourceNode>, String> {
        let child = single_child(raw)?;
        expect_expression(&child)?;
        Ok(self.build_boxed(child))
    }

    fn expressions(&mut self, children: Vec<RawNode>) -> Result<Vec<SourceNode>, String> {
        for child in &children {
            expect_expression(child)?;
        }
        Ok(self.build_all(children))
    }

    fn build_integer(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let value = attr(&raw, "value")?;
        normalize_integer(&value)
            .map(SourceKind::IntegerLiteral)
            .ok_or_else(|| format!("`{value}` is not an integer"))
    }

    fn build_float(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let value = attr(&raw, "value")?;
        if value.replace('_', "").parse::<f64>().is_err() {
            return Err(format!("`{value}` is not a floating-point number"));
        }
        Ok(SourceKind::FloatLiteral(value))
    }

    fn build_boolean(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        match raw.attr("value") {
            Some("true") => Ok(SourceKind::BooleanLiteral(true)),
            Some("false") => Ok(SourceKind::BooleanLiteral(false)),
            Some(other) => Err(format!("`{other}` is not a boolean")),
            None => Err("missing required attribute `value`".to_string()),
        }
    }

    fn build_string(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::StringLiteral(attr(&raw, "value")?))
    }

    fn build_interpolated(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.expressions(raw.children)
            .map(SourceKind::InterpolatedString)
    }

    fn build_nil(&mut self, _raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::NilLiteral)
    }

    fn build_declref(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::DeclRef {
            name: attr(&raw, "name")?,
            ty: optional_type(&raw, "type")?,
        })
    }

    fn build_binary(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let operator = attr(&raw, "operator")?;
        let [lhs, rhs] = raw.children.as_slice() else {
            return Err("expected two operands".to_string());
        };
        expect_expression(lhs)?;
        expect_expression(rhs)?;
        let [lhs, rhs] = take_pair(raw.children)?;
        Ok(SourceKind::Binary {
            operator,
            lhs: self.build_boxed(lhs),
            rhs: self.build_boxed(rhs),
        })
    }

    fn build_prefix_unary(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let operator = attr(&raw, "operator")?;
        Ok(SourceKind::PrefixUnary {
            operator,
            operand: self.single_expression(raw)?,
        })
    }

    fn build_assign(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [target, value] = raw.children.as_slice() else {
            return Err("expected a target and a value".to_string());
        };
        expect_expression(target)?;
        expect_expression(value)?;
        let [target, value] = take_pair(raw.children)?;
        Ok(SourceKind::Assign {
            target: self.build_boxed(target),
            value: self.build_boxed(value),
        })
    }

    fn build_call(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [callee, arguments @ ..] = raw.children.as_slice() else {
            return Err("expected a callee".to_string());
        };
        expect_expression(callee)?;
        for argument in arguments {
            if argument.kind == "argument" {
                match argument.children.as_slice() {
                    [value] => expect_expression(value)?,
                    _ => return Err("argument must wrap exactly one expression".to_string()),
                }
            } else {
                expect_expression(argument)?;
            }
        }

        let mut children = raw.children.into_iter();
        let callee = match children.next() {
            Some(callee) => self.build_boxed(callee),
            None => return Err("expected a callee".to_string()),
        };
        let mut built = Vec::new();
        for argument in children {
            if argument.kind == "argument" {
                let label = argument
                    .attr("label")
                    .filter(|label| *label != "_")
                    .map(String::from);
                let value = single_child(argument)?;
                built.push(Argument {
                    label,
                    value: self.build(value),
                });
            } else {
                built.push(Argument {
                    label: None,
                    value: self.build(argument),
                });
            }
        }
        Ok(SourceKind::Call {
            callee,
            arguments: built,
        })
    }

    fn build_member(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let name = attr(&raw, "name")?;
        Ok(SourceKind::Member {
            name,
            base: self.single_expression(raw)?,
        })
    }

    fn build_implicit_member(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Ok(SourceKind::ImplicitMember {
            name: attr(&raw, "name")?,
            ty: optional_type(&raw, "type")?,
        })
    }

    fn build_subscript(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let [base, index] = raw.children.as_slice() else {
            return Err("expected a base and an index".to_string());
        };
        expect_expression(base)?;
        expect_expression(index)?;
        let [base, index] = take_pair(raw.children)?;
        Ok(SourceKind::Subscript {
            base: self.build_boxed(base),
            index: self.build_boxed(index),
        })
    }

    fn build_array(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.expressions(raw.children).map(SourceKind::ArrayLiteral)
    }

    fn build_dictionary(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        if raw.children.len() % 2 != 0 {
            return Err("expected alternating keys and values".to_string());
        }
        let mut items = self.expressions(raw.children)?.into_iter();
        let mut pairs = Vec::new();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            pairs.push((key, value));
        }
        Ok(SourceKind::DictionaryLiteral(pairs))
    }

    fn build_tuple(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.expressions(raw.children).map(SourceKind::Tuple)
    }

    fn build_paren(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::Paren)
    }

    fn build_closure(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let (list, body) = match raw.children.as_slice() {
            [body] => (None, body),
            [list, body] => {
                expect_kind(list, "parameter_list")?;
                (Some(list), body)
            }
            _ => return Err("expected parameters and a body".to_string()),
        };
        let mut params = Vec::new();
        for param in list.map(|list| list.children.as_slice()).unwrap_or_default() {
            expect_kind(param, "parameter")?;
            params.push(attr(param, "name")?);
        }
        if body.kind != "brace_stmt" {
            expect_expression(body)?;
        }

        let Some(body) = raw.children.into_iter().last() else {
            return Err("expected a body".to_string());
        };
        let body = if body.kind == "brace_stmt" {
            self.build_all(body.children)
        } else {
            let value = self.build(body);
            let range = value.range.clone();
            vec![SourceNode::new(SourceKind::Return(Some(Box::new(value))), range)]
        };
        Ok(SourceKind::Closure { params, body })
    }

    fn build_ternary(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        let mut parts = self.expressions(raw.children)?.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(condition), Some(then_value), Some(else_value)) => Ok(SourceKind::Ternary {
                condition: Box::new(condition),
                then_value: Box::new(then_value),
                else_value: Box::new(else_value),
            }),
            _ => Err("expected a condition and two values".to_string()),
        }
    }

    fn build_force_unwrap(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::ForceUnwrap)
    }

    fn build_bind_optional(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::BindOptional)
    }

    fn build_optional_evaluation(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw)
            .map(SourceKind::OptionalEvaluation)
    }

    fn cast(&mut self, raw: RawNode, kind: CastKind) -> Result<SourceKind, String> {
        let ty = required_type(&raw, "type")?;
        Ok(SourceKind::Cast {
            kind,
            value: self.single_expression(raw)?,
            ty,
        })
    }

    fn build_coerce(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.cast(raw, CastKind::Coerce)
    }

    fn build_conditional_cast(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.cast(raw, CastKind::Conditional)
    }

    fn build_forced_cast(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.cast(raw, CastKind::Forced)
    }

    fn build_is(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.cast(raw, CastKind::Check)
    }

    fn build_try(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::Try)
    }

    fn build_optional_try(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        self.single_expression(raw).map(SourceKind::OptionalTry)
    }

    fn build_misplaced(&mut self, raw: RawNode) -> Result<SourceKind, String> {
        Err(format!(
            "`{}` is only valid inside its parent construct",
            raw.kind
        ))
    }
}

fn attr(raw: &RawNode, key: &str) -> Result<String, String> {
    raw.attr(key)
        .map(String::from)
        .ok_or_else(|| format!("missing required attribute `{key}`"))
}

fn required_type(raw: &RawNode, key: &str) -> Result<SwiftType, String> {
    let text = attr(raw, key)?;
    parse_type(&text).map_err(|err| err.to_string())
}

fn optional_type(raw: &RawNode, key: &str) -> Result<Option<SwiftType>, String> {
    match raw.attr(key) {
        Some(text) => parse_type(text).map(Some).map_err(|err| err.to_string()),
        None => Ok(None),
    }
}

fn single_child(raw: RawNode) -> Result<RawNode, String> {
    let count = raw.children.len();
    let mut children = raw.children.into_iter();
    match (children.next(), count) {
        (Some(child), 1) => Ok(child),
        _ => Err(format!("expected exactly one child, found {count}")),
    }
}

fn take_pair(children: Vec<RawNode>) -> Result<[RawNode; 2], String> {
    let count = children.len();
    children
        .try_into()
        .map_err(|_| format!("expected exactly two children, found {count}"))
}

fn expect_kind(raw: &RawNode, kind: &str) -> Result<(), String> {
    if raw.kind == kind {
        Ok(())
    } else {
        Err(format!("expected `{kind}`, found `{}`", raw.kind))
    }
}

/// Unknown kinds pass: they become passthrough placeholders.
fn expect_expression(raw: &RawNode) -> Result<(), String> {
    match constructor_for(&raw.kind) {
        Some(constructor) if !constructor.tag.is_some_and(NodeTag::is_expression) => {
            Err(format!("expected an expression, found `{}`", raw.kind))
        }
        _ => Ok(()),
    }
}

fn check_condition(raw: &RawNode) -> Result<(), String> {
    if raw.kind != "optional_binding" {
        return expect_expression(raw);
    }
    if !raw.has("name") {
        return Err("optional binding without `name`".to_string());
    }
    match raw.children.as_slice() {
        [value] => expect_expression(value),
        _ => Err("optional binding must bind exactly one value".to_string()),
    }
}

/// Accepts decimal, `0x`, `0b` and `0o` literals with `_` separators.
/// Octal is rewritten to decimal; everything else is kept verbatim.
fn normalize_integer(text: &str) -> Option<String> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (radix, body) = match digits.get(..2) {
        Some("0x") => (16, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        _ => (10, digits),
    };
    let cleaned = body.replace('_', "");
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if radix == 8 {
        let value = u128::from_str_radix(&cleaned, 8).ok()?;
        return Some(format!("{sign}{value}"));
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, Severity};
    use crate::input::dump::parse_dump;

    fn build(source: &str) -> (SourceNode, Diagnostics) {
        let raw = parse_dump(source, "main.swift").unwrap();
        let mut diagnostics = Diagnostics::new();
        let node = build_ast(raw, &mut diagnostics);
        (node, diagnostics)
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for constructor in constructors() {
            assert!(seen.insert(constructor.kind), "{}", constructor.kind);
        }
        assert!(constructor_for("func_decl").is_some());
        assert!(constructor_for("FutureConstruct").is_none());
    }

    #[test]
    fn test_empty_function() {
        let (node, diagnostics) =
            build("(source_file (func_decl name=\"foo\" (parameter_list) (brace_stmt)))");
        assert!(diagnostics.is_empty());
        let SourceKind::File(items) = node.kind else {
            panic!("expected a file");
        };
        let SourceKind::Function(func) = &items[0].kind else {
            panic!("expected a function");
        };
        assert_eq!(func.name, "foo");
        assert!(func.params.is_empty());
        assert_eq!(func.body.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_parameters_and_labels() {
        let (node, diagnostics) = build(
            r#"(func_decl name="add" result="Int"
                 (parameter_list
                   (parameter name="a" type="Int" label="_")
                   (parameter name="b" type="Int" label="to" (integer_literal_expr value=1)))
                 (brace_stmt))"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let SourceKind::Function(func) = node.kind else {
            panic!("expected a function");
        };
        assert_eq!(func.params[0].label, None);
        assert_eq!(func.params[1].label.as_deref(), Some("to"));
        assert!(func.params[1].default.is_some());
        assert_eq!(func.result, Some(SwiftType::named("Int")));
    }

    #[test]
    fn test_unknown_kind_is_passthrough() {
        let (node, diagnostics) = build(
            "(source_file (FutureConstruct (integer_literal_expr value=1)) (break_stmt))",
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.kind, DiagnosticKind::UnrecognizedConstruct);

        let SourceKind::File(items) = node.kind else {
            panic!("expected a file");
        };
        let SourceKind::Unknown { kind, children } = &items[0].kind else {
            panic!("expected an unknown placeholder");
        };
        assert_eq!(kind, "FutureConstruct");
        assert_eq!(children[0].tag(), NodeTag::IntegerLiteral);
        assert_eq!(items[1].tag(), NodeTag::Break);
    }

    #[test]
    fn test_malformed_node_is_contained() {
        let (node, diagnostics) = build(
            "(source_file (break_stmt) (func_decl [main.swift:2:1 - line:2:9] (brace_stmt (FutureConstruct))) (continue_stmt))",
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::MalformedConstruct);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(
            diagnostic.message,
            "malformed `func_decl`: missing required attribute `name`"
        );

        let SourceKind::File(items) = node.kind else {
            panic!("expected a file");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].tag(), NodeTag::Invalid);
        assert_eq!(items[1].range.as_ref().map(|r| r.start_line), Some(2));
        assert_eq!(items[2].tag(), NodeTag::Continue);
    }

    #[test]
    fn test_arity_is_checked() {
        let (node, diagnostics) = build("(binary_expr operator=\"+\" (integer_literal_expr value=1))");
        assert_eq!(node.tag(), NodeTag::Invalid);
        assert!(diagnostics.as_slice()[0]
            .message
            .contains("expected at least 2 children, found 1"));
    }

    #[test]
    fn test_literal_values_are_checked() {
        let (node, _) = build("(integer_literal_expr value=\"12a\")");
        assert_eq!(node.tag(), NodeTag::Invalid);
        let (node, _) = build("(float_literal_expr value=\"1.5e3\")");
        assert_eq!(node.kind, SourceKind::FloatLiteral("1.5e3".to_string()));
        let (node, _) = build("(integer_literal_expr value=\"0o17\")");
        assert_eq!(node.kind, SourceKind::IntegerLiteral("15".to_string()));
        let (node, _) = build("(integer_literal_expr value=\"1_000\")");
        assert_eq!(node.kind, SourceKind::IntegerLiteral("1_000".to_string()));
    }

    #[test]
    fn test_bad_type_string_is_malformed() {
        let (node, diagnostics) = build("(declref_expr name=x type=\"[Int\")");
        assert_eq!(node.tag(), NodeTag::Invalid);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_statement_where_expression_expected() {
        let (node, diagnostics) = build("(return_stmt (break_stmt))");
        assert_eq!(node.tag(), NodeTag::Invalid);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_if_let_and_else_if() {
        let (node, diagnostics) = build(
            r#"(if_stmt
                 (optional_binding name="x" (declref_expr name="y"))
                 (brace_stmt)
                 (if_stmt (boolean_literal_expr value=true) (brace_stmt)))"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let SourceKind::If {
            condition,
            else_branch,
            ..
        } = node.kind
        else {
            panic!("expected an if");
        };
        assert!(matches!(condition, Condition::Binding { ref name, .. } if name == "x"));
        assert_eq!(else_branch.map(|b| b.tag()), Some(NodeTag::If));
    }

    #[test]
    fn test_switch_cases() {
        let (node, diagnostics) = build(
            r#"(switch_stmt (declref_expr name="d")
                 (case_stmt (implicit_member_expr name="north") (brace_stmt (break_stmt)))
                 (case_stmt default (brace_stmt)))"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let SourceKind::Switch { cases, .. } = node.kind else {
            panic!("expected a switch");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].patterns.len(), 1);
        assert!(cases[1].patterns.is_empty());
    }

    #[test]
    fn test_helper_kind_alone_is_malformed() {
        let (node, diagnostics) = build("(parameter_list)");
        assert_eq!(node.tag(), NodeTag::Invalid);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_variable_with_accessors() {
        let (node, diagnostics) = build(
            r#"(var_decl name="area" type="Double"
                 (accessor_decl kind=get (brace_stmt (return_stmt (float_literal_expr value=1.0)))))"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let SourceKind::Variable(var) = node.kind else {
            panic!("expected a variable");
        };
        assert!(!var.is_stored());
        assert_eq!(var.accessors[0].kind, AccessorKind::Get);
    }

    #[test]
    fn test_single_expression_closure() {
        let (node, diagnostics) = build(
            r#"(closure_expr (parameter_list (parameter name="x")) (declref_expr name="x"))"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let SourceKind::Closure { params, body } = node.kind else {
            panic!("expected a closure");
        };
        assert_eq!(params, vec!["x".to_string()]);
        assert_eq!(body[0].tag(), NodeTag::Return);
    }
}
