//! Expression rewriting.

use super::rules::{self, ArgumentStyle, CallSite, EnumRepresentation};
use super::{CaseStyle, Scope, Translator, is_assignment_operator};
use crate::kotlin::{
    Argument as KotlinArgument, BinaryOp, CastKind as KotlinCast, Literal, TargetKind, TargetNode,
    TemplatePart, UnaryOp,
};
use crate::range::SourceRange;
use crate::swift::{Argument, CastKind, SourceKind, SourceNode, SwiftType};

/// Swift initializers that convert between builtin types, with the Kotlin
/// conversion function and its string-parsing variant.
const CONVERSIONS: &[(&str, &str, &str)] = &[
    ("Int", "toInt", "toIntOrNull"),
    ("Int64", "toLong", "toLongOrNull"),
    ("Double", "toDouble", "toDoubleOrNull"),
    ("Float", "toFloat", "toFloatOrNull"),
    ("String", "toString", "toString"),
];

/// Collection and string methods whose Kotlin name differs.
const METHOD_RENAMES: &[(&str, &str)] = &[
    ("append", "add"),
    ("compactMap", "mapNotNull"),
    ("hasPrefix", "startsWith"),
    ("hasSuffix", "endsWith"),
    ("joined", "joinToString"),
    ("lowercased", "lowercase"),
    ("reduce", "fold"),
    ("uppercased", "uppercase"),
];

pub(super) fn binary_operator(operator: &str) -> Option<BinaryOp> {
    Some(match operator {
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Rem,
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "..." => BinaryOp::RangeTo,
        "..<" => BinaryOp::Until,
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "^" => BinaryOp::Xor,
        "<<" => BinaryOp::Shl,
        ">>" => BinaryOp::Shr,
        "??" => BinaryOp::Elvis,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "===" => BinaryOp::Identical,
        "!==" => BinaryOp::NotIdentical,
        "&&" => BinaryOp::Conj,
        "||" => BinaryOp::Disj,
        _ => return None,
    })
}

fn call(callee: TargetNode, args: Vec<TargetNode>, range: Option<SourceRange>) -> TargetNode {
    TargetNode::call(callee, args, range)
}

fn method(base: TargetNode, name: &str, safe: bool, range: Option<SourceRange>) -> TargetNode {
    TargetNode::new(
        TargetKind::Member {
            base: Box::new(base),
            name: name.to_string(),
            safe,
        },
        range,
    )
}

fn lambda(params: Vec<String>, body: Vec<TargetNode>, range: Option<SourceRange>) -> TargetNode {
    TargetNode::new(TargetKind::Lambda { params, body }, range)
}

/// `$0` becomes `it`, `$N` becomes `itN`.
fn anonymous_index(name: &str) -> Option<usize> {
    name.strip_prefix('$')?.parse().ok()
}

fn anonymous_name(index: usize) -> String {
    if index == 0 {
        "it".to_string()
    } else {
        format!("it{index}")
    }
}

fn argument_labels(arguments: &[Argument]) -> Vec<Option<&str>> {
    arguments.iter().map(|arg| arg.label.as_deref()).collect()
}

impl Translator<'_> {
    /// Translate a node in value position.
    pub(super) fn translate_expr(&mut self, node: &SourceNode) -> TargetNode {
        let range = node.range.clone();
        match &node.kind {
            SourceKind::IntegerLiteral(value) => {
                TargetNode::literal(Literal::Int(value.clone()), range)
            }
            SourceKind::FloatLiteral(value) => {
                TargetNode::literal(Literal::Double(value.clone()), range)
            }
            SourceKind::BooleanLiteral(value) => TargetNode::literal(Literal::Bool(*value), range),
            SourceKind::StringLiteral(value) => {
                TargetNode::literal(Literal::String(value.clone()), range)
            }
            SourceKind::InterpolatedString(segments) => {
                let parts = segments
                    .iter()
                    .map(|segment| match &segment.kind {
                        SourceKind::StringLiteral(text) => TemplatePart::Text(text.clone()),
                        _ => TemplatePart::Expr(self.translate_expr(segment)),
                    })
                    .collect();
                TargetNode::new(TargetKind::Template(parts), range)
            }
            SourceKind::NilLiteral => TargetNode::literal(Literal::Null, range),
            SourceKind::DeclRef { name, .. } => self.translate_declref(name, range),
            SourceKind::Binary { operator, lhs, rhs } => {
                self.translate_binary(operator, lhs, rhs, range)
            }
            SourceKind::PrefixUnary { operator, operand } => {
                self.translate_prefix(operator, operand, range)
            }
            SourceKind::Assign { .. } => self.untranslatable(
                "assignment used as a value",
                "Kotlin assignments are not expressions",
                range,
            ),
            SourceKind::Call { callee, arguments } => self.translate_call(callee, arguments, range),
            SourceKind::Member { base, name } => self.translate_member(base, name, range),
            SourceKind::ImplicitMember { name, ty } => {
                self.translate_implicit_member(name, ty.as_ref(), range)
            }
            SourceKind::Subscript { base, index } => {
                let index = self.translate_expr(index);
                match &base.kind {
                    SourceKind::BindOptional(inner) => {
                        let inner = self.translate_expr(inner);
                        call(method(inner, "get", true, range.clone()), vec![index], range)
                    }
                    _ => {
                        let base = self.translate_expr(base);
                        TargetNode::new(
                            TargetKind::Index {
                                base: Box::new(base),
                                index: Box::new(index),
                            },
                            range,
                        )
                    }
                }
            }
            SourceKind::ArrayLiteral(items) => {
                let items = items.iter().map(|item| self.translate_value(item)).collect();
                call(TargetNode::name("mutableListOf", range.clone()), items, range)
            }
            SourceKind::DictionaryLiteral(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| {
                        let key = self.translate_expr(key);
                        let value = self.translate_value(value);
                        TargetNode::binary(BinaryOp::To, key, value, range.clone())
                    })
                    .collect();
                call(TargetNode::name("mutableMapOf", range.clone()), pairs, range)
            }
            SourceKind::Tuple(items) => self.translate_tuple(items, range),
            SourceKind::Paren(inner)
            | SourceKind::BindOptional(inner)
            | SourceKind::OptionalEvaluation(inner)
            | SourceKind::Try(inner) => self.translate_expr(inner),
            SourceKind::Closure { params, body } => self.translate_closure(params, body, range),
            SourceKind::Ternary {
                condition,
                then_value,
                else_value,
            } => {
                let condition = self.translate_expr(condition);
                let then_value = self.translate_value(then_value);
                let else_value = self.translate_value(else_value);
                TargetNode::new(
                    TargetKind::IfExpr {
                        condition: Box::new(condition),
                        then_value: Box::new(then_value),
                        else_value: Box::new(else_value),
                    },
                    range,
                )
            }
            SourceKind::ForceUnwrap(inner) => {
                let inner = self.translate_expr(inner);
                TargetNode::new(TargetKind::NotNullAssert(Box::new(inner)), range)
            }
            SourceKind::Cast { kind, value, ty } => {
                let kind = match kind {
                    CastKind::Coerce | CastKind::Forced => KotlinCast::As,
                    CastKind::Conditional => KotlinCast::SafeAs,
                    CastKind::Check => KotlinCast::Is,
                };
                let value = self.translate_expr(value);
                let ty = self.kotlin_type(ty, range.as_ref());
                TargetNode::new(
                    TargetKind::Cast {
                        kind,
                        value: Box::new(value),
                        ty,
                    },
                    range,
                )
            }
            SourceKind::OptionalTry(inner) => {
                let inner = self.translate_expr(inner);
                let attempt = TargetNode::new(
                    TargetKind::Call {
                        callee: Box::new(TargetNode::name("runCatching", range.clone())),
                        args: Vec::new(),
                        trailing_lambda: Some(Box::new(lambda(Vec::new(), vec![inner], range.clone()))),
                    },
                    range.clone(),
                );
                call(method(attempt, "getOrNull", false, range.clone()), Vec::new(), range)
            }

            SourceKind::Invalid { kind, reason } => {
                TargetNode::comment(format!("invalid `{kind}`: {reason}"), range)
            }
            SourceKind::Unknown { kind, .. } => {
                TargetNode::comment(format!("unrecognized construct: {kind}"), range)
            }

            SourceKind::File(_)
            | SourceKind::Import { .. }
            | SourceKind::Function(_)
            | SourceKind::Initializer { .. }
            | SourceKind::Variable(_)
            | SourceKind::Struct(_)
            | SourceKind::Class(_)
            | SourceKind::Protocol(_)
            | SourceKind::Enum(_)
            | SourceKind::EnumCase(_)
            | SourceKind::Extension { .. }
            | SourceKind::TypeAlias { .. }
            | SourceKind::Block(_)
            | SourceKind::Return(_)
            | SourceKind::If { .. }
            | SourceKind::Guard { .. }
            | SourceKind::While { .. }
            | SourceKind::RepeatWhile { .. }
            | SourceKind::ForEach { .. }
            | SourceKind::Switch { .. }
            | SourceKind::Break
            | SourceKind::Continue
            | SourceKind::Throw(_)
            | SourceKind::Defer(_)
            | SourceKind::DoCatch { .. } => self.untranslatable(
                &format!("{} used as a value", node.tag().label().to_lowercase()),
                "only expressions can appear here",
                range,
            ),
        }
    }

    /// Translate an expression whose value is stored or passed on.
    ///
    /// Struct values are copied on assignment in Swift; a data class needs
    /// an explicit `.copy()` to keep that.
    pub(super) fn translate_value(&mut self, node: &SourceNode) -> TargetNode {
        let translated = self.translate_expr(node);
        let is_reference = matches!(
            node.kind,
            SourceKind::DeclRef { .. } | SourceKind::Member { .. } | SourceKind::Subscript { .. }
        );
        if !is_reference {
            return translated;
        }
        let Some(ty) = self.type_of(node) else {
            return translated;
        };
        let Some(name) = ty.name() else {
            return translated;
        };
        let resolved = self.registry.resolve(name).to_string();
        match self
            .registry
            .struct_info(&resolved)
            .map(|info| info.representation)
        {
            Some(rules::StructRepresentation::DataClass) => {
                let range = translated.range.clone();
                call(method(translated, "copy", false, range.clone()), Vec::new(), range)
            }
            Some(rules::StructRepresentation::ClassWithEquality) => {
                self.mismatch(
                    format!("value of struct `{resolved}` is shared by reference instead of copied"),
                    node.range.clone(),
                );
                translated
            }
            None => translated,
        }
    }

    fn translate_declref(&mut self, name: &str, range: Option<SourceRange>) -> TargetNode {
        if let Some(index) = anonymous_index(name) {
            if self.closure_depth > 0 {
                self.anonymous_max = Some(self.anonymous_max.map_or(index, |max| max.max(index)));
                return TargetNode::name(anonymous_name(index), range);
            }
        }
        let name = self.local_rename(name).unwrap_or(name).to_string();
        TargetNode::name(self.names.identifier(&name), range)
    }

    fn translate_binary(
        &mut self,
        operator: &str,
        lhs: &SourceNode,
        rhs: &SourceNode,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if is_assignment_operator(operator) {
            return self.untranslatable(
                &format!("`{operator}` used as a value"),
                "Kotlin assignments are not expressions",
                range,
            );
        }
        let Some(op) = binary_operator(operator) else {
            return self.untranslatable(
                &format!("operator `{operator}`"),
                "no matching Kotlin operator",
                range,
            );
        };
        let lhs = self.translate_expr(lhs);
        let rhs = self.translate_expr(rhs);
        TargetNode::binary(op, lhs, rhs, range)
    }

    fn translate_prefix(
        &mut self,
        operator: &str,
        operand: &SourceNode,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let op = match operator {
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            "!" => UnaryOp::Not,
            "~" => {
                let operand = self.translate_expr(operand);
                return call(method(operand, "inv", false, range.clone()), Vec::new(), range);
            }
            _ => {
                return self.untranslatable(
                    &format!("prefix operator `{operator}`"),
                    "no matching Kotlin operator",
                    range,
                );
            }
        };
        let operand = self.translate_expr(operand);
        TargetNode::new(
            TargetKind::Unary {
                op,
                operand: Box::new(operand),
            },
            range,
        )
    }

    fn translate_tuple(&mut self, items: &[SourceNode], range: Option<SourceRange>) -> TargetNode {
        match items {
            [] => TargetNode::name("Unit", range),
            [single] => self.translate_expr(single),
            [_, _] | [_, _, _] => {
                let callee = if items.len() == 2 { "Pair" } else { "Triple" };
                let items = items.iter().map(|item| self.translate_value(item)).collect();
                call(TargetNode::name(callee, range.clone()), items, range)
            }
            _ => self.untranslatable(
                &format!("tuple of {} elements", items.len()),
                "Kotlin only has Pair and Triple",
                range,
            ),
        }
    }

    fn translate_closure(
        &mut self,
        params: &[String],
        body: &[SourceNode],
        range: Option<SourceRange>,
    ) -> TargetNode {
        self.closure_depth += 1;
        let outer_anonymous = self.anonymous_max.take();
        let in_case = std::mem::replace(&mut self.in_case_body, false);
        self.enter_scope();
        for param in params {
            self.declare(param, None);
        }

        let mut out = Vec::with_capacity(body.len());
        if let Some((last, rest)) = body.split_last() {
            out.extend(self.statements(rest));
            match &last.kind {
                SourceKind::Return(Some(value)) => out.push(self.translate_value(value)),
                SourceKind::Return(None) => {}
                _ => out.extend(self.translate_node(last)),
            }
        }

        let mut params: Vec<String> = params
            .iter()
            .map(|param| self.names.identifier(param))
            .collect();
        if params.is_empty() {
            if let Some(max) = self.anonymous_max {
                params = (0..=max).map(anonymous_name).collect();
            }
        }
        self.exit_scope();
        self.in_case_body = in_case;
        self.anonymous_max = outer_anonymous;
        self.closure_depth -= 1;
        lambda(params, out, range)
    }

    // Calls

    fn translate_call(
        &mut self,
        callee: &SourceNode,
        arguments: &[Argument],
        range: Option<SourceRange>,
    ) -> TargetNode {
        match &callee.kind {
            SourceKind::DeclRef { name, .. } if name == "print" && !self.registry.is_type(name) => {
                return self.translate_print(arguments, range);
            }
            SourceKind::DeclRef { name, .. } if !self.registry.is_type(name) => {
                let conversion = CONVERSIONS.iter().find(|(swift, ..)| *swift == name.as_str());
                if let (Some((_, convert, parse)), [argument]) = (conversion, arguments) {
                    if argument.label.is_none() {
                        let is_text = self
                            .type_of(&argument.value)
                            .is_some_and(|ty| ty.non_optional().is_string());
                        let value = self.translate_expr(&argument.value);
                        let function = if is_text { *parse } else { *convert };
                        return call(method(value, function, false, range.clone()), Vec::new(), range);
                    }
                }
            }
            SourceKind::DeclRef { name, .. } => {
                let resolved = self.registry.resolve(name).to_string();
                if let Some(lookup) = self.raw_value_lookup(&resolved, arguments, range.clone()) {
                    return lookup;
                }
                let labels = argument_labels(arguments);
                let names = self.registry.argument_names(&resolved, &labels);
                let callee = TargetNode::name(self.names.identifier(name), callee.range.clone());
                return self.finish_call(callee, arguments, names, range);
            }
            SourceKind::Member { base, name } => {
                if let Some((enum_name, case)) = self.enum_case_pattern(callee) {
                    let labels = argument_labels(arguments);
                    let names = self.registry.case_argument_names(&enum_name, &case, &labels);
                    let callee = self.enum_case_ref(&enum_name, &case, callee.range.clone());
                    return self.finish_call(callee, arguments, names, range);
                }
                if let Some(renamed) = self.rename_method(base, name, arguments, range.clone()) {
                    return renamed;
                }
            }
            SourceKind::ImplicitMember { .. } => {
                if let Some((enum_name, case)) = self.enum_case_pattern(callee) {
                    let labels = argument_labels(arguments);
                    let names = self.registry.case_argument_names(&enum_name, &case, &labels);
                    let callee = self.enum_case_ref(&enum_name, &case, callee.range.clone());
                    return self.finish_call(callee, arguments, names, range);
                }
            }
            _ => {}
        }
        let callee = self.translate_expr(callee);
        self.finish_call(callee, arguments, None, range)
    }

    /// Attach arguments, lifting a final closure into a trailing lambda.
    /// `names` are the callee's parameter names, one per argument, when known.
    fn finish_call(
        &mut self,
        callee: TargetNode,
        arguments: &[Argument],
        names: Option<Vec<String>>,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let site = CallSite {
            params_known: names.is_some(),
            has_labels: arguments.iter().any(|arg| arg.label.is_some()),
        };
        let names = match rules::argument_style(&site) {
            ArgumentStyle::Named => names.unwrap_or_default(),
            ArgumentStyle::Positional => Vec::new(),
        };

        let (arguments, trailing) = match arguments.split_last() {
            Some((last, rest)) if matches!(last.value.kind, SourceKind::Closure { .. }) => {
                (rest, Some(self.translate_expr(&last.value)))
            }
            _ => (arguments, None),
        };
        let args = arguments
            .iter()
            .enumerate()
            .map(|(index, arg)| KotlinArgument {
                name: names.get(index).map(|name| self.names.identifier(name)),
                value: self.translate_value(&arg.value),
            })
            .collect();
        TargetNode::new(
            TargetKind::Call {
                callee: Box::new(callee),
                args,
                trailing_lambda: trailing.map(Box::new),
            },
            range,
        )
    }

    fn translate_print(&mut self, arguments: &[Argument], range: Option<SourceRange>) -> TargetNode {
        let mut function = "println";
        let mut values = Vec::new();
        for argument in arguments {
            match argument.label.as_deref() {
                None => values.push(&argument.value),
                Some("terminator")
                    if matches!(&argument.value.kind, SourceKind::StringLiteral(s) if s.is_empty()) =>
                {
                    function = "print";
                }
                Some(label) => self.mismatch(
                    format!("`print` argument `{label}` is dropped"),
                    argument.value.range.clone(),
                ),
            }
        }
        let args = match values.as_slice() {
            [] => Vec::new(),
            [single] => vec![self.translate_expr(single)],
            many => {
                let mut parts = Vec::with_capacity(many.len() * 2);
                for (i, value) in many.iter().enumerate() {
                    if i > 0 {
                        parts.push(TemplatePart::Text(" ".to_string()));
                    }
                    parts.push(TemplatePart::Expr(self.translate_expr(value)));
                }
                vec![TargetNode::new(TargetKind::Template(parts), range.clone())]
            }
        };
        call(TargetNode::name(function, range.clone()), args, range)
    }

    /// `Direction(rawValue: x)` on an enum class looks the entry up by value.
    fn raw_value_lookup(
        &mut self,
        enum_name: &str,
        arguments: &[Argument],
        range: Option<SourceRange>,
    ) -> Option<TargetNode> {
        let info = self.registry.enum_info(enum_name)?;
        if info.representation != EnumRepresentation::EnumClass {
            return None;
        }
        let [argument] = arguments else {
            return None;
        };
        if argument.label.as_deref() != Some("rawValue") {
            return None;
        }
        let value = self.translate_expr(&argument.value);
        let entries = call(
            method(
                TargetNode::name(self.names.identifier(enum_name), range.clone()),
                "values",
                false,
                range.clone(),
            ),
            Vec::new(),
            range.clone(),
        );
        let test = TargetNode::binary(
            BinaryOp::Eq,
            TargetNode::member(TargetNode::name("it", range.clone()), "rawValue", range.clone()),
            value,
            range.clone(),
        );
        Some(TargetNode::new(
            TargetKind::Call {
                callee: Box::new(method(entries, "firstOrNull", false, range.clone())),
                args: Vec::new(),
                trailing_lambda: Some(Box::new(lambda(Vec::new(), vec![test], range.clone()))),
            },
            range,
        ))
    }

    /// Collection and string methods with a different Kotlin name or shape.
    fn rename_method(
        &mut self,
        base: &SourceNode,
        name: &str,
        arguments: &[Argument],
        range: Option<SourceRange>,
    ) -> Option<TargetNode> {
        let (target, safe) = match &base.kind {
            SourceKind::BindOptional(inner) => (inner.as_ref(), true),
            _ => (base, false),
        };
        let base_type = self.type_of(target);
        let is_text = base_type
            .as_ref()
            .is_some_and(|ty| ty.non_optional().is_string());
        let labels = argument_labels(arguments);

        let (kotlin, reorder) = match (name, labels.as_slice()) {
            ("removeAll", []) => ("clear", false),
            ("remove", [Some("at")]) => ("removeAt", false),
            ("insert", [None, Some("at")]) => ("add", true),
            ("append", _) if is_text => return None,
            _ => {
                let (_, renamed) = METHOD_RENAMES.iter().find(|(swift, _)| *swift == name)?;
                (*renamed, false)
            }
        };

        let receiver = self.translate_expr(target);
        let callee = method(receiver, kotlin, safe, range.clone());
        if reorder {
            let values: Vec<TargetNode> = arguments
                .iter()
                .rev()
                .map(|arg| self.translate_value(&arg.value))
                .collect();
            return Some(call(callee, values, range));
        }
        let unlabelled: Vec<Argument> = arguments
            .iter()
            .map(|arg| Argument {
                label: None,
                value: arg.value.clone(),
            })
            .collect();
        Some(self.finish_call(callee, &unlabelled, None, range))
    }

    // Members

    fn translate_member(
        &mut self,
        base: &SourceNode,
        name: &str,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if let SourceKind::DeclRef { name: type_name, .. } = &base.kind {
            let resolved = self.registry.resolve(type_name).to_string();
            let is_case = self
                .registry
                .enum_info(&resolved)
                .is_some_and(|info| info.case(name).is_some());
            if is_case {
                return self.enum_case_ref(&resolved, name, range);
            }
        }

        let (target, safe) = match &base.kind {
            SourceKind::BindOptional(inner) => (inner.as_ref(), true),
            _ => (base, false),
        };
        let base_type = self.type_of(target).map(|ty| ty.non_optional().clone());
        let is_text = base_type.as_ref().is_some_and(SwiftType::is_string);
        let is_collection = base_type.as_ref().is_some_and(SwiftType::is_collection);
        let receiver = self.translate_expr(target);

        match name {
            "count" if is_text => method(receiver, "length", safe, range),
            "count" => method(receiver, "size", safe, range),
            "isEmpty" => call(method(receiver, "isEmpty", safe, range.clone()), Vec::new(), range),
            "first" | "last" if is_collection || is_text => {
                let function = if name == "first" { "firstOrNull" } else { "lastOrNull" };
                call(method(receiver, function, safe, range.clone()), Vec::new(), range)
            }
            _ => {
                let name = self.names.identifier(name);
                method(receiver, &name, safe, range)
            }
        }
    }

    fn translate_implicit_member(
        &mut self,
        name: &str,
        ty: Option<&SwiftType>,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if let Some(enum_name) = self.resolve_implicit(name, ty) {
            return self.enum_case_ref(&enum_name, name, range);
        }
        match ty.and_then(|ty| ty.non_optional().name()) {
            // Static members of other types: `.zero` on `CGPoint`.
            Some(type_name) => {
                let owner = self.kotlin_type(&SwiftType::named(type_name), range.as_ref());
                let name = self.names.identifier(name);
                TargetNode::member(TargetNode::name(owner.to_string(), range.clone()), name, range)
            }
            None => self.untranslatable(
                &format!("implicit member `.{name}`"),
                "the type it belongs to cannot be determined",
                range,
            ),
        }
    }

    /// The enum an implicit `.case` refers to.
    fn resolve_implicit(&self, case: &str, ty: Option<&SwiftType>) -> Option<String> {
        let has_case = |enum_name: &str| {
            self.registry
                .enum_info(enum_name)
                .is_some_and(|info| info.case(case).is_some())
        };
        if let Some(enum_name) = ty.and_then(|ty| self.enum_name_of(ty)) {
            return Some(enum_name);
        }
        if let Some(expected) = self.expected_enum.as_deref().filter(|e| has_case(*e)) {
            return Some(expected.to_string());
        }
        let enclosing = match &self.scope {
            Scope::Type { name } | Scope::Extension { name, .. } => Some(name.as_str()),
            Scope::TopLevel | Scope::Protocol => None,
        };
        if let Some(enclosing) = enclosing.filter(|e| has_case(*e)) {
            return Some(enclosing.to_string());
        }
        self.registry.enum_for_case(case).map(String::from)
    }

    /// `(enum, case)` for `.case`, `Enum.case` and calls of either.
    pub(super) fn enum_case_pattern(&self, node: &SourceNode) -> Option<(String, String)> {
        match &node.kind {
            SourceKind::ImplicitMember { name, ty } => self
                .resolve_implicit(name, ty.as_ref())
                .map(|enum_name| (enum_name, name.clone())),
            SourceKind::Member { base, name } => match &base.kind {
                SourceKind::DeclRef { name: type_name, .. } => {
                    let resolved = self.registry.resolve(type_name);
                    self.registry
                        .enum_info(resolved)
                        .and_then(|info| info.case(name))
                        .map(|_| (resolved.to_string(), name.clone()))
                }
                _ => None,
            },
            SourceKind::Call { callee, .. } => self.enum_case_pattern(callee),
            _ => None,
        }
    }

    pub(super) fn case_name(&mut self, enum_name: &str, case: &str) -> String {
        let style = match self.registry.enum_info(enum_name).map(|info| info.representation) {
            Some(EnumRepresentation::SealedClass) => CaseStyle::UpperCamel,
            _ => CaseStyle::UpperSnake,
        };
        self.names.enum_case(enum_name, case, style)
    }

    fn enum_case_ref(&mut self, enum_name: &str, case: &str, range: Option<SourceRange>) -> TargetNode {
        let owner = self.names.identifier(enum_name);
        let case = self.case_name(enum_name, case);
        TargetNode::member(TargetNode::name(owner, range.clone()), case, range)
    }
}
