//! Kotlin writer.
//!
//! Emits a [`TargetNode`] tree as Kotlin source. Layout is fixed: blocks
//! always open on the header line and close on their own line, so the same
//! tree always produces the same text.

use crate::config::OutputConfig;
use crate::kotlin::*;
use std::fmt::Write;

/// Precedence of atoms and postfix expressions (calls, members, `!!`).
const POSTFIX: u8 = 13;
const PREFIX: u8 = 12;
const AS: u8 = 11;
const IS: u8 = 5;
const ATOM: u8 = 20;

/// Emits Kotlin AST as source code.
pub struct KotlinWriter {
    output: String,
    indent: usize,
    indent_width: usize,
}

impl KotlinWriter {
    pub fn new() -> Self {
        Self::with_options(&OutputConfig::default())
    }

    pub fn with_options(config: &OutputConfig) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            indent_width: config.indent_width,
        }
    }

    /// Emit a file (or any single node) with default options.
    pub fn emit(node: &TargetNode) -> String {
        Self::new().finish(node)
    }

    pub fn emit_with(node: &TargetNode, config: &OutputConfig) -> String {
        Self::with_options(config).finish(node)
    }

    fn finish(mut self, node: &TargetNode) -> String {
        match &node.kind {
            TargetKind::File(items) => self.write_items(items, true),
            _ => self.write_stmt(node),
        }
        let trimmed = self.output.trim_end().len();
        self.output.truncate(trimmed);
        self.output.push('\n');
        self.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent * self.indent_width {
            self.output.push(' ');
        }
    }

    /// Write a statement list; `spaced` separates declarations with a blank line.
    fn write_items(&mut self, items: &[TargetNode], spaced: bool) {
        for (i, item) in items.iter().enumerate() {
            if spaced && i > 0 && (is_declaration(&items[i - 1]) || is_declaration(item)) {
                self.output.push('\n');
            }
            self.write_stmt(item);
        }
    }

    fn write_stmt(&mut self, node: &TargetNode) {
        self.write_indent();
        self.write_construct(node);
        self.output.push('\n');
    }

    /// `{`, the indented body, and `}` on its own line.
    fn write_block(&mut self, body: &[TargetNode]) {
        self.write_braced(body, false);
    }

    fn write_braced(&mut self, body: &[TargetNode], spaced: bool) {
        self.output.push_str("{\n");
        self.indent += 1;
        self.write_items(body, spaced);
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_construct(&mut self, node: &TargetNode) {
        match &node.kind {
            TargetKind::File(items) => {
                // Nested files only come from hand-built trees.
                for item in items {
                    self.write_construct(item);
                }
            }
            TargetKind::Comment(text) => {
                let _ = write!(self.output, "/* {} */", text.replace("*/", "* /").replace("/*", "/ *"));
            }
            TargetKind::Import(module) => {
                let _ = write!(self.output, "import {module}");
            }
            TargetKind::Function(func) => self.write_function(func),
            TargetKind::Property(prop) => self.write_property(prop),
            TargetKind::Class(class) => self.write_class(class),
            TargetKind::Constructor { params, body } => {
                self.output.push_str("constructor(");
                self.write_params(params);
                self.output.push_str(") ");
                self.write_block(body);
            }
            TargetKind::CompanionObject(items) => {
                self.output.push_str("companion object ");
                self.write_braced(items, true);
            }
            TargetKind::TypeAlias { name, ty } => {
                let _ = write!(self.output, "typealias {name} = {ty}");
            }
            TargetKind::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value);
                }
            }
            TargetKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.write_if(condition, then_branch, else_branch.as_deref()),
            TargetKind::While { condition, body } => {
                self.output.push_str("while (");
                self.write_expr(condition);
                self.output.push_str(") ");
                self.write_block(body);
            }
            TargetKind::DoWhile { body, condition } => {
                self.output.push_str("do ");
                self.write_block(body);
                self.output.push_str(" while (");
                self.write_expr(condition);
                self.output.push(')');
            }
            TargetKind::For {
                variable,
                iterable,
                body,
            } => {
                let _ = write!(self.output, "for ({variable} in ");
                self.write_expr(iterable);
                self.output.push_str(") ");
                self.write_block(body);
            }
            TargetKind::When { subject, branches } => self.write_when(subject.as_deref(), branches),
            TargetKind::Break => self.output.push_str("break"),
            TargetKind::Continue => self.output.push_str("continue"),
            TargetKind::Throw(value) => {
                self.output.push_str("throw ");
                self.write_expr(value);
            }
            TargetKind::Try { body, catches } => {
                self.output.push_str("try ");
                self.write_block(body);
                for catch in catches {
                    let _ = write!(self.output, " catch ({}: {}) ", catch.name, catch.ty);
                    self.write_block(&catch.body);
                }
            }
            TargetKind::Assign { op, target, value } => {
                self.write_expr(target);
                let _ = write!(self.output, " {} ", op.symbol());
                self.write_expr(value);
            }
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
            | TargetKind::Cast { .. } => self.write_expr(node),
        }
    }

    fn write_if(
        &mut self,
        condition: &TargetNode,
        then_branch: &[TargetNode],
        else_branch: Option<&[TargetNode]>,
    ) {
        self.output.push_str("if (");
        self.write_expr(condition);
        self.output.push_str(") ");
        self.write_block(then_branch);
        match else_branch {
            Some(
                [
                    TargetNode {
                        kind:
                            TargetKind::If {
                                condition,
                                then_branch,
                                else_branch,
                            },
                        ..
                    },
                ],
            ) => {
                self.output.push_str(" else ");
                self.write_if(condition, then_branch, else_branch.as_deref());
            }
            Some(branch) => {
                self.output.push_str(" else ");
                self.write_block(branch);
            }
            None => {}
        }
    }

    fn write_when(&mut self, subject: Option<&TargetNode>, branches: &[WhenBranch]) {
        self.output.push_str("when ");
        if let Some(subject) = subject {
            self.output.push('(');
            self.write_expr(subject);
            self.output.push_str(") ");
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for branch in branches {
            self.write_indent();
            if branch.conditions.is_empty() {
                self.output.push_str("else");
            }
            for (i, condition) in branch.conditions.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                match condition {
                    WhenCondition::Value(value) => self.write_expr(value),
                    WhenCondition::Is(ty) => {
                        let _ = write!(self.output, "is {ty}");
                    }
                }
            }
            self.output.push_str(" -> ");
            self.write_block(&branch.body);
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.output.push_str(modifier.keyword());
            self.output.push(' ');
        }
    }

    fn write_params(&mut self, params: &[Parameter]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            if let Some(binding) = param.binding {
                self.output.push_str(binding.keyword());
                self.output.push(' ');
            }
            let _ = write!(self.output, "{}: {}", param.name, param.ty);
            if let Some(default) = &param.default {
                self.output.push_str(" = ");
                self.write_expr(default);
            }
        }
    }

    fn write_function(&mut self, func: &FunctionDef) {
        self.write_modifiers(&func.modifiers);
        self.output.push_str("fun ");
        if let Some(receiver) = &func.receiver {
            let _ = write!(self.output, "{receiver}.");
        }
        self.output.push_str(&func.name);
        self.output.push('(');
        self.write_params(&func.params);
        self.output.push(')');
        if let Some(ty) = &func.return_type {
            let _ = write!(self.output, ": {ty}");
        }
        if let Some(body) = &func.body {
            self.output.push(' ');
            self.write_block(body);
        }
    }

    fn write_property(&mut self, prop: &PropertyDef) {
        self.write_modifiers(&prop.modifiers);
        self.output.push_str(prop.binding.keyword());
        self.output.push(' ');
        if let Some(receiver) = &prop.receiver {
            let _ = write!(self.output, "{receiver}.");
        }
        self.output.push_str(&prop.name);
        if let Some(ty) = &prop.ty {
            let _ = write!(self.output, ": {ty}");
        }
        if let Some(init) = &prop.init {
            self.output.push_str(" = ");
            self.write_expr(init);
        }
        for (header, body) in [("get() ", &prop.getter), ("set(newValue) ", &prop.setter)] {
            if let Some(body) = body {
                self.output.push('\n');
                self.indent += 1;
                self.write_indent();
                self.output.push_str(header);
                self.write_block(body);
                self.indent -= 1;
            }
        }
    }

    fn write_class(&mut self, class: &ClassDef) {
        self.write_modifiers(&class.modifiers);
        let _ = write!(self.output, "{} {}", class.kind.keyword(), class.name);
        if !class.params.is_empty() {
            self.output.push('(');
            self.write_params(&class.params);
            self.output.push(')');
        }
        for (i, supertype) in class.supertypes.iter().enumerate() {
            self.output.push_str(if i == 0 { " : " } else { ", " });
            self.output.push_str(&supertype.name);
            if supertype.constructor_call {
                self.output.push_str("()");
            }
        }
        if class.entries.is_empty() && class.members.is_empty() {
            return;
        }

        self.output.push_str(" {\n");
        self.indent += 1;
        for (i, entry) in class.entries.iter().enumerate() {
            self.write_indent();
            self.output.push_str(&entry.name);
            if !entry.args.is_empty() {
                self.output.push('(');
                self.write_args(entry.args.iter().map(|arg| (None, arg)));
                self.output.push(')');
            }
            if i + 1 < class.entries.len() {
                self.output.push(',');
            } else if !class.members.is_empty() {
                self.output.push(';');
            }
            self.output.push('\n');
        }
        if !class.entries.is_empty() && !class.members.is_empty() {
            self.output.push('\n');
        }
        self.write_items(&class.members, true);
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_args<'a>(&mut self, args: impl Iterator<Item = (Option<&'a str>, &'a TargetNode)>) {
        for (i, (name, value)) in args.enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            if let Some(name) = name {
                let _ = write!(self.output, "{name} = ");
            }
            self.write_expr(value);
        }
    }

    // Expressions

    fn write_expr(&mut self, node: &TargetNode) {
        match &node.kind {
            TargetKind::Literal(literal) => self.write_literal(literal),
            TargetKind::Template(parts) => self.write_template(parts),
            TargetKind::Name(name) => self.output.push_str(name),
            TargetKind::Comment(text) => {
                self.output.push_str("TODO(");
                write_string(&mut self.output, text);
                self.output.push(')');
            }
            TargetKind::Binary { op, lhs, rhs } => {
                let precedence = op.precedence();
                let non_associative = op.is_non_associative();
                self.write_operand(lhs, precedence, non_associative);
                let _ = write!(self.output, " {} ", op.symbol());
                self.write_operand(rhs, precedence, true);
            }
            TargetKind::Unary { op, operand } => {
                self.output.push_str(op.symbol());
                let wrap = precedence(operand) < PREFIX
                    || matches!(operand.kind, TargetKind::Unary { .. })
                    || is_negative_literal(operand);
                self.write_wrapped(operand, wrap);
            }
            TargetKind::NotNullAssert(inner) => {
                self.write_operand(inner, POSTFIX, false);
                self.output.push_str("!!");
            }
            TargetKind::Call {
                callee,
                args,
                trailing_lambda,
            } => {
                self.write_operand(callee, POSTFIX, false);
                if !args.is_empty() || trailing_lambda.is_none() {
                    self.output.push('(');
                    self.write_args(args.iter().map(|arg| (arg.name.as_deref(), &arg.value)));
                    self.output.push(')');
                }
                if let Some(lambda) = trailing_lambda {
                    self.output.push(' ');
                    self.write_expr(lambda);
                }
            }
            TargetKind::Member { base, name, safe } => {
                self.write_operand(base, POSTFIX, false);
                self.output.push_str(if *safe { "?." } else { "." });
                self.output.push_str(name);
            }
            TargetKind::Index { base, index } => {
                self.write_operand(base, POSTFIX, false);
                self.output.push('[');
                self.write_expr(index);
                self.output.push(']');
            }
            TargetKind::Lambda { params, body } => self.write_lambda(params, body),
            TargetKind::IfExpr {
                condition,
                then_value,
                else_value,
            } => {
                self.output.push_str("if (");
                self.write_expr(condition);
                self.output.push_str(") ");
                self.write_expr(then_value);
                self.output.push_str(" else ");
                self.write_expr(else_value);
            }
            TargetKind::Cast { kind, value, ty } => {
                let precedence = if *kind == CastKind::Is { IS } else { AS };
                self.write_operand(value, precedence, false);
                let _ = write!(self.output, " {} {ty}", kind.keyword());
            }
            _ => self.write_construct(node),
        }
    }

    /// Write an operand of an operator with `parent` precedence.
    /// `strict` parenthesises equal precedence too (right-hand sides and
    /// non-associative operators).
    fn write_operand(&mut self, node: &TargetNode, parent: u8, strict: bool) {
        let own = precedence(node);
        let wrap = own < parent || (own == parent && strict);
        self.write_wrapped(node, wrap);
    }

    fn write_wrapped(&mut self, node: &TargetNode, wrap: bool) {
        if wrap {
            self.output.push('(');
            self.write_expr(node);
            self.output.push(')');
        } else {
            self.write_expr(node);
        }
    }

    fn write_lambda(&mut self, params: &[String], body: &[TargetNode]) {
        let implicit_it = params.len() == 1 && params[0] == "it";
        let header = if params.is_empty() || implicit_it {
            String::new()
        } else {
            format!("{} ->", params.join(", "))
        };

        match body {
            [] if header.is_empty() => self.output.push_str("{}"),
            [] => {
                let _ = write!(self.output, "{{ {header} }}");
            }
            [single] if single.kind.is_expression() && !contains_block(single) => {
                self.output.push_str("{ ");
                if !header.is_empty() {
                    self.output.push_str(&header);
                    self.output.push(' ');
                }
                self.write_expr(single);
                self.output.push_str(" }");
            }
            _ => {
                self.output.push('{');
                if !header.is_empty() {
                    self.output.push(' ');
                    self.output.push_str(&header);
                }
                self.output.push('\n');
                self.indent += 1;
                self.write_items(body, false);
                self.indent -= 1;
                self.write_indent();
                self.output.push('}');
            }
        }
    }

    fn write_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Int(value) | Literal::Double(value) => self.output.push_str(value),
            Literal::Bool(value) => {
                let _ = write!(self.output, "{value}");
            }
            Literal::String(value) => write_string(&mut self.output, value),
            Literal::Null => self.output.push_str("null"),
        }
    }

    fn write_template(&mut self, parts: &[TemplatePart]) {
        self.output.push('"');
        for (i, part) in parts.iter().enumerate() {
            match part {
                TemplatePart::Text(text) => escape_into(&mut self.output, text),
                TemplatePart::Expr(expr) => {
                    let next_is_ident = match parts.get(i + 1) {
                        Some(TemplatePart::Text(text)) => {
                            text.starts_with(|c: char| c.is_alphanumeric() || c == '_')
                        }
                        _ => false,
                    };
                    match &expr.kind {
                        TargetKind::Name(name) if is_plain_identifier(name) && !next_is_ident => {
                            let _ = write!(self.output, "${name}");
                        }
                        _ => {
                            self.output.push_str("${");
                            self.write_expr(expr);
                            self.output.push('}');
                        }
                    }
                }
            }
        }
        self.output.push('"');
    }
}

impl Default for KotlinWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_declaration(node: &TargetNode) -> bool {
    matches!(
        node.kind,
        TargetKind::Class(_)
            | TargetKind::Function(_)
            | TargetKind::Constructor { .. }
            | TargetKind::CompanionObject(_)
    )
}

fn precedence(node: &TargetNode) -> u8 {
    match &node.kind {
        TargetKind::Binary { op, .. } => op.precedence(),
        TargetKind::Unary { .. } => PREFIX,
        TargetKind::Cast { kind: CastKind::Is, .. } => IS,
        TargetKind::Cast { .. } => AS,
        TargetKind::IfExpr { .. } | TargetKind::Lambda { .. } => 0,
        TargetKind::Literal(_) if is_negative_literal(node) => PREFIX,
        TargetKind::NotNullAssert(_)
        | TargetKind::Call { .. }
        | TargetKind::Member { .. }
        | TargetKind::Index { .. } => POSTFIX,
        _ => ATOM,
    }
}

fn is_negative_literal(node: &TargetNode) -> bool {
    match &node.kind {
        TargetKind::Literal(Literal::Int(value) | Literal::Double(value)) => value.starts_with('-'),
        _ => false,
    }
}

/// Lambdas and if-expressions nested anywhere inside force multi-line layout.
fn contains_block(node: &TargetNode) -> bool {
    match &node.kind {
        TargetKind::Lambda { body, .. } => body.len() > 1,
        TargetKind::Call {
            callee,
            args,
            trailing_lambda,
        } => {
            contains_block(callee)
                || args.iter().any(|arg| contains_block(&arg.value))
                || trailing_lambda.as_deref().is_some_and(contains_block)
        }
        TargetKind::Binary { lhs, rhs, .. } => contains_block(lhs) || contains_block(rhs),
        TargetKind::Member { base, .. } | TargetKind::NotNullAssert(base) => contains_block(base),
        _ => false,
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn write_string(output: &mut String, text: &str) {
    output.push('"');
    escape_into(output, text);
    output.push('"');
}

fn escape_into(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '$' => output.push_str("\\$"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> TargetNode {
        TargetNode::name(text, None)
    }

    fn int(value: &str) -> TargetNode {
        TargetNode::literal(Literal::Int(value.to_string()), None)
    }

    fn binary(op: BinaryOp, lhs: TargetNode, rhs: TargetNode) -> TargetNode {
        TargetNode::binary(op, lhs, rhs, None)
    }

    fn file(items: Vec<TargetNode>) -> TargetNode {
        TargetNode::new(TargetKind::File(items), None)
    }

    fn function(name: &str, body: Vec<TargetNode>) -> TargetNode {
        TargetNode::new(
            TargetKind::Function(FunctionDef {
                name: name.to_string(),
                receiver: None,
                params: Vec::new(),
                return_type: None,
                body: Some(body),
                modifiers: Vec::new(),
            }),
            None,
        )
    }

    fn expr(node: TargetNode) -> String {
        KotlinWriter::emit(&node).trim_end().to_string()
    }

    #[test]
    fn test_comment_cannot_open_or_close_early() {
        let comment = TargetNode::new(TargetKind::Comment("a /* b */ c".to_string()), None);
        let output = KotlinWriter::emit(&file(vec![comment]));
        assert_eq!(output, "/* a / * b * / c */\n");
    }

    #[test]
    fn test_empty_function() {
        let output = KotlinWriter::emit(&file(vec![function("foo", Vec::new())]));
        assert_eq!(output, "fun foo() {\n}\n");
    }

    #[test]
    fn test_blank_line_between_declarations() {
        let prop = TargetNode::new(
            TargetKind::Property(PropertyDef::simple("x", Binding::Val, None, Some(int("1")))),
            None,
        );
        let output = KotlinWriter::emit(&file(vec![
            prop.clone(),
            prop,
            function("a", Vec::new()),
            function("b", Vec::new()),
        ]));
        assert_eq!(output, "val x = 1\nval x = 1\n\nfun a() {\n}\n\nfun b() {\n}\n");
    }

    #[test]
    fn test_indent_width() {
        let body = vec![TargetNode::new(TargetKind::Return(None), None)];
        let config = OutputConfig { indent_width: 2 };
        let output = KotlinWriter::emit_with(&file(vec![function("f", body)]), &config);
        assert_eq!(output, "fun f() {\n  return\n}\n");
    }

    #[test]
    fn test_parentheses_follow_precedence() {
        // (a + b) * c
        let sum = binary(BinaryOp::Add, name("a"), name("b"));
        assert_eq!(expr(binary(BinaryOp::Mul, sum.clone(), name("c"))), "(a + b) * c");
        // a + b * c
        let product = binary(BinaryOp::Mul, name("b"), name("c"));
        assert_eq!(expr(binary(BinaryOp::Add, name("a"), product)), "a + b * c");
        // a - (b + c), but (a + b) - c prints flat
        assert_eq!(expr(binary(BinaryOp::Sub, name("a"), sum.clone())), "a - (a + b)");
        assert_eq!(expr(binary(BinaryOp::Sub, sum, name("c"))), "a + b - c");
    }

    #[test]
    fn test_comparisons_do_not_chain() {
        let less = binary(BinaryOp::Lt, name("a"), name("b"));
        assert_eq!(expr(binary(BinaryOp::Eq, less.clone(), name("c"))), "a < b == c");
        assert_eq!(expr(binary(BinaryOp::Lt, less, name("c"))), "(a < b) < c");
    }

    #[test]
    fn test_unary_operands() {
        let not = |operand| {
            TargetNode::new(
                TargetKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                None,
            )
        };
        assert_eq!(expr(not(name("x"))), "!x");
        assert_eq!(expr(not(binary(BinaryOp::Conj, name("a"), name("b")))), "!(a && b)");
        let neg = TargetNode::new(
            TargetKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(int("-1")),
            },
            None,
        );
        assert_eq!(expr(neg), "-(-1)");
    }

    #[test]
    fn test_else_if_chain() {
        let inner = TargetNode::new(
            TargetKind::If {
                condition: Box::new(name("b")),
                then_branch: vec![TargetNode::new(TargetKind::Break, None)],
                else_branch: Some(vec![TargetNode::new(TargetKind::Continue, None)]),
            },
            None,
        );
        let outer = TargetNode::new(
            TargetKind::If {
                condition: Box::new(name("a")),
                then_branch: Vec::new(),
                else_branch: Some(vec![inner]),
            },
            None,
        );
        assert_eq!(
            KotlinWriter::emit(&outer),
            "if (a) {\n} else if (b) {\n    break\n} else {\n    continue\n}\n"
        );
    }

    #[test]
    fn test_when_branches() {
        let when = TargetNode::new(
            TargetKind::When {
                subject: Some(Box::new(name("x"))),
                branches: vec![
                    WhenBranch {
                        conditions: vec![WhenCondition::Value(int("1")), WhenCondition::Value(int("2"))],
                        body: vec![TargetNode::new(TargetKind::Break, None)],
                    },
                    WhenBranch {
                        conditions: vec![WhenCondition::Is(KotlinType::named("String"))],
                        body: Vec::new(),
                    },
                    WhenBranch {
                        conditions: Vec::new(),
                        body: Vec::new(),
                    },
                ],
            },
            None,
        );
        assert_eq!(
            KotlinWriter::emit(&when),
            "when (x) {\n    1, 2 -> {\n        break\n    }\n    is String -> {\n    }\n    else -> {\n    }\n}\n"
        );
    }

    #[test]
    fn test_template_escapes() {
        let template = TargetNode::new(
            TargetKind::Template(vec![
                TemplatePart::Text("cost: $".to_string()),
                TemplatePart::Expr(name("price")),
                TemplatePart::Text(" for ".to_string()),
                TemplatePart::Expr(name("n")),
                TemplatePart::Text("x".to_string()),
            ]),
            None,
        );
        assert_eq!(expr(template), r#""cost: \$$price for ${n}x""#);
    }

    #[test]
    fn test_trailing_lambda() {
        let lambda = TargetNode::new(
            TargetKind::Lambda {
                params: vec!["it".to_string()],
                body: vec![binary(BinaryOp::Mul, name("it"), int("2"))],
            },
            None,
        );
        let call = TargetNode::new(
            TargetKind::Call {
                callee: Box::new(TargetNode::member(name("xs"), "map", None)),
                args: Vec::new(),
                trailing_lambda: Some(Box::new(lambda)),
            },
            None,
        );
        assert_eq!(expr(call), "xs.map { it * 2 }");
    }

    #[test]
    fn test_comment_in_expression_position() {
        let call = TargetNode::call(
            name("println"),
            vec![TargetNode::comment("unrecognized construct: Foo", None)],
            None,
        );
        assert_eq!(expr(call), r#"println(TODO("unrecognized construct: Foo"))"#);
        assert_eq!(
            expr(TargetNode::comment("no Kotlin equivalent for defer", None)),
            "/* no Kotlin equivalent for defer */"
        );
    }

    #[test]
    fn test_enum_class_with_members() {
        let mut class = ClassDef::new("Direction", ClassKind::EnumClass);
        class.entries = vec![
            EnumEntry {
                name: "NORTH".to_string(),
                args: Vec::new(),
            },
            EnumEntry {
                name: "SOUTH".to_string(),
                args: Vec::new(),
            },
        ];
        class.members = vec![function("flip", Vec::new())];
        assert_eq!(
            KotlinWriter::emit(&TargetNode::new(TargetKind::Class(class), None)),
            "enum class Direction {\n    NORTH,\n    SOUTH;\n\n    fun flip() {\n    }\n}\n"
        );
    }
}
