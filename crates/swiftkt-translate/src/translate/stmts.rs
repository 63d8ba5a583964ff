//! Statement rewriting.

use super::Translator;
use super::rules::{self, BindingSite, BindingStyle};
use crate::kotlin::{
    AssignOp, Binding, BinaryOp, CatchBlock, KotlinType, Literal, PropertyDef, TargetKind,
    TargetNode, UnaryOp, WhenBranch, WhenCondition,
};
use crate::range::SourceRange;
use crate::swift::{
    CastKind, CatchClause, Condition, SourceKind, SourceNode, SwiftType, SwitchCase,
};

impl Translator<'_> {
    /// A bare `{ }` scope runs as `run { }`.
    pub(super) fn translate_block(
        &mut self,
        items: &[SourceNode],
        range: Option<SourceRange>,
    ) -> TargetNode {
        let body = self.statements(items);
        let lambda = TargetNode::new(
            TargetKind::Lambda {
                params: Vec::new(),
                body,
            },
            range.clone(),
        );
        TargetNode::new(
            TargetKind::Call {
                callee: Box::new(TargetNode::name("run", range.clone())),
                args: Vec::new(),
                trailing_lambda: Some(Box::new(lambda)),
            },
            range,
        )
    }

    pub(super) fn translate_return(
        &mut self,
        value: Option<&SourceNode>,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if self.closure_depth > 0 {
            return self.untranslatable(
                "early return from a closure",
                "a bare `return` in a Kotlin lambda returns from the enclosing function",
                range,
            );
        }
        let value = value.map(|value| Box::new(self.translate_value(value)));
        TargetNode::new(TargetKind::Return(value), range)
    }

    fn else_branch(&mut self, branch: &SourceNode) -> Vec<TargetNode> {
        match &branch.kind {
            SourceKind::Block(items) => self.statements(items),
            _ => self.translate_node(branch),
        }
    }

    pub(super) fn translate_if(
        &mut self,
        condition: &Condition,
        then_branch: &[SourceNode],
        else_branch: Option<&SourceNode>,
        range: Option<SourceRange>,
    ) -> Vec<TargetNode> {
        match condition {
            Condition::Expr(expr) => {
                let condition = self.translate_expr(expr);
                let then_branch = self.statements(then_branch);
                let else_branch = else_branch.map(|branch| self.else_branch(branch));
                vec![if_node(condition, then_branch, else_branch, range)]
            }
            Condition::Binding {
                name,
                value,
                range: binding_range,
            } => {
                let site = BindingSite {
                    name,
                    value,
                    then_branch,
                    has_else: else_branch.is_some(),
                };
                let style = rules::binding_style(&site);
                tracing::trace!(name = %name, ?style, "optional binding");

                let kotlin_name = self.names.identifier(name);
                let bound_type = self.type_of(value).map(|ty| ty.non_optional().clone());
                let value = self.translate_expr(value);
                let then_branch = self.with_scope(|this| {
                    match style {
                        BindingStyle::SmartCast => this.narrow(name, bound_type),
                        _ => this.declare(name, bound_type),
                    }
                    this.statements(then_branch)
                });
                let else_branch = else_branch.map(|branch| self.else_branch(branch));
                match style {
                    BindingStyle::SmartCast => {
                        vec![if_node(not_null(value), then_branch, else_branch, range)]
                    }
                    BindingStyle::SafeLet => {
                        let lambda = TargetNode::new(
                            TargetKind::Lambda {
                                params: vec![kotlin_name],
                                body: then_branch,
                            },
                            range.clone(),
                        );
                        let call = TargetNode::new(
                            TargetKind::Call {
                                callee: Box::new(TargetNode::new(
                                    TargetKind::Member {
                                        base: Box::new(value),
                                        name: "let".to_string(),
                                        safe: true,
                                    },
                                    range.clone(),
                                )),
                                args: Vec::new(),
                                trailing_lambda: Some(Box::new(lambda)),
                            },
                            range,
                        );
                        vec![call]
                    }
                    BindingStyle::ScopedVal => {
                        let subject = hoist(&kotlin_name, value, binding_range.clone());
                        let branches = vec![
                            WhenBranch {
                                conditions: vec![WhenCondition::Value(TargetNode::literal(
                                    Literal::Null,
                                    range.clone(),
                                ))],
                                body: else_branch.unwrap_or_default(),
                            },
                            WhenBranch {
                                conditions: Vec::new(),
                                body: then_branch,
                            },
                        ];
                        vec![TargetNode::new(
                            TargetKind::When {
                                subject: Some(Box::new(subject)),
                                branches,
                            },
                            range,
                        )]
                    }
                }
            }
        }
    }

    pub(super) fn translate_guard(
        &mut self,
        condition: &Condition,
        else_branch: &[SourceNode],
        range: Option<SourceRange>,
    ) -> Vec<TargetNode> {
        match condition {
            Condition::Expr(expr) => {
                let condition = negate(self.translate_expr(expr));
                let body = self.statements(else_branch);
                vec![if_node(condition, body, None, range)]
            }
            Condition::Binding {
                name,
                value,
                range: binding_range,
            } => {
                let bound_type = self.type_of(value).map(|ty| ty.non_optional().clone());
                let rebinds = rules::rebinds(name, value);
                let value = self.translate_expr(value);
                let body = self.statements(else_branch);
                if rebinds {
                    // `guard let x = x`: Kotlin smart-casts `x` after the null check.
                    self.narrow(name, bound_type);
                    return vec![if_node(is_null(value, range.clone()), body, None, range)];
                }
                let kotlin_name = self.declare_fresh(name, bound_type);
                let check = is_null(TargetNode::name(&kotlin_name, range.clone()), range.clone());
                vec![
                    hoist(&kotlin_name, value, binding_range.clone()),
                    if_node(check, body, None, range),
                ]
            }
        }
    }

    pub(super) fn translate_while(
        &mut self,
        condition: &SourceNode,
        body: &[SourceNode],
        range: Option<SourceRange>,
    ) -> TargetNode {
        let condition = self.translate_expr(condition);
        let body = self.loop_body(body);
        TargetNode::new(
            TargetKind::While {
                condition: Box::new(condition),
                body,
            },
            range,
        )
    }

    pub(super) fn translate_repeat_while(
        &mut self,
        body: &[SourceNode],
        condition: &SourceNode,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let body = self.loop_body(body);
        let condition = self.translate_expr(condition);
        TargetNode::new(
            TargetKind::DoWhile {
                body,
                condition: Box::new(condition),
            },
            range,
        )
    }

    pub(super) fn translate_for_each(
        &mut self,
        variable: &str,
        sequence: &SourceNode,
        body: &[SourceNode],
        range: Option<SourceRange>,
    ) -> TargetNode {
        let element = match self.type_of(sequence) {
            Some(SwiftType::Array(element)) => Some(*element),
            _ => None,
        };
        let iterable = self.translate_expr(sequence);
        let (variable, body) = self.with_scope(|this| {
            let variable = if variable == "_" {
                "ignored".to_string()
            } else {
                this.declare(variable, element);
                this.names.identifier(variable)
            };
            (variable, this.loop_body(body))
        });
        TargetNode::new(
            TargetKind::For {
                variable,
                iterable: Box::new(iterable),
                body,
            },
            range,
        )
    }

    pub(super) fn translate_switch(
        &mut self,
        subject: &SourceNode,
        cases: &[SwitchCase],
        range: Option<SourceRange>,
    ) -> TargetNode {
        let subject_enum = self
            .type_of(subject)
            .and_then(|ty| self.enum_name_of(&ty));
        let subject = self.translate_expr(subject);

        let saved = std::mem::replace(&mut self.expected_enum, subject_enum);
        let branches = cases
            .iter()
            .map(|case| {
                let conditions = case
                    .patterns
                    .iter()
                    .map(|pattern| self.when_condition(pattern))
                    .collect();
                WhenBranch {
                    conditions,
                    body: self.case_body(&case.body),
                }
            })
            .collect();
        self.expected_enum = saved;

        TargetNode::new(
            TargetKind::When {
                subject: Some(Box::new(subject)),
                branches,
            },
            range,
        )
    }

    fn when_condition(&mut self, pattern: &SourceNode) -> WhenCondition {
        if let SourceKind::Cast {
            kind: CastKind::Check,
            ty,
            ..
        } = &pattern.kind
        {
            return WhenCondition::Is(self.kotlin_type(ty, pattern.range.as_ref()));
        }
        if let Some((enum_name, case)) = self.enum_case_pattern(pattern) {
            if let Some(info) = self.registry.enum_info(&enum_name) {
                let has_params = info.case(&case).is_some_and(|c| c.has_params);
                if has_params {
                    let kotlin_enum = self.names.identifier(&enum_name);
                    let case_name = self.case_name(&enum_name, &case);
                    return WhenCondition::Is(KotlinType::named(format!("{kotlin_enum}.{case_name}")));
                }
            }
        }
        WhenCondition::Value(self.translate_expr(pattern))
    }

    /// `break` and `continue` in a loop body target the loop, not a switch.
    fn loop_body(&mut self, body: &[SourceNode]) -> Vec<TargetNode> {
        let in_case = std::mem::replace(&mut self.in_case_body, false);
        let out = self.statements(body);
        self.in_case_body = in_case;
        out
    }

    /// A trailing `break` only ends the Swift case and is implicit in Kotlin.
    fn case_body(&mut self, body: &[SourceNode]) -> Vec<TargetNode> {
        let body = match body.split_last() {
            Some((last, rest)) if matches!(last.kind, SourceKind::Break) => rest,
            _ => body,
        };
        let in_case = std::mem::replace(&mut self.in_case_body, true);
        let out = self.statements(body);
        self.in_case_body = in_case;
        out
    }

    pub(super) fn translate_do_catch(
        &mut self,
        body: &[SourceNode],
        catches: &[CatchClause],
        range: Option<SourceRange>,
    ) -> TargetNode {
        let body = self.statements(body);
        let catches = catches
            .iter()
            .map(|clause| {
                let ty = match &clause.ty {
                    Some(ty) => self.kotlin_type(ty, clause.range.as_ref()),
                    None => KotlinType::named("Exception"),
                };
                let swift_name = clause.name.as_deref().unwrap_or("error");
                let name = self.names.identifier(swift_name);
                let body = self.with_scope(|this| {
                    this.declare(swift_name, clause.ty.clone());
                    this.statements(&clause.body)
                });
                CatchBlock { name, ty, body }
            })
            .collect();
        TargetNode::new(TargetKind::Try { body, catches }, range)
    }

    pub(super) fn translate_assign(
        &mut self,
        target: &SourceNode,
        value: &SourceNode,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if matches!(&target.kind, SourceKind::DeclRef { name, .. } if name == "_") {
            return self.translate_expr(value);
        }
        let expected = self
            .type_of(target)
            .and_then(|ty| self.enum_name_of(&ty))
            .or_else(|| self.expected_enum.clone());
        let saved = std::mem::replace(&mut self.expected_enum, expected);
        let value = self.translate_value(value);
        self.expected_enum = saved;
        let target = self.translate_expr(target);
        assign(AssignOp::Assign, target, value, range)
    }

    pub(super) fn translate_compound_assign(
        &mut self,
        operator: &str,
        target: &SourceNode,
        value: &SourceNode,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let op = match operator {
            "+=" => Some(AssignOp::Add),
            "-=" => Some(AssignOp::Sub),
            "*=" => Some(AssignOp::Mul),
            "/=" => Some(AssignOp::Div),
            "%=" => Some(AssignOp::Rem),
            _ => None,
        };
        let lhs = self.translate_expr(target);
        let rhs = self.translate_expr(value);
        if let Some(op) = op {
            return assign(op, lhs, rhs, range);
        }
        // Bitwise compound operators expand to `a = a op b`.
        let binary = match operator {
            "&=" => BinaryOp::And,
            "|=" => BinaryOp::Or,
            "^=" => BinaryOp::Xor,
            "<<=" => BinaryOp::Shl,
            ">>=" => BinaryOp::Shr,
            _ => {
                return self.untranslatable(
                    &format!("operator `{operator}`"),
                    "no matching Kotlin operator",
                    range,
                );
            }
        };
        let combined = TargetNode::binary(binary, lhs.clone(), rhs, range.clone());
        assign(AssignOp::Assign, lhs, combined, range)
    }
}

fn if_node(
    condition: TargetNode,
    then_branch: Vec<TargetNode>,
    else_branch: Option<Vec<TargetNode>>,
    range: Option<SourceRange>,
) -> TargetNode {
    TargetNode::new(
        TargetKind::If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        },
        range,
    )
}

fn assign(op: AssignOp, target: TargetNode, value: TargetNode, range: Option<SourceRange>) -> TargetNode {
    TargetNode::new(
        TargetKind::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        },
        range,
    )
}

fn is_null(value: TargetNode, range: Option<SourceRange>) -> TargetNode {
    TargetNode::binary(BinaryOp::Eq, value, TargetNode::literal(Literal::Null, None), range)
}

fn not_null(value: TargetNode) -> TargetNode {
    let range = value.range.clone();
    TargetNode::binary(BinaryOp::Ne, value, TargetNode::literal(Literal::Null, None), range)
}

fn negate(condition: TargetNode) -> TargetNode {
    let range = condition.range.clone();
    TargetNode::new(
        TargetKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(condition),
        },
        range,
    )
}

fn hoist(name: &str, value: TargetNode, range: Option<SourceRange>) -> TargetNode {
    let prop = PropertyDef::simple(name, Binding::Val, None, Some(value));
    TargetNode::new(TargetKind::Property(prop), range)
}
