//! Declaration rewriting: functions, properties and type declarations.

use super::rules::{self, EnumRepresentation, StructRepresentation};
use super::{CaseStyle, Scope, Translator};
use crate::kotlin::{
    Binding, BinaryOp, ClassDef, ClassKind, EnumEntry, FunctionDef, KotlinType, Literal, Modifier,
    Parameter, PropertyDef, Supertype, TargetKind, TargetNode, UnaryOp,
};
use crate::range::SourceRange;
use crate::swift::{
    AccessorKind, EnumCaseDecl, FunctionDecl, Param, SourceKind, SourceNode, SwiftType,
    TypeDecl, VariableDecl,
};

/// Swift types an enum can take raw values from.
const RAW_VALUE_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "Double", "Float", "String", "Character",
];

/// Members of a type body, split by where Kotlin puts them.
#[derive(Default)]
struct Members {
    instance: Vec<TargetNode>,
    statics: Vec<TargetNode>,
}

impl Members {
    fn into_nodes(self, range: Option<&SourceRange>) -> Vec<TargetNode> {
        let mut nodes = self.instance;
        if !self.statics.is_empty() {
            nodes.push(TargetNode::new(
                TargetKind::CompanionObject(self.statics),
                range.cloned(),
            ));
        }
        nodes
    }
}

fn is_static(node: &SourceNode) -> bool {
    match &node.kind {
        SourceKind::Function(func) => func.is_static,
        SourceKind::Variable(var) => var.is_static,
        _ => false,
    }
}

impl Translator<'_> {
    pub(super) fn translate_import(
        &mut self,
        module: &str,
        range: Option<SourceRange>,
    ) -> Vec<TargetNode> {
        if self.options.drops_import(module) {
            tracing::debug!(module, "dropping import");
            Vec::new()
        } else {
            vec![TargetNode::new(TargetKind::Import(module.to_string()), range)]
        }
    }

    fn parameters(&mut self, params: &[Param], range: Option<&SourceRange>) -> Vec<Parameter> {
        params
            .iter()
            .map(|param| {
                self.declare(&param.name, Some(param.ty.clone()));
                Parameter {
                    name: self.names.identifier(&param.name),
                    ty: self.kotlin_type(&param.ty, range),
                    default: param
                        .default
                        .as_deref()
                        .map(|value| Box::new(self.translate_expr(value))),
                    binding: None,
                }
            })
            .collect()
    }

    /// Function and initializer bodies start outside any closure or switch.
    fn body(&mut self, stmts: &[SourceNode]) -> Vec<TargetNode> {
        let depth = std::mem::replace(&mut self.closure_depth, 0);
        let in_case = std::mem::replace(&mut self.in_case_body, false);
        let body = self.statements(stmts);
        self.closure_depth = depth;
        self.in_case_body = in_case;
        body
    }

    /// A body whose value is returned, where Swift allows an implicit return.
    fn returning_body(&mut self, stmts: &[SourceNode]) -> Vec<TargetNode> {
        let mut body = self.body(stmts);
        if body.len() == 1 && body[0].kind.is_expression() {
            if let Some(value) = body.pop() {
                let range = value.range.clone();
                body.push(TargetNode::new(TargetKind::Return(Some(Box::new(value))), range));
            }
        }
        body
    }

    pub(super) fn translate_function(
        &mut self,
        func: &FunctionDecl,
        range: Option<SourceRange>,
    ) -> TargetNode {
        self.enter_scope();
        let params = self.parameters(&func.params, range.as_ref());
        let return_type = match &func.result {
            Some(ty) => {
                let mapped = self.kotlin_type(ty, range.as_ref());
                (mapped != KotlinType::named("Unit")).then_some(mapped)
            }
            None => None,
        };
        let receiver = match &self.scope {
            Scope::Extension { receiver, .. } if func.is_static => {
                Some(KotlinType::named(format!("{receiver}.Companion")))
            }
            Scope::Extension { receiver, .. } => Some(receiver.clone()),
            _ => None,
        };
        let body = match (func.body.as_deref(), &return_type) {
            (Some(body), Some(_)) => Some(self.returning_body(body)),
            (Some(body), None) => Some(self.body(body)),
            (None, _) => None,
        };
        self.exit_scope();

        let mut modifiers = Vec::new();
        if func.is_override {
            modifiers.push(Modifier::Override);
        }
        if body.is_none() && matches!(self.scope, Scope::Type { .. }) {
            modifiers.push(Modifier::Abstract);
        }

        let def = FunctionDef {
            name: self.names.identifier(&func.name),
            receiver,
            params,
            return_type,
            body,
            modifiers,
        };
        TargetNode::new(TargetKind::Function(def), range)
    }

    pub(super) fn translate_initializer(
        &mut self,
        params: &[Param],
        body: Option<&[SourceNode]>,
        range: Option<SourceRange>,
    ) -> TargetNode {
        if !matches!(self.scope, Scope::Type { .. }) {
            return self.untranslatable(
                "initializer",
                "Kotlin constructors can only be declared inside the class body",
                range,
            );
        }
        self.enter_scope();
        let params = self.parameters(params, range.as_ref());
        let body = body.map(|body| self.body(body)).unwrap_or_default();
        self.exit_scope();
        TargetNode::new(TargetKind::Constructor { params, body }, range)
    }

    pub(super) fn translate_variable(
        &mut self,
        var: &VariableDecl,
        range: Option<SourceRange>,
    ) -> Vec<TargetNode> {
        let known = var
            .ty
            .clone()
            .or_else(|| var.init.as_deref().and_then(|init| self.type_of(init)));

        let in_extension = matches!(self.scope, Scope::Extension { .. });
        if var.is_stored() && in_extension {
            return vec![self.untranslatable(
                &format!("stored property `{}` in an extension", var.name),
                "Kotlin extension properties cannot have backing fields",
                range,
            )];
        }

        let name = self.names.identifier(&var.name);
        let ty = var
            .ty
            .as_ref()
            .map(|ty| self.kotlin_type(ty, range.as_ref()));

        if !var.is_stored() {
            self.declare(&var.name, known);
            return vec![self.computed_property(var, name, ty, range)];
        }

        let init = var.init.as_deref().map(|init| {
            let expected = var
                .ty
                .as_ref()
                .and_then(|ty| self.enum_name_of(ty))
                .or_else(|| self.expected_enum.clone());
            let saved = std::mem::replace(&mut self.expected_enum, expected);
            let value = self.translate_value(init);
            self.expected_enum = saved;
            value
        });
        // Declared after the initializer, which still sees any outer local.
        self.declare(&var.name, known);
        let binding = if var.is_let { Binding::Val } else { Binding::Var };
        let prop = PropertyDef::simple(name, binding, ty, init);
        vec![TargetNode::new(TargetKind::Property(prop), range)]
    }

    fn computed_property(
        &mut self,
        var: &VariableDecl,
        name: String,
        ty: Option<KotlinType>,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let find = |kind: AccessorKind| var.accessors.iter().find(|a| a.kind == kind);
        let has_setter = find(AccessorKind::Set).is_some();
        let binding = if has_setter { Binding::Var } else { Binding::Val };

        let receiver = match &self.scope {
            Scope::Extension { receiver, .. } => Some(receiver.clone()),
            _ => None,
        };
        let getter = find(AccessorKind::Get)
            .and_then(|a| a.body.as_deref())
            .map(|body| self.returning_body(body));
        let setter = find(AccessorKind::Set)
            .and_then(|a| a.body.as_deref())
            .map(|body| self.body(body));

        let mut modifiers = Vec::new();
        if getter.is_none() && matches!(self.scope, Scope::Type { .. }) {
            modifiers.push(Modifier::Abstract);
        }

        let prop = PropertyDef {
            name,
            binding,
            ty,
            receiver,
            init: None,
            getter,
            setter,
            modifiers,
        };
        TargetNode::new(TargetKind::Property(prop), range)
    }

    /// Translate a type body in `scope`, routing static members to the
    /// companion object.
    fn members(&mut self, members: &[SourceNode], scope: Scope) -> Members {
        let saved = std::mem::replace(&mut self.scope, scope);
        self.enter_scope();
        let mut out = Members::default();
        for member in members {
            let translated = self.translate_node(member);
            if is_static(member) {
                out.statics.extend(translated);
            } else {
                out.instance.extend(translated);
            }
        }
        self.exit_scope();
        self.scope = saved;
        out
    }

    fn supertypes(&self, decl: &TypeDecl, skip: &[&str]) -> Vec<Supertype> {
        decl.inherits
            .iter()
            .filter(|name| !skip.contains(&name.as_str()))
            .map(|name| Supertype {
                name: name.clone(),
                constructor_call: self.registry.is_class(name),
            })
            .collect()
    }

    pub(super) fn translate_struct(&mut self, decl: &TypeDecl, range: Option<SourceRange>) -> TargetNode {
        let representation = self
            .registry
            .struct_info(&decl.name)
            .map(|info| info.representation)
            .unwrap_or_else(|| rules::struct_representation(decl));
        let name = self.names.identifier(&decl.name);
        let scope = Scope::Type {
            name: decl.name.clone(),
        };

        let mut class = match representation {
            StructRepresentation::DataClass => {
                let mut class = ClassDef::new(&name, ClassKind::DataClass);
                let (stored, rest): (Vec<&SourceNode>, Vec<&SourceNode>) =
                    decl.members.iter().partition(|member| {
                        matches!(&member.kind, SourceKind::Variable(var) if var.is_stored() && !var.is_static)
                    });
                let saved = std::mem::replace(&mut self.scope, scope.clone());
                self.enter_scope();
                class.params = stored
                    .iter()
                    .filter_map(|member| match &member.kind {
                        SourceKind::Variable(var) => Some(self.constructor_property(var, member.range.as_ref())),
                        _ => None,
                    })
                    .collect();
                self.scope = saved;
                let rest: Vec<SourceNode> = rest.into_iter().cloned().collect();
                class.members = self.members(&rest, scope).into_nodes(range.as_ref());
                self.exit_scope();
                class
            }
            StructRepresentation::ClassWithEquality => {
                self.mismatch(
                    format!(
                        "struct `{}` becomes a class: copies share state instead of being independent values",
                        decl.name
                    ),
                    range.clone(),
                );
                let mut class = ClassDef::new(&name, ClassKind::Class);
                let mut members = self.members(&decl.members, scope);
                let stored: Vec<String> = rules::stored_properties(decl)
                    .into_iter()
                    .map(|var| self.names.identifier(&var.name))
                    .collect();
                members
                    .instance
                    .extend(equality_members(&name, &stored, range.as_ref()));
                class.members = members.into_nodes(range.as_ref());
                class
            }
        };
        class.supertypes = self.supertypes(decl, &[]);
        TargetNode::new(TargetKind::Class(class), range)
    }

    /// A stored property lifted into the primary constructor.
    fn constructor_property(&mut self, var: &VariableDecl, range: Option<&SourceRange>) -> Parameter {
        let ty = match (&var.ty, var.init.as_deref()) {
            (Some(ty), _) => self.kotlin_type(ty, range),
            (None, Some(init)) => match self.type_of(init) {
                Some(ty) => self.kotlin_type(&ty, range),
                None => KotlinType::named("Any"),
            },
            (None, None) => KotlinType::named("Any"),
        };
        let known = var
            .ty
            .clone()
            .or_else(|| var.init.as_deref().and_then(|init| self.type_of(init)));
        self.declare(&var.name, known);
        Parameter {
            name: self.names.identifier(&var.name),
            ty,
            default: var
                .init
                .as_deref()
                .map(|init| Box::new(self.translate_value(init))),
            binding: Some(if var.is_let { Binding::Val } else { Binding::Var }),
        }
    }

    pub(super) fn translate_class(&mut self, decl: &TypeDecl, range: Option<SourceRange>) -> TargetNode {
        let name = self.names.identifier(&decl.name);
        let mut class = ClassDef::new(&name, ClassKind::Class);
        if self.registry.is_subclassed(&decl.name) {
            class.modifiers.push(Modifier::Open);
        }
        class.supertypes = self.supertypes(decl, &[]);
        let scope = Scope::Type {
            name: decl.name.clone(),
        };
        class.members = self.members(&decl.members, scope).into_nodes(range.as_ref());
        TargetNode::new(TargetKind::Class(class), range)
    }

    pub(super) fn translate_protocol(
        &mut self,
        decl: &TypeDecl,
        range: Option<SourceRange>,
    ) -> TargetNode {
        let name = self.names.identifier(&decl.name);
        let mut class = ClassDef::new(&name, ClassKind::Interface);
        class.supertypes = decl
            .inherits
            .iter()
            .map(|name| Supertype {
                name: name.clone(),
                constructor_call: false,
            })
            .collect();
        class.members = self
            .members(&decl.members, Scope::Protocol)
            .into_nodes(range.as_ref());
        TargetNode::new(TargetKind::Class(class), range)
    }

    pub(super) fn translate_enum(&mut self, decl: &TypeDecl, range: Option<SourceRange>) -> TargetNode {
        let representation = self
            .registry
            .enum_info(&decl.name)
            .map(|info| info.representation)
            .unwrap_or_else(|| rules::enum_representation(decl));
        let (cases, others): (Vec<&SourceNode>, Vec<&SourceNode>) = decl
            .members
            .iter()
            .partition(|member| matches!(member.kind, SourceKind::EnumCase(_)));
        let cases: Vec<(&EnumCaseDecl, Option<&SourceRange>)> = cases
            .into_iter()
            .filter_map(|member| match &member.kind {
                SourceKind::EnumCase(case) => Some((case, member.range.as_ref())),
                _ => None,
            })
            .collect();
        let others: Vec<SourceNode> = others.into_iter().cloned().collect();
        let scope = Scope::Type {
            name: decl.name.clone(),
        };

        let name = self.names.identifier(&decl.name);
        let class = match representation {
            EnumRepresentation::EnumClass => {
                let raw_type = decl
                    .inherits
                    .first()
                    .filter(|ty| RAW_VALUE_TYPES.contains(&ty.as_str()))
                    .cloned();
                let mut class = ClassDef::new(&name, ClassKind::EnumClass);
                class.supertypes = self.supertypes(decl, RAW_VALUE_TYPES);
                class.entries = self.enum_entries(&decl.name, &cases, raw_type.as_deref());
                if let Some(raw_type) = &raw_type {
                    class.params.push(Parameter {
                        name: "rawValue".to_string(),
                        ty: self.kotlin_type(&SwiftType::named(raw_type.clone()), range.as_ref()),
                        default: None,
                        binding: Some(Binding::Val),
                    });
                }
                class.members = self.members(&others, scope).into_nodes(range.as_ref());
                class
            }
            EnumRepresentation::SealedClass => {
                let mut class = ClassDef::new(&name, ClassKind::SealedClass);
                class.supertypes = self.supertypes(decl, &[]);
                let mut members = Vec::with_capacity(cases.len());
                for (case, case_range) in &cases {
                    members.push(self.sealed_case(&decl.name, &name, case, *case_range));
                }
                members.extend(self.members(&others, scope).into_nodes(range.as_ref()));
                class.members = members;
                class
            }
        };
        TargetNode::new(TargetKind::Class(class), range)
    }

    fn enum_entries(
        &mut self,
        enum_name: &str,
        cases: &[(&EnumCaseDecl, Option<&SourceRange>)],
        raw_type: Option<&str>,
    ) -> Vec<EnumEntry> {
        let is_text = matches!(raw_type, Some("String" | "Character"));
        let mut next_int: Option<i64> = Some(0);
        cases
            .iter()
            .map(|(case, case_range)| {
                let case_range = case_range.cloned();
                let name = self
                    .names
                    .enum_case(enum_name, &case.name, CaseStyle::UpperSnake);
                let args = match (raw_type, case.raw_value.as_deref()) {
                    (None, _) => Vec::new(),
                    (Some(_), Some(value)) => {
                        next_int = match &value.kind {
                            SourceKind::IntegerLiteral(text) => {
                                text.parse::<i64>().ok().and_then(|n| n.checked_add(1))
                            }
                            _ => None,
                        };
                        vec![self.translate_expr(value)]
                    }
                    (Some(_), None) if is_text => {
                        vec![TargetNode::literal(Literal::String(case.name.clone()), case_range)]
                    }
                    (Some(_), None) => match next_int {
                        Some(n) => {
                            next_int = n.checked_add(1);
                            vec![int_literal(n, case_range)]
                        }
                        None => Vec::new(),
                    },
                };
                EnumEntry { name, args }
            })
            .collect()
    }

    fn sealed_case(
        &mut self,
        enum_name: &str,
        kotlin_name: &str,
        case: &EnumCaseDecl,
        range: Option<&SourceRange>,
    ) -> TargetNode {
        let name = self
            .names
            .enum_case(enum_name, &case.name, CaseStyle::UpperCamel);
        let supertype = Supertype {
            name: kotlin_name.to_string(),
            constructor_call: true,
        };
        let mut class = if case.params.is_empty() {
            ClassDef::new(name, ClassKind::Object)
        } else {
            let mut class = ClassDef::new(name, ClassKind::DataClass);
            class.params = case
                .params
                .iter()
                .map(|param| {
                    let field = param.label.as_deref().unwrap_or(&param.name);
                    Parameter {
                        name: self.names.identifier(field),
                        ty: self.kotlin_type(&param.ty, range),
                        default: None,
                        binding: Some(Binding::Val),
                    }
                })
                .collect();
            class
        };
        class.supertypes.push(supertype);
        TargetNode::new(TargetKind::Class(class), range.cloned())
    }

    pub(super) fn translate_extension(
        &mut self,
        extended: &str,
        members: &[SourceNode],
        range: Option<SourceRange>,
    ) -> Vec<TargetNode> {
        if self.registry.is_protocol(extended) {
            self.mismatch(
                format!("extension of protocol `{extended}` becomes extension functions on the interface; conforming types cannot override them"),
                range.clone(),
            );
        }
        let receiver = match crate::swift::parse_type(extended) {
            Ok(ty) => self.kotlin_type(&ty, range.as_ref()),
            Err(_) => KotlinType::named(extended),
        };
        let scope = Scope::Extension {
            receiver,
            name: extended.to_string(),
        };
        let saved = std::mem::replace(&mut self.scope, scope);
        self.enter_scope();
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            if matches!(
                member.kind,
                SourceKind::Struct(_) | SourceKind::Class(_) | SourceKind::Enum(_)
            ) {
                // Nested types are hoisted to the top level.
                let extension = std::mem::replace(&mut self.scope, Scope::TopLevel);
                out.extend(self.translate_node(member));
                self.scope = extension;
            } else {
                out.extend(self.translate_node(member));
            }
        }
        self.exit_scope();
        self.scope = saved;
        out
    }
}

fn int_literal(n: i64, range: Option<SourceRange>) -> TargetNode {
    if n < 0 {
        let magnitude = Literal::Int(n.unsigned_abs().to_string());
        TargetNode::new(
            TargetKind::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(TargetNode::literal(magnitude, range.clone())),
            },
            range,
        )
    } else {
        TargetNode::literal(Literal::Int(n.to_string()), range)
    }
}

/// `equals`/`hashCode` over the stored properties, for structs that
/// cannot be data classes.
fn equality_members(class_name: &str, stored: &[String], range: Option<&SourceRange>) -> Vec<TargetNode> {
    let range = range.cloned();
    let name = |n: &str| TargetNode::name(n, range.clone());

    let mut equal = TargetNode::new(
        TargetKind::Cast {
            kind: crate::kotlin::CastKind::Is,
            value: Box::new(name("other")),
            ty: KotlinType::named(class_name),
        },
        range.clone(),
    );
    for field in stored {
        let same = TargetNode::binary(
            BinaryOp::Eq,
            TargetNode::member(name("this"), field, range.clone()),
            TargetNode::member(name("other"), field, range.clone()),
            range.clone(),
        );
        equal = TargetNode::binary(BinaryOp::Conj, equal, same, range.clone());
    }
    let equals = FunctionDef {
        name: "equals".to_string(),
        receiver: None,
        params: vec![Parameter {
            name: "other".to_string(),
            ty: KotlinType::named("Any").nullable(),
            default: None,
            binding: None,
        }],
        return_type: Some(KotlinType::named("Boolean")),
        body: Some(vec![TargetNode::new(
            TargetKind::Return(Some(Box::new(equal))),
            range.clone(),
        )]),
        modifiers: vec![Modifier::Override],
    };

    let hash = if stored.is_empty() {
        TargetNode::literal(Literal::Int("0".to_string()), range.clone())
    } else {
        let fields = stored.iter().map(|field| name(field.as_str())).collect();
        let list = TargetNode::call(name("listOf"), fields, range.clone());
        TargetNode::call(TargetNode::member(list, "hashCode", range.clone()), Vec::new(), range.clone())
    };
    let hash_code = FunctionDef {
        name: "hashCode".to_string(),
        receiver: None,
        params: Vec::new(),
        return_type: Some(KotlinType::named("Int")),
        body: Some(vec![TargetNode::new(
            TargetKind::Return(Some(Box::new(hash))),
            range.clone(),
        )]),
        modifiers: vec![Modifier::Override],
    };

    vec![
        TargetNode::new(TargetKind::Function(equals), range.clone()),
        TargetNode::new(TargetKind::Function(hash_code), range),
    ]
}
