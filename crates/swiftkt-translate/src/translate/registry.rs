//! Whole-file collection pass.
//!
//! Runs once before rewriting. Records every type name the file declares
//! and fixes the representation of each struct and enum, so use sites that
//! appear before a declaration still agree with it.

use super::rules::{self, EnumRepresentation, StructRepresentation};
use crate::swift::{Param, SourceKind, SourceNode, SwiftType, TypeDecl};
use std::collections::{HashMap, HashSet};

/// One parameter of a constructor the file declares, or that Swift
/// synthesizes for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    /// Argument label at call sites; `None` for `_`.
    pub label: Option<String>,
    /// Name of the parameter in the translated Kotlin declaration.
    pub name: String,
    pub has_default: bool,
}

impl ParamInfo {
    fn declared(param: &Param) -> Self {
        Self {
            label: param.label.clone(),
            name: param.name.clone(),
            has_default: param.default.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
    pub representation: StructRepresentation,
    pub stored: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInfo {
    pub name: String,
    pub has_params: bool,
    pub params: Vec<ParamInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    pub representation: EnumRepresentation,
    pub cases: Vec<CaseInfo>,
}

impl EnumInfo {
    pub fn case(&self, name: &str) -> Option<&CaseInfo> {
        self.cases.iter().find(|case| case.name == name)
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    structs: HashMap<String, StructInfo>,
    enums: HashMap<String, EnumInfo>,
    classes: HashSet<String>,
    /// Names that appear in some class's inheritance list.
    inherited: HashSet<String>,
    protocols: HashSet<String>,
    aliases: HashMap<String, SwiftType>,
    /// Constructor parameter lists per struct or class.
    constructors: HashMap<String, Vec<Vec<ParamInfo>>>,
}

impl TypeRegistry {
    pub fn collect(root: &SourceNode) -> Self {
        let mut registry = Self::default();
        registry.visit(root);
        tracing::debug!(
            structs = registry.structs.len(),
            enums = registry.enums.len(),
            classes = registry.classes.len(),
            protocols = registry.protocols.len(),
            "collected type declarations"
        );
        registry
    }

    fn visit(&mut self, node: &SourceNode) {
        match &node.kind {
            SourceKind::File(items) => items.iter().for_each(|item| self.visit(item)),
            SourceKind::Struct(decl) => {
                let info = StructInfo {
                    representation: rules::struct_representation(decl),
                    stored: rules::stored_properties(decl)
                        .into_iter()
                        .map(|var| var.name.clone())
                        .collect(),
                };
                self.structs.entry(decl.name.clone()).or_insert(info);
                let mut constructors = initializers(decl);
                if constructors.is_empty() {
                    constructors.push(memberwise(decl));
                }
                self.constructors.entry(decl.name.clone()).or_insert(constructors);
                self.visit_members(decl);
            }
            SourceKind::Enum(decl) => {
                let cases = decl
                    .members
                    .iter()
                    .filter_map(|member| match &member.kind {
                        SourceKind::EnumCase(case) => Some(CaseInfo {
                            name: case.name.clone(),
                            has_params: !case.params.is_empty(),
                            // Case classes name their fields after the label.
                            params: case
                                .params
                                .iter()
                                .map(|param| ParamInfo {
                                    name: param.label.clone().unwrap_or_else(|| param.name.clone()),
                                    ..ParamInfo::declared(param)
                                })
                                .collect(),
                        }),
                        _ => None,
                    })
                    .collect();
                let info = EnumInfo {
                    representation: rules::enum_representation(decl),
                    cases,
                };
                self.enums.entry(decl.name.clone()).or_insert(info);
                self.visit_members(decl);
            }
            SourceKind::Class(decl) => {
                self.classes.insert(decl.name.clone());
                self.inherited.extend(decl.inherits.iter().cloned());
                self.constructors
                    .entry(decl.name.clone())
                    .or_insert_with(|| initializers(decl));
                self.visit_members(decl);
            }
            SourceKind::Protocol(decl) => {
                self.protocols.insert(decl.name.clone());
            }
            SourceKind::TypeAlias { name, ty } => {
                self.aliases.insert(name.clone(), ty.clone());
            }
            SourceKind::Extension { members, .. } => {
                members.iter().for_each(|member| self.visit(member));
            }
            SourceKind::Unknown { children, .. } => {
                children.iter().for_each(|child| self.visit(child));
            }
            _ => {}
        }
    }

    fn visit_members(&mut self, decl: &TypeDecl) {
        decl.members.iter().for_each(|member| self.visit(member));
    }

    /// A struct, class or enum declared in this file.
    pub fn is_constructible(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.classes.contains(name) || self.enums.contains_key(name)
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.is_constructible(name) || self.protocols.contains(name) || self.aliases.contains_key(name)
    }

    pub fn is_protocol(&self, name: &str) -> bool {
        self.protocols.contains(name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// A declared class that another declared class inherits from.
    pub fn is_subclassed(&self, name: &str) -> bool {
        self.classes.contains(name) && self.inherited.contains(name)
    }

    pub fn struct_info(&self, name: &str) -> Option<&StructInfo> {
        self.structs.get(name)
    }

    pub fn enum_info(&self, name: &str) -> Option<&EnumInfo> {
        self.enums.get(name)
    }

    /// The only declared enum with a case named `case`, if exactly one has it.
    pub fn enum_for_case(&self, case: &str) -> Option<&str> {
        let mut owners = self
            .enums
            .iter()
            .filter(|(_, info)| info.case(case).is_some())
            .map(|(name, _)| name.as_str());
        match (owners.next(), owners.next()) {
            (Some(owner), None) => Some(owner),
            _ => None,
        }
    }

    /// Kotlin parameter names for a constructor call on `type_name` with the
    /// given argument labels. `None` when no declared constructor accepts them.
    pub fn argument_names(&self, type_name: &str, labels: &[Option<&str>]) -> Option<Vec<String>> {
        self.constructors
            .get(type_name)?
            .iter()
            .find_map(|params| match_labels(params, labels))
    }

    /// Kotlin field names for constructing the enum case `case` with `labels`.
    pub fn case_argument_names(
        &self,
        enum_name: &str,
        case: &str,
        labels: &[Option<&str>],
    ) -> Option<Vec<String>> {
        let case = self.enum_info(enum_name)?.case(case)?;
        match_labels(&case.params, labels)
    }

    /// Follows type aliases to the aliased struct/enum name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        for _ in 0..8 {
            match self.aliases.get(current).and_then(SwiftType::name) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }
}

fn initializers(decl: &TypeDecl) -> Vec<Vec<ParamInfo>> {
    decl.members
        .iter()
        .filter_map(|member| match &member.kind {
            SourceKind::Initializer { params, .. } => {
                Some(params.iter().map(ParamInfo::declared).collect())
            }
            _ => None,
        })
        .collect()
}

/// The initializer Swift synthesizes from a struct's stored properties.
fn memberwise(decl: &TypeDecl) -> Vec<ParamInfo> {
    rules::stored_properties(decl)
        .into_iter()
        .map(|var| ParamInfo {
            label: Some(var.name.clone()),
            name: var.name.clone(),
            has_default: var.init.is_some(),
        })
        .collect()
}

/// Pair arguments with parameters the way Swift does: in order, with
/// defaulted parameters skippable. Returns the matched parameter names.
fn match_labels(params: &[ParamInfo], labels: &[Option<&str>]) -> Option<Vec<String>> {
    let mut names = Vec::with_capacity(labels.len());
    let mut remaining = labels.iter().peekable();
    for param in params {
        match remaining.peek() {
            Some(label) if **label == param.label.as_deref() => {
                names.push(param.name.clone());
                remaining.next();
            }
            _ if param.has_default => {}
            _ => return None,
        }
    }
    remaining.peek().is_none().then_some(names)
}
