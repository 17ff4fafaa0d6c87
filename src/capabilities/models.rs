//! Model rendering: immutable value classes for object schemas.

use std::collections::HashSet;

use crate::algebra::{Handler, Vocabulary};
use crate::bind;
use crate::codegen::{CodegenSink, Contribution, SupportDefinition};
use crate::error::GenError;
use crate::log::Log;
use crate::outcome::{traverse, Outcome};
use crate::protocol::ProtocolField;
use crate::syntax::{
    ConstructorDecl, Expr, FieldDecl, Member, MethodDecl, Modifier, Parameter, QualifiedName,
    Stmt, Type, TypeDecl, TypeDeclKind,
};

use super::{getter_name, member_name, unit};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelTerm {
    /// Names a property and settles its Java type. Required properties are unboxed.
    TransformProperty {
        class_name: String,
        property_name: String,
        ty: Type,
        required: bool,
    },
    RenderClass {
        name: String,
        fields: Vec<ProtocolField>,
        /// Interfaces the class implements.
        parents: Vec<Type>,
    },
}

impl Vocabulary for ModelTerm {
    type Output = ModelOutput;

    fn label(&self) -> String {
        match self {
            ModelTerm::TransformProperty {
                class_name,
                property_name,
                ..
            } => format!("transform property {class_name}.{property_name}"),
            ModelTerm::RenderClass { name, .. } => format!("render class {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Field(ProtocolField),
    Class(SupportDefinition),
}

impl ModelOutput {
    pub fn into_field(self) -> Result<ProtocolField, GenError> {
        match self {
            ModelOutput::Field(field) => Ok(field),
            ModelOutput::Class(def) => Err(GenError::internal(format!(
                "expected a field from model renderer, got class {}",
                def.name()
            ))),
        }
    }

    pub fn into_class(self) -> Result<SupportDefinition, GenError> {
        match self {
            ModelOutput::Class(def) => Ok(def),
            ModelOutput::Field(field) => Err(GenError::internal(format!(
                "expected a class from model renderer, got field {}",
                field.name
            ))),
        }
    }
}

impl Contribution for ModelOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        if let ModelOutput::Class(def) = self {
            sink.add_support(def.clone());
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelRenderer {
    package: QualifiedName,
}

impl ModelRenderer {
    pub fn new(package: QualifiedName) -> Self {
        Self { package }
    }

    fn transform(
        &self,
        class_name: &str,
        property_name: String,
        ty: Type,
        required: bool,
        log: Log,
    ) -> Outcome<ProtocolField> {
        let (term, log) = bind!(member_name(&property_name, "field", log));
        let ty = if required { ty.unbox() } else { ty };
        let log = log.debug(format!("{class_name}.{property_name} -> {ty} {term}"));
        Outcome::pure(
            ProtocolField {
                name: property_name,
                term,
                ty,
                required,
            },
            log,
        )
    }

    fn render(
        &self,
        name: &str,
        fields: Vec<ProtocolField>,
        parents: Vec<Type>,
        log: Log,
    ) -> Outcome<SupportDefinition> {
        let (class_name, log) = bind!(super::type_name(name, log));

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.term.clone()) {
                return Outcome::raise_user(
                    format!("class {class_name} has two properties named '{}'", field.term),
                    log,
                );
            }
        }

        let mut decl = TypeDecl::new(TypeDeclKind::Class, vec![Modifier::Public], class_name.clone());
        for parent in parents {
            match parent.into_class_type() {
                Some(parent) => decl.implements.push(parent),
                None => {
                    return Outcome::raise_internal(
                        format!("parent of {class_name} is not a class or interface type"),
                        log,
                    )
                }
            }
        }

        for field in &fields {
            decl.members.push(Member::Field(FieldDecl::new(
                vec![Modifier::Private, Modifier::Final],
                field.ty.clone(),
                field.term.clone(),
            )));
        }

        decl.members.push(Member::Constructor(ConstructorDecl {
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            name: class_name.clone(),
            params: fields
                .iter()
                .map(|f| Parameter::new(f.ty.clone(), f.term.clone()))
                .collect(),
            body: fields
                .iter()
                .map(|f| {
                    Stmt::Expr(Expr::assign(
                        Expr::this_field(f.term.clone()),
                        Expr::name(f.term.clone()),
                    ))
                })
                .collect(),
        }));

        let (getters, log) = bind!(traverse(&fields, log, |field, log| {
            let (getter, log) = bind!(getter_name(&field.term, log));
            let mut method = MethodDecl::new(vec![Modifier::Public], field.ty.clone(), getter);
            method.body = Some(vec![Stmt::Return(Some(Expr::this_field(field.term.clone())))]);
            Outcome::pure(Member::Method(method), log)
        }));
        decl.members.extend(getters);

        let log = log.info(format!("rendered model {class_name} ({} fields)", fields.len()));
        let definition = SupportDefinition::new(class_name, unit(&self.package, Vec::new(), decl));
        Outcome::pure(definition, log)
    }
}

impl Handler<ModelTerm> for ModelRenderer {
    fn handle(&mut self, term: ModelTerm, log: Log) -> Outcome<ModelOutput> {
        match term {
            ModelTerm::TransformProperty {
                class_name,
                property_name,
                ty,
                required,
            } => self
                .transform(&class_name, property_name, ty, required, log)
                .map(ModelOutput::Field),
            ModelTerm::RenderClass {
                name,
                fields,
                parents,
            } => self.render(&name, fields, parents, log).map(ModelOutput::Class),
        }
    }
}
