//! Enum rendering.

use std::collections::HashSet;

use crate::algebra::{Handler, Vocabulary};
use crate::bind;
use crate::codegen::{CodegenSink, Contribution, SupportDefinition};
use crate::log::Log;
use crate::outcome::{traverse, Outcome};
use crate::syntax::naming::{sanitize_constant_name, unique_identifier};
use crate::syntax::{
    self, Annotation, ConstructorDecl, EnumConstant, Expr, FieldDecl, Member, MethodDecl, Modifier,
    Parameter, QualifiedName, Stmt, TypeDecl, TypeDeclKind,
};

use super::{type_name, unit};

#[derive(Debug, Clone, PartialEq)]
pub enum EnumTerm {
    /// Enum over string wire values, in declaration order.
    RenderEnum { name: String, values: Vec<String> },
}

impl Vocabulary for EnumTerm {
    type Output = EnumOutput;

    fn label(&self) -> String {
        match self {
            EnumTerm::RenderEnum { name, .. } => format!("render enum {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumOutput(pub SupportDefinition);

impl Contribution for EnumOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        sink.add_support(self.0.clone());
    }
}

#[derive(Debug, Clone)]
pub struct EnumRenderer {
    package: QualifiedName,
}

impl EnumRenderer {
    pub fn new(package: QualifiedName) -> Self {
        Self { package }
    }

    fn render(&self, name: &str, values: Vec<String>, log: Log) -> Outcome<SupportDefinition> {
        if values.is_empty() {
            return Outcome::raise_user(format!("enum '{name}' declares no values"), log);
        }
        let (enum_name, log) = bind!(type_name(name, log));

        let mut used = HashSet::new();
        let (constants, log) = bind!(traverse(&values, log, |value, log| {
            let constant = unique_identifier(&sanitize_constant_name(value), &mut used);
            syntax::parse_name(&constant, log).map(|name| EnumConstant {
                name,
                args: vec![Expr::string(value.clone())],
            })
        }));

        let (string_ty, log) = bind!(syntax::parse_type("String", log));
        let (value_name, log) = bind!(syntax::parse_name("value", log));
        let (getter, log) = bind!(syntax::parse_name("getValue", log));
        let (to_string, log) = bind!(syntax::parse_name("toString", log));
        let (override_name, log) = bind!(syntax::parse_qualified_name("Override", log));

        let mut decl = TypeDecl::new(TypeDeclKind::Enum, vec![Modifier::Public], enum_name.clone());
        decl.constants = constants;
        decl.members.push(Member::Field(FieldDecl::new(
            vec![Modifier::Private, Modifier::Final],
            string_ty.clone(),
            value_name.clone(),
        )));
        decl.members.push(Member::Constructor(ConstructorDecl {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            name: enum_name.clone(),
            params: vec![Parameter::new(string_ty.clone(), value_name.clone())],
            body: vec![Stmt::Expr(Expr::assign(
                Expr::this_field(value_name.clone()),
                Expr::name(value_name.clone()),
            ))],
        }));

        let mut get_value = MethodDecl::new(vec![Modifier::Public], string_ty.clone(), getter);
        get_value.body = Some(vec![Stmt::Return(Some(Expr::this_field(value_name.clone())))]);
        decl.members.push(Member::Method(get_value));

        let mut to_string = MethodDecl::new(vec![Modifier::Public], string_ty, to_string);
        to_string.annotations.push(Annotation::marker(override_name));
        to_string.body = Some(vec![Stmt::Return(Some(Expr::this_field(value_name)))]);
        decl.members.push(Member::Method(to_string));

        let log = log.info(format!("rendered enum {enum_name} ({} values)", values.len()));
        let definition = SupportDefinition::new(enum_name, unit(&self.package, Vec::new(), decl));
        Outcome::pure(definition, log)
    }
}

impl Handler<EnumTerm> for EnumRenderer {
    fn handle(&mut self, term: EnumTerm, log: Log) -> Outcome<EnumOutput> {
        match term {
            EnumTerm::RenderEnum { name, values } => {
                self.render(&name, values, log).map(EnumOutput)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::syntax::parser::parse_qualified_name;

    fn render(name: &str, values: &[&str]) -> Outcome<EnumOutput> {
        let mut renderer = EnumRenderer::new(parse_qualified_name("com.example.api").unwrap());
        renderer.handle(
            EnumTerm::RenderEnum {
                name: name.to_string(),
                values: values.iter().map(|v| v.to_string()).collect(),
            },
            Log::new(),
        )
    }

    #[test]
    fn renders_constants_with_wire_values() {
        let EnumOutput(def) = render("pet-status", &["available", "on hold", "404"])
            .unsafe_run()
            .unwrap();
        let text = def.unit().to_string();
        assert!(text.contains("public enum PetStatus {\n"));
        assert!(text.contains("    AVAILABLE(\"available\"),\n    ON_HOLD(\"on hold\"),\n    V_404(\"404\");\n"));
        assert!(text.contains("    PetStatus(String value) {\n"));
        assert!(text.contains("    @Override\n    public String toString() {\n"));
    }

    #[test]
    fn colliding_constants_get_suffixes() {
        let EnumOutput(def) = render("Kind", &["a-b", "a_b"]).unsafe_run().unwrap();
        let names: Vec<_> = def.unit().types[0]
            .constants
            .iter()
            .map(|c| c.name.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["A_B", "A_B2"]);
    }

    #[test]
    fn empty_enum_is_user_error() {
        let out = render("Empty", &[]);
        assert_eq!(out.error().unwrap().kind(), ErrorKind::User);
    }
}
