//! Polymorphic rendering: discriminated unions as interfaces.
//!
//! The union becomes an interface with a getter for the discriminator property
//! and one string constant per variant. Variant classes implement it; their own
//! discriminator property supplies the getter.

use std::collections::HashSet;

use crate::algebra::{Handler, Vocabulary};
use crate::bind;
use crate::codegen::{CodegenSink, Contribution, SupportDefinition};
use crate::log::Log;
use crate::outcome::{traverse, Outcome};
use crate::protocol::UnionVariant;
use crate::syntax::naming::{sanitize_constant_name, unique_identifier};
use crate::syntax::{
    self, Expr, FieldDecl, Member, MethodDecl, Modifier, QualifiedName, TypeDecl, TypeDeclKind,
};

use super::{getter_name, member_name, type_name, unit};

#[derive(Debug, Clone, PartialEq)]
pub enum PolyTerm {
    RenderUnion {
        name: String,
        /// Wire name of the discriminator property.
        discriminator: String,
        variants: Vec<UnionVariant>,
    },
}

impl Vocabulary for PolyTerm {
    type Output = PolyOutput;

    fn label(&self) -> String {
        match self {
            PolyTerm::RenderUnion { name, variants, .. } => {
                format!("render union {name} ({} variants)", variants.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolyOutput(pub SupportDefinition);

impl Contribution for PolyOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        sink.add_support(self.0.clone());
    }
}

#[derive(Debug, Clone)]
pub struct UnionRenderer {
    package: QualifiedName,
}

impl UnionRenderer {
    pub fn new(package: QualifiedName) -> Self {
        Self { package }
    }

    fn render(
        &self,
        name: &str,
        discriminator: &str,
        variants: Vec<UnionVariant>,
        log: Log,
    ) -> Outcome<SupportDefinition> {
        if variants.is_empty() {
            return Outcome::raise_user(format!("union '{name}' declares no variants"), log);
        }
        let (interface_name, log) = bind!(type_name(name, log));
        let (string_ty, log) = bind!(syntax::parse_type("String", log));

        let mut decl = TypeDecl::new(
            TypeDeclKind::Interface,
            vec![Modifier::Public],
            interface_name.clone(),
        );

        let mut used = HashSet::new();
        let (constants, log) = bind!(traverse(&variants, log, |variant, log| {
            let constant = unique_identifier(&sanitize_constant_name(&variant.value), &mut used);
            let (constant, log) = bind!(syntax::parse_name(&constant, log));
            let mut field = FieldDecl::new(
                vec![Modifier::Public, Modifier::Static, Modifier::Final],
                string_ty.clone(),
                constant,
            );
            field.init = Some(Expr::string(variant.value.clone()));
            let log = log.debug(format!("{} is a variant of {interface_name}", variant.ty));
            Outcome::pure(Member::Field(field), log)
        }));
        decl.members.extend(constants);

        let (member, log) = bind!(member_name(discriminator, "type", log));
        let (getter, log) = bind!(getter_name(&member, log));
        decl.members
            .push(Member::Method(MethodDecl::new(Vec::new(), string_ty, getter)));

        let log = log.info(format!(
            "rendered union {interface_name} ({} variants)",
            variants.len()
        ));
        let definition =
            SupportDefinition::new(interface_name, unit(&self.package, Vec::new(), decl));
        Outcome::pure(definition, log)
    }
}

impl Handler<PolyTerm> for UnionRenderer {
    fn handle(&mut self, term: PolyTerm, log: Log) -> Outcome<PolyOutput> {
        match term {
            PolyTerm::RenderUnion {
                name,
                discriminator,
                variants,
            } => self
                .render(&name, &discriminator, variants, log)
                .map(PolyOutput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::{parse_qualified_name, parse_type};

    fn render(variants: &[(&str, &str)]) -> Outcome<PolyOutput> {
        let mut renderer = UnionRenderer::new(parse_qualified_name("com.example.api").unwrap());
        renderer.handle(
            PolyTerm::RenderUnion {
                name: "animal".to_string(),
                discriminator: "pet_type".to_string(),
                variants: variants
                    .iter()
                    .map(|(value, ty)| UnionVariant {
                        value: value.to_string(),
                        ty: parse_type(ty).unwrap(),
                    })
                    .collect(),
            },
            Log::new(),
        )
    }

    #[test]
    fn renders_interface_with_constants_and_discriminator_getter() {
        let PolyOutput(def) = render(&[("Cat", "Cat"), ("Dog", "Dog")]).unsafe_run().unwrap();
        let expected = "\
package com.example.api;

public interface Animal {
    public static final String CAT = \"Cat\";
    public static final String DOG = \"Dog\";

    String getPetType();
}
";
        assert_eq!(def.unit().to_string(), expected);
    }

    #[test]
    fn union_without_variants_is_user_error() {
        let out = render(&[]);
        assert!(out.error().unwrap().message().contains("declares no variants"));
    }
}
