//! Array rendering: named list types.

use crate::algebra::{Handler, Vocabulary};
use crate::bind;
use crate::codegen::{CodegenSink, Contribution, SupportDefinition};
use crate::log::Log;
use crate::outcome::Outcome;
use crate::syntax::{self, Modifier, QualifiedName, Type, TypeDecl, TypeDeclKind};

use super::{type_name, unit};

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayTerm {
    RenderArray { name: String, items: Type },
}

impl Vocabulary for ArrayTerm {
    type Output = ArrayOutput;

    fn label(&self) -> String {
        match self {
            ArrayTerm::RenderArray { name, items } => format!("render array {name} of {items}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOutput(pub SupportDefinition);

impl Contribution for ArrayOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        sink.add_support(self.0.clone());
    }
}

#[derive(Debug, Clone)]
pub struct ArrayRenderer {
    package: QualifiedName,
}

impl ArrayRenderer {
    pub fn new(package: QualifiedName) -> Self {
        Self { package }
    }
}

impl Handler<ArrayTerm> for ArrayRenderer {
    fn handle(&mut self, term: ArrayTerm, log: Log) -> Outcome<ArrayOutput> {
        let ArrayTerm::RenderArray { name, items } = term;
        if items.is_optional() {
            return Outcome::raise_user(
                format!("array '{name}' cannot hold optional items ({items})"),
                log,
            );
        }
        let (class_name, log) = bind!(type_name(&name, log));
        let (base, log) = bind!(syntax::parse_class_type("java.util.ArrayList", log));

        let mut decl = TypeDecl::new(TypeDeclKind::Class, vec![Modifier::Public], class_name.clone());
        decl.extends.push(base.with_args(vec![items]));

        let log = log.info(format!("rendered array {class_name}"));
        let definition = SupportDefinition::new(class_name, unit(&self.package, Vec::new(), decl));
        Outcome::pure(ArrayOutput(definition), log)
    }
}
