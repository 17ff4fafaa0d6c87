//! Type introspection and well-known type builders.
//!
//! Capability handlers look at a [`Type`] only through these functions.

use super::ast::{ClassType, PrimitiveType, QualifiedName, Type, TypeArg, TypeKind};

const OPTIONAL: &str = "java.util.Optional";
const FUTURE: &str = "java.util.concurrent.CompletionStage";
const FUNCTION: &str = "java.util.function.Function";
const SUPPLIER: &str = "java.util.function.Supplier";
const LIST: &str = "java.util.List";
const MAP: &str = "java.util.Map";

impl Type {
    /// True iff this is `Optional` or `java.util.Optional`, with any arguments.
    pub fn is_optional(&self) -> bool {
        match &self.0 {
            TypeKind::Class(class) => {
                let name = class.name().to_string();
                name == OPTIONAL || name == "Optional"
            }
            _ => false,
        }
    }

    /// The sole type argument when there is exactly one, otherwise the type itself.
    pub fn contained_type(&self) -> Type {
        if let TypeKind::Class(class) = &self.0 {
            if let [TypeArg::Type(inner)] = class.args() {
                return inner.clone();
            }
        }
        self.clone()
    }

    /// `Integer` becomes `int` and so on; anything else is returned as is.
    pub fn unbox(&self) -> Type {
        if let TypeKind::Class(class) = &self.0 {
            if class.args().is_empty() {
                let name = class.name().to_string();
                if let Some(primitive) = PrimitiveType::from_boxed_name(&name) {
                    return Type::primitive(primitive);
                }
            }
        }
        self.clone()
    }

    pub fn boxed(&self) -> Type {
        match &self.0 {
            TypeKind::Primitive(primitive) => Type::class(ClassType::new(
                QualifiedName::well_known(primitive.boxed_name()),
                Vec::new(),
            )),
            _ => self.clone(),
        }
    }

    /// Compares the full qualified name if `name` contains a dot, the last
    /// segment otherwise. Only class types have a name.
    pub fn is_named(&self, name: &str) -> bool {
        match &self.0 {
            TypeKind::Class(class) if name.contains('.') => class.name().to_string() == name,
            TypeKind::Class(class) => class.name().name().as_str() == name,
            _ => false,
        }
    }

    pub fn name(&self) -> Option<String> {
        match &self.0 {
            TypeKind::Class(class) => Some(class.name().to_string()),
            _ => None,
        }
    }

    /// The type with all type arguments removed.
    pub fn erasure(&self) -> Type {
        match &self.0 {
            TypeKind::Class(class) => {
                Type::class(ClassType::new(class.name().clone(), Vec::new()))
            }
            TypeKind::Array(element) => Type::array(element.erasure()),
            _ => self.clone(),
        }
    }
}

fn generic(path: &str, args: Vec<Type>) -> Type {
    Type::class(ClassType::new(
        QualifiedName::well_known(path),
        args.into_iter().map(TypeArg::Type).collect(),
    ))
}

pub fn optional_type(inner: Type) -> Type {
    generic(OPTIONAL, vec![inner])
}

pub fn future_type(inner: Type) -> Type {
    generic(FUTURE, vec![inner])
}

pub fn function_type(input: Type, output: Type) -> Type {
    generic(FUNCTION, vec![input, output])
}

pub fn supplier_type(inner: Type) -> Type {
    generic(SUPPLIER, vec![inner])
}

pub fn list_type(item: Type) -> Type {
    generic(LIST, vec![item])
}

pub fn map_type(key: Type, value: Type) -> Type {
    generic(MAP, vec![key, value])
}
