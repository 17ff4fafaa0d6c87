//! Instruction vocabularies, one per generation concern, with their default
//! handlers. The client, server and framework vocabularies are handled by a
//! framework plugin (see [`crate::frameworks`]).

use crate::log::Log;
use crate::outcome::Outcome;
use crate::syntax::naming::{sanitize_member_name, sanitize_type_name, to_pascal_case};
use crate::syntax::{self, unescape_reserved_word, CompilationUnit, Import, Name, QualifiedName, TypeDecl};

pub mod arrays;
pub mod client;
pub mod enums;
pub mod framework;
pub mod models;
pub mod parsing;
pub mod poly;
pub mod server;

/// Java type name for a wire name.
pub fn type_name(raw: &str, log: Log) -> Outcome<Name> {
    syntax::parse_name(&sanitize_type_name(raw), log)
}

/// Java member name for a wire name; reserved words come back escaped.
pub fn member_name(raw: &str, fallback: &str, log: Log) -> Outcome<Name> {
    syntax::parse_name(&sanitize_member_name(raw, fallback), log)
}

/// `getFoo` for member `foo`. An escaped member reads as its plain word.
pub fn getter_name(member: &Name, log: Log) -> Outcome<Name> {
    let mut getter = format!("get{}", to_pascal_case(&unescape_reserved_word(member.as_str())));
    // Object.getClass is final.
    if getter == "getClass" {
        getter.push('_');
    }
    syntax::parse_name(&getter, log)
}

/// Unit holding `decl` in `package`.
pub(crate) fn unit(package: &QualifiedName, imports: Vec<Import>, decl: TypeDecl) -> CompilationUnit {
    CompilationUnit::single(Some(package.clone()), imports, decl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<T>(out: Outcome<T>) -> T {
        out.unsafe_run().unwrap()
    }

    #[test]
    fn names_are_sanitized_then_validated() {
        assert_eq!(run(type_name("pet-store", Log::new())).as_str(), "PetStore");
        assert_eq!(run(member_name("class", "field", Log::new())).as_str(), "class_");
        assert_eq!(run(member_name("pet_id", "field", Log::new())).as_str(), "petId");
    }

    #[test]
    fn getters_use_the_unescaped_word() {
        let default = run(member_name("default", "field", Log::new()));
        assert_eq!(run(getter_name(&default, Log::new())).as_str(), "getDefault");
        let class = run(member_name("class", "field", Log::new()));
        assert_eq!(run(getter_name(&class, Log::new())).as_str(), "getClass_");
    }
}
