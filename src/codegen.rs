//! Codegen Result assembly.
//!
//! Handler answers contribute their definitions to a [`CodegenSink`] as they
//! are produced; the sink is sealed into a [`CodegenResult`] once the whole
//! program has run. Definitions keep the order their instructions executed in.

use serde::Serialize;

use crate::algebra::{End, Sum};
use crate::syntax::{CompilationUnit, Name};
use crate::verify::compute_sha256;

macro_rules! definition {
    ($(#[$meta:meta])* $ty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $ty {
            name: Name,
            unit: CompilationUnit,
        }

        impl $ty {
            pub fn new(name: Name, unit: CompilationUnit) -> Self {
                Self { name, unit }
            }

            pub fn name(&self) -> &Name {
                &self.name
            }

            pub fn unit(&self) -> &CompilationUnit {
                &self.unit
            }
        }
    };
}

definition!(
    /// Model, enum, array, union or transport type shared by clients and servers.
    SupportDefinition
);
definition!(
    /// Client class for one group of routes.
    ClientDefinition
);
definition!(
    /// Server interface for one group of routes.
    ServerDefinition
);

/// Handler answers that carry definitions into the result.
pub trait Contribution {
    fn contribute(&self, sink: &mut CodegenSink);
}

impl Contribution for End {
    fn contribute(&self, _sink: &mut CodegenSink) {
        match *self {}
    }
}

impl<H: Contribution, T: Contribution> Contribution for Sum<H, T> {
    fn contribute(&self, sink: &mut CodegenSink) {
        match self {
            Sum::Head(output) => output.contribute(sink),
            Sum::Tail(output) => output.contribute(sink),
        }
    }
}

#[derive(Debug, Default)]
/// Accumulates definitions while a program runs.
pub struct CodegenSink {
    clients: Vec<ClientDefinition>,
    servers: Vec<ServerDefinition>,
    support: Vec<SupportDefinition>,
}

impl CodegenSink {
    pub fn add_client(&mut self, definition: ClientDefinition) {
        self.clients.push(definition);
    }

    pub fn add_server(&mut self, definition: ServerDefinition) {
        self.servers.push(definition);
    }

    pub fn add_support(&mut self, definition: SupportDefinition) {
        self.support.push(definition);
    }

    pub(crate) fn finish(self) -> CodegenResult {
        CodegenResult {
            clients: self.clients,
            servers: self.servers,
            support: self.support,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything one successful generation run produced. Immutable once built.
pub struct CodegenResult {
    clients: Vec<ClientDefinition>,
    servers: Vec<ServerDefinition>,
    support: Vec<SupportDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Relative path, `/`-separated.
    pub path: String,
    pub contents: String,
}

impl CodegenResult {
    pub fn clients(&self) -> &[ClientDefinition] {
        &self.clients
    }

    pub fn servers(&self) -> &[ServerDefinition] {
        &self.servers
    }

    pub fn support_definitions(&self) -> &[SupportDefinition] {
        &self.support
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.servers.is_empty() && self.support.is_empty()
    }

    /// One file per definition: support first, then clients, then servers.
    pub fn files(&self) -> Vec<GeneratedFile> {
        let support = self.support.iter().map(|d| (&d.name, &d.unit));
        let clients = self.clients.iter().map(|d| (&d.name, &d.unit));
        let servers = self.servers.iter().map(|d| (&d.name, &d.unit));
        support
            .chain(clients)
            .chain(servers)
            .map(|(name, unit)| GeneratedFile {
                path: file_path(name, unit),
                contents: unit.to_string(),
            })
            .collect()
    }

    /// `sha256:<hex>` over every file path and its contents, in file order.
    pub fn fingerprint(&self) -> String {
        let mut bytes = Vec::new();
        for file in self.files() {
            bytes.extend_from_slice(file.path.as_bytes());
            bytes.push(0);
            bytes.extend_from_slice(file.contents.as_bytes());
            bytes.push(0);
        }
        compute_sha256(&bytes)
    }
}

fn file_path(name: &Name, unit: &CompilationUnit) -> String {
    let mut path = String::new();
    if let Some(package) = &unit.package {
        for segment in package.segments() {
            path.push_str(segment.as_str());
            path.push('/');
        }
    }
    path.push_str(name.as_str());
    path.push_str(".java");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::{parse_compilation_unit, parse_name};

    fn support(name: &str, source: &str) -> SupportDefinition {
        SupportDefinition::new(
            parse_name(name).unwrap(),
            parse_compilation_unit(source).unwrap(),
        )
    }

    #[test]
    fn files_follow_package_layout_and_result_order() {
        let mut sink = CodegenSink::default();
        sink.add_server(ServerDefinition::new(
            parse_name("PetsHandler").unwrap(),
            parse_compilation_unit("package a.b; public interface PetsHandler {}").unwrap(),
        ));
        sink.add_support(support("Pet", "package a.b; public class Pet {}"));
        sink.add_client(ClientDefinition::new(
            parse_name("PetsClient").unwrap(),
            parse_compilation_unit("package a.b; public class PetsClient {}").unwrap(),
        ));
        let result = sink.finish();

        let paths: Vec<_> = result.files().into_iter().map(|f| f.path).collect();
        assert_eq!(
            paths,
            vec!["a/b/Pet.java", "a/b/PetsClient.java", "a/b/PetsHandler.java"]
        );
    }

    #[test]
    fn unit_without_package_lands_at_root() {
        let mut sink = CodegenSink::default();
        sink.add_support(support("Pet", "class Pet {}"));
        assert_eq!(sink.finish().files()[0].path, "Pet.java");
    }

    #[test]
    fn fingerprint_tracks_contents() {
        let mut first = CodegenSink::default();
        first.add_support(support("Pet", "package a; class Pet {}"));
        let mut second = CodegenSink::default();
        second.add_support(support("Pet", "package a; class Pet { int id; }"));

        let first = first.finish();
        assert_eq!(first.fingerprint(), first.clone().fingerprint());
        assert_ne!(first.fingerprint(), second.finish().fingerprint());
        assert!(first.fingerprint().starts_with("sha256:"));
    }
}
