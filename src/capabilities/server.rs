//! Server rendering vocabulary.

use crate::algebra::Vocabulary;
use crate::codegen::{CodegenSink, Contribution, ServerDefinition};
use crate::protocol::ServerRoute;
use crate::syntax::Import;

#[derive(Debug, Clone, PartialEq)]
pub enum ServerTerm {
    /// One server interface for the routes of client group `name`.
    RenderServer {
        name: String,
        routes: Vec<ServerRoute>,
        imports: Vec<Import>,
    },
}

impl Vocabulary for ServerTerm {
    type Output = ServerOutput;

    fn label(&self) -> String {
        match self {
            ServerTerm::RenderServer { name, routes, .. } => {
                format!("render server {name} ({} routes)", routes.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerOutput(pub ServerDefinition);

impl Contribution for ServerOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        sink.add_server(self.0.clone());
    }
}
