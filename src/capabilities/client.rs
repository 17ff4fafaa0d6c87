//! Client rendering vocabulary.

use crate::algebra::Vocabulary;
use crate::codegen::{ClientDefinition, CodegenSink, Contribution};
use crate::protocol::ClientRoute;
use crate::syntax::Import;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientTerm {
    /// One client class for the routes of client group `name`.
    RenderClient {
        name: String,
        routes: Vec<ClientRoute>,
        imports: Vec<Import>,
    },
}

impl Vocabulary for ClientTerm {
    type Output = ClientOutput;

    fn label(&self) -> String {
        match self {
            ClientTerm::RenderClient { name, routes, .. } => {
                format!("render client {name} ({} routes)", routes.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientOutput(pub ClientDefinition);

impl Contribution for ClientOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        sink.add_client(self.0.clone());
    }
}
