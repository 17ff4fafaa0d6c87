//! Framework glue vocabulary: the pieces a client or server needs from the
//! HTTP framework it targets.

use crate::algebra::Vocabulary;
use crate::codegen::{CodegenSink, Contribution, SupportDefinition};
use crate::description::{HttpMethod, ParamLocation};
use crate::error::GenError;
use crate::syntax::{Annotation, Import, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Server => "server",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkTerm {
    Imports { role: Role },
    /// Return type of a route method; `None` is an empty response.
    ResponseType { body: Option<Type> },
    RouteAnnotations { method: HttpMethod, path: String },
    ParameterAnnotations { location: ParamLocation, name: String },
    /// Shared support types every client depends on.
    TransportSupport,
}

impl Vocabulary for FrameworkTerm {
    type Output = FrameworkOutput;

    fn label(&self) -> String {
        match self {
            FrameworkTerm::Imports { role } => format!("{} imports", role.as_str()),
            FrameworkTerm::ResponseType { body: Some(body) } => format!("response type of {body}"),
            FrameworkTerm::ResponseType { body: None } => "empty response type".to_string(),
            FrameworkTerm::RouteAnnotations { method, path } => {
                format!("annotations for {} {path}", method.as_str())
            }
            FrameworkTerm::ParameterAnnotations { name, .. } => {
                format!("annotations for parameter {name}")
            }
            FrameworkTerm::TransportSupport => "transport support".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkOutput {
    Imports(Vec<Import>),
    ResponseType(Type),
    Annotations(Vec<Annotation>),
    Support(Vec<SupportDefinition>),
}

impl FrameworkOutput {
    pub fn into_imports(self) -> Result<Vec<Import>, GenError> {
        match self {
            FrameworkOutput::Imports(imports) => Ok(imports),
            other => Err(mismatch("imports", &other)),
        }
    }

    pub fn into_response_type(self) -> Result<Type, GenError> {
        match self {
            FrameworkOutput::ResponseType(ty) => Ok(ty),
            other => Err(mismatch("a response type", &other)),
        }
    }

    pub fn into_annotations(self) -> Result<Vec<Annotation>, GenError> {
        match self {
            FrameworkOutput::Annotations(annotations) => Ok(annotations),
            other => Err(mismatch("annotations", &other)),
        }
    }

    pub fn into_support(self) -> Result<Vec<SupportDefinition>, GenError> {
        match self {
            FrameworkOutput::Support(definitions) => Ok(definitions),
            other => Err(mismatch("support definitions", &other)),
        }
    }
}

fn mismatch(expected: &str, got: &FrameworkOutput) -> GenError {
    let got = match got {
        FrameworkOutput::Imports(_) => "imports",
        FrameworkOutput::ResponseType(_) => "a response type",
        FrameworkOutput::Annotations(_) => "annotations",
        FrameworkOutput::Support(_) => "support definitions",
    };
    GenError::internal(format!("expected {expected} from framework handler, got {got}"))
}

impl Contribution for FrameworkOutput {
    fn contribute(&self, sink: &mut CodegenSink) {
        if let FrameworkOutput::Support(definitions) = self {
            for definition in definitions {
                sink.add_support(definition.clone());
            }
        }
    }
}
