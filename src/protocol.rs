//! Resolved protocol model shared between capabilities.
//!
//! Description types are resolved to Java [`Type`]s and wire names to escaped
//! [`Name`]s before any renderer sees them.

use crate::description::{HttpMethod, ParamLocation};
use crate::syntax::{Annotation, Name, Type};

#[derive(Debug, Clone, PartialEq)]
/// A model property after type resolution and name escaping.
pub struct ProtocolField {
    /// Name on the wire.
    pub name: String,
    /// Java member name.
    pub term: Name,
    pub ty: Type,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteParam {
    pub name: String,
    pub term: Name,
    pub location: ParamLocation,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
/// One endpoint, resolved.
pub struct Route {
    pub operation: Name,
    /// Client group the route belongs to.
    pub client: String,
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<RouteParam>,
    pub body: Option<Type>,
    /// First 2xx response body.
    pub response: Option<Type>,
}

impl Route {
    /// Path split into literal text and the parameter names between braces.
    pub fn path_segments(&self) -> Vec<PathSegment<'_>> {
        let mut segments = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            if open > 0 {
                segments.push(PathSegment::Literal(&rest[..open]));
            }
            segments.push(PathSegment::Param(&rest[open + 1..open + close]));
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            segments.push(PathSegment::Literal(rest));
        }
        segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientRoute {
    pub route: Route,
    /// What the client method returns, e.g. `CompletableFuture<Pet>`.
    pub return_type: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerRoute {
    pub route: Route,
    pub return_type: Type,
    pub annotations: Vec<Annotation>,
    /// Per entry of `route.params`, in order.
    pub parameter_annotations: Vec<Vec<Annotation>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    /// Discriminator value on the wire.
    pub value: String,
    pub ty: Type,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_name;

    fn route(path: &str) -> Route {
        Route {
            operation: parse_name("op").unwrap(),
            client: "default".to_string(),
            method: HttpMethod::Get,
            path: path.to_string(),
            params: Vec::new(),
            body: None,
            response: None,
        }
    }

    #[test]
    fn splits_path_around_placeholders() {
        assert_eq!(
            route("/pets/{petId}/toys/{toyId}").path_segments(),
            vec![
                PathSegment::Literal("/pets/"),
                PathSegment::Param("petId"),
                PathSegment::Literal("/toys/"),
                PathSegment::Param("toyId"),
            ]
        );
        assert_eq!(route("/pets").path_segments(), vec![PathSegment::Literal("/pets")]);
    }
}
