//! Description parsing: schema indexing, type resolution and route extraction.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::algebra::{Handler, Vocabulary};
use crate::codegen::{CodegenSink, Contribution};
use crate::description::{Endpoint, ParamLocation, SchemaDef, TypeRef};
use crate::error::GenError;
use crate::log::Log;
use crate::outcome::{scoped, traverse, Outcome};
use crate::protocol::{Route, RouteParam};
use crate::syntax::{self, list_type, map_type, optional_type, Name, Type};
use crate::bind;

use super::{member_name, type_name};

#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionTerm {
    /// Registers every schema name so references can be resolved.
    IndexSchemas { schemas: Vec<SchemaDef> },
    /// Java type for a description type; `optional` wraps it in `Optional`.
    ResolveType { type_ref: TypeRef, optional: bool },
    ExtractRoutes { endpoints: Vec<Endpoint> },
}

impl Vocabulary for DescriptionTerm {
    type Output = DescriptionOutput;

    fn label(&self) -> String {
        match self {
            DescriptionTerm::IndexSchemas { schemas } => {
                format!("index {} schemas", schemas.len())
            }
            DescriptionTerm::ResolveType { type_ref, .. } => format!("resolve {type_ref:?}"),
            DescriptionTerm::ExtractRoutes { endpoints } => {
                format!("extract {} routes", endpoints.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionOutput {
    /// Java type names of the indexed schemas, in declaration order.
    Indexed(Vec<Name>),
    Type(Type),
    Routes(Vec<Route>),
}

impl DescriptionOutput {
    pub fn into_indexed(self) -> Result<Vec<Name>, GenError> {
        match self {
            DescriptionOutput::Indexed(names) => Ok(names),
            other => Err(mismatch("schema index", &other)),
        }
    }

    pub fn into_type(self) -> Result<Type, GenError> {
        match self {
            DescriptionOutput::Type(ty) => Ok(ty),
            other => Err(mismatch("type", &other)),
        }
    }

    pub fn into_routes(self) -> Result<Vec<Route>, GenError> {
        match self {
            DescriptionOutput::Routes(routes) => Ok(routes),
            other => Err(mismatch("routes", &other)),
        }
    }
}

fn mismatch(expected: &str, got: &DescriptionOutput) -> GenError {
    GenError::internal(format!("expected {expected} from description parser, got {got:?}"))
}

impl Contribution for DescriptionOutput {
    fn contribute(&self, _sink: &mut CodegenSink) {}
}

#[derive(Debug, Clone, Default)]
/// Resolves description types against the indexed schemas.
pub struct DescriptionParser {
    /// Wire name to Java type name.
    known: BTreeMap<String, Name>,
}

impl DescriptionParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, schemas: Vec<SchemaDef>, log: Log) -> Outcome<Vec<Name>> {
        let mut taken: BTreeMap<String, String> = self
            .known
            .iter()
            .map(|(wire, name)| (name.as_str().to_string(), wire.clone()))
            .collect();
        let mut names = Vec::new();
        let mut log = log;
        for schema in schemas {
            if self.known.contains_key(&schema.name) {
                return Outcome::raise_user(
                    format!("duplicate schema name '{}'", schema.name),
                    log,
                );
            }
            let (name, next) = bind!(type_name(&schema.name, log));
            log = next;
            if let Some(previous) = taken.get(name.as_str()) {
                return Outcome::raise_user(
                    format!(
                        "schemas '{previous}' and '{}' both map to Java type '{name}'",
                        schema.name
                    ),
                    log,
                );
            }
            taken.insert(name.as_str().to_string(), schema.name.clone());
            log = log.debug(format!("schema '{}' -> {name}", schema.name));
            self.known.insert(schema.name, name.clone());
            names.push(name);
        }
        Outcome::pure(names, log)
    }

    fn resolve(&self, type_ref: &TypeRef, log: Log) -> Outcome<Type> {
        let builtin = match type_ref {
            TypeRef::String => Some("String"),
            TypeRef::Integer => Some("Integer"),
            TypeRef::Long => Some("Long"),
            TypeRef::Number => Some("java.math.BigDecimal"),
            TypeRef::Boolean => Some("Boolean"),
            TypeRef::Date => Some("java.time.LocalDate"),
            TypeRef::DateTime => Some("java.time.OffsetDateTime"),
            _ => None,
        };
        if let Some(text) = builtin {
            return syntax::parse_type(text, log);
        }

        match type_ref {
            TypeRef::Ref { name } => match self.known.get(name) {
                Some(java) => syntax::parse_type(java.as_str(), log),
                None => Outcome::raise_user(format!("unknown schema reference '{name}'"), log),
            },
            TypeRef::Array { items } => self.resolve(items, log).map(list_type),
            TypeRef::Map { values } => {
                let (key, log) = bind!(syntax::parse_type("String", log));
                self.resolve(values, log).map(|value| map_type(key, value))
            }
            _ => Outcome::raise_internal(format!("unhandled type reference {type_ref:?}"), log),
        }
    }

    fn extract_routes(&self, endpoints: Vec<Endpoint>, log: Log) -> Outcome<Vec<Route>> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut routes = Vec::new();
        let mut log = log;
        for endpoint in endpoints {
            let operation_id = endpoint.operation_id.clone();
            let (route, next) = bind!(scoped(&operation_id, log, |log| {
                self.extract_route(endpoint, log)
            }));
            log = next;
            if !seen.insert((route.client.clone(), route.operation.as_str().to_string())) {
                return Outcome::raise_user(
                    format!(
                        "duplicate operation '{}' in client '{}'",
                        route.operation, route.client
                    ),
                    log,
                );
            }
            routes.push(route);
        }
        Outcome::pure(routes, log)
    }

    fn extract_route(&self, endpoint: Endpoint, log: Log) -> Outcome<Route> {
        if !endpoint.path.starts_with('/') {
            return Outcome::raise_user(
                format!(
                    "path '{}' of operation '{}' must start with '/'",
                    endpoint.path, endpoint.operation_id
                ),
                log,
            );
        }

        let stray = placeholder_regex().replace_all(&endpoint.path, "");
        if stray.contains(['{', '}']) {
            return Outcome::raise_user(
                format!(
                    "path '{}' of operation '{}' has a malformed placeholder; \
                     expected '{{name}}' with a letter or '_' first",
                    endpoint.path, endpoint.operation_id
                ),
                log,
            );
        }

        let placeholders: BTreeSet<&str> = placeholder_regex()
            .captures_iter(&endpoint.path)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();
        let path_params: BTreeSet<&str> = endpoint
            .parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
            .map(|p| p.name.as_str())
            .collect();
        if let Some(missing) = placeholders.difference(&path_params).next() {
            return Outcome::raise_user(
                format!(
                    "path '{}' uses '{{{missing}}}' but declares no path parameter '{missing}'",
                    endpoint.path
                ),
                log,
            );
        }
        if let Some(unused) = path_params.difference(&placeholders).next() {
            return Outcome::raise_user(
                format!(
                    "path parameter '{unused}' does not appear in path '{}'",
                    endpoint.path
                ),
                log,
            );
        }

        let (operation, log) = bind!(member_name(&endpoint.operation_id, "operation", log));

        let mut terms = HashSet::new();
        let (params, log) = bind!(traverse(&endpoint.parameters, log, |param, log| {
            let (term, log) = bind!(member_name(&param.name, "param", log));
            if !terms.insert(term.clone()) {
                return Outcome::raise_user(
                    format!(
                        "parameters of operation '{}' collide on name '{term}'",
                        endpoint.operation_id
                    ),
                    log,
                );
            }
            let optional = !param.required && param.location != ParamLocation::Path;
            let (ty, log) = bind!(self.resolve(&param.ty, log));
            let ty = if optional { optional_type(ty) } else { ty.unbox() };
            Outcome::pure(
                RouteParam {
                    name: param.name.clone(),
                    term,
                    location: param.location,
                    ty,
                },
                log,
            )
        }));

        let (body, log) = match &endpoint.request_body {
            Some(type_ref) => {
                let (ty, log) = bind!(self.resolve(type_ref, log));
                (Some(ty), log)
            }
            None => (None, log),
        };

        let success = endpoint
            .responses
            .iter()
            .find(|r| (200..300).contains(&r.status));
        let (response, log) = match success {
            Some(response) => match &response.body {
                Some(type_ref) => {
                    let (ty, log) = bind!(self.resolve(type_ref, log));
                    (Some(ty), log)
                }
                None => (None, log),
            },
            None => (
                None,
                log.warning(format!(
                    "operation '{}' declares no 2xx response; treating it as empty",
                    endpoint.operation_id
                )),
            ),
        };

        let log = log.debug(format!(
            "{} {} -> {operation}",
            endpoint.method.as_str(),
            endpoint.path
        ));
        Outcome::pure(
            Route {
                operation,
                client: endpoint.client_group().to_string(),
                method: endpoint.method,
                path: endpoint.path,
                params,
                body,
                response,
            },
            log,
        )
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("valid regex"))
}

impl Handler<DescriptionTerm> for DescriptionParser {
    fn handle(&mut self, term: DescriptionTerm, log: Log) -> Outcome<DescriptionOutput> {
        match term {
            DescriptionTerm::IndexSchemas { schemas } => {
                self.index(schemas, log).map(DescriptionOutput::Indexed)
            }
            DescriptionTerm::ResolveType { type_ref, optional } => self
                .resolve(&type_ref, log)
                .map(|ty| {
                    if optional {
                        optional_type(ty)
                    } else {
                        ty
                    }
                })
                .map(DescriptionOutput::Type),
            DescriptionTerm::ExtractRoutes { endpoints } => self
                .extract_routes(endpoints, log)
                .map(DescriptionOutput::Routes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::ApiDescription;
    use crate::error::ErrorKind;
    use crate::log::LogLevel;

    fn parser_with(schemas: &str) -> DescriptionParser {
        let description = ApiDescription::from_json_str(schemas).unwrap();
        let mut parser = DescriptionParser::new();
        parser
            .handle(
                DescriptionTerm::IndexSchemas {
                    schemas: description.schemas,
                },
                Log::new(),
            )
            .unsafe_run()
            .unwrap();
        parser
    }

    fn endpoints(json: &str) -> Vec<Endpoint> {
        ApiDescription::from_json_str(json).unwrap().endpoints
    }

    fn resolve(parser: &mut DescriptionParser, json: &str, optional: bool) -> Outcome<DescriptionOutput> {
        let type_ref: TypeRef = serde_json::from_str(json).unwrap();
        parser.handle(DescriptionTerm::ResolveType { type_ref, optional }, Log::new())
    }

    const PET: &str = r#"{"schemas": [{"name": "pet", "kind": "object"}]}"#;

    #[test]
    fn resolves_builtins_refs_and_containers() {
        let mut parser = parser_with(PET);
        let ty = |out: Outcome<DescriptionOutput>| {
            out.unsafe_run().unwrap().into_type().unwrap().to_string()
        };
        assert_eq!(ty(resolve(&mut parser, r#"{"type": "number"}"#, false)), "java.math.BigDecimal");
        assert_eq!(ty(resolve(&mut parser, r#"{"type": "ref", "name": "pet"}"#, false)), "Pet");
        assert_eq!(
            ty(resolve(&mut parser, r#"{"type": "map", "values": {"type": "array", "items": {"type": "long"}}}"#, false)),
            "java.util.Map<String, java.util.List<Long>>"
        );
        assert_eq!(
            ty(resolve(&mut parser, r#"{"type": "string"}"#, true)),
            "java.util.Optional<String>"
        );
    }

    #[test]
    fn unknown_reference_is_user_error() {
        let mut parser = parser_with(PET);
        let out = resolve(&mut parser, r#"{"type": "ref", "name": "Owner"}"#, false);
        assert_eq!(out.error().unwrap().kind(), ErrorKind::User);
        assert!(out.error().unwrap().message().contains("'Owner'"));
    }

    #[test]
    fn duplicate_schemas_are_rejected() {
        let mut parser = DescriptionParser::new();
        let description = ApiDescription::from_json_str(
            r#"{"schemas": [{"name": "pet-store", "kind": "object"}, {"name": "PetStore", "kind": "object"}]}"#,
        )
        .unwrap();
        let out = parser.handle(
            DescriptionTerm::IndexSchemas {
                schemas: description.schemas,
            },
            Log::new(),
        );
        assert!(out.error().unwrap().message().contains("both map to Java type 'PetStore'"));
    }

    #[test]
    fn extracts_routes_with_params_and_first_success_body() {
        let mut parser = parser_with(PET);
        let endpoints = endpoints(
            r#"{"endpoints": [{
                "operationId": "get-pet", "method": "get", "path": "/pets/{petId}", "tags": ["pets"],
                "parameters": [
                    {"name": "petId", "in": "path", "type": {"type": "long"}, "required": true},
                    {"name": "verbose", "in": "query", "type": {"type": "boolean"}}
                ],
                "responses": [{"status": 404}, {"status": 200, "body": {"type": "ref", "name": "pet"}}]
            }]}"#,
        );
        let routes = parser
            .handle(DescriptionTerm::ExtractRoutes { endpoints }, Log::new())
            .unsafe_run()
            .unwrap()
            .into_routes()
            .unwrap();
        let route = &routes[0];
        assert_eq!(route.operation.as_str(), "getPet");
        assert_eq!(route.client, "pets");
        assert_eq!(route.params[0].ty.to_string(), "long");
        assert!(route.params[1].ty.is_optional());
        assert_eq!(route.response.as_ref().unwrap().to_string(), "Pet");
    }

    #[test]
    fn placeholder_without_parameter_is_user_error() {
        let mut parser = parser_with(PET);
        let endpoints = endpoints(
            r#"{"endpoints": [{"operationId": "getPet", "method": "get", "path": "/pets/{petId}"}]}"#,
        );
        let out = parser.handle(DescriptionTerm::ExtractRoutes { endpoints }, Log::new());
        assert!(out.error().unwrap().message().contains("declares no path parameter 'petId'"));
        assert!(out.log().current_path().is_empty());
    }

    #[test]
    fn malformed_placeholders_are_user_errors() {
        for path in ["/a/{1}", "/a/{}", "/a/{ id }", "/a/{id", "/a/id}"] {
            let mut parser = parser_with(PET);
            let json = format!(
                r#"{{"endpoints": [{{"operationId": "get", "method": "get", "path": "{path}",
                    "parameters": [{{"name": "1", "in": "path", "type": {{"type": "long"}}, "required": true}}]}}]}}"#
            );
            let out = parser.handle(
                DescriptionTerm::ExtractRoutes {
                    endpoints: endpoints(&json),
                },
                Log::new(),
            );
            let err = out.error().unwrap();
            assert_eq!(err.kind(), ErrorKind::User, "{path}");
            assert!(err.message().contains("malformed placeholder"), "{path}");
        }
    }

    #[test]
    fn relative_path_is_user_error() {
        let mut parser = parser_with(PET);
        let endpoints = endpoints(
            r#"{"endpoints": [{"operationId": "list", "method": "get", "path": "pets"}]}"#,
        );
        let out = parser.handle(DescriptionTerm::ExtractRoutes { endpoints }, Log::new());
        assert!(out.error().unwrap().message().contains("must start with '/'"));
    }

    #[test]
    fn duplicate_operation_in_client_is_user_error() {
        let mut parser = parser_with(PET);
        let endpoints = endpoints(
            r#"{"endpoints": [
                {"operationId": "list", "method": "get", "path": "/a", "tags": ["pets"]},
                {"operationId": "list", "method": "get", "path": "/b", "tags": ["pets"]},
                {"operationId": "list", "method": "get", "path": "/c", "tags": ["stores"]}
            ]}"#,
        );
        let out = parser.handle(DescriptionTerm::ExtractRoutes { endpoints }, Log::new());
        assert!(out
            .error()
            .unwrap()
            .message()
            .contains("duplicate operation 'list' in client 'pets'"));
    }

    #[test]
    fn missing_success_response_is_logged() {
        let mut parser = parser_with(PET);
        let endpoints = endpoints(
            r#"{"endpoints": [{"operationId": "ping", "method": "head", "path": "/ping", "responses": [{"status": 500}]}]}"#,
        );
        let out = parser.handle(DescriptionTerm::ExtractRoutes { endpoints }, Log::new());
        assert!(out.is_success());
        assert!(out.log().render(LogLevel::Warning).contains("declares no 2xx response"));
    }
}
