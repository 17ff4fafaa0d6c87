//! Java HTTP plugin in two flavors: plain `java.net.http` futures and JAX-RS.
//!
//! Clients delegate every call to an `ApiTransport` support interface, so the
//! generated code carries no HTTP stack of its own.

use std::collections::HashSet;

use crate::algebra::Handler;
use crate::bind;
use crate::capabilities::client::{ClientOutput, ClientTerm};
use crate::capabilities::framework::{FrameworkOutput, FrameworkTerm, Role};
use crate::capabilities::server::{ServerOutput, ServerTerm};
use crate::capabilities::{type_name, unit};
use crate::codegen::{ClientDefinition, ServerDefinition, SupportDefinition};
use crate::config::Framework;
use crate::description::{HttpMethod, ParamLocation};
use crate::log::Log;
use crate::outcome::{traverse, Outcome};
use crate::protocol::{ClientRoute, PathSegment, Route, ServerRoute};
use crate::syntax::naming::unique_identifier;
use crate::syntax::{
    self, future_type, Annotation, ConstructorDecl, Expr, FieldDecl, Import, Member, MethodDecl,
    Modifier, Name, Parameter, QualifiedName, Stmt, Type, TypeDecl, TypeDeclKind,
};

const TRANSPORT_TEMPLATE: &str = r#"
import java.util.Map;

/**
 * Sends one HTTP request and decodes the response body.
 */
public interface ApiTransport {
    <T> FUTURE<T> send(String method, String path, Map<String, Object> query, Map<String, Object> headers, Object body, Class<?> responseType);
}
"#;

fn future_class(framework: Framework) -> &'static str {
    match framework {
        Framework::JdkHttp => "java.util.concurrent.CompletableFuture",
        Framework::Jaxrs => "java.util.concurrent.CompletionStage",
    }
}

#[derive(Debug, Clone)]
/// Imports, return types, annotations and the transport interface.
pub struct JavaHttpFramework {
    package: QualifiedName,
    framework: Framework,
}

impl JavaHttpFramework {
    pub fn new(package: QualifiedName, framework: Framework) -> Self {
        Self { package, framework }
    }

    fn imports(&self, role: Role, log: Log) -> Outcome<Vec<Import>> {
        let raw: &[&str] = match (role, self.framework) {
            (Role::Client, _) => &["java.util.Map"],
            (Role::Server, Framework::JdkHttp) => &[],
            (Role::Server, Framework::Jaxrs) => &["javax.ws.rs.*"],
        };
        traverse(raw, log, |text, log| syntax::parse_raw_import(text, log))
    }

    fn response_type(&self, body: Option<Type>, log: Log) -> Outcome<Type> {
        let (body, log) = match body {
            Some(body) => (body, log),
            None => bind!(syntax::parse_type("Void", log)),
        };
        match self.framework {
            Framework::JdkHttp => syntax::parse_class_type(future_class(self.framework), log)
                .map(|future| Type::class(future.with_args(vec![body]))),
            Framework::Jaxrs => Outcome::pure(future_type(body), log),
        }
    }

    fn route_annotations(&self, method: HttpMethod, path: String, log: Log) -> Outcome<Vec<Annotation>> {
        if self.framework == Framework::JdkHttp {
            return Outcome::pure(Vec::new(), log);
        }
        let (verb, log) = bind!(syntax::parse_qualified_name(method.as_str(), log));
        let (path_name, log) = bind!(syntax::parse_qualified_name("Path", log));
        Outcome::pure(
            vec![
                Annotation::marker(verb),
                Annotation::with_argument(path_name, Expr::string(path)),
            ],
            log,
        )
    }

    fn parameter_annotations(
        &self,
        location: ParamLocation,
        name: String,
        log: Log,
    ) -> Outcome<Vec<Annotation>> {
        if self.framework == Framework::JdkHttp {
            return Outcome::pure(Vec::new(), log);
        }
        let annotation = match location {
            ParamLocation::Path => "PathParam",
            ParamLocation::Query => "QueryParam",
            ParamLocation::Header => "HeaderParam",
        };
        syntax::parse_qualified_name(annotation, log)
            .map(|annotation| vec![Annotation::with_argument(annotation, Expr::string(name))])
    }

    fn transport_support(&self, log: Log) -> Outcome<Vec<SupportDefinition>> {
        let source = TRANSPORT_TEMPLATE.replace("FUTURE", future_class(self.framework));
        let (mut unit, log) = bind!(syntax::parse_compilation_unit(&source, log));
        unit.package = Some(self.package.clone());
        let Some(name) = unit.types.first().map(|decl| decl.name.clone()) else {
            return Outcome::raise_internal("transport template declares no type", log);
        };
        let log = log.info(format!("rendered transport support {name}"));
        Outcome::pure(vec![SupportDefinition::new(name, unit)], log)
    }
}

impl Handler<FrameworkTerm> for JavaHttpFramework {
    fn handle(&mut self, term: FrameworkTerm, log: Log) -> Outcome<FrameworkOutput> {
        match term {
            FrameworkTerm::Imports { role } => self.imports(role, log).map(FrameworkOutput::Imports),
            FrameworkTerm::ResponseType { body } => self
                .response_type(body, log)
                .map(FrameworkOutput::ResponseType),
            FrameworkTerm::RouteAnnotations { method, path } => self
                .route_annotations(method, path, log)
                .map(FrameworkOutput::Annotations),
            FrameworkTerm::ParameterAnnotations { location, name } => self
                .parameter_annotations(location, name, log)
                .map(FrameworkOutput::Annotations),
            FrameworkTerm::TransportSupport => {
                self.transport_support(log).map(FrameworkOutput::Support)
            }
        }
    }
}

/// Method parameters of a route: path, query and header parameters in
/// declaration order, then the request body.
fn route_parameters(route: &Route, log: Log) -> Outcome<(Vec<Parameter>, Option<Name>)> {
    let mut used: HashSet<String> = route
        .params
        .iter()
        .map(|p| p.term.as_str().to_string())
        .collect();
    let mut params: Vec<Parameter> = route
        .params
        .iter()
        .map(|p| Parameter::new(p.ty.clone(), p.term.clone()))
        .collect();
    let Some(body) = &route.body else {
        return Outcome::pure((params, None), log);
    };
    let body_name = unique_identifier("body", &mut used);
    syntax::parse_name(&body_name, log).map(|name| {
        params.push(Parameter::new(body.clone(), name.clone()));
        (params, Some(name))
    })
}

#[derive(Debug, Clone)]
/// Client classes that forward every route to `ApiTransport`.
pub struct JavaHttpClient {
    package: QualifiedName,
    suffix: String,
}

impl JavaHttpClient {
    pub fn new(package: QualifiedName, suffix: impl Into<String>) -> Self {
        Self {
            package,
            suffix: suffix.into(),
        }
    }

    fn render(
        &self,
        group: &str,
        routes: Vec<ClientRoute>,
        imports: Vec<Import>,
        log: Log,
    ) -> Outcome<ClientDefinition> {
        let (class_name, log) = bind!(type_name(&format!("{group} {}", self.suffix), log));
        let (transport_ty, log) = bind!(syntax::parse_type("ApiTransport", log));
        let (transport, log) = bind!(syntax::parse_name("transport", log));

        let mut decl = TypeDecl::new(TypeDeclKind::Class, vec![Modifier::Public], class_name.clone());
        decl.members.push(Member::Field(FieldDecl::new(
            vec![Modifier::Private, Modifier::Final],
            transport_ty.clone(),
            transport.clone(),
        )));
        decl.members.push(Member::Constructor(ConstructorDecl {
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            name: class_name.clone(),
            params: vec![Parameter::new(transport_ty, transport.clone())],
            body: vec![Stmt::Expr(Expr::assign(
                Expr::this_field(transport.clone()),
                Expr::name(transport.clone()),
            ))],
        }));

        let (methods, log) = bind!(traverse(&routes, log, |route, log| {
            self.render_method(&transport, route, log)
        }));
        decl.members.extend(methods);

        let log = log.info(format!("rendered client {class_name} ({} routes)", routes.len()));
        Outcome::pure(
            ClientDefinition::new(class_name, unit(&self.package, imports, decl)),
            log,
        )
    }

    fn render_method(&self, transport: &Name, client_route: &ClientRoute, log: Log) -> Outcome<Member> {
        let route = &client_route.route;
        let ((params, body), log) = bind!(route_parameters(route, log));

        let mut path_parts = Vec::new();
        for segment in route.path_segments() {
            match segment {
                PathSegment::Literal(text) => path_parts.push(Expr::string(text)),
                PathSegment::Param(name) => match route.params.iter().find(|p| p.name == name) {
                    Some(param) => path_parts.push(Expr::name(param.term.clone())),
                    None => {
                        return Outcome::raise_internal(
                            format!("path placeholder '{name}' of {} has no parameter", route.operation),
                            log,
                        )
                    }
                },
            }
        }

        let (map, log) = bind!(syntax::parse_name("Map", log));
        let (of_entries, log) = bind!(syntax::parse_name("ofEntries", log));
        let (entry, log) = bind!(syntax::parse_name("entry", log));
        let entries = |location: ParamLocation| {
            let entries = route
                .params
                .iter()
                .filter(|p| p.location == location)
                .map(|p| {
                    Expr::name(map.clone()).call(
                        entry.clone(),
                        vec![Expr::string(p.name.clone()), Expr::name(p.term.clone())],
                    )
                })
                .collect();
            Expr::name(map.clone()).call(of_entries.clone(), entries)
        };

        let (response_class, log) = match &route.response {
            Some(ty) => (Expr::class_literal(ty), log),
            None => {
                let (void, log) = bind!(syntax::parse_type("Void", log));
                (Expr::class_literal(&void), log)
            }
        };

        let (send, log) = bind!(syntax::parse_name("send", log));
        let call = Expr::this_field(transport.clone()).call(
            send,
            vec![
                Expr::string(route.method.as_str()),
                Expr::concat(path_parts),
                entries(ParamLocation::Query),
                entries(ParamLocation::Header),
                body.map(Expr::name).unwrap_or_else(Expr::null),
                response_class,
            ],
        );

        let mut method = MethodDecl::new(
            vec![Modifier::Public],
            client_route.return_type.clone(),
            route.operation.clone(),
        );
        method.params = params;
        method.body = Some(vec![Stmt::Return(Some(call))]);
        let log = log.debug(format!("client method {}", route.operation));
        Outcome::pure(Member::Method(method), log)
    }
}

impl Handler<ClientTerm> for JavaHttpClient {
    fn handle(&mut self, term: ClientTerm, log: Log) -> Outcome<ClientOutput> {
        match term {
            ClientTerm::RenderClient {
                name,
                routes,
                imports,
            } => self.render(&name, routes, imports, log).map(ClientOutput),
        }
    }
}

#[derive(Debug, Clone)]
/// Server interfaces with one abstract method per route.
pub struct JavaHttpServer {
    package: QualifiedName,
    suffix: String,
}

impl JavaHttpServer {
    pub fn new(package: QualifiedName, suffix: impl Into<String>) -> Self {
        Self {
            package,
            suffix: suffix.into(),
        }
    }

    fn render(
        &self,
        group: &str,
        routes: Vec<ServerRoute>,
        imports: Vec<Import>,
        log: Log,
    ) -> Outcome<ServerDefinition> {
        let (interface_name, log) = bind!(type_name(&format!("{group} {}", self.suffix), log));
        let mut decl = TypeDecl::new(
            TypeDeclKind::Interface,
            vec![Modifier::Public],
            interface_name.clone(),
        );

        let (methods, log) = bind!(traverse(&routes, log, |server_route, log| {
            let route = &server_route.route;
            if server_route.parameter_annotations.len() != route.params.len() {
                return Outcome::raise_internal(
                    format!(
                        "{} has {} parameters but {} parameter annotation lists",
                        route.operation,
                        route.params.len(),
                        server_route.parameter_annotations.len()
                    ),
                    log,
                );
            }
            let ((mut params, _), log) = bind!(route_parameters(route, log));
            for (param, annotations) in params.iter_mut().zip(&server_route.parameter_annotations) {
                param.annotations = annotations.clone();
            }
            let mut method = MethodDecl::new(
                Vec::new(),
                server_route.return_type.clone(),
                route.operation.clone(),
            );
            method.annotations = server_route.annotations.clone();
            method.params = params;
            Outcome::pure(Member::Method(method), log)
        }));
        decl.members.extend(methods);

        let log = log.info(format!(
            "rendered server {interface_name} ({} routes)",
            routes.len()
        ));
        Outcome::pure(
            ServerDefinition::new(interface_name, unit(&self.package, imports, decl)),
            log,
        )
    }
}

impl Handler<ServerTerm> for JavaHttpServer {
    fn handle(&mut self, term: ServerTerm, log: Log) -> Outcome<ServerOutput> {
        match term {
            ServerTerm::RenderServer {
                name,
                routes,
                imports,
            } => self.render(&name, routes, imports, log).map(ServerOutput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RouteParam;
    use crate::syntax::parser::{parse_name, parse_qualified_name, parse_type};

    fn package() -> QualifiedName {
        parse_qualified_name("com.example.api").unwrap()
    }

    fn get_pet_route() -> Route {
        Route {
            operation: parse_name("getPet").unwrap(),
            client: "pets".to_string(),
            method: HttpMethod::Get,
            path: "/pets/{petId}".to_string(),
            params: vec![
                RouteParam {
                    name: "petId".to_string(),
                    term: parse_name("petId").unwrap(),
                    location: ParamLocation::Path,
                    ty: parse_type("long").unwrap(),
                },
                RouteParam {
                    name: "X-Trace".to_string(),
                    term: parse_name("xTrace").unwrap(),
                    location: ParamLocation::Header,
                    ty: parse_type("java.util.Optional<String>").unwrap(),
                },
            ],
            body: None,
            response: Some(parse_type("java.util.List<Pet>").unwrap()),
        }
    }

    fn framework(kind: Framework) -> JavaHttpFramework {
        JavaHttpFramework::new(package(), kind)
    }

    fn answer(handler: &mut JavaHttpFramework, term: FrameworkTerm) -> FrameworkOutput {
        handler.handle(term, Log::new()).unsafe_run().unwrap()
    }

    #[test]
    fn response_type_depends_on_flavor() {
        let body = Some(parse_type("Pet").unwrap());
        let jdk = answer(
            &mut framework(Framework::JdkHttp),
            FrameworkTerm::ResponseType { body: body.clone() },
        );
        assert_eq!(
            jdk.into_response_type().unwrap().to_string(),
            "java.util.concurrent.CompletableFuture<Pet>"
        );
        let jaxrs = answer(&mut framework(Framework::Jaxrs), FrameworkTerm::ResponseType { body: None });
        assert_eq!(
            jaxrs.into_response_type().unwrap().to_string(),
            "java.util.concurrent.CompletionStage<Void>"
        );
    }

    #[test]
    fn jaxrs_annotations() {
        let mut handler = framework(Framework::Jaxrs);
        let route = answer(
            &mut handler,
            FrameworkTerm::RouteAnnotations {
                method: HttpMethod::Delete,
                path: "/pets/{petId}".to_string(),
            },
        )
        .into_annotations()
        .unwrap();
        let rendered: Vec<_> = route.iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, vec!["@DELETE", "@Path(\"/pets/{petId}\")"]);

        let param = answer(
            &mut handler,
            FrameworkTerm::ParameterAnnotations {
                location: ParamLocation::Header,
                name: "X-Trace".to_string(),
            },
        )
        .into_annotations()
        .unwrap();
        assert_eq!(param[0].to_string(), "@HeaderParam(\"X-Trace\")");

        let none = answer(
            &mut framework(Framework::JdkHttp),
            FrameworkTerm::RouteAnnotations {
                method: HttpMethod::Get,
                path: "/".to_string(),
            },
        );
        assert_eq!(none.into_annotations().unwrap(), Vec::new());
    }

    #[test]
    fn transport_support_is_parsed_from_template() {
        let support = answer(&mut framework(Framework::JdkHttp), FrameworkTerm::TransportSupport)
            .into_support()
            .unwrap();
        assert_eq!(support.len(), 1);
        assert_eq!(support[0].name().as_str(), "ApiTransport");
        let text = support[0].unit().to_string();
        assert!(text.starts_with("package com.example.api;\n\nimport java.util.Map;\n"));
        assert!(text.contains("<T> java.util.concurrent.CompletableFuture<T> send("));
    }

    #[test]
    fn client_method_forwards_to_transport() {
        let mut client = JavaHttpClient::new(package(), "Client");
        let route = ClientRoute {
            route: get_pet_route(),
            return_type: parse_type("java.util.concurrent.CompletableFuture<java.util.List<Pet>>").unwrap(),
        };
        let ClientOutput(def) = client
            .handle(
                ClientTerm::RenderClient {
                    name: "pets".to_string(),
                    routes: vec![route],
                    imports: vec![Import::of(parse_qualified_name("java.util.Map").unwrap())],
                },
                Log::new(),
            )
            .unsafe_run()
            .unwrap();
        assert_eq!(def.name().as_str(), "PetsClient");
        let text = def.unit().to_string();
        assert!(text.contains(
            "    public java.util.concurrent.CompletableFuture<java.util.List<Pet>> getPet(long petId, java.util.Optional<String> xTrace) {\n"
        ));
        assert!(text.contains(
            "return this.transport.send(\"GET\", \"/pets/\" + petId, Map.ofEntries(), Map.ofEntries(Map.entry(\"X-Trace\", xTrace)), null, java.util.List.class);"
        ));
    }

    #[test]
    fn server_method_carries_annotations_and_body() {
        let mut route = get_pet_route();
        route.params.truncate(1);
        route.method = HttpMethod::Put;
        route.body = Some(parse_type("Pet").unwrap());
        route.params[0].term = parse_name("body").unwrap();

        let mut server = JavaHttpServer::new(package(), "Handler");
        let path_param = parse_qualified_name("PathParam").unwrap();
        let ServerOutput(def) = server
            .handle(
                ServerTerm::RenderServer {
                    name: "pets".to_string(),
                    routes: vec![ServerRoute {
                        route,
                        return_type: parse_type("java.util.concurrent.CompletionStage<Void>").unwrap(),
                        annotations: vec![Annotation::marker(parse_qualified_name("PUT").unwrap())],
                        parameter_annotations: vec![vec![Annotation::with_argument(
                            path_param,
                            Expr::string("petId"),
                        )]],
                    }],
                    imports: Vec::new(),
                },
                Log::new(),
            )
            .unsafe_run()
            .unwrap();
        let text = def.unit().to_string();
        assert!(text.contains("public interface PetsHandler {\n    @PUT\n"));
        assert!(text.contains(
            "    java.util.concurrent.CompletionStage<Void> getPet(@PathParam(\"petId\") long body, Pet body2);\n"
        ));
    }
}
