//! The default generation program: every concern composed into one vocabulary
//! and driven over an [`ApiDescription`].

use std::collections::HashMap;

use crate::algebra::{Handler, Interpreter};
use crate::bind;
use crate::capabilities::arrays::{ArrayRenderer, ArrayTerm};
use crate::capabilities::client::{ClientOutput, ClientTerm};
use crate::capabilities::enums::{EnumRenderer, EnumTerm};
use crate::capabilities::framework::{FrameworkOutput, FrameworkTerm, Role};
use crate::capabilities::models::{ModelOutput, ModelRenderer, ModelTerm};
use crate::capabilities::parsing::{DescriptionOutput, DescriptionParser, DescriptionTerm};
use crate::capabilities::poly::{PolyTerm, UnionRenderer};
use crate::capabilities::server::{ServerOutput, ServerTerm};
use crate::codegen::CodegenResult;
use crate::config::GeneratorConfig;
use crate::description::{ApiDescription, Property, Schema, SchemaDef, TypeRef};
use crate::frameworks::{JavaHttpClient, JavaHttpFramework, JavaHttpServer};
use crate::interpreter;
use crate::log::Log;
use crate::outcome::{scoped, traverse, Outcome};
use crate::protocol::{ClientRoute, Route, ServerRoute, UnionVariant};
use crate::syntax::{Name, QualifiedName, Type};
use crate::vocabulary;

/// Every vocabulary the default program uses.
pub type CodegenVocabulary = vocabulary![
    DescriptionTerm,
    ModelTerm,
    EnumTerm,
    ArrayTerm,
    PolyTerm,
    ClientTerm,
    ServerTerm,
    FrameworkTerm,
];

/// Simple names generated code uses unqualified from `java.lang` and
/// `java.util.Map`; no schema may take one.
const IMPLICIT_TYPES: &[&str] = &[
    "Object",
    "String",
    "Class",
    "Void",
    "Override",
    "Boolean",
    "Byte",
    "Short",
    "Integer",
    "Long",
    "Character",
    "Float",
    "Double",
    "Map",
];

/// The built-in handlers for [`CodegenVocabulary`], configured by `config`.
pub fn default_handlers(
    package: QualifiedName,
    config: &GeneratorConfig,
) -> impl Handler<CodegenVocabulary> {
    interpreter![
        DescriptionParser::new(),
        ModelRenderer::new(package.clone()),
        EnumRenderer::new(package.clone()),
        ArrayRenderer::new(package.clone()),
        UnionRenderer::new(package.clone()),
        JavaHttpClient::new(package.clone(), config.client_suffix.clone()),
        JavaHttpServer::new(package.clone(), config.server_suffix.clone()),
        JavaHttpFramework::new(package, config.framework),
    ]
}

/// Generates Java sources for `description` with the built-in handlers.
pub fn generate(
    description: &ApiDescription,
    config: &GeneratorConfig,
    log: Log,
) -> Outcome<CodegenResult> {
    scoped("generate", log, |log| {
        let (package, log) = bind!(config.package_name(log));
        let log = log.info(format!(
            "package {package}, framework {}",
            config.framework
        ));
        generate_with(default_handlers(package, config), description, log)
    })
}

/// Generates with caller-supplied handlers, e.g. another framework plugin.
///
/// A failed run yields no [`CodegenResult`].
pub fn generate_with<H>(handler: H, description: &ApiDescription, log: Log) -> Outcome<CodegenResult>
where
    H: Handler<CodegenVocabulary>,
{
    let mut interpreter = Interpreter::new(handler);
    drive(&mut interpreter, description, log).map(|()| interpreter.finish())
}

type Driver<H> = Interpreter<CodegenVocabulary, H>;

fn drive<H>(interp: &mut Driver<H>, description: &ApiDescription, log: Log) -> Outcome<()>
where
    H: Handler<CodegenVocabulary>,
{
    if let Err(error) = description.check_requirement() {
        return Outcome::failed(error, log);
    }
    let log = log.info(format!(
        "{} schemas, {} endpoints",
        description.schemas.len(),
        description.endpoints.len()
    ));

    let (indexed, log) = bind!(interp
        .exec(
            DescriptionTerm::IndexSchemas {
                schemas: description.schemas.clone(),
            },
            log,
        )
        .try_map(DescriptionOutput::into_indexed));

    // Java type name to what generates it; every emitted file needs its own.
    let mut taken: HashMap<String, String> = HashMap::new();
    for (name, def) in indexed.iter().zip(&description.schemas) {
        if IMPLICIT_TYPES.contains(&name.as_str()) {
            return Outcome::raise_user(
                format!(
                    "schema '{}' maps to Java type '{name}', which generated code already uses",
                    def.name
                ),
                log,
            );
        }
        if let Err(message) = claim(&mut taken, name, format!("schema '{}'", def.name)) {
            return Outcome::raise_user(message, log);
        }
    }

    let schemas: HashMap<&str, &SchemaDef> = description
        .schemas
        .iter()
        .map(|def| (def.name.as_str(), def))
        .collect();
    let parents = union_parents(&description.schemas);

    let (_, log) = bind!(traverse(&description.schemas, log, |def, log| {
        scoped(&def.name, log, |log| {
            render_schema(interp, def, &schemas, &parents, log)
        })
    }));

    if description.endpoints.is_empty() {
        return Outcome::pure((), log);
    }

    let (support, log) = bind!(interp
        .exec(FrameworkTerm::TransportSupport, log)
        .try_map(FrameworkOutput::into_support));
    for def in &support {
        if let Err(message) = claim(&mut taken, def.name(), "transport support".to_string()) {
            return Outcome::raise_user(message, log);
        }
    }

    let (routes, log) = bind!(interp
        .exec(
            DescriptionTerm::ExtractRoutes {
                endpoints: description.endpoints.clone(),
            },
            log,
        )
        .try_map(DescriptionOutput::into_routes));

    let (_, log) = bind!(traverse(group_by_client(routes), log, |(group, routes), log| {
        scoped(&group, log, |log| {
            render_group(interp, &mut taken, &group, routes, log)
        })
    }));
    Outcome::pure((), log)
}

fn claim(taken: &mut HashMap<String, String>, name: &Name, origin: String) -> Result<(), String> {
    match taken.get(name.as_str()) {
        Some(previous) => Err(format!(
            "{origin} and {previous} both generate Java type '{name}'"
        )),
        None => {
            taken.insert(name.as_str().to_string(), origin);
            Ok(())
        }
    }
}

/// Object schema name to the unions listing it as a variant, in declaration order.
fn union_parents(schemas: &[SchemaDef]) -> HashMap<&str, Vec<&str>> {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for def in schemas {
        if let Schema::Union { variants, .. } = &def.schema {
            for variant in variants {
                parents
                    .entry(variant.as_str())
                    .or_default()
                    .push(def.name.as_str());
            }
        }
    }
    parents
}

fn resolve<H>(interp: &mut Driver<H>, type_ref: TypeRef, optional: bool, log: Log) -> Outcome<Type>
where
    H: Handler<CodegenVocabulary>,
{
    interp
        .exec(DescriptionTerm::ResolveType { type_ref, optional }, log)
        .try_map(DescriptionOutput::into_type)
}

fn schema_ref(name: &str) -> TypeRef {
    TypeRef::Ref {
        name: name.to_string(),
    }
}

fn render_schema<H>(
    interp: &mut Driver<H>,
    def: &SchemaDef,
    schemas: &HashMap<&str, &SchemaDef>,
    parents: &HashMap<&str, Vec<&str>>,
    log: Log,
) -> Outcome<()>
where
    H: Handler<CodegenVocabulary>,
{
    match &def.schema {
        Schema::Object { properties } => {
            let (fields, log) = bind!(traverse(properties, log, |property, log| {
                let (ty, log) = bind!(resolve(interp, property.ty.clone(), property.optional, log));
                interp
                    .exec(
                        ModelTerm::TransformProperty {
                            class_name: def.name.clone(),
                            property_name: property.name.clone(),
                            ty,
                            required: !property.optional,
                        },
                        log,
                    )
                    .try_map(ModelOutput::into_field)
            }));
            let unions = parents.get(def.name.as_str()).cloned().unwrap_or_default();
            let (parents, log) = bind!(traverse(unions, log, |union, log| {
                resolve(interp, schema_ref(union), false, log)
            }));
            interp
                .exec(
                    ModelTerm::RenderClass {
                        name: def.name.clone(),
                        fields,
                        parents,
                    },
                    log,
                )
                .try_map(ModelOutput::into_class)
                .map(|_| ())
        }
        Schema::Enum { values } => interp
            .exec(
                EnumTerm::RenderEnum {
                    name: def.name.clone(),
                    values: values.clone(),
                },
                log,
            )
            .map(|_| ()),
        Schema::Array { items } => {
            let (items, log) = bind!(resolve(interp, items.clone(), false, log));
            interp
                .exec(
                    ArrayTerm::RenderArray {
                        name: def.name.clone(),
                        items,
                    },
                    log,
                )
                .map(|_| ())
        }
        Schema::Union {
            discriminator,
            variants,
        } => {
            let (variants, log) = bind!(traverse(variants, log, |variant, log| {
                if let Err(message) = check_variant(&def.name, discriminator, variant, schemas) {
                    return Outcome::raise_user(message, log);
                }
                resolve(interp, schema_ref(variant), false, log).map(|ty| UnionVariant {
                    value: variant.clone(),
                    ty,
                })
            }));
            interp
                .exec(
                    PolyTerm::RenderUnion {
                        name: def.name.clone(),
                        discriminator: discriminator.clone(),
                        variants,
                    },
                    log,
                )
                .map(|_| ())
        }
    }
}

/// A variant must be an object schema carrying the discriminator as a
/// required string property, so its getter satisfies the union interface.
fn check_variant(
    union: &str,
    discriminator: &str,
    variant: &str,
    schemas: &HashMap<&str, &SchemaDef>,
) -> Result<(), String> {
    let Some(def) = schemas.get(variant) else {
        return Err(format!("union '{union}' names unknown variant '{variant}'"));
    };
    let Schema::Object { properties } = &def.schema else {
        return Err(format!(
            "variant '{variant}' of union '{union}' is not an object schema"
        ));
    };
    match properties.iter().find(|p| p.name == discriminator) {
        Some(Property {
            ty: TypeRef::String,
            optional: false,
            ..
        }) => Ok(()),
        Some(_) => Err(format!(
            "discriminator '{discriminator}' of variant '{variant}' must be a required string"
        )),
        None => Err(format!(
            "variant '{variant}' of union '{union}' has no discriminator property '{discriminator}'"
        )),
    }
}

/// Routes grouped by client, groups in order of first appearance.
fn group_by_client(routes: Vec<Route>) -> Vec<(String, Vec<Route>)> {
    let mut groups: Vec<(String, Vec<Route>)> = Vec::new();
    for route in routes {
        match groups.iter_mut().find(|(name, _)| *name == route.client) {
            Some((_, members)) => members.push(route),
            None => groups.push((route.client.clone(), vec![route])),
        }
    }
    groups
}

fn render_group<H>(
    interp: &mut Driver<H>,
    taken: &mut HashMap<String, String>,
    group: &str,
    routes: Vec<Route>,
    log: Log,
) -> Outcome<()>
where
    H: Handler<CodegenVocabulary>,
{
    let (client_imports, log) = bind!(interp
        .exec(FrameworkTerm::Imports { role: Role::Client }, log)
        .try_map(FrameworkOutput::into_imports));
    let (server_imports, log) = bind!(interp
        .exec(FrameworkTerm::Imports { role: Role::Server }, log)
        .try_map(FrameworkOutput::into_imports));

    let (pairs, log) = bind!(traverse(routes, log, |route, log| {
        let (return_type, log) = bind!(interp
            .exec(
                FrameworkTerm::ResponseType {
                    body: route.response.clone(),
                },
                log,
            )
            .try_map(FrameworkOutput::into_response_type));
        let (annotations, log) = bind!(interp
            .exec(
                FrameworkTerm::RouteAnnotations {
                    method: route.method,
                    path: route.path.clone(),
                },
                log,
            )
            .try_map(FrameworkOutput::into_annotations));
        let (parameter_annotations, log) = bind!(traverse(&route.params, log, |param, log| {
            interp
                .exec(
                    FrameworkTerm::ParameterAnnotations {
                        location: param.location,
                        name: param.name.clone(),
                    },
                    log,
                )
                .try_map(FrameworkOutput::into_annotations)
        }));
        let client = ClientRoute {
            route: route.clone(),
            return_type: return_type.clone(),
        };
        let server = ServerRoute {
            route,
            return_type,
            annotations,
            parameter_annotations,
        };
        Outcome::pure((client, server), log)
    }));
    let (clients, servers): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

    let (ClientOutput(client), log) = bind!(interp.exec(
        ClientTerm::RenderClient {
            name: group.to_string(),
            routes: clients,
            imports: client_imports,
        },
        log,
    ));
    if let Err(message) = claim(taken, client.name(), format!("client of group '{group}'")) {
        return Outcome::raise_user(message, log);
    }
    let (ServerOutput(server), log) = bind!(interp.exec(
        ServerTerm::RenderServer {
            name: group.to_string(),
            routes: servers,
            imports: server_imports,
        },
        log,
    ));
    if let Err(message) = claim(taken, server.name(), format!("server of group '{group}'")) {
        return Outcome::raise_user(message, log);
    }
    Outcome::pure((), log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::log::LogEvent;

    fn description(json: &str) -> ApiDescription {
        ApiDescription::from_json_str(json).unwrap()
    }

    fn names(result: &CodegenResult) -> Vec<String> {
        result
            .files()
            .into_iter()
            .map(|file| file.path)
            .collect()
    }

    const ZOO: &str = r#"{
        "schemas": [
            {"name": "animal", "kind": "union", "discriminator": "kind", "variants": ["cat", "dog"]},
            {"name": "cat", "kind": "object", "properties": [
                {"name": "kind", "type": {"type": "string"}},
                {"name": "lives", "type": {"type": "integer"}}
            ]},
            {"name": "dog", "kind": "object", "properties": [
                {"name": "kind", "type": {"type": "string"}},
                {"name": "good", "type": {"type": "boolean"}, "optional": true}
            ]},
            {"name": "size", "kind": "enum", "values": ["small", "large"]},
            {"name": "animals", "kind": "array", "items": {"type": "ref", "name": "animal"}}
        ],
        "endpoints": [
            {"operationId": "listAnimals", "method": "get", "path": "/animals", "tags": ["zoo"],
             "parameters": [{"name": "limit", "in": "query", "type": {"type": "integer"}}],
             "responses": [{"status": 200, "body": {"type": "ref", "name": "animals"}}]},
            {"operationId": "feed", "method": "post", "path": "/animals/{id}/feed", "tags": ["keepers"],
             "parameters": [{"name": "id", "in": "path", "type": {"type": "long"}, "required": true}],
             "responses": [{"status": 204}]},
            {"operationId": "getAnimal", "method": "get", "path": "/animals/{id}", "tags": ["zoo"],
             "parameters": [{"name": "id", "in": "path", "type": {"type": "long"}, "required": true}],
             "responses": [{"status": 200, "body": {"type": "ref", "name": "animal"}}]}
        ]
    }"#;

    #[test]
    fn definitions_follow_execution_order() {
        let result = generate(&description(ZOO), &GeneratorConfig::default(), Log::new())
            .unsafe_run()
            .unwrap();
        assert_eq!(
            names(&result),
            vec![
                "com/example/api/Animal.java",
                "com/example/api/Cat.java",
                "com/example/api/Dog.java",
                "com/example/api/Size.java",
                "com/example/api/Animals.java",
                "com/example/api/ApiTransport.java",
                "com/example/api/ZooClient.java",
                "com/example/api/KeepersClient.java",
                "com/example/api/ZooHandler.java",
                "com/example/api/KeepersHandler.java",
            ]
        );
        let cat = result.support_definitions()[1].unit().to_string();
        assert!(cat.contains("public class Cat implements Animal {"));
        let zoo = result.clients()[0].unit().to_string();
        assert!(zoo.contains(" listAnimals(java.util.Optional<Integer> limit) {"));
        assert!(zoo.contains(" getAnimal(long id) {"));
    }

    #[test]
    fn schema_scopes_wrap_their_diagnostics() {
        let out = generate(&description(ZOO), &GeneratorConfig::default(), Log::new());
        let pushes: Vec<_> = out
            .log()
            .entries()
            .iter()
            .filter(|e| e.event == LogEvent::Push)
            .map(|e| e.message().to_string())
            .collect();
        assert!(pushes.starts_with(&["generate".to_string(), "animal".to_string()]));
        assert!(pushes.contains(&"keepers".to_string()));
    }

    #[test]
    fn variant_without_discriminator_is_rejected() {
        let json = r#"{"schemas": [
            {"name": "shape", "kind": "union", "discriminator": "type", "variants": ["circle"]},
            {"name": "circle", "kind": "object", "properties": [
                {"name": "radius", "type": {"type": "number"}}
            ]}
        ]}"#;
        let out = generate(&description(json), &GeneratorConfig::default(), Log::new());
        let err = out.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::User);
        assert!(err.message().contains("has no discriminator property 'type'"));
    }

    #[test]
    fn failed_run_keeps_the_log_but_yields_nothing() {
        let json = r#"{"schemas": [
            {"name": "pet", "kind": "object", "properties": [
                {"name": "owner", "type": {"type": "ref", "name": "person"}}
            ]}
        ]}"#;
        let out = generate(&description(json), &GeneratorConfig::default(), Log::new());
        assert!(!out.is_success());
        assert!(out.log().current_path().is_empty());
        assert!(out.log().render(crate::LogLevel::Debug).contains("pet"));
    }

    #[test]
    fn unsatisfied_requirement_stops_before_indexing() {
        let json = r#"{"requires": ">=99.0.0", "schemas": []}"#;
        let out = generate(&description(json), &GeneratorConfig::default(), Log::new());
        assert!(out.error().unwrap().message().contains("requires apigen"));
    }

    fn collision(json: &str) -> String {
        let out = generate(&description(json), &GeneratorConfig::default(), Log::new());
        let err = out.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::User);
        err.message().to_string()
    }

    #[test]
    fn schema_cannot_take_a_generated_name() {
        let message = collision(
            r#"{"schemas": [{"name": "api_transport", "kind": "object"}],
                "endpoints": [{"operationId": "list", "method": "get", "path": "/t", "tags": ["t"]}]}"#,
        );
        assert!(message.contains("transport support and schema 'api_transport'"));

        let message = collision(
            r#"{"schemas": [{"name": "t client", "kind": "object"}],
                "endpoints": [{"operationId": "list", "method": "get", "path": "/t", "tags": ["t"]}]}"#,
        );
        assert!(message.contains("client of group 't' and schema 't client' both generate Java type 'TClient'"));
    }

    #[test]
    fn groups_with_the_same_java_name_collide() {
        let message = collision(
            r#"{"endpoints": [
                {"operationId": "a", "method": "get", "path": "/a", "tags": ["pets"]},
                {"operationId": "b", "method": "get", "path": "/b", "tags": ["Pets"]}
            ]}"#,
        );
        assert!(message.contains("both generate Java type 'PetsClient'"));
    }

    #[test]
    fn schema_cannot_shadow_implicit_types() {
        for name in ["string", "void", "override", "map"] {
            let json = format!(r#"{{"schemas": [{{"name": "{name}", "kind": "object"}}]}}"#);
            assert!(collision(&json).contains("which generated code already uses"), "{name}");
        }
    }

    #[test]
    fn description_without_endpoints_has_no_transport() {
        let json = r#"{"schemas": [{"name": "size", "kind": "enum", "values": ["s"]}]}"#;
        let result = generate(&description(json), &GeneratorConfig::default(), Log::new())
            .unsafe_run()
            .unwrap();
        assert_eq!(names(&result), vec!["com/example/api/Size.java"]);
    }
}
