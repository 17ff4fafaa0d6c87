//! Normalized API description handed to the generator.
//!
//! Loading and normalizing a concrete format such as OpenAPI happens upstream;
//! this is the JSON shape that comes out of that step.

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::verify::verify_generator_version;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescription {
    /// Semver requirement on the generator version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl ApiDescription {
    pub fn from_json_str(input: &str) -> Result<Self, GenError> {
        serde_json::from_str(input)
            .map_err(|e| GenError::user(format!("invalid API description: {e}")))
    }

    /// Fails when `requires` is set and this generator does not satisfy it.
    pub fn check_requirement(&self) -> Result<(), GenError> {
        match &self.requires {
            Some(requirement) => verify_generator_version(requirement),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    #[serde(flatten)]
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schema {
    Object {
        #[serde(default)]
        properties: Vec<Property>,
    },
    Enum {
        values: Vec<String>,
    },
    Array {
        items: TypeRef,
    },
    /// Tagged union; each variant names an object schema.
    Union {
        discriminator: String,
        variants: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TypeRef {
    String,
    Integer,
    Long,
    Number,
    Boolean,
    Date,
    DateTime,
    Ref { name: String },
    Array { items: Box<TypeRef> },
    Map { values: Box<TypeRef> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<EndpointParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<TypeRef>,
    #[serde(default)]
    pub responses: Vec<EndpointResponse>,
}

impl Endpoint {
    /// Client group: the first tag, or `default` when untagged.
    pub fn client_group(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("default")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<TypeRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}
