//! Generator configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::log::Log;
use crate::outcome::Outcome;
use crate::syntax::{self, QualifiedName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// HTTP framework the clients and servers are written against.
pub enum Framework {
    /// `java.net.http` transport; clients return `CompletableFuture`.
    #[default]
    JdkHttp,
    /// JAX-RS annotated servers; clients return `CompletionStage`.
    Jaxrs,
}

impl Framework {
    pub fn as_str(self) -> &'static str {
        match self {
            Framework::JdkHttp => "jdk-http",
            Framework::Jaxrs => "jaxrs",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jdk-http" => Ok(Framework::JdkHttp),
            "jaxrs" => Ok(Framework::Jaxrs),
            other => Err(GenError::user(format!(
                "unknown framework '{other}'; expected 'jdk-http' or 'jaxrs'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Java package of every emitted unit.
    pub package: String,
    pub framework: Framework,
    /// Appended to the client group name, e.g. `PetsClient`.
    pub client_suffix: String,
    /// Appended to the client group name for server interfaces, e.g. `PetsHandler`.
    pub server_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: "com.example.api".to_string(),
            framework: Framework::default(),
            client_suffix: "Client".to_string(),
            server_suffix: "Handler".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(input: &str) -> Result<Self, GenError> {
        serde_json::from_str(input)
            .map_err(|e| GenError::user(format!("invalid generator config: {e}")))
    }

    /// The configured package, validated as a qualified name.
    pub fn package_name(&self, log: Log) -> Outcome<QualifiedName> {
        syntax::parse_qualified_name(&self.package, log)
    }
}
