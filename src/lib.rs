pub mod algebra;
pub mod capabilities;
pub mod codegen;
pub mod config;
pub mod description;
pub mod error;
pub mod frameworks;
pub mod generate;
pub mod log;
pub mod outcome;
pub mod protocol;
pub mod syntax;
pub mod verify;

pub use codegen::{CodegenResult, GeneratedFile};
pub use config::{Framework, GeneratorConfig};
pub use description::ApiDescription;
pub use error::{BoundaryError, ErrorKind, GenError};
pub use generate::{generate, generate_with, CodegenVocabulary};
pub use log::{Log, LogLevel};
pub use outcome::Outcome;

/// Parses a JSON API description and generates from it.
pub fn generate_from_json(
    description_json: &str,
    config: &GeneratorConfig,
    log: Log,
) -> Outcome<CodegenResult> {
    match ApiDescription::from_json_str(description_json) {
        Ok(description) => generate(&description, config, log),
        Err(error) => Outcome::failed(error, log),
    }
}
