//! Framework plugins: handlers for the client, server and framework
//! vocabularies.

pub mod java;

pub use java::{JavaHttpClient, JavaHttpFramework, JavaHttpServer};
