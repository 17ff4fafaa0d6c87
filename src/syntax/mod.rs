//! Safe construction of Java syntax.
//!
//! Renderers never splice strings into output. Text is parsed into a validated
//! fragment here, and a parse failure becomes a [`GenError::User`] that names
//! the text and the fragment kind that was asked for.

use std::fmt;

use crate::error::{GenError, ParseError};
use crate::log::Log;
use crate::outcome::Outcome;

pub mod ast;
pub mod lexer;
pub mod naming;
pub mod parser;
mod print;
pub mod types;

pub use ast::{
    Annotation, BinaryOp, ClassType, CompilationUnit, ConstructorDecl, EnumConstant, Expr,
    FieldDecl, Import, Literal, Member, MethodDecl, Modifier, Name, Parameter, PrimitiveType,
    QualifiedName, Stmt, Type, TypeArg, TypeDecl, TypeDeclKind, UnaryOp, WildcardBound,
};
pub use naming::{escape_reserved_word, is_reserved_word, unescape_reserved_word};
pub use types::{function_type, future_type, list_type, map_type, optional_type, supplier_type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    CompilationUnit,
    Name,
    QualifiedName,
    Type,
    ClassType,
    Expression,
    Parameter,
    Import,
    RawImport,
    RawStaticImport,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyntaxKind::CompilationUnit => "compilation unit",
            SyntaxKind::Name => "simple name",
            SyntaxKind::QualifiedName => "qualified name",
            SyntaxKind::Type => "type",
            SyntaxKind::ClassType => "class or interface type",
            SyntaxKind::Expression => "expression",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::Import => "import",
            SyntaxKind::RawImport => "raw import",
            SyntaxKind::RawStaticImport => "raw static import",
        };
        f.write_str(label)
    }
}

fn safe_parse<T>(
    op: &str,
    kind: SyntaxKind,
    text: &str,
    log: Log,
    parse: fn(&str) -> Result<T, ParseError>,
) -> Outcome<T> {
    let log = log.debug(format!("{op}: {text}"));
    match parse(text) {
        Ok(value) => Outcome::pure(value, log),
        Err(err) => Outcome::failed(
            GenError::user(format!("Unable to parse '{text}' to a {kind}: {err}")),
            log,
        ),
    }
}

pub fn parse_compilation_unit(text: &str, log: Log) -> Outcome<CompilationUnit> {
    safe_parse(
        "parse_compilation_unit",
        SyntaxKind::CompilationUnit,
        text,
        log,
        parser::parse_compilation_unit,
    )
}

pub fn parse_name(text: &str, log: Log) -> Outcome<Name> {
    safe_parse("parse_name", SyntaxKind::Name, text, log, parser::parse_name)
}

pub fn parse_qualified_name(text: &str, log: Log) -> Outcome<QualifiedName> {
    safe_parse(
        "parse_qualified_name",
        SyntaxKind::QualifiedName,
        text,
        log,
        parser::parse_qualified_name,
    )
}

pub fn parse_type(text: &str, log: Log) -> Outcome<Type> {
    safe_parse("parse_type", SyntaxKind::Type, text, log, parser::parse_type)
}

pub fn parse_class_type(text: &str, log: Log) -> Outcome<ClassType> {
    safe_parse(
        "parse_class_type",
        SyntaxKind::ClassType,
        text,
        log,
        parser::parse_class_type,
    )
}

pub fn parse_expression(text: &str, log: Log) -> Outcome<Expr> {
    safe_parse(
        "parse_expression",
        SyntaxKind::Expression,
        text,
        log,
        parser::parse_expression,
    )
}

pub fn parse_parameter(text: &str, log: Log) -> Outcome<Parameter> {
    safe_parse(
        "parse_parameter",
        SyntaxKind::Parameter,
        text,
        log,
        parser::parse_parameter,
    )
}

pub fn parse_import(text: &str, log: Log) -> Outcome<Import> {
    safe_parse("parse_import", SyntaxKind::Import, text, log, parser::parse_import)
}

pub fn parse_raw_import(text: &str, log: Log) -> Outcome<Import> {
    safe_parse(
        "parse_raw_import",
        SyntaxKind::RawImport,
        text,
        log,
        parser::parse_raw_import,
    )
}

pub fn parse_raw_static_import(text: &str, log: Log) -> Outcome<Import> {
    safe_parse(
        "parse_raw_static_import",
        SyntaxKind::RawStaticImport,
        text,
        log,
        parser::parse_raw_static_import,
    )
}
