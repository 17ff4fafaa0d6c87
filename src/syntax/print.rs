//! Canonical Java text for every syntax fragment.
//!
//! Printing is the only way generated code leaves the crate, so the output of
//! `Display` here is what ends up in the emitted files.

use std::fmt::{self, Display, Formatter, Write};

use super::ast::{
    Annotation, BinaryOp, ClassType, CompilationUnit, ConstructorDecl, EnumConstant, Expr,
    FieldDecl, Import, Literal, Member, MethodDecl, Modifier, Name, Parameter, QualifiedName, Stmt,
    Type, TypeArg, TypeDecl, TypeDeclKind, TypeKind, UnaryOp, WildcardBound,
};

const INDENT: &str = "    ";

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.segments(), ".")
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            TypeKind::Primitive(primitive) => f.write_str(primitive.keyword()),
            TypeKind::Class(class) => class.fmt(f),
            TypeKind::Array(element) => write!(f, "{element}[]"),
            TypeKind::Void => f.write_str("void"),
        }
    }
}

impl Display for ClassType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if !self.args().is_empty() {
            f.write_char('<')?;
            write_joined(f, self.args(), ", ")?;
            f.write_char('>')?;
        }
        Ok(())
    }
}

impl Display for TypeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(ty) => ty.fmt(f),
            TypeArg::Wildcard(None) => f.write_char('?'),
            TypeArg::Wildcard(Some(WildcardBound::Extends(ty))) => write!(f, "? extends {ty}"),
            TypeArg::Wildcard(Some(WildcardBound::Super(ty))) => write!(f, "? super {ty}"),
        }
    }
}

impl Display for Import {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        if self.is_static() {
            f.write_str("static ")?;
        }
        write!(f, "{}", self.name())?;
        if self.is_asterisk() {
            f.write_str(".*")?;
        }
        f.write_char(';')
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(value) => write_java_string(f, value),
            Literal::Integer(n) if i32::try_from(*n).is_err() => write!(f, "{n}L"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if let Some(argument) = &self.argument {
            write!(f, "({argument})")?;
        }
        Ok(())
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        if self.is_final {
            f.write_str("final ")?;
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{expr};"),
            Stmt::Return(None) => f.write_str("return;"),
            Stmt::Return(Some(value)) => write!(f, "return {value};"),
            Stmt::Throw(value) => write!(f, "throw {value};"),
            Stmt::Local { ty, name, init } => {
                write!(f, "{ty} {name}")?;
                if let Some(init) = init {
                    write!(f, " = {init}")?;
                }
                f.write_char(';')
            }
        }
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_member(f, self, 0)
    }
}

impl Display for TypeDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_type_decl(f, self, 0)
    }
}

impl Display for CompilationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut wrote_section = false;
        if let Some(package) = &self.package {
            writeln!(f, "package {package};")?;
            wrote_section = true;
        }
        if !self.imports.is_empty() {
            if wrote_section {
                f.write_char('\n')?;
            }
            for import in &self.imports {
                writeln!(f, "{import}")?;
            }
            wrote_section = true;
        }
        for decl in &self.types {
            if wrote_section {
                f.write_char('\n')?;
            }
            write_type_decl(f, decl, 0)?;
            f.write_char('\n')?;
            wrote_section = true;
        }
        Ok(())
    }
}

fn write_joined<I>(f: &mut Formatter<'_>, items: I, sep: &str) -> fmt::Result
where
    I: IntoIterator,
    I::Item: Display,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_java_string(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } => 1,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } => 6,
        Expr::Literal(Literal::Integer(n)) if *n < 0 => 6,
        _ => 7,
    }
}

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 2,
        BinaryOp::And => 3,
        BinaryOp::Eq | BinaryOp::NotEq => 4,
        BinaryOp::Add | BinaryOp::Sub => 5,
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

/// Writes `expr`, parenthesized when it binds looser than `min`.
fn write_expr(f: &mut Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    let own = precedence(expr);
    if own < min {
        f.write_char('(')?;
        write_expr(f, expr, 0)?;
        return f.write_char(')');
    }

    match expr {
        Expr::Literal(literal) => literal.fmt(f),
        Expr::Name(name) => name.fmt(f),
        Expr::This => f.write_str("this"),
        Expr::FieldAccess { target, name } => {
            write_expr(f, target, 7)?;
            write!(f, ".{name}")
        }
        Expr::MethodCall { target, name, args } => {
            if let Some(target) = target {
                write_expr(f, target, 7)?;
                f.write_char('.')?;
            }
            write!(f, "{name}(")?;
            write_joined(f, args, ", ")?;
            f.write_char(')')
        }
        Expr::New { ty, args } => {
            write!(f, "new {ty}(")?;
            write_joined(f, args, ", ")?;
            f.write_char(')')
        }
        Expr::ClassLiteral(ty) => write!(f, "{}.class", ty.erasure()),
        Expr::Unary {
            op: UnaryOp::Not,
            expr,
        } => {
            f.write_char('!')?;
            write_expr(f, expr, 6)
        }
        Expr::Unary {
            op: UnaryOp::Neg,
            expr,
        } => match expr.as_ref() {
            // Java reads `--` as decrement.
            Expr::Unary {
                op: UnaryOp::Neg, ..
            } => {
                f.write_str("- ")?;
                write_expr(f, expr, 6)
            }
            Expr::Literal(Literal::Integer(n)) if *n < 0 => write!(f, "- {expr}"),
            // `-5` reads back as the literal itself.
            Expr::Literal(Literal::Integer(_)) => write!(f, "-({expr})"),
            _ => {
                f.write_char('-')?;
                write_expr(f, expr, 6)
            }
        },
        Expr::Binary { op, left, right } => {
            write_expr(f, left, own)?;
            write!(f, " {} ", binary_symbol(*op))?;
            write_expr(f, right, own + 1)
        }
        Expr::Assign { target, value } => {
            write_expr(f, target, 7)?;
            f.write_str(" = ")?;
            write_expr(f, value, 1)
        }
    }
}

fn write_annotations_on_lines(
    f: &mut Formatter<'_>,
    annotations: &[Annotation],
    depth: usize,
) -> fmt::Result {
    for annotation in annotations {
        write_indent(f, depth)?;
        writeln!(f, "{annotation}")?;
    }
    Ok(())
}

fn write_modifiers(f: &mut Formatter<'_>, modifiers: &[Modifier]) -> fmt::Result {
    for modifier in modifiers {
        write!(f, "{modifier} ")?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, body: &[Stmt], depth: usize) -> fmt::Result {
    f.write_str(" {\n")?;
    for stmt in body {
        write_indent(f, depth + 1)?;
        writeln!(f, "{stmt}")?;
    }
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_member(f: &mut Formatter<'_>, member: &Member, depth: usize) -> fmt::Result {
    match member {
        Member::Field(field) => write_field(f, field, depth),
        Member::Constructor(ctor) => write_constructor(f, ctor, depth),
        Member::Method(method) => write_method(f, method, depth),
    }
}

fn write_field(f: &mut Formatter<'_>, field: &FieldDecl, depth: usize) -> fmt::Result {
    write_annotations_on_lines(f, &field.annotations, depth)?;
    write_indent(f, depth)?;
    write_modifiers(f, &field.modifiers)?;
    write!(f, "{} {}", field.ty, field.name)?;
    if let Some(init) = &field.init {
        write!(f, " = {init}")?;
    }
    f.write_char(';')
}

fn write_constructor(f: &mut Formatter<'_>, ctor: &ConstructorDecl, depth: usize) -> fmt::Result {
    write_annotations_on_lines(f, &ctor.annotations, depth)?;
    write_indent(f, depth)?;
    write_modifiers(f, &ctor.modifiers)?;
    write!(f, "{}(", ctor.name)?;
    write_joined(f, &ctor.params, ", ")?;
    f.write_char(')')?;
    write_block(f, &ctor.body, depth)
}

fn write_method(f: &mut Formatter<'_>, method: &MethodDecl, depth: usize) -> fmt::Result {
    write_annotations_on_lines(f, &method.annotations, depth)?;
    write_indent(f, depth)?;
    write_modifiers(f, &method.modifiers)?;
    if !method.type_params.is_empty() {
        f.write_char('<')?;
        write_joined(f, &method.type_params, ", ")?;
        f.write_str("> ")?;
    }
    write!(f, "{} {}(", method.return_type, method.name)?;
    write_joined(f, &method.params, ", ")?;
    f.write_char(')')?;
    match &method.body {
        Some(body) => write_block(f, body, depth),
        None => f.write_char(';'),
    }
}

fn write_enum_constant(f: &mut Formatter<'_>, constant: &EnumConstant) -> fmt::Result {
    write!(f, "{}", constant.name)?;
    if !constant.args.is_empty() {
        f.write_char('(')?;
        write_joined(f, &constant.args, ", ")?;
        f.write_char(')')?;
    }
    Ok(())
}

fn write_type_decl(f: &mut Formatter<'_>, decl: &TypeDecl, depth: usize) -> fmt::Result {
    write_annotations_on_lines(f, &decl.annotations, depth)?;
    write_indent(f, depth)?;
    write_modifiers(f, &decl.modifiers)?;
    write!(f, "{} {}", decl.kind.keyword(), decl.name)?;
    if !decl.extends.is_empty() {
        f.write_str(" extends ")?;
        write_joined(f, &decl.extends, ", ")?;
    }
    if !decl.implements.is_empty() {
        f.write_str(" implements ")?;
        write_joined(f, &decl.implements, ", ")?;
    }
    f.write_str(" {\n")?;

    let inner = depth + 1;
    if decl.kind == TypeDeclKind::Enum && !decl.constants.is_empty() {
        for (i, constant) in decl.constants.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write_indent(f, inner)?;
            write_enum_constant(f, constant)?;
        }
        if decl.members.is_empty() {
            f.write_char('\n')?;
        } else {
            f.write_str(";\n\n")?;
        }
    }

    let mut previous: Option<&Member> = None;
    for member in &decl.members {
        let fields_in_a_row = matches!(
            (previous, member),
            (Some(Member::Field(_)), Member::Field(_))
        );
        if previous.is_some() && !fields_in_a_row {
            f.write_char('\n')?;
        }
        write_member(f, member, inner)?;
        f.write_char('\n')?;
        previous = Some(member);
    }

    write_indent(f, depth)?;
    f.write_char('}')
}

#[cfg(test)]
mod tests {
    use crate::syntax::ast::{Expr, UnaryOp};
    use crate::syntax::parser::{parse_compilation_unit, parse_expression, parse_type};

    fn negate(expr: Expr) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            expr: Box::new(expr),
        }
    }

    #[test]
    fn parenthesizes_by_precedence() {
        let expr = parse_expression("(a + b) + (c + d)").unwrap();
        assert_eq!(expr.to_string(), "a + b + (c + d)");

        let expr = parse_expression("!(a && b) || (c == d)").unwrap();
        assert_eq!(expr.to_string(), "!(a && b) || c == d");
    }

    #[test]
    fn escapes_string_literals() {
        let expr = parse_expression(r#""say \"hi\"\n""#).unwrap();
        assert_eq!(expr.to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn class_literal_drops_type_arguments() {
        let ty = parse_type("java.util.List<String>").unwrap();
        let expr = crate::syntax::ast::Expr::class_literal(&ty);
        assert_eq!(expr.to_string(), "java.util.List.class");
    }

    #[test]
    fn long_literals_keep_their_suffix() {
        let expr = parse_expression("5000000000L").unwrap();
        assert_eq!(expr.to_string(), "5000000000L");
    }

    #[test]
    fn nested_negation_keeps_its_minus_signs_apart() {
        let expr = parse_expression("- -x").unwrap();
        assert_eq!(expr.to_string(), "- -x");

        let cases = [
            (negate(Expr::integer(-5)), "- -5"),
            (negate(Expr::integer(5)), "-(5)"),
            (negate(negate(Expr::integer(1))), "- -(1)"),
        ];
        for (expr, text) in cases {
            assert_eq!(expr.to_string(), text);
            assert_eq!(parse_expression(text).unwrap(), expr, "{text}");
        }
    }

    #[test]
    fn smallest_long_reads_back() {
        let min = Expr::integer(i64::MIN);
        assert_eq!(min.to_string(), "-9223372036854775808L");
        assert_eq!(parse_expression(&min.to_string()).unwrap(), min);

        let max = Expr::integer(i64::MAX);
        assert_eq!(parse_expression(&max.to_string()).unwrap(), max);
    }

    #[test]
    fn prints_compilation_unit_in_canonical_layout() {
        let source = "package com.example; import java.util.List; \
            public class Pet { private final String name; private final long id; \
            public Pet(String name, long id) { this.name = name; this.id = id; } \
            public String getName() { return this.name; } }";
        let unit = parse_compilation_unit(source).unwrap();
        let expected = "\
package com.example;

import java.util.List;

public class Pet {
    private final String name;
    private final long id;

    public Pet(String name, long id) {
        this.name = name;
        this.id = id;
    }

    public String getName() {
        return this.name;
    }
}
";
        assert_eq!(unit.to_string(), expected);
        assert_eq!(parse_compilation_unit(expected).unwrap(), unit);
    }

    #[test]
    fn enum_without_members_has_no_trailing_semicolon() {
        let unit = parse_compilation_unit("enum Color { RED, GREEN, }").unwrap();
        assert_eq!(unit.to_string(), "enum Color {\n    RED,\n    GREEN\n}\n");
    }
}
