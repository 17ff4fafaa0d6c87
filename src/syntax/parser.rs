//! Recursive-descent parser for the Java subset.
//!
//! Every entry point consumes its whole input; trailing tokens are an error.

use crate::error::ParseError;

use super::ast::{
    Annotation, BinaryOp, ClassType, CompilationUnit, ConstructorDecl, EnumConstant, Expr,
    FieldDecl, Import, Literal, Member, MethodDecl, Modifier, Name, Parameter, PrimitiveType,
    QualifiedName, Stmt, Type, TypeArg, TypeDecl, TypeDeclKind, UnaryOp, WildcardBound,
};
use super::lexer::{tokenize, Token, TokenKind};
use super::naming::is_reserved_word;

/// Deepest nesting of type arguments, parentheses or unary operators accepted.
const MAX_NESTING: usize = 128;

pub fn parse_compilation_unit(input: &str) -> Result<CompilationUnit, ParseError> {
    parse_all(input, Parser::parse_compilation_unit)
}

pub fn parse_name(input: &str) -> Result<Name, ParseError> {
    parse_all(input, Parser::parse_name)
}

pub fn parse_qualified_name(input: &str) -> Result<QualifiedName, ParseError> {
    parse_all(input, Parser::parse_qualified_name)
}

pub fn parse_type(input: &str) -> Result<Type, ParseError> {
    parse_all(input, Parser::parse_type)
}

pub fn parse_class_type(input: &str) -> Result<ClassType, ParseError> {
    parse_all(input, Parser::parse_class_type)
}

pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    parse_all(input, Parser::parse_expr)
}

pub fn parse_parameter(input: &str) -> Result<Parameter, ParseError> {
    parse_all(input, Parser::parse_parameter)
}

/// `import [static] a.b.C[.*];`
pub fn parse_import(input: &str) -> Result<Import, ParseError> {
    parse_all(input, Parser::parse_import_decl)
}

/// `a.b.C` or `a.b.*`, without the keyword and semicolon.
pub fn parse_raw_import(input: &str) -> Result<Import, ParseError> {
    parse_all(input, |p| p.parse_import_target(false))
}

/// `a.b.C.member` or `a.b.C.*`, without the keywords and semicolon.
pub fn parse_raw_static_import(input: &str) -> Result<Import, ParseError> {
    parse_all(input, |p| p.parse_import_target(true))
}

fn parse_all<T, F>(input: &str, parse: F) -> Result<T, ParseError>
where
    F: FnOnce(&mut Parser) -> Result<T, ParseError>,
{
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let value = parse(&mut parser)?;
    if !matches!(parser.current().kind, TokenKind::Eof) {
        return Err(parser.unexpected("end of input"));
    }
    Ok(value)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        let mut package = None;
        if self.consume_keyword("package") {
            package = Some(self.parse_qualified_name()?);
            self.expect(TokenKind::Semi, "';' after package declaration")?;
        }

        let mut imports = Vec::new();
        while self.at_keyword("import") {
            imports.push(self.parse_import_decl()?);
        }

        let mut types = Vec::new();
        while !matches!(self.current().kind, TokenKind::Eof) {
            types.push(self.parse_type_decl()?);
        }

        Ok(CompilationUnit {
            package,
            imports,
            types,
        })
    }

    fn parse_import_decl(&mut self) -> Result<Import, ParseError> {
        if !self.consume_keyword("import") {
            return Err(self.unexpected("'import'"));
        }
        let is_static = self.consume_keyword("static");
        let import = self.parse_import_target(is_static)?;
        self.expect(TokenKind::Semi, "';' after import")?;
        Ok(import)
    }

    fn parse_import_target(&mut self, is_static: bool) -> Result<Import, ParseError> {
        let start = self.current().pos;
        let name = self.parse_qualified_name()?;
        let is_asterisk = if matches!(self.current().kind, TokenKind::Dot)
            && matches!(self.peek_kind(1), TokenKind::Star)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        if is_static && !is_asterisk && name.is_simple() {
            return Err(ParseError::new(
                "static import must name a member of a type",
                start,
            ));
        }
        Ok(Import::new(name, is_static, is_asterisk))
    }

    fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let annotations = self.parse_annotations()?;
        let modifiers = self.parse_modifiers();
        let kind = if self.consume_keyword("class") {
            TypeDeclKind::Class
        } else if self.consume_keyword("interface") {
            TypeDeclKind::Interface
        } else if self.consume_keyword("enum") {
            TypeDeclKind::Enum
        } else {
            return Err(self.unexpected("'class', 'interface' or 'enum'"));
        };
        let name = self.parse_name()?;

        let mut decl = TypeDecl::new(kind, modifiers, name);
        decl.annotations = annotations;
        if self.consume_keyword("extends") {
            decl.extends = self.parse_class_type_list()?;
        }
        if self.consume_keyword("implements") {
            decl.implements = self.parse_class_type_list()?;
        }

        self.expect(TokenKind::LBrace, "'{' to open type body")?;
        if kind == TypeDeclKind::Enum {
            decl.constants = self.parse_enum_constants()?;
        }
        while !matches!(self.current().kind, TokenKind::RBrace) {
            if matches!(self.current().kind, TokenKind::Eof) {
                return Err(self.unexpected("'}' to close type body"));
            }
            let member = self.parse_member(&decl.name)?;
            decl.members.push(member);
        }
        self.advance();
        Ok(decl)
    }

    fn parse_enum_constants(&mut self) -> Result<Vec<EnumConstant>, ParseError> {
        let mut constants = Vec::new();
        while let TokenKind::Ident(_) = self.current().kind {
            let name = self.parse_name()?;
            let args = if matches!(self.current().kind, TokenKind::LParen) {
                self.parse_arguments()?
            } else {
                Vec::new()
            };
            constants.push(EnumConstant { name, args });
            if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        if !matches!(self.current().kind, TokenKind::RBrace) {
            self.expect(TokenKind::Semi, "';' or '}' after enum constants")?;
        }
        Ok(constants)
    }

    fn parse_member(&mut self, type_name: &Name) -> Result<Member, ParseError> {
        let annotations = self.parse_annotations()?;
        let modifiers = self.parse_modifiers();
        let type_params = if matches!(self.current().kind, TokenKind::Lt) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let is_constructor = matches!(&self.current().kind, TokenKind::Ident(n) if n == type_name.as_str())
            && matches!(self.peek_kind(1), TokenKind::LParen);
        if is_constructor {
            if !type_params.is_empty() {
                return Err(self.unexpected("a method declaration"));
            }
            let name = self.parse_name()?;
            let params = self.parse_parameter_list()?;
            let body = self.parse_block()?;
            return Ok(Member::Constructor(ConstructorDecl {
                annotations,
                modifiers,
                name,
                params,
                body,
            }));
        }

        let return_type = self.parse_return_type()?;
        let name = self.parse_name()?;

        if matches!(self.current().kind, TokenKind::LParen) {
            let params = self.parse_parameter_list()?;
            let body = if matches!(self.current().kind, TokenKind::LBrace) {
                Some(self.parse_block()?)
            } else {
                self.expect(TokenKind::Semi, "';' or method body")?;
                None
            };
            return Ok(Member::Method(MethodDecl {
                annotations,
                modifiers,
                type_params,
                return_type,
                name,
                params,
                body,
            }));
        }

        if return_type.is_void() {
            return Err(ParseError::new(
                "field cannot have type 'void'",
                self.current().pos,
            ));
        }
        if !type_params.is_empty() {
            return Err(self.unexpected("'(' after generic method name"));
        }
        let init = if self.consume_if(|k| matches!(k, TokenKind::Assign)).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi, "';' after field declaration")?;
        Ok(Member::Field(FieldDecl {
            annotations,
            modifiers,
            ty: return_type,
            name,
            init,
        }))
    }

    fn parse_type_params(&mut self) -> Result<Vec<Name>, ParseError> {
        self.expect(TokenKind::Lt, "'<'")?;
        let mut params = vec![self.parse_name()?];
        while self.consume_if(|k| matches!(k, TokenKind::Comma)).is_some() {
            params.push(self.parse_name()?);
        }
        self.expect(TokenKind::Gt, "'>' to close type parameters")?;
        Ok(params)
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if self.consume_if(|k| matches!(k, TokenKind::RParen)).is_some() {
            return Ok(params);
        }
        loop {
            params.push(self.parse_parameter()?);
            if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' to close parameter list")?;
        Ok(params)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let annotations = self.parse_annotations()?;
        let is_final = self.consume_keyword("final");
        let ty = self.parse_type()?;
        let name = self.parse_name()?;
        Ok(Parameter {
            annotations,
            is_final,
            ty,
            name,
        })
    }

    fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        while self.consume_if(|k| matches!(k, TokenKind::At)).is_some() {
            let name = self.parse_qualified_name()?;
            let argument = if self.consume_if(|k| matches!(k, TokenKind::LParen)).is_some() {
                let argument = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')' to close annotation argument")?;
                Some(argument)
            } else {
                None
            };
            annotations.push(Annotation { name, argument });
        }
        Ok(annotations)
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while let TokenKind::Ident(text) = &self.current().kind {
            let Some(modifier) = Modifier::from_keyword(text) else {
                break;
            };
            modifiers.push(modifier);
            self.advance();
        }
        modifiers
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace, "'{' to open block")?;
        let mut statements = Vec::new();
        while !matches!(self.current().kind, TokenKind::RBrace) {
            if matches!(self.current().kind, TokenKind::Eof) {
                return Err(self.unexpected("'}' to close block"));
            }
            statements.push(self.parse_statement()?);
        }
        self.advance();
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.consume_keyword("return") {
            if self.consume_if(|k| matches!(k, TokenKind::Semi)).is_some() {
                return Ok(Stmt::Return(None));
            }
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi, "';' after return value")?;
            return Ok(Stmt::Return(Some(value)));
        }
        if self.consume_keyword("throw") {
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi, "';' after throw")?;
            return Ok(Stmt::Throw(value));
        }

        if let Some(local) = self.try_parse_local()? {
            return Ok(local);
        }

        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi, "';' after expression statement")?;
        Ok(Stmt::Expr(expr))
    }

    /// Parses `Type name [= init];` when the upcoming tokens have that shape,
    /// leaving the position untouched otherwise.
    fn try_parse_local(&mut self) -> Result<Option<Stmt>, ParseError> {
        let saved = self.pos;
        let ty = match self.parse_type() {
            Ok(ty) => ty,
            Err(_) => {
                self.pos = saved;
                return Ok(None);
            }
        };
        let is_declaration = matches!(self.current().kind, TokenKind::Ident(_))
            && matches!(self.peek_kind(1), TokenKind::Assign | TokenKind::Semi);
        if !is_declaration {
            self.pos = saved;
            return Ok(None);
        }

        let name = self.parse_name()?;
        let init = if self.consume_if(|k| matches!(k, TokenKind::Assign)).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi, "';' after local variable")?;
        Ok(Some(Stmt::Local { ty, name, init }))
    }

    fn parse_name(&mut self) -> Result<Name, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Ident(text) if is_reserved_word(&text) => Err(ParseError::new(
                format!("expected identifier, found reserved word '{text}'"),
                token.pos,
            )),
            TokenKind::Ident(text) => {
                self.advance();
                Ok(Name::new_unchecked(text))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let mut segments = Vec::new();
        let mut last = self.parse_name()?;
        while matches!(self.current().kind, TokenKind::Dot)
            && matches!(self.peek_kind(1), TokenKind::Ident(_))
        {
            self.advance();
            segments.push(last);
            last = self.parse_name()?;
        }
        Ok(QualifiedName::from_parts(segments, last))
    }

    fn parse_return_type(&mut self) -> Result<Type, ParseError> {
        if self.consume_keyword("void") {
            return Ok(Type::void());
        }
        self.parse_type()
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let base = match &self.current().kind {
            TokenKind::Ident(text) => {
                if let Some(primitive) = PrimitiveType::from_keyword(text) {
                    self.advance();
                    Type::primitive(primitive)
                } else if text == "void" {
                    return Err(ParseError::new(
                        "'void' is only valid as a method return type",
                        self.current().pos,
                    ));
                } else {
                    Type::class(self.parse_class_type()?)
                }
            }
            _ => return Err(self.unexpected("type")),
        };
        self.parse_array_suffix(base)
    }

    fn parse_array_suffix(&mut self, mut ty: Type) -> Result<Type, ParseError> {
        while matches!(self.current().kind, TokenKind::LBracket) {
            self.advance();
            self.expect(TokenKind::RBracket, "']' in array type")?;
            ty = Type::array(ty);
        }
        Ok(ty)
    }

    fn parse_class_type(&mut self) -> Result<ClassType, ParseError> {
        let name = self.parse_qualified_name()?;
        let mut args = Vec::new();
        if self.consume_if(|k| matches!(k, TokenKind::Lt)).is_some() {
            if matches!(self.current().kind, TokenKind::Gt) {
                return Err(ParseError::new(
                    "empty type argument list",
                    self.current().pos,
                ));
            }
            loop {
                args.push(self.parse_type_arg()?);
                if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::Gt, "'>' to close type arguments")?;
        }
        Ok(ClassType::new(name, args))
    }

    fn parse_class_type_list(&mut self) -> Result<Vec<ClassType>, ParseError> {
        let mut types = vec![self.parse_class_type()?];
        while self.consume_if(|k| matches!(k, TokenKind::Comma)).is_some() {
            types.push(self.parse_class_type()?);
        }
        Ok(types)
    }

    fn parse_type_arg(&mut self) -> Result<TypeArg, ParseError> {
        if self.consume_if(|k| matches!(k, TokenKind::Question)).is_some() {
            let bound = if self.consume_keyword("extends") {
                Some(WildcardBound::Extends(self.nested(Self::parse_reference_type)?))
            } else if self.consume_keyword("super") {
                Some(WildcardBound::Super(self.nested(Self::parse_reference_type)?))
            } else {
                None
            };
            return Ok(TypeArg::Wildcard(bound));
        }
        Ok(TypeArg::Type(self.nested(Self::parse_reference_type)?))
    }

    fn parse_reference_type(&mut self) -> Result<Type, ParseError> {
        let pos = self.current().pos;
        let ty = self.parse_type()?;
        if ty.is_primitive() {
            return Err(ParseError::new(
                format!("primitive type '{ty}' cannot be used as a type argument"),
                pos,
            ));
        }
        Ok(ty)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current().pos;
        let target = self.parse_or()?;
        if self.consume_if(|k| matches!(k, TokenKind::Assign)).is_none() {
            return Ok(target);
        }
        if !matches!(target, Expr::Name(_) | Expr::FieldAccess { .. }) {
            return Err(ParseError::new("invalid assignment target", pos));
        }
        let value = self.nested(Self::parse_expr)?;
        Ok(Expr::assign(target, value))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_and()?;
        while self.consume_if(|k| matches!(k, TokenKind::OrOr)).is_some() {
            let right = self.parse_and()?;
            expr = Expr::binary(BinaryOp::Or, expr, right);
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_equality()?;
        while self
            .consume_if(|k| matches!(k, TokenKind::AndAnd))
            .is_some()
        {
            let right = self.parse_equality()?;
            expr = Expr::binary(BinaryOp::And, expr, right);
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = if self.consume_if(|k| matches!(k, TokenKind::EqEq)).is_some() {
                BinaryOp::Eq
            } else if self.consume_if(|k| matches!(k, TokenKind::NotEq)).is_some() {
                BinaryOp::NotEq
            } else {
                break;
            };
            let right = self.parse_additive()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.consume_if(|k| matches!(k, TokenKind::Plus)).is_some() {
                BinaryOp::Add
            } else if self.consume_if(|k| matches!(k, TokenKind::Minus)).is_some() {
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.parse_unary()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.consume_if(|k| matches!(k, TokenKind::Bang)).is_some() {
            let expr = self.nested(Self::parse_unary)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
            });
        }
        if self.consume_if(|k| matches!(k, TokenKind::Minus)).is_some() {
            if let TokenKind::Int(n) = self.current().kind {
                let value = 0i64.checked_sub_unsigned(n).ok_or_else(|| {
                    ParseError::new(
                        format!("integer literal -{n} is out of range"),
                        self.current().pos,
                    )
                })?;
                self.advance();
                return Ok(Expr::integer(value));
            }
            let expr = self.nested(Self::parse_unary)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(expr),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while matches!(self.current().kind, TokenKind::Dot) {
            let dot_pos = self.current().pos;
            self.advance();
            if self.consume_keyword("class") {
                let ty = expr_to_type(&expr).ok_or_else(|| {
                    ParseError::new("class literal requires a type name", dot_pos)
                })?;
                expr = Expr::ClassLiteral(ty);
                continue;
            }
            let name = self.parse_name()?;
            if matches!(self.current().kind, TokenKind::LParen) {
                let args = self.parse_arguments()?;
                expr = expr.call(name, args);
            } else {
                expr = expr.field(name);
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Int(n) => {
                let value = i64::try_from(n).map_err(|_| {
                    ParseError::new(format!("integer literal {n} is out of range"), token.pos)
                })?;
                self.advance();
                Ok(Expr::integer(value))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::string(s))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.nested(Self::parse_expr)?;
                self.expect(TokenKind::RParen, "')' to close parenthesized expression")?;
                Ok(expr)
            }
            TokenKind::Ident(text) => match text.as_str() {
                "true" | "false" => {
                    self.advance();
                    Ok(Expr::Literal(Literal::Boolean(text == "true")))
                }
                "null" => {
                    self.advance();
                    Ok(Expr::null())
                }
                "this" => {
                    self.advance();
                    Ok(Expr::This)
                }
                "new" => {
                    self.advance();
                    let ty = self.parse_class_type()?;
                    let args = self.parse_arguments()?;
                    Ok(Expr::new_instance(ty, args))
                }
                keyword if PrimitiveType::from_keyword(keyword).is_some() || keyword == "void" => {
                    let ty = self.parse_return_type()?;
                    if !(matches!(self.current().kind, TokenKind::Dot)
                        && matches!(self.peek_kind(1), TokenKind::Ident(k) if k == "class"))
                    {
                        return Err(self.unexpected("'.class' after primitive type"));
                    }
                    self.advance();
                    self.advance();
                    Ok(Expr::ClassLiteral(ty))
                }
                _ => {
                    let name = self.parse_name()?;
                    if matches!(self.current().kind, TokenKind::LParen) {
                        let args = self.parse_arguments()?;
                        Ok(Expr::MethodCall {
                            target: None,
                            name,
                            args,
                        })
                    } else {
                        Ok(Expr::Name(name))
                    }
                }
            },
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.consume_if(|k| matches!(k, TokenKind::RParen)).is_some() {
            return Ok(args);
        }
        loop {
            args.push(self.nested(Self::parse_expr)?);
            if self.consume_if(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' to close argument list")?;
        Ok(args)
    }

    /// Runs `parse` one level deeper, failing once [`MAX_NESTING`] is reached.
    fn nested<T, F>(&mut self, parse: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new("nesting too deep", self.current().pos));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn consume_if<F>(&mut self, pred: F) -> Option<Token>
    where
        F: Fn(&TokenKind) -> bool,
    {
        let token = self.current().clone();
        if pred(&token.kind) {
            self.advance();
            Some(token)
        } else {
            None
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(text) if text == keyword)
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        self.consume_if(|k| *k == kind)
            .ok_or_else(|| self.unexpected(what))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::new(
            format!("expected {expected}, found {}", token.kind.describe()),
            token.pos,
        )
    }
}

/// Reads `a.b.C` back as a class type for a class literal.
fn expr_to_type(expr: &Expr) -> Option<Type> {
    fn collect(expr: &Expr, out: &mut Vec<Name>) -> bool {
        match expr {
            Expr::Name(name) => {
                out.push(name.clone());
                true
            }
            Expr::FieldAccess { target, name } => {
                if !collect(target, out) {
                    return false;
                }
                out.push(name.clone());
                true
            }
            _ => false,
        }
    }

    let mut segments = Vec::new();
    if !collect(expr, &mut segments) {
        return None;
    }
    let last = segments.pop()?;
    Some(Type::class(ClassType::new(
        QualifiedName::from_parts(segments, last),
        Vec::new(),
    )))
}
