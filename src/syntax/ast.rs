//! Syntax tree for the emitted Java subset.
//!
//! Leaf fragments ([`Name`], [`QualifiedName`], [`Type`], [`ClassType`],
//! [`Import`]) have private representations and come from the parser or the
//! builders in this module and [`super::types`]. Composite nodes expose their
//! fields, since they can only be assembled from already-valid leaves.

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A simple identifier that is not a reserved word.
pub struct Name(String);

impl Name {
    /// Wraps text already known to be a valid identifier.
    pub(crate) fn new_unchecked(text: impl Into<String>) -> Self {
        Name(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Dot-separated name, for example `java.util.Optional`.
pub struct QualifiedName {
    qualifier: Vec<Name>,
    name: Name,
}

impl QualifiedName {
    pub fn simple(name: Name) -> Self {
        Self {
            qualifier: Vec::new(),
            name,
        }
    }

    pub(crate) fn from_parts(mut segments: Vec<Name>, last: Name) -> Self {
        segments.shrink_to_fit();
        Self {
            qualifier: segments,
            name: last,
        }
    }

    /// Builds a name from segments known to be valid identifiers.
    pub(crate) fn well_known(path: &str) -> Self {
        let mut segments: Vec<Name> = path.split('.').map(Name::new_unchecked).collect();
        let last = segments.pop().unwrap_or_else(|| Name::new_unchecked(path));
        Self::from_parts(segments, last)
    }

    /// Last segment.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn qualifier(&self) -> Option<QualifiedName> {
        let mut segments = self.qualifier.clone();
        let last = segments.pop()?;
        Some(Self::from_parts(segments, last))
    }

    pub fn segments(&self) -> impl Iterator<Item = &Name> {
        self.qualifier.iter().chain(std::iter::once(&self.name))
    }

    pub fn is_simple(&self) -> bool {
        self.qualifier.is_empty()
    }

    /// Appends `name` as a new last segment.
    pub fn child(&self, name: Name) -> Self {
        let mut qualifier = self.qualifier.clone();
        qualifier.push(self.name.clone());
        Self { qualifier, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

const PRIMITIVES: &[(PrimitiveType, &str, &str)] = &[
    (PrimitiveType::Boolean, "boolean", "Boolean"),
    (PrimitiveType::Byte, "byte", "Byte"),
    (PrimitiveType::Short, "short", "Short"),
    (PrimitiveType::Int, "int", "Integer"),
    (PrimitiveType::Long, "long", "Long"),
    (PrimitiveType::Char, "char", "Character"),
    (PrimitiveType::Float, "float", "Float"),
    (PrimitiveType::Double, "double", "Double"),
];

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        PRIMITIVES
            .iter()
            .find(|(p, _, _)| *p == self)
            .map(|(_, keyword, _)| *keyword)
            .unwrap_or("int")
    }

    /// Simple name of the `java.lang` wrapper class.
    pub fn boxed_name(self) -> &'static str {
        PRIMITIVES
            .iter()
            .find(|(p, _, _)| *p == self)
            .map(|(_, _, boxed)| *boxed)
            .unwrap_or("Integer")
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        PRIMITIVES
            .iter()
            .find(|(_, keyword, _)| *keyword == text)
            .map(|(p, _, _)| *p)
    }

    /// Accepts the wrapper's simple or `java.lang`-qualified name.
    pub fn from_boxed_name(text: &str) -> Option<Self> {
        let simple = text.strip_prefix("java.lang.").unwrap_or(text);
        PRIMITIVES
            .iter()
            .find(|(_, _, boxed)| *boxed == simple)
            .map(|(p, _, _)| *p)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A validated type. Shape is inspected only through the predicates in
/// [`super::types`].
pub struct Type(pub(crate) TypeKind);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeKind {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    Void,
}

impl Type {
    pub fn primitive(primitive: PrimitiveType) -> Self {
        Type(TypeKind::Primitive(primitive))
    }

    pub fn class(class: ClassType) -> Self {
        Type(TypeKind::Class(class))
    }

    /// Array of `element`; a `void` element is normalized to `java.lang.Void`.
    pub fn array(element: Type) -> Self {
        let element = match element.0 {
            TypeKind::Void => void_class(),
            _ => element,
        };
        Type(TypeKind::Array(Box::new(element)))
    }

    /// `void`, valid only as a method return type.
    pub fn void() -> Self {
        Type(TypeKind::Void)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.0, TypeKind::Void)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.0, TypeKind::Primitive(_))
    }

    /// Converts into the class-or-interface type it is, if it is one.
    pub fn into_class_type(self) -> Option<ClassType> {
        match self.0 {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }
}

fn void_class() -> Type {
    Type::class(ClassType::new(QualifiedName::well_known("Void"), Vec::new()))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Class or interface type: a qualified name plus type arguments on its last segment.
pub struct ClassType {
    name: QualifiedName,
    args: Vec<TypeArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Type(Type),
    /// `?`, `? extends T` or `? super T`.
    Wildcard(Option<WildcardBound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Extends(Type),
    Super(Type),
}

impl ClassType {
    /// Type arguments are normalized to reference types: primitives are boxed
    /// and `void` becomes `java.lang.Void`.
    pub fn new(name: QualifiedName, args: Vec<TypeArg>) -> Self {
        let args = args.into_iter().map(TypeArg::normalized).collect();
        Self { name, args }
    }

    pub fn with_args(self, args: Vec<Type>) -> Self {
        Self::new(self.name, args.into_iter().map(TypeArg::Type).collect())
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }
}

impl TypeArg {
    fn normalized(self) -> Self {
        match self {
            TypeArg::Type(ty) => TypeArg::Type(reference_type(ty)),
            TypeArg::Wildcard(Some(WildcardBound::Extends(ty))) => {
                TypeArg::Wildcard(Some(WildcardBound::Extends(reference_type(ty))))
            }
            TypeArg::Wildcard(Some(WildcardBound::Super(ty))) => {
                TypeArg::Wildcard(Some(WildcardBound::Super(reference_type(ty))))
            }
            TypeArg::Wildcard(None) => TypeArg::Wildcard(None),
        }
    }
}

fn reference_type(ty: Type) -> Type {
    match ty.0 {
        TypeKind::Void => void_class(),
        TypeKind::Primitive(_) => ty.boxed(),
        _ => ty,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    name: QualifiedName,
    is_static: bool,
    is_asterisk: bool,
}

impl Import {
    pub(crate) fn new(name: QualifiedName, is_static: bool, is_asterisk: bool) -> Self {
        Self {
            name,
            is_static,
            is_asterisk,
        }
    }

    /// Single-type import of `name`.
    pub fn of(name: QualifiedName) -> Self {
        Self::new(name, false, false)
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_asterisk(&self) -> bool {
        self.is_asterisk
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Eq,
    NotEq,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Name(Name),
    This,
    FieldAccess {
        target: Box<Expr>,
        name: Name,
    },
    MethodCall {
        target: Option<Box<Expr>>,
        name: Name,
        args: Vec<Expr>,
    },
    New {
        ty: ClassType,
        args: Vec<Expr>,
    },
    /// `T.class`; printed with type arguments erased.
    ClassLiteral(Type),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn name(name: Name) -> Self {
        Expr::Name(name)
    }

    /// `this.<name>`
    pub fn this_field(name: Name) -> Self {
        Expr::FieldAccess {
            target: Box::new(Expr::This),
            name,
        }
    }

    pub fn field(self, name: Name) -> Self {
        Expr::FieldAccess {
            target: Box::new(self),
            name,
        }
    }

    /// `<self>.<name>(<args>)`
    pub fn call(self, name: Name, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            target: Some(Box::new(self)),
            name,
            args,
        }
    }

    pub fn new_instance(ty: ClassType, args: Vec<Expr>) -> Self {
        Expr::New { ty, args }
    }

    pub fn class_literal(ty: &Type) -> Self {
        Expr::ClassLiteral(ty.erasure())
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Left-folds `parts` with `+`; an empty list yields `""`.
    pub fn concat(parts: Vec<Expr>) -> Self {
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return Expr::string("");
        };
        parts.fold(first, |acc, part| Expr::binary(BinaryOp::Add, acc, part))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    Throw(Expr),
    Local {
        ty: Type,
        name: Name,
        init: Option<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Modifier::Public),
            "protected" => Some(Modifier::Protected),
            "private" => Some(Modifier::Private),
            "abstract" => Some(Modifier::Abstract),
            "default" => Some(Modifier::Default),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `@Name` or `@Name(argument)`.
pub struct Annotation {
    pub name: QualifiedName,
    pub argument: Option<Expr>,
}

impl Annotation {
    pub fn marker(name: QualifiedName) -> Self {
        Self {
            name,
            argument: None,
        }
    }

    pub fn with_argument(name: QualifiedName, argument: Expr) -> Self {
        Self {
            name,
            argument: Some(argument),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub annotations: Vec<Annotation>,
    pub is_final: bool,
    pub ty: Type,
    pub name: Name,
}

impl Parameter {
    pub fn new(ty: Type, name: Name) -> Self {
        Self {
            annotations: Vec::new(),
            is_final: false,
            ty,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub ty: Type,
    pub name: Name,
    pub init: Option<Expr>,
}

impl FieldDecl {
    pub fn new(modifiers: Vec<Modifier>, ty: Type, name: Name) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers,
            ty,
            name,
            init: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub name: Name,
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<Name>,
    pub return_type: Type,
    pub name: Name,
    pub params: Vec<Parameter>,
    /// `None` for abstract and interface methods.
    pub body: Option<Vec<Stmt>>,
}

impl MethodDecl {
    pub fn new(modifiers: Vec<Modifier>, return_type: Type, name: Name) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers,
            type_params: Vec::new(),
            return_type,
            name,
            params: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

impl TypeDeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeDeclKind::Class => "class",
            TypeDeclKind::Interface => "interface",
            TypeDeclKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: Name,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub kind: TypeDeclKind,
    pub name: Name,
    pub extends: Vec<ClassType>,
    pub implements: Vec<ClassType>,
    /// Only populated for enums.
    pub constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(kind: TypeDeclKind, modifiers: Vec<Modifier>, name: Name) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers,
            kind,
            name,
            extends: Vec::new(),
            implements: Vec::new(),
            constants: Vec::new(),
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<QualifiedName>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
}

impl CompilationUnit {
    /// Unit holding a single type declaration.
    pub fn single(package: Option<QualifiedName>, imports: Vec<Import>, decl: TypeDecl) -> Self {
        Self {
            package,
            imports,
            types: vec![decl],
        }
    }
}
