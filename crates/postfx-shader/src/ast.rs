//! Syntax tree of an effect file
//!
//! Only declarations are represented in detail. Function bodies and the
//! contents of texture, sampler and pass blocks are skipped by the parser.

use crate::diagnostic::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Texture,
    Sampler,
    Storage,
    Struct,
}

/// A declared type: base type plus vector/matrix dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub base: BaseType,
    pub rows: u8,
    pub cols: u8,
}

impl TypeSpec {
    pub fn scalar(base: BaseType) -> Self {
        Self { base, rows: 1, cols: 1 }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.base, BaseType::Bool | BaseType::Int | BaseType::Uint | BaseType::Float)
    }

    pub fn is_scalar(&self) -> bool {
        self.is_numeric() && self.rows == 1 && self.cols == 1
    }

    pub fn is_resource(&self) -> bool {
        matches!(self.base, BaseType::Texture | BaseType::Sampler | BaseType::Storage)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub uniform: bool,
    pub is_static: bool,
    pub is_const: bool,
}

/// `name = value;` inside `< … >`
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub value: Expr,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub ty: TypeSpec,
    pub qualifiers: Qualifiers,
    /// One entry per `[…]`, `None` for an unsized dimension
    pub array_dims: Vec<Option<Expr>>,
    pub semantic: Option<String>,
    pub annotations: Vec<Annotation>,
    pub initializer: Option<Expr>,
    pub location: Location,
}

/// Texture, sampler or storage declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDecl {
    pub name: String,
    pub ty: TypeSpec,
    pub annotations: Vec<Annotation>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub passes: usize,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Variable(VariableDecl),
    Resource(ResourceDecl),
    Technique(TechniqueDecl),
    Function { name: String, location: Location },
    Struct { name: String, location: Location },
    Namespace { name: String, items: Vec<Item>, location: Location },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int { value: i64, unsigned: bool },
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_punct(p: &str) -> Option<(BinaryOp, u8)> {
        Some(match p {
            "||" => (BinaryOp::Or, 1),
            "&&" => (BinaryOp::And, 2),
            "|" => (BinaryOp::BitOr, 3),
            "^" => (BinaryOp::BitXor, 4),
            "&" => (BinaryOp::BitAnd, 5),
            "==" => (BinaryOp::Eq, 6),
            "!=" => (BinaryOp::Ne, 6),
            "<" => (BinaryOp::Lt, 7),
            ">" => (BinaryOp::Gt, 7),
            "<=" => (BinaryOp::Le, 7),
            ">=" => (BinaryOp::Ge, 7),
            "<<" => (BinaryOp::Shl, 8),
            ">>" => (BinaryOp::Shr, 8),
            "+" => (BinaryOp::Add, 9),
            "-" => (BinaryOp::Sub, 9),
            "*" => (BinaryOp::Mul, 10),
            "/" => (BinaryOp::Div, 10),
            "%" => (BinaryOp::Rem, 10),
            _ => return None,
        })
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Possibly qualified name (`ns::value`)
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Cast(TypeSpec, Box<Expr>),
    Construct(TypeSpec, Vec<Expr>),
    Call(String, Vec<Expr>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    InitList(Vec<Expr>),
}
