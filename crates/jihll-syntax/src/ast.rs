//! Abstract Syntax Tree definitions for Jihll.

use crate::token::Span;

// ═══════════════════════════════════════════════════════════════════════════
// Program
// ═══════════════════════════════════════════════════════════════════════════

/// A parsed compile unit: one source file or one REPL line.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Print(PrintStmt),
    Function(FunctionDecl),
    Class(ClassDecl),
    Block(Block),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    Return(ReturnStmt),
    Import(ImportStmt),
    Try(Box<TryStmt>),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(e) => e.span(),
            Stmt::Print(p) => p.span,
            Stmt::Function(f) => f.span,
            Stmt::Class(c) => c.span,
            Stmt::Block(b) => b.span,
            Stmt::If(i) => i.span,
            Stmt::While(w) => w.span,
            Stmt::Return(r) => r.span,
            Stmt::Import(i) => i.span,
            Stmt::Try(t) => t.span,
        }
    }
}

/// An ordered statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    pub span: Span,
}

/// `fun name p1, p2: body .`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// `class Name: fun ... . .`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub methods: Vec<FunctionDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub path: Expr,
    pub span: Span,
}

/// `try: body catch err: handler .`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: Block,
    pub error_var: Ident,
    pub handler: Block,
    pub span: Span,
}

// ═══════════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Variable(Ident),
    Literal(Literal),
    Assign(Box<AssignExpr>),
    Set(Box<SetExpr>),
    Get(Box<GetExpr>),
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Call(Box<CallExpr>),
    Array(ArrayExpr),
    Map(MapExpr),
    This(Span),
    Spawn(Box<SpawnExpr>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Variable(id) => id.span,
            Expr::Literal(lit) => lit.span(),
            Expr::Assign(a) => a.span,
            Expr::Set(s) => s.span,
            Expr::Get(g) => g.span,
            Expr::Binary(b) => b.span,
            Expr::Unary(u) => u.span,
            Expr::Call(c) => c.span,
            Expr::Array(a) => a.span,
            Expr::Map(m) => m.span,
            Expr::This(s) => *s,
            Expr::Spawn(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null(Span),
    Bool(bool, Span),
    Number(f64, Span),
    String(String, Span),
}

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Null(s) | Literal::Bool(_, s) | Literal::Number(_, s) | Literal::String(_, s) => *s,
        }
    }
}

/// `target = value`. Only a variable target is valid; the compiler rejects the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `object.name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct SetExpr {
    pub object: Expr,
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `object.name`
#[derive(Debug, Clone, PartialEq)]
pub struct GetExpr {
    pub object: Expr,
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elems: Vec<Expr>,
    pub span: Span,
}

/// `{k: v, ...}` with pairs in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapExpr {
    pub entries: Vec<(Expr, Expr)>,
    pub span: Span,
}

/// `spawn <expr>`. The operand must be a call for the program to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnExpr {
    pub call: Expr,
    pub span: Span,
}
