//! AST node definitions.
//!
//! Declarations are plain structs; statements and expressions are closed
//! enums so that every consumer matches exhaustively. Each statement and
//! expression carries the source line it came from (lines are not part of
//! the dump).
//!
//! # Node Kinds
//!
//! ```text
//! Program ── ExternFunction*
//!        └── Package ── FieldDecl*
//!                   └── Method* ── VarDef* (params)
//!                              └── MethodBody ── VarDef* / Stmt*
//! Stmt: Block | If | While | For | Return | Break | Continue | Assign | Call
//! Expr: Binary | Unary | Variable | ElementAccess | Call | Constant
//! ```

mod dump;
mod list;

use crate::{BinaryOp, Constant, TypeTag, UnaryOp};

pub use self::list::StmtList;

// Declarations

/// Root of a compilation unit.
///
/// `package` is optional only so that a malformed tree can be represented;
/// code generation rejects a program without one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub externs: StmtList<ExternFunction>,
    pub package: Option<Package>,
}

impl Program {
    pub fn new(externs: StmtList<ExternFunction>, package: Option<Package>) -> Self {
        Self { externs, package }
    }
}

/// The single package (class) of a Decaf program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub fields: StmtList<FieldDecl>,
    pub methods: StmtList<Method>,
    pub line: u32,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDecl>,
        methods: Vec<Method>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            fields: StmtList::from(fields),
            methods: StmtList::from(methods),
            line,
        }
    }
}

/// Declaration of a function implemented outside the program.
///
/// Parameters are unnamed; each entry is a [`VarDef`] without a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternFunction {
    pub name: String,
    pub return_type: TypeTag,
    pub params: StmtList<VarDef>,
    pub line: u32,
}

impl ExternFunction {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeTag,
        param_types: &[TypeTag],
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            params: param_types.iter().map(|&ty| VarDef::unnamed(ty, line)).collect(),
            line,
        }
    }
}

/// Storage shape of a package field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldSize {
    Scalar,
    /// Fixed-length array with the declared element count.
    Array(u32),
}

/// A package-level (global) field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeTag,
    pub size: FieldSize,
    /// Constant initializer (`int x = 5;`). Only valid for scalars.
    pub init: Option<Constant>,
    pub line: u32,
}

impl FieldDecl {
    pub fn scalar(name: impl Into<String>, ty: TypeTag, line: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            size: FieldSize::Scalar,
            init: None,
            line,
        }
    }

    pub fn array(name: impl Into<String>, ty: TypeTag, len: u32, line: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            size: FieldSize::Array(len),
            init: None,
            line,
        }
    }

    pub fn initialized(name: impl Into<String>, ty: TypeTag, init: Constant, line: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            size: FieldSize::Scalar,
            init: Some(init),
            line,
        }
    }
}

/// A variable or parameter declaration.
///
/// Extern parameter lists use unnamed definitions (`name == None`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDef {
    pub name: Option<String>,
    pub ty: TypeTag,
    pub line: u32,
}

impl VarDef {
    pub fn named(name: impl Into<String>, ty: TypeTag, line: u32) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            line,
        }
    }

    pub fn unnamed(ty: TypeTag, line: u32) -> Self {
        Self {
            name: None,
            ty,
            line,
        }
    }
}

/// A method definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub return_type: TypeTag,
    pub params: StmtList<VarDef>,
    pub body: MethodBody,
    pub line: u32,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeTag,
        params: Vec<VarDef>,
        body: MethodBody,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            params: StmtList::from(params),
            body,
            line,
        }
    }
}

/// The outermost block of a method. Shares its frame with the parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodBody {
    pub vars: StmtList<VarDef>,
    pub stmts: StmtList<Stmt>,
}

impl MethodBody {
    pub fn new(vars: Vec<VarDef>, stmts: Vec<Stmt>) -> Self {
        Self {
            vars: StmtList::from(vars),
            stmts: StmtList::from(stmts),
        }
    }
}

/// A nested `{ ... }` block with its own scope frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub vars: StmtList<VarDef>,
    pub stmts: StmtList<Stmt>,
}

impl Block {
    pub fn new(vars: StmtList<VarDef>, stmts: StmtList<Stmt>) -> Self {
        Self { vars, stmts }
    }

    /// A block with statements only.
    pub fn of(stmts: Vec<Stmt>) -> Self {
        Self {
            vars: StmtList::new(),
            stmts: StmtList::from(stmts),
        }
    }
}

// Statements

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub line: u32,
}

/// `for (init; cond; step) body`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForStmt {
    pub init: StmtList<Assign>,
    pub cond: Expr,
    pub step: StmtList<Assign>,
    pub body: Block,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: u32,
}

/// `name = value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignScalar {
    pub name: String,
    pub value: Expr,
    pub line: u32,
}

/// `name[index] = value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignElement {
    pub name: String,
    pub index: Expr,
    pub value: Expr,
    pub line: u32,
}

/// Either form of assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assign {
    Scalar(AssignScalar),
    Element(AssignElement),
}

impl Assign {
    pub fn scalar(name: impl Into<String>, value: Expr, line: u32) -> Self {
        Self::Scalar(AssignScalar {
            name: name.into(),
            value,
            line,
        })
    }

    pub fn element(name: impl Into<String>, index: Expr, value: Expr, line: u32) -> Self {
        Self::Element(AssignElement {
            name: name.into(),
            index,
            value,
            line,
        })
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Scalar(a) => a.line,
            Self::Element(a) => a.line,
        }
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break { line: u32 },
    Continue { line: u32 },
    Assign(Assign),
    /// A method call evaluated for its side effects.
    Call(CallExpr),
}

impl Stmt {
    pub fn if_else(cond: Expr, then_block: Block, else_block: Option<Block>, line: u32) -> Self {
        Self::If(IfStmt {
            cond,
            then_block,
            else_block,
            line,
        })
    }

    pub fn while_loop(cond: Expr, body: Block, line: u32) -> Self {
        Self::While(WhileStmt { cond, body, line })
    }

    pub fn for_loop(init: Vec<Assign>, cond: Expr, step: Vec<Assign>, body: Block, line: u32) -> Self {
        Self::For(ForStmt {
            init: StmtList::from(init),
            cond,
            step: StmtList::from(step),
            body,
            line,
        })
    }

    pub fn ret(value: Option<Expr>, line: u32) -> Self {
        Self::Return(ReturnStmt { value, line })
    }

    pub fn assign(name: impl Into<String>, value: Expr, line: u32) -> Self {
        Self::Assign(Assign::scalar(name, value, line))
    }

    pub fn assign_element(name: impl Into<String>, index: Expr, value: Expr, line: u32) -> Self {
        Self::Assign(Assign::element(name, index, value, line))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>, line: u32) -> Self {
        Self::Call(CallExpr::new(name, args, line))
    }

    /// Source line, or `None` for a bare block.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Block(_) => None,
            Self::If(s) => Some(s.line),
            Self::While(s) => Some(s.line),
            Self::For(s) => Some(s.line),
            Self::Return(s) => Some(s.line),
            Self::Break { line } | Self::Continue { line } => Some(*line),
            Self::Assign(a) => Some(a.line()),
            Self::Call(c) => Some(c.line),
        }
    }
}

// Expressions

/// `name(args...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub name: String,
    pub args: StmtList<Expr>,
    pub line: u32,
}

impl CallExpr {
    pub fn new(name: impl Into<String>, args: Vec<Expr>, line: u32) -> Self {
        Self {
            name: name.into(),
            args: StmtList::from(args),
            line,
        }
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        line: u32,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: u32,
    },
    Variable {
        name: String,
        line: u32,
    },
    ElementAccess {
        name: String,
        index: Box<Expr>,
        line: u32,
    },
    Call(CallExpr),
    Constant(Constant),
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            line,
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr, line: u32) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
            line,
        }
    }

    pub fn var(name: impl Into<String>, line: u32) -> Self {
        Self::Variable {
            name: name.into(),
            line,
        }
    }

    pub fn element(name: impl Into<String>, index: Expr, line: u32) -> Self {
        Self::ElementAccess {
            name: name.into(),
            index: Box::new(index),
            line,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>, line: u32) -> Self {
        Self::Call(CallExpr::new(name, args, line))
    }

    pub fn int(value: i32, line: u32) -> Self {
        Self::Constant(Constant::int(value, line))
    }

    pub fn boolean(value: bool, line: u32) -> Self {
        Self::Constant(Constant::boolean(value, line))
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Binary { line, .. }
            | Self::Unary { line, .. }
            | Self::Variable { line, .. }
            | Self::ElementAccess { line, .. } => *line,
            Self::Call(call) => call.line,
            Self::Constant(c) => c.line(),
        }
    }
}
