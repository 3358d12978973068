//! Decaf AST - node model for the Decaf compiler
//!
//! This crate contains the tree the parser hands to code generation:
//! - Declarations (`Program`, `Package`, `ExternFunction`, `FieldDecl`,
//!   `VarDef`, `Method`, `MethodBody`, `Block`)
//! - Statements ([`Stmt`]) and expressions ([`Expr`]) as closed enums
//! - [`TypeTag`] and operator enumerations, mapped once from parser tokens
//! - Literal decoding (decimal/hex numbers, string escapes)
//!
//! # Ownership
//!
//! Every child is owned by exactly one parent (`Box` / `Vec`). The tree is
//! acyclic and dropping a node drops its whole subtree.
//!
//! # Dump Format
//!
//! Every node implements `Display` producing `Kind(field1,field2,...)`.
//! An absent optional child prints `None`; a list prints its children
//! comma-joined, or `None` when empty. The output depends only on tree shape.

pub mod ast;
mod error;
mod literal;
mod operators;
mod types;

pub use ast::{
    Assign, AssignElement, AssignScalar, Block, CallExpr, Expr, ExternFunction, FieldDecl,
    FieldSize, ForStmt, IfStmt, Method, MethodBody, Package, Program, ReturnStmt, Stmt, StmtList,
    VarDef, WhileStmt,
};
pub use error::AstError;
pub use literal::{decode_string_literal, parse_number, ConstValue, Constant, LiteralError};
pub use operators::{BinaryOp, UnaryOp};
pub use types::TypeTag;
