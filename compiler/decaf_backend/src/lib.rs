//! Decaf backend - instruction-builder interface and reference module
//!
//! Code generation talks to an [`IrBuilder`], an LLVM-shaped interface
//! over opaque `Copy` handles ([`ValueId`], [`BlockId`], [`FunctionId`]).
//! This crate also ships a complete in-memory implementation:
//!
//! - [`ModuleBuilder`] records emitted IR into a [`Module`]
//! - `Display for Module` prints deterministic LLVM-flavoured text
//! - [`verify_function`] / [`verify_module`] check block structure
//! - [`interp::Interpreter`] executes recorded functions, dispatching
//!   external declarations to host callbacks

mod builder;
mod ids;
pub mod interp;
pub mod module;
mod module_builder;
mod printer;
mod types;
mod verify;

pub use builder::IrBuilder;
pub use ids::{BlockId, FunctionId, GlobalId, ValueId};
pub use module::Module;
pub use module_builder::ModuleBuilder;
pub use types::{BinOp, Const, IrType, UnOp};
pub use verify::{verify_function, verify_module, VerifyError};
