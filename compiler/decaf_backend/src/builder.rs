//! The instruction-builder interface code generation emits through.
//!
//! Semantics follow LLVM's `IRBuilder`: there is one insertion point, new
//! blocks are appended to a function, and instructions go to the end of
//! the current block.
//!
//! # Method Organization
//!
//! | Category | Methods |
//! |----------|---------|
//! | Module | `set_module_name`, `declare_function`, `function_param`, `verify_function` |
//! | Blocks | `append_block`, `position_at_end`, `current_block`, `current_block_terminated` |
//! | Control flow | `br`, `cond_br`, `ret`, `unreachable` |
//! | Memory | `alloca`, `load`, `store`, `element_ptr` |
//! | Arithmetic | `binary`, `unary`, `zext` |
//! | SSA merge | `phi` |
//! | Calls | `call` |
//! | Globals | `global_scalar`, `global_array`, `global_string` |
//! | Constants | `const_i32`, `const_bool`, `const_null` |

use crate::{BinOp, BlockId, Const, FunctionId, IrType, UnOp, ValueId, VerifyError};

/// ID-based instruction builder.
///
/// All handles are `Copy`; the implementor owns whatever they point at.
/// Emitting into a block that already has a terminator must not panic;
/// implementors record the problem and report it from
/// [`verify_function`](Self::verify_function).
pub trait IrBuilder {
    /// Name the module (Decaf uses the package name).
    fn set_module_name(&mut self, name: &str);

    /// Declare a function signature. Parameter names are optional hints.
    fn declare_function(
        &mut self,
        name: &str,
        ret: IrType,
        params: &[(Option<&str>, IrType)],
    ) -> FunctionId;

    /// The incoming value of parameter `index`.
    fn function_param(&self, function: FunctionId, index: usize) -> Option<ValueId>;

    /// Append a new empty block to `function`. The first block appended is
    /// the entry block.
    fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId;

    fn position_at_end(&mut self, block: BlockId);

    fn current_block(&self) -> Option<BlockId>;

    /// Whether the current block already ends in a terminator. Also `true`
    /// when there is no insertion point, since nothing can be appended.
    fn current_block_terminated(&self) -> bool;

    // Terminators

    fn br(&mut self, dest: BlockId);

    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId);

    /// `ret <value>` or `ret void`.
    fn ret(&mut self, value: Option<ValueId>);

    /// Terminate a block that has no predecessors.
    fn unreachable(&mut self);

    // Memory

    /// Stack slot placed at the start of the current function's entry block.
    fn alloca(&mut self, ty: IrType, name: &str) -> ValueId;

    fn load(&mut self, ty: IrType, ptr: ValueId, name: &str) -> ValueId;

    fn store(&mut self, value: ValueId, ptr: ValueId);

    /// Address of element `index` of an array of `elem_ty` at `base`.
    fn element_ptr(&mut self, elem_ty: IrType, base: ValueId, index: ValueId) -> ValueId;

    // Arithmetic

    fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;

    fn unary(&mut self, op: UnOp, operand: ValueId, name: &str) -> ValueId;

    fn zext(&mut self, value: ValueId, to: IrType) -> ValueId;

    /// Phi node at the current position with the given incoming edges.
    fn phi(&mut self, ty: IrType, incoming: &[(ValueId, BlockId)], name: &str) -> ValueId;

    /// Direct call. Returns `None` when the callee returns `void`.
    fn call(&mut self, callee: FunctionId, args: &[ValueId]) -> Option<ValueId>;

    // Globals (each returns the global's address)

    fn global_scalar(&mut self, name: &str, ty: IrType, init: Const) -> ValueId;

    fn global_array(&mut self, name: &str, elem: IrType, len: u32) -> ValueId;

    /// Private constant NUL-terminated string; the value points at its
    /// first byte.
    fn global_string(&mut self, contents: &str) -> ValueId;

    // Constants

    fn const_i32(&mut self, value: i32) -> ValueId;

    fn const_bool(&mut self, value: bool) -> ValueId;

    fn const_null(&mut self) -> ValueId;

    /// Type of a previously created value.
    fn value_type(&self, value: ValueId) -> IrType;

    /// Structural check of a finished function body.
    fn verify_function(&self, function: FunctionId) -> Result<(), VerifyError>;
}
