//! Recorded IR module.
//!
//! Basic-block structure in the LLVM style:
//!
//! - **[`Function`]**: signature plus an ordered list of blocks (empty for
//!   external declarations)
//! - **[`Block`]**: straight-line instructions and at most one terminator
//! - **[`Inst`]**: a single non-terminating instruction
//! - **[`Terminator`]**: block exit (branch, conditional branch, return,
//!   unreachable)
//!
//! All entities live in flat arenas owned by [`Module`] and are referenced
//! by ID.

use smallvec::SmallVec;

use crate::{BinOp, BlockId, Const, FunctionId, GlobalId, IrType, UnOp, ValueId};

// Values

/// What produced a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueDef {
    Const(Const),
    Param { function: FunctionId, index: u32 },
    /// Result of an instruction in `block` (`None` if it was emitted with
    /// no insertion point and dropped).
    Inst { block: Option<BlockId> },
    /// Address of a global.
    Global(GlobalId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueInfo {
    pub ty: IrType,
    pub def: ValueDef,
    /// Unique (per function) printed name, without the `%` sigil.
    pub name: Option<String>,
}

// Instructions

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inst {
    /// Stack slot for one value of `ty`.
    Alloca { dst: ValueId, ty: IrType },
    Load { dst: ValueId, ty: IrType, ptr: ValueId },
    Store { value: ValueId, ptr: ValueId },
    /// Address of element `index` in an array of `elem_ty` starting at `base`.
    ElementPtr {
        dst: ValueId,
        elem_ty: IrType,
        base: ValueId,
        index: ValueId,
    },
    Binary {
        dst: ValueId,
        op: BinOp,
        lhs: ValueId,
        rhs: ValueId,
    },
    Unary { dst: ValueId, op: UnOp, operand: ValueId },
    /// Zero extension to a wider integer type.
    Zext { dst: ValueId, value: ValueId, to: IrType },
    Phi {
        dst: ValueId,
        ty: IrType,
        incoming: SmallVec<[(ValueId, BlockId); 2]>,
    },
    Call {
        dst: Option<ValueId>,
        callee: FunctionId,
        args: SmallVec<[ValueId; 4]>,
    },
}

impl Inst {
    /// The value defined by this instruction, if any.
    pub fn defined_value(&self) -> Option<ValueId> {
        match self {
            Self::Alloca { dst, .. }
            | Self::Load { dst, .. }
            | Self::ElementPtr { dst, .. }
            | Self::Binary { dst, .. }
            | Self::Unary { dst, .. }
            | Self::Zext { dst, .. }
            | Self::Phi { dst, .. } => Some(*dst),
            Self::Call { dst, .. } => *dst,
            Self::Store { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    Br(BlockId),
    CondBr {
        cond: ValueId,
        then_bb: BlockId,
        else_bb: BlockId,
    },
    Ret(Option<ValueId>),
    /// Marks a block control never reaches.
    Unreachable,
}

impl Terminator {
    /// Successor blocks, in branch order.
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Self::Br(target) => smallvec::smallvec![*target],
            Self::CondBr {
                then_bb, else_bb, ..
            } => smallvec::smallvec![*then_bb, *else_bb],
            Self::Ret(_) | Self::Unreachable => SmallVec::new(),
        }
    }
}

// Blocks and functions

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub function: FunctionId,
    /// Unique (per function) label.
    pub label: String,
    pub insts: Vec<Inst>,
    pub terminator: Option<Terminator>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: IrType,
    pub value: ValueId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    pub ret: IrType,
    pub params: Vec<Param>,
    /// Blocks in layout order; the first one is the entry block.
    pub blocks: Vec<BlockId>,
}

impl Function {
    /// `true` for a declaration without a body.
    #[inline]
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn entry_block(&self) -> Option<BlockId> {
        self.blocks.first().copied()
    }
}

// Globals

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlobalKind {
    Scalar { ty: IrType, init: Const },
    /// Zero-initialized fixed-length array.
    Array { elem: IrType, len: u32 },
    /// Private NUL-terminated byte string.
    Str(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Global {
    pub id: GlobalId,
    pub name: String,
    pub kind: GlobalKind,
    /// Address of the global (always `ptr`).
    pub value: ValueId,
}

// Module

/// A problem recorded while emitting, surfaced by verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitIssue {
    /// Instruction or terminator emitted into an already-terminated block.
    AfterTerminator { block: BlockId },
    /// Instruction emitted with no insertion point set.
    NoInsertionPoint,
}

/// A complete recorded module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
    pub blocks: Vec<Block>,
    pub values: Vec<ValueInfo>,
    pub issues: Vec<(Option<FunctionId>, EmitIssue)>,
}

impl Module {
    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    #[inline]
    pub fn value(&self, id: ValueId) -> &ValueInfo {
        &self.values[id.index()]
    }

    #[inline]
    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    /// Look up a function by name.
    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Look up a global by name.
    pub fn global_by_name(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Blocks of `function` that branch to `block`.
    pub fn predecessors(&self, function: FunctionId, block: BlockId) -> Vec<BlockId> {
        self.function(function)
            .blocks
            .iter()
            .copied()
            .filter(|&b| {
                self.block(b)
                    .terminator
                    .as_ref()
                    .is_some_and(|t| t.successors().contains(&block))
            })
            .collect()
    }
}
