//! In-memory [`IrBuilder`] that records a [`Module`].
//!
//! Follows the "position at a block, emit instructions, terminate" pattern.
//! Misuse never panics: an instruction emitted into a terminated block (or
//! with no insertion point) is dropped and recorded as an [`EmitIssue`],
//! which [`verify_function`](IrBuilder::verify_function) then reports.

mod names;

use smallvec::SmallVec;

use crate::module::{
    Block, EmitIssue, Function, Global, GlobalKind, Inst, Module, Param, Terminator, ValueDef,
    ValueInfo,
};
use crate::{
    verify, BinOp, BlockId, Const, FunctionId, GlobalId, IrBuilder, IrType, UnOp, ValueId,
    VerifyError,
};

use self::names::NameTable;

/// Records emitted IR into a [`Module`].
pub struct ModuleBuilder {
    module: Module,
    current_block: Option<BlockId>,
    /// One local namespace (values and block labels) per function.
    local_names: Vec<NameTable>,
    global_names: NameTable,
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self {
            module: Module::default(),
            current_block: None,
            local_names: Vec::new(),
            global_names: NameTable::default(),
        }
    }

    /// The module recorded so far.
    #[inline]
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Consume the builder, producing the recorded module.
    pub fn finish(self) -> Module {
        for block in &self.module.blocks {
            if block.terminator.is_none() {
                tracing::warn!(
                    function = %self.module.function(block.function).name,
                    block = %block.label,
                    "finishing module with unterminated block"
                );
            }
        }
        self.module
    }

    // Internal helpers

    fn current_function(&self) -> Option<FunctionId> {
        self.current_block.map(|b| self.module.block(b).function)
    }

    fn record(&mut self, issue: EmitIssue) {
        let function = self.current_function();
        tracing::debug!(?function, ?issue, "emit issue recorded");
        self.module.issues.push((function, issue));
    }

    /// The current block if instructions may still be appended to it.
    fn writable_block(&mut self) -> Option<BlockId> {
        let Some(block) = self.current_block else {
            self.record(EmitIssue::NoInsertionPoint);
            return None;
        };
        if self.module.block(block).terminator.is_some() {
            self.record(EmitIssue::AfterTerminator { block });
            return None;
        }
        Some(block)
    }

    fn push_value(&mut self, ty: IrType, def: ValueDef, name: Option<String>) -> ValueId {
        let id = ValueId::from_len(self.module.values.len());
        self.module.values.push(ValueInfo { ty, def, name });
        id
    }

    fn local_name(&mut self, function: Option<FunctionId>, hint: &str) -> Option<String> {
        function.map(|f| self.local_names[f.index()].unique(hint))
    }

    fn push_inst(&mut self, inst: Inst) {
        if let Some(block) = self.writable_block() {
            self.module.blocks[block.index()].insts.push(inst);
        }
    }

    /// Emit a value-producing instruction at the insertion point.
    fn emit_value(&mut self, ty: IrType, hint: &str, build: impl FnOnce(ValueId) -> Inst) -> ValueId {
        let block = self.current_block;
        let name = self.local_name(self.current_function(), hint);
        let dst = self.push_value(ty, ValueDef::Inst { block }, name);
        self.push_inst(build(dst));
        dst
    }

    fn terminate(&mut self, terminator: Terminator) {
        if let Some(block) = self.writable_block() {
            self.module.blocks[block.index()].terminator = Some(terminator);
        }
    }

    fn constant(&mut self, value: Const) -> ValueId {
        self.push_value(value.ty(), ValueDef::Const(value), None)
    }

    fn push_global(&mut self, hint: &str, kind: GlobalKind) -> ValueId {
        let id = GlobalId::from_len(self.module.globals.len());
        let name = self.global_names.unique(hint);
        let value = self.push_value(IrType::Ptr, ValueDef::Global(id), Some(name.clone()));
        self.module.globals.push(Global {
            id,
            name,
            kind,
            value,
        });
        value
    }
}

impl IrBuilder for ModuleBuilder {
    fn set_module_name(&mut self, name: &str) {
        name.clone_into(&mut self.module.name);
    }

    fn declare_function(
        &mut self,
        name: &str,
        ret: IrType,
        params: &[(Option<&str>, IrType)],
    ) -> FunctionId {
        let id = FunctionId::from_len(self.module.functions.len());
        let mut names = NameTable::default();
        let mut declared = Vec::with_capacity(params.len());
        for (index, &(param_name, ty)) in params.iter().enumerate() {
            let printed = names.unique(param_name.unwrap_or(""));
            let value = self.push_value(
                ty,
                ValueDef::Param {
                    function: id,
                    index: param_index(index),
                },
                Some(printed),
            );
            declared.push(Param {
                name: param_name.map(str::to_owned),
                ty,
                value,
            });
        }
        tracing::trace!(function = name, params = params.len(), "declare function");
        self.global_names.unique(name);
        self.local_names.push(names);
        self.module.functions.push(Function {
            id,
            name: name.to_owned(),
            ret,
            params: declared,
            blocks: Vec::new(),
        });
        id
    }

    fn function_param(&self, function: FunctionId, index: usize) -> Option<ValueId> {
        self.module
            .functions
            .get(function.index())
            .and_then(|f| f.params.get(index))
            .map(|p| p.value)
    }

    fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId {
        let id = BlockId::from_len(self.module.blocks.len());
        let label = self.local_names[function.index()].unique(name);
        self.module.blocks.push(Block {
            id,
            function,
            label,
            insts: Vec::new(),
            terminator: None,
        });
        self.module.functions[function.index()].blocks.push(id);
        id
    }

    fn position_at_end(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.module.blocks.len(),
            "BlockId {} out of bounds (have {} blocks)",
            block.raw(),
            self.module.blocks.len(),
        );
        self.current_block = Some(block);
    }

    #[inline]
    fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    fn current_block_terminated(&self) -> bool {
        match self.current_block {
            Some(block) => self.module.block(block).terminator.is_some(),
            None => true,
        }
    }

    fn br(&mut self, dest: BlockId) {
        self.terminate(Terminator::Br(dest));
    }

    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_bb,
            else_bb,
        });
    }

    fn ret(&mut self, value: Option<ValueId>) {
        self.terminate(Terminator::Ret(value));
    }

    fn unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    fn alloca(&mut self, ty: IrType, name: &str) -> ValueId {
        let function = self.current_function();
        let entry = function.and_then(|f| self.module.function(f).entry_block());
        let label = self.local_name(function, name);
        let dst = self.push_value(IrType::Ptr, ValueDef::Inst { block: entry }, label);
        let Some(entry) = entry else {
            self.record(EmitIssue::NoInsertionPoint);
            return dst;
        };
        // Allocas stay grouped at the top of the entry block.
        let insts = &mut self.module.blocks[entry.index()].insts;
        let at = insts
            .iter()
            .take_while(|i| matches!(i, Inst::Alloca { .. }))
            .count();
        insts.insert(at, Inst::Alloca { dst, ty });
        dst
    }

    fn load(&mut self, ty: IrType, ptr: ValueId, name: &str) -> ValueId {
        self.emit_value(ty, name, |dst| Inst::Load { dst, ty, ptr })
    }

    fn store(&mut self, value: ValueId, ptr: ValueId) {
        self.push_inst(Inst::Store { value, ptr });
    }

    fn element_ptr(&mut self, elem_ty: IrType, base: ValueId, index: ValueId) -> ValueId {
        self.emit_value(IrType::Ptr, "elem", |dst| Inst::ElementPtr {
            dst,
            elem_ty,
            base,
            index,
        })
    }

    fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let ty = if op.is_comparison() {
            IrType::I1
        } else {
            self.value_type(lhs)
        };
        self.emit_value(ty, name, |dst| Inst::Binary { dst, op, lhs, rhs })
    }

    fn unary(&mut self, op: UnOp, operand: ValueId, name: &str) -> ValueId {
        let ty = self.value_type(operand);
        self.emit_value(ty, name, |dst| Inst::Unary { dst, op, operand })
    }

    fn zext(&mut self, value: ValueId, to: IrType) -> ValueId {
        self.emit_value(to, "zext", |dst| Inst::Zext { dst, value, to })
    }

    fn phi(&mut self, ty: IrType, incoming: &[(ValueId, BlockId)], name: &str) -> ValueId {
        let incoming: SmallVec<[(ValueId, BlockId); 2]> = incoming.iter().copied().collect();
        self.emit_value(ty, name, |dst| Inst::Phi { dst, ty, incoming })
    }

    fn call(&mut self, callee: FunctionId, args: &[ValueId]) -> Option<ValueId> {
        let ret = self.module.function(callee).ret;
        let args: SmallVec<[ValueId; 4]> = args.iter().copied().collect();
        if ret.is_void() {
            self.push_inst(Inst::Call {
                dst: None,
                callee,
                args,
            });
            return None;
        }
        Some(self.emit_value(ret, "call", |dst| Inst::Call {
            dst: Some(dst),
            callee,
            args,
        }))
    }

    fn global_scalar(&mut self, name: &str, ty: IrType, init: Const) -> ValueId {
        self.push_global(name, GlobalKind::Scalar { ty, init })
    }

    fn global_array(&mut self, name: &str, elem: IrType, len: u32) -> ValueId {
        self.push_global(name, GlobalKind::Array { elem, len })
    }

    fn global_string(&mut self, contents: &str) -> ValueId {
        self.push_global(".str", GlobalKind::Str(contents.as_bytes().to_vec()))
    }

    fn const_i32(&mut self, value: i32) -> ValueId {
        self.constant(Const::I32(value))
    }

    fn const_bool(&mut self, value: bool) -> ValueId {
        self.constant(Const::Bool(value))
    }

    fn const_null(&mut self) -> ValueId {
        self.constant(Const::Null)
    }

    #[inline]
    fn value_type(&self, value: ValueId) -> IrType {
        self.module.value(value).ty
    }

    fn verify_function(&self, function: FunctionId) -> Result<(), VerifyError> {
        verify::verify_function(&self.module, function)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "parameter lists never approach u32::MAX entries"
)]
fn param_index(index: usize) -> u32 {
    index as u32
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests build known-good fixtures")]
mod tests;
