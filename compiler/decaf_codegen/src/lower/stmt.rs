//! Statement lowering.

use decaf_ast::{Assign, Block, Expr, Stmt, StmtList, TypeTag};
use decaf_backend::IrBuilder;

use super::{ir_type, FunctionLowerer};
use crate::descriptor::Handle;
use crate::stack::ensure_sufficient_stack;
use crate::{CodegenError, CodegenWarning, JumpOutsideLoop};

/// `break` or `continue`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Jump {
    Break,
    Continue,
}

impl Jump {
    fn keyword(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
        }
    }
}

impl<B: IrBuilder + ?Sized> FunctionLowerer<'_, '_, B> {
    /// Lower a statement list, stopping once the current block is terminated.
    pub(super) fn lower_stmts(&mut self, stmts: &StmtList<Stmt>) -> Result<(), CodegenError> {
        for (index, stmt) in stmts.iter().enumerate() {
            if self.cx.builder.current_block_terminated() {
                tracing::trace!(
                    skipped = stmts.len() - index,
                    "statements after a terminator are not lowered"
                );
                break;
            }
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    pub(super) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        ensure_sufficient_stack(|| match stmt {
            Stmt::Block(block) => self.lower_block(block),
            Stmt::If(s) => self.lower_if(s),
            Stmt::While(s) => self.lower_while(s),
            Stmt::For(s) => self.lower_for(s),
            Stmt::Return(s) => self.lower_return(s.value.as_ref(), s.line),
            Stmt::Break { line } => self.lower_jump(Jump::Break, *line),
            Stmt::Continue { line } => self.lower_jump(Jump::Continue, *line),
            Stmt::Assign(assign) => self.lower_assign(assign),
            Stmt::Call(call) => self.lower_call(call).map(|_| ()),
        })
    }

    /// A nested block gets its own scope frame.
    pub(super) fn lower_block(&mut self, block: &Block) -> Result<(), CodegenError> {
        self.with_scope(|fl| {
            fl.declare_locals(&block.vars)?;
            fl.lower_stmts(&block.stmts)
        })
    }

    pub(super) fn lower_assign(&mut self, assign: &Assign) -> Result<(), CodegenError> {
        match assign {
            Assign::Scalar(a) => {
                let descriptor = self.cx.scopes.resolve_storage(&a.name, a.line)?;
                let ty = descriptor.ty;
                let Handle::Slot(slot) = descriptor.handle else {
                    return Err(CodegenError::NotAScalar {
                        name: a.name.clone(),
                        line: a.line,
                    });
                };
                let value = self.lower_value(&a.value)?;
                let value = self.coerce(value, ty);
                self.cx.builder.store(value, slot);
            }
            Assign::Element(a) => {
                let descriptor = self.cx.scopes.resolve_storage(&a.name, a.line)?;
                let ty = descriptor.ty;
                let Handle::Array { base, .. } = descriptor.handle else {
                    return Err(CodegenError::NotAnArray {
                        name: a.name.clone(),
                        line: a.line,
                    });
                };
                let index = self.lower_value(&a.index)?;
                let value = self.lower_value(&a.value)?;
                let value = self.coerce(value, ty);
                let slot = self.cx.builder.element_ptr(ir_type(ty), base, index);
                self.cx.builder.store(value, slot);
            }
        }
        Ok(())
    }

    fn lower_return(&mut self, value: Option<&Expr>, line: u32) -> Result<(), CodegenError> {
        match (value, self.ret) {
            (None, TypeTag::Void) => {
                self.cx.builder.ret(None);
                Ok(())
            }
            (None, _) => self.return_default(line),
            (Some(_), TypeTag::Void) => Err(CodegenError::ValueReturnFromVoid {
                method: self.method.to_owned(),
                line,
            }),
            (Some(expr), ty) => {
                let value = self.lower_value(expr)?;
                let value = self.coerce(value, ty);
                self.cx.builder.ret(Some(value));
                Ok(())
            }
        }
    }

    fn lower_jump(&mut self, jump: Jump, line: u32) -> Result<(), CodegenError> {
        let keyword = jump.keyword();
        if let Some(ctx) = self.cx.loops.innermost() {
            let target = match jump {
                Jump::Break => ctx.break_target,
                Jump::Continue => ctx.continue_target,
            };
            self.cx.builder.br(target);
            return Ok(());
        }
        match self.cx.options.jump_outside_loop {
            JumpOutsideLoop::Error => Err(CodegenError::JumpOutsideLoop { keyword, line }),
            JumpOutsideLoop::Ignore => {
                self.cx.warn(CodegenWarning::IgnoredJump { keyword, line });
                Ok(())
            }
        }
    }
}
