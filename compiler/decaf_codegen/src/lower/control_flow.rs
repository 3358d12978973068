//! Control flow: `if`, `while`, `for`.
//!
//! Every construct appends all of its blocks up front, branches from the
//! current block into its header, and leaves the builder positioned at its
//! exit block. A branch only jumps to the exit when its last block is still
//! open (`return`/`break`/`continue` may have closed it).

use decaf_ast::{ForStmt, IfStmt, WhileStmt};
use decaf_backend::IrBuilder;

use super::FunctionLowerer;
use crate::loop_ctx::LoopContext;
use crate::CodegenError;

impl<B: IrBuilder + ?Sized> FunctionLowerer<'_, '_, B> {
    pub(super) fn lower_if(&mut self, stmt: &IfStmt) -> Result<(), CodegenError> {
        let cond_bb = self.append_block("if.cond");
        let then_bb = self.append_block("if.then");
        let else_bb = self.append_block("if.else");
        let end_bb = self.append_block("if.end");

        self.cx.builder.br(cond_bb);
        self.cx.builder.position_at_end(cond_bb);
        let cond = self.lower_value(&stmt.cond)?;
        self.cx.builder.cond_br(cond, then_bb, else_bb);

        self.cx.builder.position_at_end(then_bb);
        self.lower_block(&stmt.then_block)?;
        let then_falls = self.branch_if_open(end_bb);

        self.cx.builder.position_at_end(else_bb);
        if let Some(else_block) = &stmt.else_block {
            self.lower_block(else_block)?;
        }
        let else_falls = self.branch_if_open(end_bb);

        self.cx.builder.position_at_end(end_bb);
        if !then_falls && !else_falls {
            // Both arms left the function or loop; nothing reaches the join.
            self.cx.builder.unreachable();
        }
        Ok(())
    }

    pub(super) fn lower_while(&mut self, stmt: &WhileStmt) -> Result<(), CodegenError> {
        let cond_bb = self.append_block("while.cond");
        let body_bb = self.append_block("while.body");
        let end_bb = self.append_block("while.end");

        self.cx.builder.br(cond_bb);
        self.cx.builder.position_at_end(cond_bb);
        let cond = self.lower_value(&stmt.cond)?;
        self.cx.builder.cond_br(cond, body_bb, end_bb);

        self.cx.builder.position_at_end(body_bb);
        let ctx = LoopContext {
            continue_target: cond_bb,
            break_target: end_bb,
        };
        self.with_loop(ctx, |fl| fl.lower_block(&stmt.body))?;
        self.branch_if_open(cond_bb);

        self.cx.builder.position_at_end(end_bb);
        Ok(())
    }

    /// `for (init; cond; step) body`.
    ///
    /// The step runs in its own block, so `continue` reaches it too.
    pub(super) fn lower_for(&mut self, stmt: &ForStmt) -> Result<(), CodegenError> {
        for assign in &stmt.init {
            self.lower_assign(assign)?;
        }

        let cond_bb = self.append_block("for.cond");
        let body_bb = self.append_block("for.body");
        let post_bb = self.append_block("for.post");
        let end_bb = self.append_block("for.end");

        self.cx.builder.br(cond_bb);
        self.cx.builder.position_at_end(cond_bb);
        let cond = self.lower_value(&stmt.cond)?;
        self.cx.builder.cond_br(cond, body_bb, end_bb);

        self.cx.builder.position_at_end(body_bb);
        let ctx = LoopContext {
            continue_target: post_bb,
            break_target: end_bb,
        };
        self.with_loop(ctx, |fl| fl.lower_block(&stmt.body))?;
        self.branch_if_open(post_bb);

        self.cx.builder.position_at_end(post_bb);
        for assign in &stmt.step {
            self.lower_assign(assign)?;
        }
        self.cx.builder.br(cond_bb);

        self.cx.builder.position_at_end(end_bb);
        Ok(())
    }
}
