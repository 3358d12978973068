//! Operator lowering.
//!
//! `&&` and `||` short-circuit: the right operand lives in its own block and
//! the result is a phi over the two incoming edges. Every other binary
//! operator evaluates left then right and emits one instruction.

use decaf_ast::{BinaryOp, Expr, TypeTag, UnaryOp};
use decaf_backend::{BinOp, IrBuilder, IrType, UnOp, ValueId};

use super::FunctionLowerer;
use crate::CodegenError;

impl<B: IrBuilder + ?Sized> FunctionLowerer<'_, '_, B> {
    pub(super) fn lower_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        line: u32,
    ) -> Result<ValueId, CodegenError> {
        let (bin_op, name) = match op {
            BinaryOp::And => return self.lower_short_circuit_and(lhs, rhs),
            BinaryOp::Or => return self.lower_short_circuit_or(lhs, rhs),
            BinaryOp::Mul => (BinOp::Mul, "mul"),
            BinaryOp::Div => (BinOp::SDiv, "div"),
            BinaryOp::Mod => (BinOp::SRem, "rem"),
            BinaryOp::Add => (BinOp::Add, "add"),
            BinaryOp::Sub => (BinOp::Sub, "sub"),
            BinaryOp::Shl => (BinOp::Shl, "shl"),
            BinaryOp::Shr => (BinOp::LShr, "shr"),
            BinaryOp::Eq => (BinOp::Eq, "eq"),
            BinaryOp::Neq => (BinOp::Ne, "ne"),
            BinaryOp::Geq => (BinOp::Sge, "ge"),
            BinaryOp::Leq => (BinOp::Sle, "le"),
            BinaryOp::Gt => (BinOp::Sgt, "gt"),
            BinaryOp::Lt => (BinOp::Slt, "lt"),
        };
        tracing::trace!(?op, line, "binary");
        let mut l = self.lower_value(lhs)?;
        let mut r = self.lower_value(rhs)?;

        // Mixed bool/int operands compare and compute as int.
        let (lt, rt) = (
            self.cx.builder.value_type(l),
            self.cx.builder.value_type(r),
        );
        if lt != rt {
            l = self.coerce(l, TypeTag::Int32);
            r = self.coerce(r, TypeTag::Int32);
        }
        Ok(self.cx.builder.binary(bin_op, l, r, name))
    }

    pub(super) fn lower_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<ValueId, CodegenError> {
        let value = self.lower_value(operand)?;
        Ok(match op {
            UnaryOp::Not => self.cx.builder.unary(UnOp::Not, value, "not"),
            UnaryOp::Negate => self.cx.builder.unary(UnOp::Neg, value, "neg"),
        })
    }

    /// `lhs && rhs`: skip `rhs` when `lhs` is false.
    ///
    /// ```text
    /// current:  lhs; br lhs, and.rhs, and.end
    /// and.rhs:  rhs; br and.end
    /// and.end:  phi [lhs, current], [rhs, rhs exit]
    /// ```
    fn lower_short_circuit_and(&mut self, lhs: &Expr, rhs: &Expr) -> Result<ValueId, CodegenError> {
        let lhs_val = self.lower_value(lhs)?;
        let rhs_bb = self.append_block("and.rhs");
        let end_bb = self.append_block("and.end");

        // lhs may have opened blocks of its own; the edge leaves from here.
        let lhs_bb = self.insertion_block()?;
        self.cx.builder.cond_br(lhs_val, rhs_bb, end_bb);

        self.cx.builder.position_at_end(rhs_bb);
        let rhs_val = self.lower_value(rhs)?;
        let rhs_exit = self.insertion_block()?;
        self.branch_if_open(end_bb);

        self.cx.builder.position_at_end(end_bb);
        Ok(self.cx.builder.phi(
            IrType::I1,
            &[(lhs_val, lhs_bb), (rhs_val, rhs_exit)],
            "and",
        ))
    }

    /// `lhs || rhs`: skip `rhs` when `lhs` is true.
    fn lower_short_circuit_or(&mut self, lhs: &Expr, rhs: &Expr) -> Result<ValueId, CodegenError> {
        let lhs_val = self.lower_value(lhs)?;
        let rhs_bb = self.append_block("or.rhs");
        let end_bb = self.append_block("or.end");

        let lhs_bb = self.insertion_block()?;
        self.cx.builder.cond_br(lhs_val, end_bb, rhs_bb);

        self.cx.builder.position_at_end(rhs_bb);
        let rhs_val = self.lower_value(rhs)?;
        let rhs_exit = self.insertion_block()?;
        self.branch_if_open(end_bb);

        self.cx.builder.position_at_end(end_bb);
        Ok(self.cx.builder.phi(
            IrType::I1,
            &[(lhs_val, lhs_bb), (rhs_val, rhs_exit)],
            "or",
        ))
    }
}
