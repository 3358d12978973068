//! Expression lowering: leaves, storage reads, coercion.

use decaf_ast::{ConstValue, Constant, Expr, TypeTag};
use decaf_backend::{IrBuilder, IrType, ValueId};

use super::{ir_type, FunctionLowerer};
use crate::descriptor::Handle;
use crate::stack::ensure_sufficient_stack;
use crate::CodegenError;

impl<B: IrBuilder + ?Sized> FunctionLowerer<'_, '_, B> {
    /// Lower an expression; `None` for a call to a void method.
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<Option<ValueId>, CodegenError> {
        ensure_sufficient_stack(|| match expr {
            Expr::Binary { op, lhs, rhs, line } => {
                self.lower_binary(*op, lhs, rhs, *line).map(Some)
            }
            Expr::Unary { op, operand, .. } => self.lower_unary(*op, operand).map(Some),
            Expr::Variable { name, line } => self.lower_variable(name, *line).map(Some),
            Expr::ElementAccess { name, index, line } => {
                self.lower_element(name, index, *line).map(Some)
            }
            Expr::Call(call) => self.lower_call(call),
            Expr::Constant(constant) => Ok(Some(self.lower_constant(constant))),
        })
    }

    /// Lower an expression that must produce a value.
    pub(super) fn lower_value(&mut self, expr: &Expr) -> Result<ValueId, CodegenError> {
        self.lower_expr(expr)?
            .ok_or(CodegenError::VoidValue { line: expr.line() })
    }

    fn lower_constant(&mut self, constant: &Constant) -> ValueId {
        match constant.value() {
            ConstValue::Int(v) => self.cx.builder.const_i32(*v),
            ConstValue::Bool(b) => self.cx.builder.const_bool(*b),
            ConstValue::Str(s) => self.cx.builder.global_string(s),
        }
    }

    fn lower_variable(&mut self, name: &str, line: u32) -> Result<ValueId, CodegenError> {
        let descriptor = self.cx.scopes.resolve_storage(name, line)?;
        let ty = descriptor.ty;
        let Handle::Slot(slot) = descriptor.handle else {
            return Err(CodegenError::NotAScalar {
                name: name.to_owned(),
                line,
            });
        };
        Ok(self.cx.builder.load(ir_type(ty), slot, name))
    }

    /// `name[index]`; the index is not bounds-checked.
    fn lower_element(&mut self, name: &str, index: &Expr, line: u32) -> Result<ValueId, CodegenError> {
        let descriptor = self.cx.scopes.resolve_storage(name, line)?;
        let ty = descriptor.ty;
        let Handle::Array { base, .. } = descriptor.handle else {
            return Err(CodegenError::NotAnArray {
                name: name.to_owned(),
                line,
            });
        };
        let index = self.lower_value(index)?;
        let slot = self.cx.builder.element_ptr(ir_type(ty), base, index);
        Ok(self.cx.builder.load(ir_type(ty), slot, &format!("{name}.elem")))
    }

    /// Widen a bool to int when the destination is int; anything else
    /// passes through unchanged.
    pub(super) fn coerce(&mut self, value: ValueId, to: TypeTag) -> ValueId {
        if to == TypeTag::Int32 && self.cx.builder.value_type(value) == IrType::I1 {
            self.cx.builder.zext(value, IrType::I32)
        } else {
            value
        }
    }
}
