//! Method and extern calls.

use decaf_ast::CallExpr;
use decaf_backend::{IrBuilder, ValueId};
use smallvec::SmallVec;

use super::FunctionLowerer;
use crate::descriptor::Handle;
use crate::CodegenError;

impl<B: IrBuilder + ?Sized> FunctionLowerer<'_, '_, B> {
    /// Arguments are evaluated left to right and bools passed to int
    /// parameters are widened. A void callee yields `None`.
    pub(super) fn lower_call(&mut self, call: &CallExpr) -> Result<Option<ValueId>, CodegenError> {
        let descriptor = self.cx.scopes.resolve_function(&call.name, call.line)?;
        let Handle::Function { id, params, .. } = &descriptor.handle else {
            return Err(CodegenError::NotCallable {
                name: call.name.clone(),
                line: call.line,
            });
        };
        let (callee, params) = (*id, params.clone());

        if params.len() != call.args.len() {
            return Err(CodegenError::ArityMismatch {
                name: call.name.clone(),
                expected: params.len(),
                found: call.args.len(),
                line: call.line,
            });
        }

        let mut args: SmallVec<[ValueId; 4]> = SmallVec::with_capacity(params.len());
        for (arg, &ty) in call.args.iter().zip(&params) {
            let value = self.lower_value(arg)?;
            args.push(self.coerce(value, ty));
        }
        tracing::trace!(callee = %call.name, args = args.len(), "call");
        Ok(self.cx.builder.call(callee, &args))
    }
}
