//! Method bodies.
//!
//! [`FunctionLowerer`] carries the per-method state (the function being
//! filled, its return type) on top of the shared [`CodegenContext`].

use decaf_ast::{Method, StmtList, TypeTag, VarDef};
use decaf_backend::{BlockId, FunctionId, IrBuilder, ValueId};

use super::ir_type;
use crate::context::CodegenContext;
use crate::descriptor::{Descriptor, DescriptorKind};
use crate::loop_ctx::LoopContext;
use crate::{CodegenError, CodegenWarning, MissingReturn};

/// Generate the body of a method declared in pass 1.
pub(super) fn define_method<B: IrBuilder + ?Sized>(
    cx: &mut CodegenContext<'_, B>,
    method: &Method,
    function: FunctionId,
) -> Result<(), CodegenError> {
    let _span = tracing::debug_span!("method", name = %method.name).entered();

    let entry = cx.builder.append_block(function, "entry");
    cx.builder.position_at_end(entry);

    let mut lowerer = FunctionLowerer::new(cx, method, function);
    lowerer.with_scope(|fl| {
        fl.bind_params(&method.params)?;
        fl.declare_locals(&method.body.vars)?;
        fl.lower_stmts(&method.body.stmts)?;
        fl.finish_body()
    })?;

    if cx.options.verify {
        cx.builder
            .verify_function(function)
            .map_err(|e| CodegenError::VerificationFailed {
                function: method.name.clone(),
                message: e.to_string(),
            })?;
    }
    tracing::debug!(name = %method.name, "method lowered");
    Ok(())
}

/// Lowers the statements and expressions of one method.
pub(crate) struct FunctionLowerer<'c, 'b, B: IrBuilder + ?Sized> {
    pub(super) cx: &'c mut CodegenContext<'b, B>,
    pub(super) function: FunctionId,
    pub(super) method: &'c str,
    pub(super) ret: TypeTag,
    pub(super) line: u32,
}

impl<'c, 'b, B: IrBuilder + ?Sized> FunctionLowerer<'c, 'b, B> {
    fn new(cx: &'c mut CodegenContext<'b, B>, method: &'c Method, function: FunctionId) -> Self {
        Self {
            cx,
            function,
            method: &method.name,
            ret: method.return_type,
            line: method.line,
        }
    }

    // -- Frames --

    /// Run `f` inside a fresh scope frame, popped even when `f` fails.
    pub(super) fn with_scope<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, CodegenError>,
    ) -> Result<R, CodegenError> {
        self.cx.scopes.push_scope();
        let result = f(self);
        self.cx.scopes.pop_scope();
        result
    }

    /// Run `f` with `ctx` as the innermost loop, popped even when `f` fails.
    pub(super) fn with_loop<R>(
        &mut self,
        ctx: LoopContext,
        f: impl FnOnce(&mut Self) -> Result<R, CodegenError>,
    ) -> Result<R, CodegenError> {
        self.cx.loops.push(ctx);
        let result = f(self);
        self.cx.loops.pop();
        result
    }

    // -- Blocks --

    pub(super) fn append_block(&mut self, name: &str) -> BlockId {
        let block = self.cx.builder.append_block(self.function, name);
        tracing::trace!(block = name, id = block.raw(), "append block");
        block
    }

    /// The block instructions are currently emitted into.
    pub(super) fn insertion_block(&self) -> Result<BlockId, CodegenError> {
        self.cx
            .builder
            .current_block()
            .ok_or_else(|| CodegenError::VerificationFailed {
                function: self.method.to_owned(),
                message: "no insertion point".to_owned(),
            })
    }

    /// Branch to `dest` unless the current block already ended.
    ///
    /// Returns whether the branch was emitted, i.e. whether control falls
    /// through to `dest`.
    pub(super) fn branch_if_open(&mut self, dest: BlockId) -> bool {
        if self.cx.builder.current_block_terminated() {
            false
        } else {
            self.cx.builder.br(dest);
            true
        }
    }

    // -- Storage --

    fn bind_params(&mut self, params: &StmtList<VarDef>) -> Result<(), CodegenError> {
        for (index, param) in params.iter().enumerate() {
            let Some(name) = &param.name else {
                continue;
            };
            let slot = self
                .cx
                .builder
                .alloca(ir_type(param.ty), &format!("{name}.addr"));
            if let Some(incoming) = self.cx.builder.function_param(self.function, index) {
                self.cx.builder.store(incoming, slot);
            }
            self.cx.scopes.bind(
                name,
                Descriptor::scalar(DescriptorKind::Parameter, param.ty, slot, param.line),
            )?;
        }
        Ok(())
    }

    /// Stack slots for block-local declarations, zeroed where declared.
    pub(super) fn declare_locals(
        &mut self,
        vars: &StmtList<VarDef>,
    ) -> Result<(), CodegenError> {
        for var in vars {
            let Some(name) = &var.name else {
                continue;
            };
            let slot = self.cx.builder.alloca(ir_type(var.ty), name);
            let zero = self.zero_value(var.ty, var.line)?;
            self.cx.builder.store(zero, slot);
            self.cx.scopes.bind(
                name,
                Descriptor::scalar(DescriptorKind::LocalVariable, var.ty, slot, var.line),
            )?;
        }
        Ok(())
    }

    // -- Returns --

    /// Terminate the block left open at the end of the body.
    fn finish_body(&mut self) -> Result<(), CodegenError> {
        if self.cx.builder.current_block_terminated() {
            return Ok(());
        }
        if self.ret == TypeTag::Void {
            self.cx.builder.ret(None);
            Ok(())
        } else {
            self.return_default(self.line)
        }
    }

    /// Return the default of the method's return type, if policy allows.
    pub(super) fn return_default(&mut self, line: u32) -> Result<(), CodegenError> {
        match self.cx.options.missing_return {
            MissingReturn::Error => Err(CodegenError::MissingReturn {
                method: self.method.to_owned(),
            }),
            MissingReturn::Synthesize => {
                self.cx.warn(CodegenWarning::SynthesizedReturn {
                    method: self.method.to_owned(),
                    line,
                });
                let value = self.default_value(self.ret, line)?;
                self.cx.builder.ret(Some(value));
                Ok(())
            }
        }
    }

    /// Returned value when none is given: `0` for int, `true` for bool,
    /// null for string.
    fn default_value(&mut self, ty: TypeTag, line: u32) -> Result<ValueId, CodegenError> {
        match ty {
            TypeTag::Bool1 => Ok(self.cx.builder.const_bool(true)),
            _ => self.zero_value(ty, line),
        }
    }

    fn zero_value(&mut self, ty: TypeTag, line: u32) -> Result<ValueId, CodegenError> {
        Ok(match ty {
            TypeTag::Int32 => self.cx.builder.const_i32(0),
            TypeTag::Bool1 => self.cx.builder.const_bool(false),
            TypeTag::StringPtr => self.cx.builder.const_null(),
            TypeTag::Void => return Err(CodegenError::VoidValue { line }),
        })
    }
}
