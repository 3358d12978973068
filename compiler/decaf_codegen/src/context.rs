//! State threaded through one lowering run.

use decaf_backend::IrBuilder;

use crate::loop_ctx::LoopStack;
use crate::scope::ScopeStack;
use crate::{CodegenOptions, CodegenWarning};

/// Owns every piece of mutable lowering state: the builder borrow, the
/// scope stack, the loop stack, and collected warnings.
pub(crate) struct CodegenContext<'b, B: IrBuilder + ?Sized> {
    pub(crate) builder: &'b mut B,
    pub(crate) scopes: ScopeStack,
    pub(crate) loops: LoopStack,
    pub(crate) options: CodegenOptions,
    pub(crate) warnings: Vec<CodegenWarning>,
}

impl<'b, B: IrBuilder + ?Sized> CodegenContext<'b, B> {
    pub(crate) fn new(builder: &'b mut B, options: CodegenOptions) -> Self {
        Self {
            builder,
            scopes: ScopeStack::new(),
            loops: LoopStack::new(),
            options,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, warning: CodegenWarning) {
        tracing::warn!(line = warning.line(), "{warning}");
        self.warnings.push(warning);
    }
}
