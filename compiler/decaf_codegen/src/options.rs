//! Lowering configuration.

/// What to do when a non-void method can fall off its end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissingReturn {
    /// Return the zero-like default of the return type and warn.
    #[default]
    Synthesize,
    /// Fail with [`CodegenError::MissingReturn`](crate::CodegenError::MissingReturn).
    Error,
}

/// What to do with `break`/`continue` outside any loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum JumpOutsideLoop {
    /// Fail with [`CodegenError::JumpOutsideLoop`](crate::CodegenError::JumpOutsideLoop).
    #[default]
    Error,
    /// Drop the statement and warn.
    Ignore,
}

/// Options for [`generate`](crate::generate).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    pub missing_return: MissingReturn,
    pub jump_outside_loop: JumpOutsideLoop,
    /// Run the builder's verifier on every generated function.
    pub verify: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            missing_return: MissingReturn::default(),
            jump_outside_loop: JumpOutsideLoop::default(),
            verify: true,
        }
    }
}

impl CodegenOptions {
    #[must_use]
    pub fn with_missing_return(mut self, policy: MissingReturn) -> Self {
        self.missing_return = policy;
        self
    }

    #[must_use]
    pub fn with_jump_outside_loop(mut self, policy: JumpOutsideLoop) -> Self {
        self.jump_outside_loop = policy;
        self
    }

    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
