//! Code generation errors and warnings.

use std::fmt;

/// A fatal code generation failure.
///
/// Any of these aborts the whole compilation; the partially built module is
/// left to the caller to discard.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("program has no package")]
    MissingPackage,

    #[error("line {line}: `{name}` is not defined")]
    UnresolvedIdentifier { name: String, line: u32 },

    #[error("line {line}: `{name}` is not a method")]
    NotCallable { name: String, line: u32 },

    #[error("line {line}: method `{name}` used as a variable")]
    NotAVariable { name: String, line: u32 },

    #[error("line {line}: `{name}` is not an array")]
    NotAnArray { name: String, line: u32 },

    #[error("line {line}: array `{name}` used without an index")]
    NotAScalar { name: String, line: u32 },

    #[error("line {line}: `{name}` expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: u32,
    },

    #[error("line {line}: `{name}` is already defined on line {previous_line}")]
    DuplicateDefinition {
        name: String,
        line: u32,
        previous_line: u32,
    },

    #[error("line {line}: `{keyword}` outside of a loop")]
    JumpOutsideLoop { keyword: &'static str, line: u32 },

    #[error("method `{method}` can reach its end without returning a value")]
    MissingReturn { method: String },

    #[error("line {line}: void method `{method}` returns a value")]
    ValueReturnFromVoid { method: String, line: u32 },

    #[error("line {line}: array `{name}` must have a positive length")]
    InvalidArraySize { name: String, line: u32 },

    #[error("line {line}: field `{name}` has an initializer of the wrong kind")]
    InvalidInitializer { name: String, line: u32 },

    #[error("line {line}: void method call used as a value")]
    VoidValue { line: u32 },

    #[error("generated code for `{function}` is malformed: {message}")]
    VerificationFailed { function: String, message: String },
}

impl CodegenError {
    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::UnresolvedIdentifier { line, .. }
            | Self::NotCallable { line, .. }
            | Self::NotAVariable { line, .. }
            | Self::NotAnArray { line, .. }
            | Self::NotAScalar { line, .. }
            | Self::ArityMismatch { line, .. }
            | Self::DuplicateDefinition { line, .. }
            | Self::JumpOutsideLoop { line, .. }
            | Self::ValueReturnFromVoid { line, .. }
            | Self::InvalidArraySize { line, .. }
            | Self::InvalidInitializer { line, .. }
            | Self::VoidValue { line } => Some(*line),
            Self::MissingPackage | Self::MissingReturn { .. } | Self::VerificationFailed { .. } => {
                None
            }
        }
    }
}

/// A non-fatal diagnostic collected during lowering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodegenWarning {
    /// A non-void method could fall off its end; a default value is returned.
    SynthesizedReturn { method: String, line: u32 },
    /// `break`/`continue` outside a loop was dropped.
    IgnoredJump { keyword: &'static str, line: u32 },
}

impl CodegenWarning {
    pub fn line(&self) -> u32 {
        match self {
            Self::SynthesizedReturn { line, .. } | Self::IgnoredJump { line, .. } => *line,
        }
    }
}

impl fmt::Display for CodegenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SynthesizedReturn { method, line } => write!(
                f,
                "line {line}: method `{method}` may end without a return; a default value is returned"
            ),
            Self::IgnoredJump { keyword, line } => {
                write!(f, "line {line}: `{keyword}` outside of a loop is ignored")
            }
        }
    }
}

/// Result of a successful lowering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodegenOutput {
    pub warnings: Vec<CodegenWarning>,
}

impl CodegenOutput {
    #[inline]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
