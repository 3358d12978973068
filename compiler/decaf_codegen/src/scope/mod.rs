//! Lexical scopes for code generation.
//!
//! A stack of frames mapping names to [`Descriptor`]s. The bottom frame is
//! the global frame (externs, fields, methods) and is never popped; each
//! method body and each block pushes one frame on top. Lookup walks from
//! the innermost frame outwards, so inner bindings shadow outer ones.

use rustc_hash::FxHashMap;

use crate::descriptor::{Descriptor, DescriptorKind};
use crate::CodegenError;

type Frame = FxHashMap<String, Descriptor>;

// ---------------------------------------------------------------------------
// ScopeStack
// ---------------------------------------------------------------------------

/// Stack of name-binding frames.
#[derive(Debug)]
pub struct ScopeStack {
    global: Frame,
    /// Method and block frames, innermost last.
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the global frame.
    pub fn new() -> Self {
        Self {
            global: Frame::default(),
            frames: Vec::new(),
        }
    }

    /// Number of frames, the global frame included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len() + 1
    }

    pub fn push_scope(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Drop the innermost frame and its bindings.
    ///
    /// Returns `false` (and leaves the stack alone) when only the global
    /// frame is left.
    pub fn pop_scope(&mut self) -> bool {
        if self.frames.pop().is_some() {
            true
        } else {
            tracing::warn!("attempted to pop the global scope");
            false
        }
    }

    /// Bind `name` in the innermost frame.
    ///
    /// A name may shadow an outer binding but not one in the same frame.
    pub fn bind(&mut self, name: &str, descriptor: Descriptor) -> Result<(), CodegenError> {
        let depth = self.depth();
        let frame = match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.global,
        };
        if let Some(previous) = frame.get(name) {
            return Err(CodegenError::DuplicateDefinition {
                name: name.to_owned(),
                line: descriptor.line,
                previous_line: previous.line,
            });
        }
        tracing::trace!(name, kind = ?descriptor.kind, depth, "bind");
        frame.insert(name.to_owned(), descriptor);
        Ok(())
    }

    /// Innermost binding of `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Descriptor> {
        self.frames
            .iter()
            .rev()
            .chain(std::iter::once(&self.global))
            .find_map(|frame| frame.get(name))
    }

    /// Innermost binding of `name`.
    pub fn resolve(&self, name: &str, line: u32) -> Result<&Descriptor, CodegenError> {
        self.lookup(name)
            .ok_or_else(|| CodegenError::UnresolvedIdentifier {
                name: name.to_owned(),
                line,
            })
    }

    /// Innermost binding of `name`, which must be a function.
    pub fn resolve_function(&self, name: &str, line: u32) -> Result<&Descriptor, CodegenError> {
        let descriptor = self.resolve(name, line)?;
        if descriptor.kind == DescriptorKind::Function {
            Ok(descriptor)
        } else {
            Err(CodegenError::NotCallable {
                name: name.to_owned(),
                line,
            })
        }
    }

    /// Innermost binding of `name`, which must be a variable of some kind.
    pub fn resolve_storage(&self, name: &str, line: u32) -> Result<&Descriptor, CodegenError> {
        let descriptor = self.resolve(name, line)?;
        if descriptor.kind.is_variable() {
            Ok(descriptor)
        } else {
            Err(CodegenError::NotAVariable {
                name: name.to_owned(),
                line,
            })
        }
    }
}
