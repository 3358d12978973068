//! Loop jump targets.
//!
//! `break` and `continue` resolve against this stack, which is separate
//! from variable scope.

use decaf_backend::BlockId;
use smallvec::SmallVec;

/// Jump targets for `break` and `continue` inside a loop body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopContext {
    /// `while.cond` for while loops, `for.post` for for loops.
    pub continue_target: BlockId,
    pub break_target: BlockId,
}

/// Stack of enclosing loops, innermost last.
#[derive(Debug, Default)]
pub struct LoopStack {
    frames: SmallVec<[LoopContext; 4]>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ctx: LoopContext) {
        self.frames.push(ctx);
    }

    pub fn pop(&mut self) -> Option<LoopContext> {
        self.frames.pop()
    }

    #[inline]
    pub fn innermost(&self) -> Option<LoopContext> {
        self.frames.last().copied()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use decaf_backend::BlockId;

    use super::{LoopContext, LoopStack};

    #[test]
    fn innermost_loop_wins() {
        let outer = LoopContext {
            continue_target: BlockId::new(1),
            break_target: BlockId::new(2),
        };
        let inner = LoopContext {
            continue_target: BlockId::new(3),
            break_target: BlockId::new(4),
        };
        let mut loops = LoopStack::new();
        assert_eq!(loops.innermost(), None);
        loops.push(outer);
        loops.push(inner);
        assert_eq!(loops.depth(), 2);
        assert_eq!(loops.innermost(), Some(inner));
        assert_eq!(loops.pop(), Some(inner));
        assert_eq!(loops.innermost(), Some(outer));
    }
}
