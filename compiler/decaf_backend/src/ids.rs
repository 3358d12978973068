//! Opaque ID newtypes.
//!
//! Callers of the builder never see the recorded module directly; they hold
//! `Copy` handles. Each ID is a `u32` index into the corresponding arena
//! `Vec` of the [`Module`](crate::Module).

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an ID from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "arena sizes never exceed u32"
            )]
            pub(crate) fn from_len(len: usize) -> Self {
                Self(len as u32)
            }
        }
    };
}

define_id!(
    /// Handle to an SSA value (constant, parameter, instruction result, or
    /// global address).
    ValueId
);

define_id!(
    /// Handle to a basic block. Blocks belong to exactly one function.
    BlockId
);

define_id!(
    /// Handle to a declared function (with or without a body).
    FunctionId
);

define_id!(
    /// Handle to a module-level global.
    GlobalId
);
