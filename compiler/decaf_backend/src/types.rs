//! IR value types and operation kinds.

use std::fmt;

/// First-class IR types.
///
/// Pointers are opaque: loads, stores and element addressing name the
/// accessed type explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    I1,
    I32,
    Ptr,
    Void,
}

impl IrType {
    #[inline]
    pub fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::I1 => "i1",
            Self::I32 => "i32",
            Self::Ptr => "ptr",
            Self::Void => "void",
        })
    }
}

/// Two-operand integer instructions.
///
/// Comparisons are signed and produce `i1`; everything else produces the
/// operand type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    Shl,
    LShr,
    Eq,
    Ne,
    Sge,
    Sle,
    Sgt,
    Slt,
}

impl BinOp {
    #[inline]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Sge | Self::Sle | Self::Sgt | Self::Slt
        )
    }

    /// Mnemonic as printed (`add`, `icmp slt`, ...).
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::SDiv => "sdiv",
            Self::SRem => "srem",
            Self::Shl => "shl",
            Self::LShr => "lshr",
            Self::Eq => "icmp eq",
            Self::Ne => "icmp ne",
            Self::Sge => "icmp sge",
            Self::Sle => "icmp sle",
            Self::Sgt => "icmp sgt",
            Self::Slt => "icmp slt",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnOp {
    /// Bitwise complement (logical not on `i1`).
    Not,
    /// Two's complement negation.
    Neg,
}

impl UnOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "neg",
        }
    }
}

/// Compile-time constant, used for initializers and inline operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Const {
    I32(i32),
    Bool(bool),
    Null,
}

impl Const {
    pub fn ty(self) -> IrType {
        match self {
            Self::I32(_) => IrType::I32,
            Self::Bool(_) => IrType::I1,
            Self::Null => IrType::Ptr,
        }
    }

    /// The all-zero constant of `ty`, or `None` for `void`.
    pub fn zero(ty: IrType) -> Option<Self> {
        match ty {
            IrType::I1 => Some(Self::Bool(false)),
            IrType::I32 => Some(Self::I32(0)),
            IrType::Ptr => Some(Self::Null),
            IrType::Void => None,
        }
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Null => f.write_str("null"),
        }
    }
}
