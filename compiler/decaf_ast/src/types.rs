//! Decaf value types.

use std::fmt;

use crate::AstError;

/// The closed set of Decaf types.
///
/// Scalars are 32-bit integers or 1-bit booleans; strings only exist as
/// pointers to constant data (extern arguments); `Void` is a return type only.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTag {
    Int32,
    Bool1,
    StringPtr,
    Void,
}

impl TypeTag {
    /// Map a parser type token onto a `TypeTag`.
    pub fn from_token(token: &str) -> Result<Self, AstError> {
        match token {
            "T_INTTYPE" => Ok(Self::Int32),
            "T_BOOLTYPE" => Ok(Self::Bool1),
            "T_STRINGTYPE" => Ok(Self::StringPtr),
            "T_VOID" => Ok(Self::Void),
            _ => Err(AstError::UnknownToken {
                kind: "type",
                token: token.to_owned(),
            }),
        }
    }

    /// Name used in the AST dump.
    pub const fn dump_name(self) -> &'static str {
        match self {
            Self::Int32 => "IntType",
            Self::Bool1 => "BoolType",
            Self::StringPtr => "StringType",
            Self::Void => "VoidType",
        }
    }

    /// Returns `true` for `Void`.
    #[inline]
    pub fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dump_name())
    }
}
