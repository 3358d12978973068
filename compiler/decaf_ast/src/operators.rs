//! Binary and Unary Operators
//!
//! Parser tokens are mapped onto these enums once, at AST construction,
//! so code generation matches exhaustively and never sees an unknown
//! operator string.

use std::fmt;

use crate::AstError;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Mul,
    Div,
    Mod,
    Add,
    Sub,

    // Shift
    Shl,
    Shr,

    // Comparison
    Eq,
    Neq,
    Geq,
    Leq,
    Gt,
    Lt,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinaryOp {
    /// Map a parser operator token onto a `BinaryOp`.
    pub fn from_token(token: &str) -> Result<Self, AstError> {
        let op = match token {
            "T_MULT" => Self::Mul,
            "T_DIV" => Self::Div,
            "T_MOD" => Self::Mod,
            "T_PLUS" => Self::Add,
            "T_MINUS" => Self::Sub,
            "T_LEFTSHIFT" => Self::Shl,
            "T_RIGHTSHIFT" => Self::Shr,
            "T_EQ" => Self::Eq,
            "T_NEQ" => Self::Neq,
            "T_GEQ" => Self::Geq,
            "T_LEQ" => Self::Leq,
            "T_GT" => Self::Gt,
            "T_LT" => Self::Lt,
            "T_AND" => Self::And,
            "T_OR" => Self::Or,
            _ => {
                return Err(AstError::UnknownToken {
                    kind: "binary operator",
                    token: token.to_owned(),
                })
            }
        };
        Ok(op)
    }

    /// Name used in the AST dump.
    pub const fn dump_name(self) -> &'static str {
        match self {
            Self::Mul => "Mult",
            Self::Div => "Div",
            Self::Mod => "Mod",
            Self::Add => "Plus",
            Self::Sub => "Minus",
            Self::Shl => "Leftshift",
            Self::Shr => "Rightshift",
            Self::Eq => "Eq",
            Self::Neq => "Neq",
            Self::Geq => "Geq",
            Self::Leq => "Leq",
            Self::Gt => "Gt",
            Self::Lt => "Lt",
            Self::And => "And",
            Self::Or => "Or",
        }
    }

    /// Returns `true` for `&&` and `||`.
    #[inline]
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Returns `true` for the six integer comparisons.
    #[inline]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Neq | Self::Geq | Self::Leq | Self::Gt | Self::Lt
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dump_name())
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Logical negation of a 1-bit value.
    Not,
    /// Arithmetic negation.
    Negate,
}

impl UnaryOp {
    /// Map a parser operator token onto a `UnaryOp`.
    pub fn from_token(token: &str) -> Result<Self, AstError> {
        match token {
            "T_NOT" => Ok(Self::Not),
            "T_UMINUS" => Ok(Self::Negate),
            _ => Err(AstError::UnknownToken {
                kind: "unary operator",
                token: token.to_owned(),
            }),
        }
    }

    /// Name used in the AST dump.
    pub const fn dump_name(self) -> &'static str {
        match self {
            Self::Not => "Not",
            Self::Negate => "UnaryMinus",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dump_name())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use known operator tokens")]
mod tests {
    use super::*;

    #[test]
    fn binary_tokens_round_to_dump_names() {
        let cases = [
            ("T_MULT", "Mult"),
            ("T_DIV", "Div"),
            ("T_MOD", "Mod"),
            ("T_PLUS", "Plus"),
            ("T_MINUS", "Minus"),
            ("T_LEFTSHIFT", "Leftshift"),
            ("T_RIGHTSHIFT", "Rightshift"),
            ("T_EQ", "Eq"),
            ("T_NEQ", "Neq"),
            ("T_GEQ", "Geq"),
            ("T_LEQ", "Leq"),
            ("T_GT", "Gt"),
            ("T_LT", "Lt"),
            ("T_AND", "And"),
            ("T_OR", "Or"),
        ];
        for (token, name) in cases {
            let op = BinaryOp::from_token(token).unwrap();
            assert_eq!(op.dump_name(), name, "token {token}");
        }
    }

    #[test]
    fn unknown_operator_tokens_are_rejected() {
        assert!(matches!(
            BinaryOp::from_token("T_POW"),
            Err(AstError::UnknownToken {
                kind: "binary operator",
                ..
            })
        ));
        assert!(matches!(
            UnaryOp::from_token("T_TILDE"),
            Err(AstError::UnknownToken {
                kind: "unary operator",
                ..
            })
        ));
    }

    #[test]
    fn classification() {
        assert!(BinaryOp::And.is_short_circuit());
        assert!(BinaryOp::Or.is_short_circuit());
        assert!(!BinaryOp::Add.is_short_circuit());
        assert!(BinaryOp::Geq.is_comparison());
        assert!(!BinaryOp::Shl.is_comparison());
    }

    #[test]
    fn unary_names() {
        assert_eq!(UnaryOp::from_token("T_NOT"), Ok(UnaryOp::Not));
        assert_eq!(UnaryOp::from_token("T_UMINUS"), Ok(UnaryOp::Negate));
        assert_eq!(UnaryOp::Negate.to_string(), "UnaryMinus");
    }
}
