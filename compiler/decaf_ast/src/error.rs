//! Errors raised while constructing AST nodes.

use crate::literal::LiteralError;

/// Problem found while turning parser output into AST nodes.
///
/// `UnknownToken` should be unreachable for a grammar-valid token stream;
/// it signals a parser/AST mismatch rather than a user error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    /// A type or operator token with no counterpart in the closed enumerations.
    #[error("unrecognized {kind} token `{token}`")]
    UnknownToken { kind: &'static str, token: String },

    /// A malformed literal.
    #[error(transparent)]
    Literal(#[from] LiteralError),
}
