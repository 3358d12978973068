//! Literal constants and their decoding.
//!
//! Numbers are 32-bit: decimal literals must fit in `i32`, hexadecimal
//! literals (`0x` prefix) may use the full unsigned 32-bit range and are
//! reinterpreted as two's complement. String literals keep their source
//! lexeme for the dump and carry the decoded bytes for code generation.

use std::fmt;

use crate::TypeTag;

/// Malformed literal lexeme.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("invalid numeric literal `{0}`")]
    InvalidNumber(String),
    #[error("numeric literal `{0}` does not fit in 32 bits")]
    OutOfRange(String),
    #[error("invalid boolean literal `{0}`")]
    InvalidBool(String),
    #[error("malformed string literal `{0}`")]
    MalformedString(String),
    #[error("malformed character literal `{0}`")]
    MalformedChar(String),
}

/// Decoded value of a constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i32),
    Bool(bool),
    /// Decoded string contents (escapes applied, quotes removed).
    Str(String),
}

/// A literal constant node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constant {
    value: ConstValue,
    lexeme: String,
    line: u32,
}

impl Constant {
    /// Numeric literal from its source lexeme (`42`, `0x2A`).
    pub fn number(lexeme: &str, line: u32) -> Result<Self, LiteralError> {
        let value = parse_number(lexeme)?;
        Ok(Self {
            value: ConstValue::Int(value),
            lexeme: lexeme.to_owned(),
            line,
        })
    }

    /// Integer constant from an already-known value.
    pub fn int(value: i32, line: u32) -> Self {
        Self {
            value: ConstValue::Int(value),
            lexeme: value.to_string(),
            line,
        }
    }

    /// Character literal (`'a'`, `'\n'`), which Decaf treats as its ASCII code.
    pub fn char_literal(lexeme: &str, line: u32) -> Result<Self, LiteralError> {
        let malformed = || LiteralError::MalformedChar(lexeme.to_owned());
        let inner = lexeme
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .ok_or_else(malformed)?;
        let mut chars = inner.chars();
        let c = match (chars.next(), chars.next(), chars.next()) {
            (Some('\\'), Some(esc), None) => unescape(esc).ok_or_else(malformed)?,
            (Some(c), None, None) if c != '\\' => c,
            _ => return Err(malformed()),
        };
        let code = i32::try_from(u32::from(c)).map_err(|_| malformed())?;
        Ok(Self::int(code, line))
    }

    /// Boolean constant.
    pub fn boolean(value: bool, line: u32) -> Self {
        Self {
            value: ConstValue::Bool(value),
            lexeme: if value { "True" } else { "False" }.to_owned(),
            line,
        }
    }

    /// Boolean literal from its source lexeme (`true` / `false`, any case).
    pub fn boolean_lexeme(lexeme: &str, line: u32) -> Result<Self, LiteralError> {
        if lexeme.eq_ignore_ascii_case("true") {
            Ok(Self::boolean(true, line))
        } else if lexeme.eq_ignore_ascii_case("false") {
            Ok(Self::boolean(false, line))
        } else {
            Err(LiteralError::InvalidBool(lexeme.to_owned()))
        }
    }

    /// String literal from its quoted source lexeme.
    pub fn string(lexeme: &str, line: u32) -> Result<Self, LiteralError> {
        let decoded = decode_string_literal(lexeme)?;
        Ok(Self {
            value: ConstValue::Str(decoded),
            lexeme: lexeme.to_owned(),
            line,
        })
    }

    #[inline]
    pub fn value(&self) -> &ConstValue {
        &self.value
    }

    #[inline]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The Decaf type of this constant.
    pub fn type_tag(&self) -> TypeTag {
        match self.value {
            ConstValue::Int(_) => TypeTag::Int32,
            ConstValue::Bool(_) => TypeTag::Bool1,
            ConstValue::Str(_) => TypeTag::StringPtr,
        }
    }

    /// Literal kind as printed in the dump.
    pub fn kind_name(&self) -> &'static str {
        match self.value {
            ConstValue::Int(_) => "NumberExpr",
            ConstValue::Bool(_) => "BoolExpr",
            ConstValue::Str(_) => "StringConstant",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constant({},{})", self.kind_name(), self.lexeme)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal literal into 32 bits.
pub fn parse_number(lexeme: &str) -> Result<i32, LiteralError> {
    let invalid = || LiteralError::InvalidNumber(lexeme.to_owned());
    let out_of_range = || LiteralError::OutOfRange(lexeme.to_owned());

    if let Some(digits) = lexeme
        .strip_prefix("0x")
        .or_else(|| lexeme.strip_prefix("0X"))
    {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let raw = u32::from_str_radix(digits, 16).map_err(|_| out_of_range())?;
        return Ok(i32::from_ne_bytes(raw.to_ne_bytes()));
    }

    if lexeme.is_empty() || !lexeme.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    lexeme.parse::<i32>().map_err(|_| out_of_range())
}

/// Decode a quoted string literal.
///
/// Recognized escapes: `\a \b \t \n \v \f \r \\ \' \"`. Any other escape
/// sequence is dropped entirely (backslash and following character).
pub fn decode_string_literal(lexeme: &str) -> Result<String, LiteralError> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| LiteralError::MalformedString(lexeme.to_owned()))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        if let Some(decoded) = chars.next().and_then(unescape) {
            out.push(decoded);
        }
    }
    Ok(out)
}

fn unescape(c: char) -> Option<char> {
    let decoded = match c {
        'a' => '\x07',
        'b' => '\x08',
        't' => '\t',
        'n' => '\n',
        'v' => '\x0B',
        'f' => '\x0C',
        'r' => '\r',
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests decode known-good literals")]
mod tests;
