use super::*;

#[test]
fn decimal_numbers() {
    assert_eq!(parse_number("0"), Ok(0));
    assert_eq!(parse_number("42"), Ok(42));
    assert_eq!(parse_number("2147483647"), Ok(i32::MAX));
}

#[test]
fn hex_numbers() {
    assert_eq!(parse_number("0x2A"), Ok(42));
    assert_eq!(parse_number("0xff"), Ok(255));
    assert_eq!(parse_number("0XFF"), Ok(255));
    assert_eq!(parse_number("0xFFFFFFFF"), Ok(-1));
}

#[test]
fn number_errors() {
    assert_eq!(
        parse_number("2147483648"),
        Err(LiteralError::OutOfRange("2147483648".to_owned()))
    );
    assert_eq!(
        parse_number("0x100000000"),
        Err(LiteralError::OutOfRange("0x100000000".to_owned()))
    );
    assert_eq!(
        parse_number("0x"),
        Err(LiteralError::InvalidNumber("0x".to_owned()))
    );
    assert_eq!(
        parse_number("12a"),
        Err(LiteralError::InvalidNumber("12a".to_owned()))
    );
}

#[test]
fn number_constant_keeps_lexeme() {
    let c = Constant::number("0x1F", 3).unwrap();
    assert_eq!(c.value(), &ConstValue::Int(31));
    assert_eq!(c.to_string(), "Constant(NumberExpr,0x1F)");
    assert_eq!(c.line(), 3);
    assert_eq!(c.type_tag(), TypeTag::Int32);
}

#[test]
fn string_escapes_are_decoded() {
    let decoded = decode_string_literal(r#""a\tb\nc\\d\"e\'f""#).unwrap();
    assert_eq!(decoded, "a\tb\nc\\d\"e'f");

    let controls = decode_string_literal(r#""\a\b\v\f\r""#).unwrap();
    assert_eq!(controls, "\x07\x08\x0B\x0C\r");
}

#[test]
fn unknown_escape_is_dropped() {
    let decoded = decode_string_literal(r#""x\qy""#).unwrap();
    assert_eq!(decoded, "xy");
}

#[test]
fn string_needs_quotes() {
    assert_eq!(
        decode_string_literal("hello"),
        Err(LiteralError::MalformedString("hello".to_owned()))
    );
    assert!(decode_string_literal("\"").is_err());
}

#[test]
fn string_constant_dumps_raw_lexeme() {
    let c = Constant::string(r#""hi\n""#, 1).unwrap();
    assert_eq!(c.value(), &ConstValue::Str("hi\n".to_owned()));
    assert_eq!(c.to_string(), r#"Constant(StringConstant,"hi\n")"#);
    assert_eq!(c.type_tag(), TypeTag::StringPtr);
}

#[test]
fn booleans() {
    assert_eq!(
        Constant::boolean(true, 1).to_string(),
        "Constant(BoolExpr,True)"
    );
    let f = Constant::boolean_lexeme("false", 2).unwrap();
    assert_eq!(f.value(), &ConstValue::Bool(false));
    assert_eq!(f.to_string(), "Constant(BoolExpr,False)");
    assert!(Constant::boolean_lexeme("yes", 2).is_err());
}

#[test]
fn char_literals_become_numbers() {
    let a = Constant::char_literal("'a'", 1).unwrap();
    assert_eq!(a.value(), &ConstValue::Int(97));
    assert_eq!(a.to_string(), "Constant(NumberExpr,97)");

    let nl = Constant::char_literal(r"'\n'", 1).unwrap();
    assert_eq!(nl.value(), &ConstValue::Int(10));

    assert!(Constant::char_literal("'ab'", 1).is_err());
    assert!(Constant::char_literal(r"'\q'", 1).is_err());
}
