// Numeric-literal coercion for raw payload cells

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};
use serde_json::Value;

/// Coerce a raw cell to a number.
///
/// Strings go through [`parse_numeric_literal`]; booleans become 1/0 and
/// `null` becomes 0. Arrays and objects are `NaN`.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_literal(s),
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Render a raw cell as the label shown for a category.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Shortest round-trip form of a number. Magnitudes of 1e21 and above, or
/// below 1e-6, use exponent notation with an explicit sign (`1e+21`, `1e-7`).
fn format_number(f: f64) -> String {
    let magnitude = f.abs();
    if f.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{:e}", f);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    if f.fract() == 0.0 && f.is_finite() {
        format!("{}", f as i128)
    } else {
        f.to_string()
    }
}

/// Parse a string using standard numeric-literal rules.
///
/// Surrounding whitespace is ignored and a blank string is 0. Accepts signed
/// decimals with optional fraction and exponent, `0x`/`0o`/`0b` integers and
/// `Infinity`. Anything else yields `NaN`.
pub fn parse_numeric_literal(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match all_consuming(alt((radix_integer, infinity, decimal)))(trimmed) {
        Ok((_, value)) => value,
        Err(_) => f64::NAN,
    }
}

fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |literal: &str| literal.parse::<f64>(),
    )(input)
}

fn infinity(input: &str) -> IResult<&str, f64> {
    map(pair(opt(one_of("+-")), tag("Infinity")), |(sign, _)| {
        if sign == Some('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    })(input)
}

fn radix_integer(input: &str) -> IResult<&str, f64> {
    alt((
        map(
            preceded(tag_no_case("0x"), take_while1(|c: char| c.is_ascii_hexdigit())),
            |digits: &str| fold_digits(digits, 16),
        ),
        map(
            preceded(tag_no_case("0o"), take_while1(|c: char| ('0'..='7').contains(&c))),
            |digits: &str| fold_digits(digits, 8),
        ),
        map(
            preceded(tag_no_case("0b"), take_while1(|c: char| c == '0' || c == '1')),
            |digits: &str| fold_digits(digits, 2),
        ),
    ))(input)
}

// Accumulate in f64 so long literals lose precision instead of overflowing.
fn fold_digits(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}
