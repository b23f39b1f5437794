//! Classification of scalar literal tokens.
//!
//! A token is tried against each literal form in turn and the first match
//! wins:
//!
//! 1. the keywords `true` and `false`
//! 2. the special floats `f32.nan`, `f32.inf`, `-f32.inf` and their `f64` forms
//! 3. integers: decimal, `0x` hexadecimal or `0b` binary, optionally grouped
//!    with `_`, with an optional integer suffix (default `i32`)
//! 4. decimal floats: digits, optional fraction, optional exponent, with an
//!    optional float suffix (default `f64`)
//! 5. hexadecimal floats: `0x` mantissa with a fraction and a required `p`
//!    exponent, with an optional float suffix (default `f64`)
//!
//! ```rust
//! use futhark_data::literal::parse_scalar;
//! use futhark_data::Scalar;
//!
//! assert_eq!(parse_scalar("-5i8").unwrap(), Scalar::I8(-5));
//! assert_eq!(parse_scalar("0xff_ffu32").unwrap(), Scalar::U32(0xffff));
//! assert_eq!(parse_scalar("2.5e1f32").unwrap(), Scalar::F32(25.0));
//! assert_eq!(parse_scalar("0x1.8p1").unwrap(), Scalar::F64(3.0));
//! ```

use crate::types::PrimitiveType;
use crate::{Error, Result, Scalar};

/// Parses one scalar literal token.
///
/// # Errors
///
/// Returns [`Error::InvalidLiteral`] when the token matches no literal form
/// or its value does not fit the selected type, and [`Error::UnknownTypeTag`]
/// when a number carries a suffix that names no primitive type.
pub fn parse_scalar(token: &str) -> Result<Scalar> {
    match token {
        "true" => return Ok(Scalar::Bool(true)),
        "false" => return Ok(Scalar::Bool(false)),
        _ => {}
    }

    if let Some(special) = special_float(token) {
        return Ok(special);
    }

    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if let Some((magnitude, ty)) = integer_literal(token, body)? {
        let value = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        return integer_scalar(token, value, ty);
    }

    if let Some((text, ty)) = decimal_float_literal(body) {
        let value: f64 = text
            .parse()
            .map_err(|_| Error::invalid_literal(token))?;
        return Ok(float_scalar(if negative { -value } else { value }, ty));
    }

    if let Some((value, ty)) = hex_float_literal(body) {
        return Ok(float_scalar(if negative { -value } else { value }, ty));
    }

    Err(unmatched(token))
}

/// Parses the size inside a `[...]` dimension of `empty(...)`.
///
/// # Errors
///
/// Returns [`Error::InvalidLiteral`] unless the token is a non-negative
/// decimal integer.
pub fn parse_dimension(token: &str) -> Result<usize> {
    match split_digits(token, |b| b.is_ascii_digit()) {
        Some((digits, "")) => digits
            .replace('_', "")
            .parse()
            .map_err(|_| Error::invalid_literal_because(token, "dimension too large")),
        _ => Err(Error::invalid_literal_because(
            token,
            "expected a non-negative dimension size",
        )),
    }
}

fn special_float(token: &str) -> Option<Scalar> {
    let scalar = match token {
        "f32.nan" => Scalar::F32(f32::NAN),
        "f32.inf" => Scalar::F32(f32::INFINITY),
        "-f32.inf" => Scalar::F32(f32::NEG_INFINITY),
        "f64.nan" => Scalar::F64(f64::NAN),
        "f64.inf" => Scalar::F64(f64::INFINITY),
        "-f64.inf" => Scalar::F64(f64::NEG_INFINITY),
        _ => return None,
    };
    Some(scalar)
}

/// Splits `s` into a leading run of digits and the rest. Single `_`
/// separators may appear between digits, but not doubled or at the end.
fn split_digits(s: &str, is_digit: impl Fn(u8) -> bool) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    if !bytes.first().is_some_and(|&b| is_digit(b)) {
        return None;
    }
    let end = bytes
        .iter()
        .position(|&b| !(is_digit(b) || b == b'_'))
        .unwrap_or(bytes.len());
    let (digits, rest) = s.split_at(end);
    if digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some((digits, rest))
}

fn suffix_type(suffix: &str, allowed: fn(PrimitiveType) -> bool) -> Option<PrimitiveType> {
    PrimitiveType::from_suffix(suffix).filter(|ty| allowed(*ty))
}

fn integer_literal(token: &str, body: &str) -> Result<Option<(u128, PrimitiveType)>> {
    let (radix, digits_and_suffix) = if let Some(rest) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = body.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, body)
    };

    let Some((digits, suffix)) = split_digits(digits_and_suffix, |b| (b as char).is_digit(radix))
    else {
        return Ok(None);
    };
    // Binary literals need at least two characters after `0b`.
    if radix == 2 && digits.len() < 2 {
        return Ok(None);
    }

    let ty = if suffix.is_empty() {
        PrimitiveType::DEFAULT_INTEGER
    } else {
        match suffix_type(suffix, PrimitiveType::is_integer) {
            Some(ty) => ty,
            None => return Ok(None),
        }
    };

    let mut magnitude: u128 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).unwrap_or_default();
        magnitude = magnitude
            .checked_mul(u128::from(radix))
            .and_then(|m| m.checked_add(u128::from(digit)))
            .ok_or_else(|| out_of_range(token, ty))?;
    }
    if magnitude > u128::from(u64::MAX) {
        return Err(out_of_range(token, ty));
    }
    Ok(Some((magnitude, ty)))
}

fn out_of_range(token: &str, ty: PrimitiveType) -> Error {
    Error::invalid_literal_because(token, &format!("out of range for {}", ty))
}

macro_rules! narrow_integer {
    ($token:expr, $value:expr, $ty:expr, $($prim:ident => $rust:ty),*) => {
        match $ty {
            $(PrimitiveType::$prim => <$rust>::try_from($value)
                .map(Scalar::$prim)
                .map_err(|_| out_of_range($token, $ty)),)*
            other => Err(Error::invalid_literal_because(
                $token,
                &format!("{} is not an integer type", other),
            )),
        }
    };
}

fn integer_scalar(token: &str, value: i128, ty: PrimitiveType) -> Result<Scalar> {
    narrow_integer!(token, value, ty,
        I8 => i8, I16 => i16, I32 => i32, I64 => i64,
        U8 => u8, U16 => u16, U32 => u32, U64 => u64)
}

fn float_scalar(value: f64, ty: PrimitiveType) -> Scalar {
    match ty {
        PrimitiveType::F32 => Scalar::F32(value as f32),
        _ => Scalar::F64(value),
    }
}

fn float_suffix(suffix: &str) -> Option<PrimitiveType> {
    if suffix.is_empty() {
        Some(PrimitiveType::DEFAULT_FLOAT)
    } else {
        suffix_type(suffix, PrimitiveType::is_float)
    }
}

/// Matches `[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9][0-9_]*)?` plus an
/// optional float suffix, returning the number text without underscores.
fn decimal_float_literal(body: &str) -> Option<(String, PrimitiveType)> {
    let is_digit = |b: u8| b.is_ascii_digit();
    let (_, mut rest) = split_digits(body, is_digit)?;

    if let Some(after_dot) = rest.strip_prefix('.') {
        if let Some((_, after_fraction)) = split_digits(after_dot, is_digit) {
            rest = after_fraction;
        }
    }

    if let Some(after_e) = rest.strip_prefix(['e', 'E']) {
        let unsigned = after_e.strip_prefix(['+', '-']).unwrap_or(after_e);
        if let Some((_, after_exponent)) = split_digits(unsigned, is_digit) {
            rest = after_exponent;
        }
    }

    let ty = float_suffix(rest)?;
    let number = &body[..body.len() - rest.len()];
    Some((number.replace('_', ""), ty))
}

/// Matches `0[xX]H[H_]*\.H[H_]*[pP][+-]?[0-9]+` plus an optional float suffix.
fn hex_float_literal(body: &str) -> Option<(f64, PrimitiveType)> {
    let is_hex = |b: u8| b.is_ascii_hexdigit();
    let rest = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))?;
    let (integer, rest) = split_digits(rest, is_hex)?;
    let (fraction, rest) = split_digits(rest.strip_prefix('.')?, is_hex)?;
    let rest = rest.strip_prefix(['p', 'P'])?;
    let (exponent_negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let (exponent_digits, suffix) = rest.split_at(digits_end);
    let ty = float_suffix(suffix)?;

    // Keep at most 120 significant bits; `sticky` records nonzero digits past them.
    const LIMIT: u128 = 1 << 120;
    let mut mantissa: u128 = 0;
    let mut shift: i64 = 0;
    let mut sticky = false;
    for c in integer.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(16).unwrap_or_default();
        if mantissa < LIMIT {
            mantissa = mantissa * 16 + u128::from(digit);
        } else {
            shift += 4;
            sticky |= digit != 0;
        }
    }
    for c in fraction.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(16).unwrap_or_default();
        if mantissa < LIMIT {
            mantissa = mantissa * 16 + u128::from(digit);
            shift -= 4;
        } else {
            sticky |= digit != 0;
        }
    }

    let exponent = exponent_digits
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(1 << 20));
    let exponent = if exponent_negative { -exponent } else { exponent };

    Some((round_to_f64(mantissa, exponent + shift, sticky), ty))
}

/// Significand bits of an `f64`, the implicit leading one included.
const F64_PRECISION: i64 = 53;

/// Exponent of the least significant bit of the smallest subnormal `f64`.
const F64_MIN_EXP: i64 = -1074;

/// Rounds `mantissa * 2^exp` to the nearest `f64`, ties to even, in a single
/// step. `sticky` marks nonzero bits below `mantissa` that were dropped.
fn round_to_f64(mantissa: u128, exp: i64, sticky: bool) -> f64 {
    if mantissa == 0 {
        return 0.0;
    }
    let bits = i64::from(128 - mantissa.leading_zeros());
    let drop = (bits - F64_PRECISION).max(F64_MIN_EXP - exp);
    if drop <= 0 {
        return scale_by_power_of_two(mantissa as f64, exp);
    }
    if drop > 128 {
        return 0.0;
    }

    let (kept, rest) = if drop == 128 {
        (0, mantissa)
    } else {
        (mantissa >> drop, mantissa & ((1u128 << drop) - 1))
    };
    let half = 1u128 << (drop - 1);
    let round_up = rest > half || (rest == half && (sticky || kept & 1 == 1));
    let kept = if round_up { kept + 1 } else { kept };

    // `kept` has at most 54 bits, so the conversion is exact and the scaling
    // only loses precision by overflowing to infinity.
    scale_by_power_of_two(kept as f64, exp + drop)
}

/// Computes `x * 2^exp` without overflowing intermediate powers.
fn scale_by_power_of_two(mut x: f64, mut exp: i64) -> f64 {
    while exp > 1000 && x.is_finite() {
        x *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 && x != 0.0 {
        x *= 2f64.powi(-1000);
        exp += 1000;
    }
    x * 2f64.powi(exp.clamp(-1100, 1100) as i32)
}

/// Picks the error for a token no literal form accepts. A number carrying a
/// suffix such as `i128` or `f16` reports the unknown suffix.
fn unmatched(token: &str) -> Error {
    let body = token.strip_prefix('-').unwrap_or(token);
    if body.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some(start) = body.rfind(['i', 'u', 'f']) {
            let suffix = &body[start..];
            let numeric_suffix = suffix.len() > 1 && suffix[1..].bytes().all(|b| b.is_ascii_digit());
            let after_digit = body[..start]
                .bytes()
                .last()
                .is_some_and(|b| b.is_ascii_digit() || b == b'_');
            if numeric_suffix && after_digit && PrimitiveType::from_suffix(suffix).is_none() {
                return Error::unknown_type(suffix);
            }
        }
    }
    Error::invalid_literal(token)
}
