//! Literal lexing
//!
//! Turns the raw text of a literal token into a value and the type it resolves to.
//! The parser hands over literal text verbatim, so suffixes (`i32`, `f64`),
//! base prefixes (`0x`, `0b`) and `_` digit separators are all handled here.

use crate::compiler_frontend::compiler_messages::compiler_errors::{
    CompileError, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_frontend::datatypes::Type;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{eval_log, return_compile_error};

// Longest suffixes first so "i16" is never mistaken for a shorter match
static INTEGER_SUFFIXES: [(&str, Type); 8] = [
    ("i16", Type::I16),
    ("i32", Type::I32),
    ("i64", Type::I64),
    ("u16", Type::U16),
    ("u32", Type::U32),
    ("u64", Type::U64),
    ("i8", Type::I8),
    ("u8", Type::U8),
];

static FLOAT_SUFFIXES: [(&str, Type); 2] = [("f32", Type::F32), ("f64", Type::F64)];

const NANOSECONDS_PER_SECOND: f64 = 1_000_000_000.0;

enum TemporalUnit {
    // Nanoseconds per unit
    Span(i64),
    // Cycles per second per unit
    Frequency(f64),
}

// Checked in order, every unit that is a suffix of another unit comes after it
static TEMPORAL_UNITS: [(&str, TemporalUnit); 9] = [
    ("khz", TemporalUnit::Frequency(1_000.0)),
    ("mhz", TemporalUnit::Frequency(1_000_000.0)),
    ("hz", TemporalUnit::Frequency(1.0)),
    ("ns", TemporalUnit::Span(1)),
    ("us", TemporalUnit::Span(1_000)),
    ("ms", TemporalUnit::Span(1_000_000)),
    ("s", TemporalUnit::Span(1_000_000_000)),
    ("m", TemporalUnit::Span(60 * 1_000_000_000)),
    ("h", TemporalUnit::Span(60 * 60 * 1_000_000_000)),
];

/// Which numeric token the parser matched. Decides the suffix set and default type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericLiteralKind {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexedLiteral {
    pub value: LiteralValue,
    pub data_type: Type,
}

/// Parses a numeric literal such as `1_000_000i32`, `0xFFi32`, `3.14f32` or `42`.
///
/// Integers without a suffix are `i64`, floats without one are `f64`.
/// Values meant for types narrower than 32 bits are not range checked or narrowed,
/// the I32 cell they end up in is a representation convention of the type system.
pub fn lex_numeric_literal(
    text: &str,
    kind: NumericLiteralKind,
    location: TextLocation,
) -> Result<LexedLiteral, CompileError> {
    let lexed = match kind {
        NumericLiteralKind::Integer => lex_integer(text, location)?,
        NumericLiteralKind::Float => lex_float(text, location)?,
    };

    eval_log!("Lexed literal ", text, " as ", #lexed);

    Ok(lexed)
}

fn lex_integer(text: &str, location: TextLocation) -> Result<LexedLiteral, CompileError> {
    let (body, data_type) = strip_suffix(text, &INTEGER_SUFFIXES, Type::I64);
    let cleaned: String = body.chars().filter(|c| *c != '_').collect();

    let (digits, radix) = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(binary) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        (binary, 2)
    } else {
        (cleaned.as_str(), 10)
    };

    // from_str_radix would accept a leading sign, literals never have one
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed_literal(text, location));
    }

    let value = match i64::from_str_radix(digits, radix) {
        Ok(value) => value,

        // Full width unsigned values and hex/binary bit patterns above i64::MAX
        // keep their two's complement bits
        Err(_) if radix != 10 || data_type == Type::U64 => {
            match u64::from_str_radix(digits, radix) {
                Ok(value) => value as i64,
                Err(_) => return Err(malformed_literal(text, location)),
            }
        }

        Err(_) => return Err(malformed_literal(text, location)),
    };

    Ok(LexedLiteral {
        value: LiteralValue::Int(value),
        data_type,
    })
}

fn lex_float(text: &str, location: TextLocation) -> Result<LexedLiteral, CompileError> {
    let (body, data_type) = strip_suffix(text, &FLOAT_SUFFIXES, Type::F64);
    let cleaned: String = body.chars().filter(|c| *c != '_').collect();

    // Rust's float parser also takes "inf" and "NaN", Slate literals don't
    if !is_decimal_text(&cleaned) {
        return Err(malformed_literal(text, location));
    }

    match cleaned.parse::<f64>() {
        Ok(value) => Ok(LexedLiteral {
            value: LiteralValue::Float(value),
            data_type,
        }),
        Err(_) => Err(malformed_literal(text, location)),
    }
}

/// Parses a temporal literal (`500ms`, `1.5s`, `10hz`) into a `timespan` of nanoseconds.
/// Frequencies become the period of one cycle.
pub fn lex_temporal_literal(
    text: &str,
    location: TextLocation,
) -> Result<LexedLiteral, CompileError> {
    let lowered = text.to_ascii_lowercase();

    let Some((magnitude, unit)) = TEMPORAL_UNITS
        .iter()
        .find_map(|(suffix, unit)| lowered.strip_suffix(suffix).map(|rest| (rest, unit)))
    else {
        return Err(malformed_literal(text, location));
    };

    let cleaned: String = magnitude.chars().filter(|c| *c != '_').collect();
    if !is_decimal_text(&cleaned) {
        return Err(malformed_literal(text, location));
    }

    let nanoseconds = match unit {
        TemporalUnit::Span(nanos_per_unit) => match cleaned.parse::<i64>() {
            Ok(whole) => match whole.checked_mul(*nanos_per_unit) {
                Some(nanos) => nanos,
                None => return Err(malformed_literal(text, location)),
            },
            Err(_) => match cleaned.parse::<f64>() {
                Ok(fractional) => {
                    whole_nanoseconds(fractional * *nanos_per_unit as f64, text, location)?
                }
                Err(_) => return Err(malformed_literal(text, location)),
            },
        },

        TemporalUnit::Frequency(hertz_per_unit) => {
            let hertz = match cleaned.parse::<f64>() {
                Ok(value) => value * hertz_per_unit,
                Err(_) => return Err(malformed_literal(text, location)),
            };

            if hertz <= 0.0 {
                return_compile_error!(
                    MalformedLiteral,
                    format!("frequency literal '{text}' must be greater than zero"),
                    location,
                    {
                        CompilationStage => "Literal Lexing",
                    }
                )
            }

            whole_nanoseconds(NANOSECONDS_PER_SECOND / hertz, text, location)?
        }
    };

    let lexed = LexedLiteral {
        value: LiteralValue::Int(nanoseconds),
        data_type: Type::TimeSpan,
    };

    eval_log!("Lexed temporal literal ", text, " as ", #lexed);

    Ok(lexed)
}

// `as i64` saturates, anything outside the i64 range is rejected instead
fn whole_nanoseconds(nanos: f64, text: &str, location: TextLocation) -> Result<i64, CompileError> {
    let rounded = nanos.round();

    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(malformed_literal(text, location));
    }

    Ok(rounded as i64)
}

fn strip_suffix<'t>(text: &'t str, suffixes: &[(&str, Type)], default: Type) -> (&'t str, Type) {
    for (suffix, data_type) in suffixes {
        if let Some(body) = text.strip_suffix(suffix) {
            return (body, data_type.to_owned());
        }
    }

    (text, default)
}

fn is_decimal_text(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

fn malformed_literal(text: &str, location: TextLocation) -> CompileError {
    let mut error = CompileError::new(
        format!("malformed numeric literal '{text}'"),
        location,
        ErrorType::MalformedLiteral,
    );
    error.new_metadata_entry(ErrorMetaDataKey::CompilationStage, "Literal Lexing");
    error
}
