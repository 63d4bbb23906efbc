#![cfg(test)]

use crate::backends::wasm::opcode_selection::{
    equals_zero, float_negate, multiply, not_equal, select_binary_opcode,
};
use crate::compiler_frontend::compiler_messages::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::datatypes::{MachineCell, Type};
use crate::compiler_frontend::parse_tree::BinaryOperator;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use wasm_encoder::{Encode, Instruction};

fn opcode_bytes(instruction: &Instruction<'_>) -> Vec<u8> {
    let mut bytes = Vec::new();
    instruction.encode(&mut bytes);
    bytes
}

fn select(operator: BinaryOperator, carrier: Type) -> Vec<u8> {
    let instruction = select_binary_opcode(operator, &carrier, TextLocation::default())
        .unwrap_or_else(|error| panic!("{operator} on {carrier} should select: {error}"));
    opcode_bytes(&instruction)
}

#[test]
fn family_follows_float_and_width() {
    assert_eq!(select(BinaryOperator::Add, Type::I32), [0x6a]);
    assert_eq!(select(BinaryOperator::Add, Type::I64), [0x7c]);
    assert_eq!(select(BinaryOperator::Add, Type::F32), [0x92]);
    assert_eq!(select(BinaryOperator::Add, Type::F64), [0xa0]);

    // Narrow integers share the i32 family
    assert_eq!(select(BinaryOperator::Subtract, Type::I8), [0x6b]);
    assert_eq!(select(BinaryOperator::Multiply, Type::U16), [0x6c]);

    // Temporal values are 64-bit signed integers
    assert_eq!(select(BinaryOperator::Subtract, Type::TimeStamp), [0x7d]);
}

#[test]
fn signedness_only_matters_for_division_remainder_and_ordering() {
    let signed_unsigned: [(BinaryOperator, [u8; 1], [u8; 1]); 6] = [
        (BinaryOperator::Divide, [0x6d], [0x6e]),
        (BinaryOperator::Modulus, [0x6f], [0x70]),
        (BinaryOperator::LessThan, [0x48], [0x49]),
        (BinaryOperator::GreaterThan, [0x4a], [0x4b]),
        (BinaryOperator::LessThanOrEqual, [0x4c], [0x4d]),
        (BinaryOperator::GreaterThanOrEqual, [0x4e], [0x4f]),
    ];

    for (operator, signed, unsigned) in signed_unsigned {
        assert_eq!(select(operator, Type::I32), signed, "{operator} i32");
        assert_eq!(select(operator, Type::U32), unsigned, "{operator} u32");
    }

    for operator in [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
    ] {
        assert_eq!(select(operator, Type::I64), select(operator, Type::U64));
    }
}

#[test]
fn wide_unsigned_variants() {
    assert_eq!(select(BinaryOperator::Divide, Type::U64), [0x80]);
    assert_eq!(select(BinaryOperator::Modulus, Type::U64), [0x82]);
    assert_eq!(select(BinaryOperator::GreaterThanOrEqual, Type::U64), [0x5a]);
    assert_eq!(select(BinaryOperator::LessThan, Type::I64), [0x53]);
}

#[test]
fn float_comparisons() {
    assert_eq!(select(BinaryOperator::Equal, Type::F32), [0x5b]);
    assert_eq!(select(BinaryOperator::LessThan, Type::F32), [0x5d]);
    assert_eq!(select(BinaryOperator::GreaterThanOrEqual, Type::F64), [0x66]);
    assert_eq!(select(BinaryOperator::Divide, Type::F64), [0xa3]);
}

#[test]
fn every_numeric_type_selects_every_basic_operator() {
    let operators = [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::LessThan,
        BinaryOperator::GreaterThan,
        BinaryOperator::LessThanOrEqual,
        BinaryOperator::GreaterThanOrEqual,
    ];

    for carrier in Type::NUMERICS {
        for operator in operators {
            assert!(
                select_binary_opcode(operator, &carrier, TextLocation::default()).is_ok(),
                "{operator} on {carrier}"
            );
        }
    }
}

#[test]
fn float_modulo_fails() {
    for carrier in [Type::F32, Type::F64] {
        let error = select_binary_opcode(BinaryOperator::Modulus, &carrier, TextLocation::default())
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::Type);
        assert_eq!(error.metadata.get(&ErrorMetaDataKey::Operator), Some(&"%"));
        assert_eq!(
            error.metadata.get(&ErrorMetaDataKey::FoundType),
            Some(&carrier.keyword())
        );
    }
}

#[test]
fn exponent_is_not_yet_implemented_for_any_numeric_type() {
    for carrier in Type::NUMERICS {
        let error = select_binary_opcode(BinaryOperator::Exponent, &carrier, TextLocation::default())
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotImplemented);
        assert!(error.msg.contains("not yet implemented"));
    }
}

#[test]
fn non_numeric_carriers_are_type_errors() {
    let carriers = [
        Type::String,
        Type::Series(Box::new(Type::I32)),
        Type::Chan(Box::new(Type::F64)),
    ];

    for carrier in carriers {
        let error = select_binary_opcode(BinaryOperator::Add, &carrier, TextLocation::default())
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::Type);
        assert!(error.msg.contains(&carrier.to_string()));
        assert_eq!(error.metadata.get(&ErrorMetaDataKey::Operator), Some(&"+"));
    }
}

#[test]
fn exponent_on_handles_reports_the_missing_operator_first() {
    for carrier in [Type::String, Type::Series(Box::new(Type::F32))] {
        let error = select_binary_opcode(BinaryOperator::Exponent, &carrier, TextLocation::default())
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotImplemented, "{carrier}");
        assert_eq!(error.msg, format!("operator ^ on {carrier} is not yet implemented"));
    }
}

#[test]
fn synthesized_instructions_follow_the_cell() {
    assert_eq!(opcode_bytes(&equals_zero(MachineCell::I32)), [0x45]);
    assert_eq!(opcode_bytes(&equals_zero(MachineCell::I64)), [0x50]);
    assert_eq!(opcode_bytes(&equals_zero(MachineCell::F64)), [0x61]);
    assert_eq!(opcode_bytes(&not_equal(MachineCell::I32)), [0x47]);
    assert_eq!(opcode_bytes(&not_equal(MachineCell::F32)), [0x5c]);
    assert_eq!(opcode_bytes(&multiply(MachineCell::I64)), [0x7e]);
    assert!(float_negate(MachineCell::I32).is_none());
    assert_eq!(
        float_negate(MachineCell::F32).map(|negate| opcode_bytes(&negate)),
        Some(vec![0x8c])
    );
}
