#![cfg(test)]

use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::compiler_frontend::datatypes::MachineCell;
use crate::compiler_frontend::tokenizer::literals::LiteralValue;
use proptest::prelude::*;
use wasm_encoder::{BlockType, Instruction, ValType};

// Minimal decoders, only good enough to read back what the encoder wrote

fn read_signed_leb128(bytes: &[u8]) -> (i64, usize) {
    let mut result: i64 = 0;
    let mut shift = 0;

    for (index, byte) in bytes.iter().enumerate() {
        result |= i64::from(byte & 0x7f) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= -1 << shift;
            }
            return (result, index + 1);
        }
    }

    panic!("unterminated LEB128 sequence: {bytes:02x?}");
}

fn read_unsigned_leb128(bytes: &[u8]) -> (u64, usize) {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (index, byte) in bytes.iter().enumerate() {
        result |= u64::from(byte & 0x7f) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return (result, index + 1);
        }
    }

    panic!("unterminated LEB128 sequence: {bytes:02x?}");
}

fn encode_int(cell: MachineCell, value: i64) -> Vec<u8> {
    let mut encoder = InstructionEncoder::new();
    encoder.push_int_const(cell, value);
    encoder.into_bytes()
}

#[test]
fn small_constants_fit_in_one_byte() {
    assert_eq!(encode_int(MachineCell::I32, 0), [0x41, 0x00]);
    assert_eq!(encode_int(MachineCell::I32, 10), [0x41, 0x0a]);
    assert_eq!(encode_int(MachineCell::I32, -1), [0x41, 0x7f]);
    assert_eq!(encode_int(MachineCell::I32, 63), [0x41, 0x3f]);
    assert_eq!(encode_int(MachineCell::I32, -64), [0x41, 0x40]);
}

#[test]
fn sign_bit_forces_an_extra_byte() {
    // 64 has bit 6 set, a single byte would decode as -64
    assert_eq!(encode_int(MachineCell::I32, 64), [0x41, 0xc0, 0x00]);
    assert_eq!(encode_int(MachineCell::I64, 100), [0x42, 0xe4, 0x00]);
    assert_eq!(encode_int(MachineCell::I64, -65), [0x42, 0xbf, 0x7f]);
}

#[test]
fn extreme_i64_constants() {
    let min = encode_int(MachineCell::I64, i64::MIN);
    assert_eq!(min.len(), 11);
    assert_eq!(read_signed_leb128(&min[1..]), (i64::MIN, 10));

    let max = encode_int(MachineCell::I64, i64::MAX);
    assert_eq!(read_signed_leb128(&max[1..]), (i64::MAX, 10));
}

#[test]
fn i32_cell_wraps_wide_integers() {
    // 0xFFFF_FFFF as an i32 is -1
    assert_eq!(encode_int(MachineCell::I32, 0xFFFF_FFFF), [0x41, 0x7f]);
}

#[test]
fn float_constants_are_little_endian_ieee754() {
    let mut encoder = InstructionEncoder::new();
    encoder.push_const(MachineCell::F32, LiteralValue::Float(1.0));
    assert_eq!(encoder.bytes(), [0x43, 0x00, 0x00, 0x80, 0x3f]);

    encoder.reset();
    encoder.push_const(MachineCell::F64, LiteralValue::Float(-2.0));
    assert_eq!(
        encoder.bytes(),
        [0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0]
    );
}

#[test]
fn integer_literal_in_float_cell_is_converted() {
    let mut encoder = InstructionEncoder::new();
    encoder.push_const(MachineCell::F32, LiteralValue::Int(3));

    assert_eq!(encoder.bytes()[0], 0x43);
    assert_eq!(
        f32::from_le_bytes([
            encoder.bytes()[1],
            encoder.bytes()[2],
            encoder.bytes()[3],
            encoder.bytes()[4]
        ]),
        3.0
    );
}

#[test]
fn local_access_uses_unsigned_leb128_slots() {
    let mut encoder = InstructionEncoder::new();
    encoder.write_local_get(3);
    encoder.write_local_set(200);
    encoder.write_local_tee(0);

    assert_eq!(encoder.bytes(), [0x20, 0x03, 0x21, 0xc8, 0x01, 0x22, 0x00]);
}

#[test]
fn structured_if_always_closes_its_block() {
    let mut encoder = InstructionEncoder::new();
    encoder.write_if(BlockType::Empty, |then_arm| {
        then_arm.write_opcode(&Instruction::Nop);
    });
    assert_eq!(encoder.bytes(), [0x04, 0x40, 0x01, 0x0b]);

    encoder.reset();
    assert!(encoder.is_empty());

    encoder.write_if_else(
        BlockType::Result(ValType::I64),
        |then_arm| then_arm.push_int_const(MachineCell::I64, 1),
        |else_arm| {
            else_arm.write_if_else(
                BlockType::Result(ValType::I64),
                |inner| inner.push_int_const(MachineCell::I64, 2),
                |inner| inner.push_int_const(MachineCell::I64, 3),
            )
        },
    );

    assert_eq!(
        encoder.bytes(),
        [
            0x04, 0x7e, 0x42, 0x01, // if (result i64) 1
            0x05, // else
            0x04, 0x7e, 0x42, 0x02, 0x05, 0x42, 0x03, 0x0b, // nested if
            0x0b, // end
        ]
    );
}

#[test]
fn calls_and_appended_bytes() {
    let mut child = InstructionEncoder::new();
    child.write_opcode(&Instruction::I32Add);

    let mut encoder = InstructionEncoder::with_capacity(8);
    encoder.write_call(130);
    encoder.append(child.bytes());

    assert_eq!(encoder.len(), 4);
    assert_eq!(encoder.into_bytes(), [0x10, 0x82, 0x01, 0x6a]);
}

proptest! {
    #[test]
    fn i32_constants_round_trip(value in any::<i32>()) {
        let bytes = encode_int(MachineCell::I32, i64::from(value));

        prop_assert_eq!(bytes[0], 0x41);
        let (decoded, length) = read_signed_leb128(&bytes[1..]);
        prop_assert_eq!(decoded, i64::from(value));
        prop_assert_eq!(length, bytes.len() - 1);
        prop_assert!(length <= 5);
    }

    #[test]
    fn i64_constants_round_trip(value in any::<i64>()) {
        let bytes = encode_int(MachineCell::I64, value);

        prop_assert_eq!(bytes[0], 0x42);
        let (decoded, length) = read_signed_leb128(&bytes[1..]);
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(length, bytes.len() - 1);
        prop_assert!(length <= 10);
    }

    #[test]
    fn local_slots_round_trip(slot in any::<u32>()) {
        let mut encoder = InstructionEncoder::new();
        encoder.write_local_get(slot);
        let bytes = encoder.into_bytes();

        prop_assert_eq!(bytes[0], 0x20);
        prop_assert_eq!(read_unsigned_leb128(&bytes[1..]), (u64::from(slot), bytes.len() - 1));
    }

    #[test]
    fn f64_constants_round_trip_bit_for_bit(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        let mut encoder = InstructionEncoder::new();
        encoder.push_const(MachineCell::F64, LiteralValue::Float(value));
        let bytes = encoder.into_bytes();

        prop_assert_eq!(bytes.len(), 9);
        prop_assert_eq!(bytes[0], 0x44);
        let mut payload = [0u8; 8];
        payload.copy_from_slice(&bytes[1..]);
        prop_assert_eq!(u64::from_le_bytes(payload), bits);
    }

    #[test]
    fn f32_constants_round_trip(value in any::<f32>().prop_filter("NaN payloads", |v| !v.is_nan())) {
        let mut encoder = InstructionEncoder::new();
        encoder.push_const(MachineCell::F32, LiteralValue::Float(f64::from(value)));
        let bytes = encoder.into_bytes();

        prop_assert_eq!(bytes[0], 0x43);
        let decoded = f32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        prop_assert_eq!(decoded.to_bits(), value.to_bits());
    }
}
