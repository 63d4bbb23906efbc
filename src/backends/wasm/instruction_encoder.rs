//! Instruction Encoder
//!
//! Append-only byte sink for a WebAssembly instruction stream.
//! Every write goes through `wasm_encoder::Instruction`, so constants come out as
//! minimal signed LEB128 (integers) or little-endian IEEE-754 (floats) and
//! local indices as unsigned LEB128, byte for byte what a WASM engine expects.
//!
//! Structured control flow can only be written through `write_if` / `write_if_else`.
//! Both take the arms as closures and close the block themselves,
//! so an `if` without its `end` (or with two `else`s) can't be expressed.

use crate::codegen_log;
use crate::compiler_frontend::datatypes::MachineCell;
use crate::compiler_frontend::tokenizer::literals::LiteralValue;
use wasm_encoder::{BlockType, Encode, Ieee32, Ieee64, Instruction};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstructionEncoder {
    bytes: Vec<u8>,
}

impl InstructionEncoder {
    pub fn new() -> Self {
        InstructionEncoder::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InstructionEncoder {
            bytes: Vec::with_capacity(capacity),
        }
    }

    // =========================================================================
    // Constants
    // Stack: [] -> [value]
    // =========================================================================

    /// Pushes a constant into the given cell.
    /// Integers headed for a float cell are converted, floats headed for an integer
    /// cell are truncated toward zero.
    pub fn push_const(&mut self, cell: MachineCell, value: LiteralValue) {
        let instruction = match (cell, value) {
            (MachineCell::I32, LiteralValue::Int(value)) => Instruction::I32Const(value as i32),
            (MachineCell::I32, LiteralValue::Float(value)) => Instruction::I32Const(value as i32),
            (MachineCell::I64, LiteralValue::Int(value)) => Instruction::I64Const(value),
            (MachineCell::I64, LiteralValue::Float(value)) => Instruction::I64Const(value as i64),
            (MachineCell::F32, LiteralValue::Int(value)) => {
                Instruction::F32Const(Ieee32::new((value as f32).to_bits()))
            }
            (MachineCell::F32, LiteralValue::Float(value)) => {
                Instruction::F32Const(Ieee32::new((value as f32).to_bits()))
            }
            (MachineCell::F64, LiteralValue::Int(value)) => {
                Instruction::F64Const(Ieee64::new((value as f64).to_bits()))
            }
            (MachineCell::F64, LiteralValue::Float(value)) => {
                Instruction::F64Const(Ieee64::new(value.to_bits()))
            }
        };

        self.write_opcode(&instruction);
    }

    pub fn push_int_const(&mut self, cell: MachineCell, value: i64) {
        self.push_const(cell, LiteralValue::Int(value));
    }

    // =========================================================================
    // Plain instructions (arithmetic, comparison, conversion, calls)
    // =========================================================================

    pub fn write_opcode(&mut self, instruction: &Instruction<'_>) {
        codegen_log!("Emitting ", #instruction);
        instruction.encode(&mut self.bytes);
    }

    pub fn write_call(&mut self, function_index: u32) {
        self.write_opcode(&Instruction::Call(function_index));
    }

    // =========================================================================
    // Local Variable Access
    // Stack: [] -> [value] for LocalGet
    // Stack: [value] -> [] for LocalSet
    // Stack: [value] -> [value] for LocalTee
    // =========================================================================

    pub fn write_local_get(&mut self, slot: u32) {
        self.write_opcode(&Instruction::LocalGet(slot));
    }

    pub fn write_local_set(&mut self, slot: u32) {
        self.write_opcode(&Instruction::LocalSet(slot));
    }

    pub fn write_local_tee(&mut self, slot: u32) {
        self.write_opcode(&Instruction::LocalTee(slot));
    }

    // =========================================================================
    // Structured Control Flow
    // =========================================================================

    /// `if <block_type> ... end`
    pub fn write_if(&mut self, block_type: BlockType, then_arm: impl FnOnce(&mut Self)) {
        self.write_opcode(&Instruction::If(block_type));
        then_arm(self);
        self.write_opcode(&Instruction::End);
    }

    /// `if <block_type> ... else ... end`
    pub fn write_if_else(
        &mut self,
        block_type: BlockType,
        then_arm: impl FnOnce(&mut Self),
        else_arm: impl FnOnce(&mut Self),
    ) {
        self.write_opcode(&Instruction::If(block_type));
        then_arm(self);
        self.write_opcode(&Instruction::Else);
        else_arm(self);
        self.write_opcode(&Instruction::End);
    }

    // =========================================================================
    // Buffer
    // =========================================================================

    /// Appends bytes that were already encoded by another encoder
    pub fn append(&mut self, encoded: &[u8]) {
        self.bytes.extend_from_slice(encoded);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
