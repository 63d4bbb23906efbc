//! Numeric casts between machine cells.
//!
//! Signedness is only a compile time label, so a cast that stays in the same cell
//! (`i32` -> `u32`, `i64` -> `timespan`) emits nothing.
//! Every other pair of cells maps to exactly one conversion instruction.

use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::{MachineCell, Type};
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{codegen_log, return_compile_error};
use wasm_encoder::Instruction;

pub fn emit_cast(
    from: &Type,
    to: &Type,
    encoder: &mut InstructionEncoder,
    location: TextLocation,
) -> Result<(), CompileError> {
    let (Some(from_cell), Some(to_cell)) = (from.machine_cell(), to.machine_cell()) else {
        return_compile_error!(
            UnsupportedCast,
            format!("cannot cast {from} to {to}"),
            location,
            {
                CompilationStage => "Expression Codegen",
                PrimarySuggestion => "Only numeric and temporal types can be cast",
            }
        )
    };

    // Float sources pick the truncation variant from the destination,
    // everything else from the source
    let signed = if from_cell.is_float() {
        to.is_signed_integer()
    } else {
        from.is_signed_integer()
    };

    if let Some(instruction) = select_cast_instruction(from_cell, to_cell, signed) {
        codegen_log!("Cast ", from, " -> ", to);
        encoder.write_opcode(&instruction);
    }

    Ok(())
}

/// The single instruction converting a `from` cell into a `to` cell,
/// or None when both are the same cell.
///
/// `signed` is the signedness of the side that decides the variant:
/// the source for integer sources, the destination for float sources.
pub fn select_cast_instruction(
    from: MachineCell,
    to: MachineCell,
    signed: bool,
) -> Option<Instruction<'static>> {
    use MachineCell::{F32, F64, I32, I64};

    let instruction = match (from, to, signed) {
        (I32, I32, _) | (I64, I64, _) | (F32, F32, _) | (F64, F64, _) => return None,

        (I32, I64, true) => Instruction::I64ExtendI32S,
        (I32, I64, false) => Instruction::I64ExtendI32U,
        (I32, F32, true) => Instruction::F32ConvertI32S,
        (I32, F32, false) => Instruction::F32ConvertI32U,
        (I32, F64, true) => Instruction::F64ConvertI32S,
        (I32, F64, false) => Instruction::F64ConvertI32U,

        (I64, I32, _) => Instruction::I32WrapI64,
        (I64, F32, true) => Instruction::F32ConvertI64S,
        (I64, F32, false) => Instruction::F32ConvertI64U,
        (I64, F64, true) => Instruction::F64ConvertI64S,
        (I64, F64, false) => Instruction::F64ConvertI64U,

        (F32, I32, true) => Instruction::I32TruncF32S,
        (F32, I32, false) => Instruction::I32TruncF32U,
        (F32, I64, true) => Instruction::I64TruncF32S,
        (F32, I64, false) => Instruction::I64TruncF32U,
        (F32, F64, _) => Instruction::F64PromoteF32,

        (F64, I32, true) => Instruction::I32TruncF64S,
        (F64, I32, false) => Instruction::I32TruncF64U,
        (F64, I64, true) => Instruction::I64TruncF64S,
        (F64, I64, false) => Instruction::I64TruncF64U,
        (F64, F32, _) => Instruction::F32DemoteF64,
    };

    Some(instruction)
}
