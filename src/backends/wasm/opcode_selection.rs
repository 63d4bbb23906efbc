//! Opcode Selection
//!
//! Maps an operator and the carrier type of its operands onto one WASM instruction.
//! The instruction family comes from the type (float or integer, 32 or 64 bit) and,
//! for division, remainder and ordering comparisons, the signed or unsigned variant
//! comes from the type's signedness.

use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::{MachineCell, Type};
use crate::compiler_frontend::parse_tree::BinaryOperator;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{return_compile_error, return_not_implemented_error, return_type_error};
use wasm_encoder::Instruction;

pub fn select_binary_opcode(
    operator: BinaryOperator,
    carrier: &Type,
    location: TextLocation,
) -> Result<Instruction<'static>, CompileError> {
    // No instruction exists for ^ on any carrier, integer and float pow go through the host
    if operator == BinaryOperator::Exponent {
        return_not_implemented_error!(format!("operator ^ on {carrier}"), location)
    }

    if !carrier.is_numeric() {
        return_type_error!(
            format!("operator {operator} is not supported for type {carrier}"),
            location,
            {
                CompilationStage => "Expression Codegen",
                PrimarySuggestion => "Arithmetic and comparison operators need numeric operands",
                Operator => operator.symbol(),
                FoundType => carrier.keyword(),
            }
        )
    }

    let selected = if carrier.is_float() {
        float_opcode(operator, carrier.is_64_bit())
    } else {
        integer_opcode(operator, carrier.is_64_bit(), carrier.is_unsigned_integer())
    };

    match selected {
        Some(instruction) => Ok(instruction),

        None if operator == BinaryOperator::Modulus => {
            return_type_error!(
                format!("operator % is not supported for float type {carrier}"),
                location,
                {
                    CompilationStage => "Expression Codegen",
                    PrimarySuggestion => "Cast the operands to an integer type first",
                    Operator => operator.symbol(),
                    FoundType => carrier.keyword(),
                }
            )
        }

        None => return_compile_error!(
            UnknownOperator,
            format!("unknown operator '{operator}' for type {carrier}"),
            location,
            {
                CompilationStage => "Expression Codegen",
                Operator => operator.symbol(),
            }
        ),
    }
}

fn float_opcode(operator: BinaryOperator, wide: bool) -> Option<Instruction<'static>> {
    let instruction = match (operator, wide) {
        (BinaryOperator::Add, true) => Instruction::F64Add,
        (BinaryOperator::Subtract, true) => Instruction::F64Sub,
        (BinaryOperator::Multiply, true) => Instruction::F64Mul,
        (BinaryOperator::Divide, true) => Instruction::F64Div,
        (BinaryOperator::Equal, true) => Instruction::F64Eq,
        (BinaryOperator::NotEqual, true) => Instruction::F64Ne,
        (BinaryOperator::LessThan, true) => Instruction::F64Lt,
        (BinaryOperator::GreaterThan, true) => Instruction::F64Gt,
        (BinaryOperator::LessThanOrEqual, true) => Instruction::F64Le,
        (BinaryOperator::GreaterThanOrEqual, true) => Instruction::F64Ge,

        (BinaryOperator::Add, false) => Instruction::F32Add,
        (BinaryOperator::Subtract, false) => Instruction::F32Sub,
        (BinaryOperator::Multiply, false) => Instruction::F32Mul,
        (BinaryOperator::Divide, false) => Instruction::F32Div,
        (BinaryOperator::Equal, false) => Instruction::F32Eq,
        (BinaryOperator::NotEqual, false) => Instruction::F32Ne,
        (BinaryOperator::LessThan, false) => Instruction::F32Lt,
        (BinaryOperator::GreaterThan, false) => Instruction::F32Gt,
        (BinaryOperator::LessThanOrEqual, false) => Instruction::F32Le,
        (BinaryOperator::GreaterThanOrEqual, false) => Instruction::F32Ge,

        (BinaryOperator::Modulus | BinaryOperator::Exponent, _) => return None,
    };

    Some(instruction)
}

fn integer_opcode(
    operator: BinaryOperator,
    wide: bool,
    unsigned: bool,
) -> Option<Instruction<'static>> {
    let instruction = if wide {
        match (operator, unsigned) {
            (BinaryOperator::Add, _) => Instruction::I64Add,
            (BinaryOperator::Subtract, _) => Instruction::I64Sub,
            (BinaryOperator::Multiply, _) => Instruction::I64Mul,
            (BinaryOperator::Equal, _) => Instruction::I64Eq,
            (BinaryOperator::NotEqual, _) => Instruction::I64Ne,
            (BinaryOperator::Divide, true) => Instruction::I64DivU,
            (BinaryOperator::Divide, false) => Instruction::I64DivS,
            (BinaryOperator::Modulus, true) => Instruction::I64RemU,
            (BinaryOperator::Modulus, false) => Instruction::I64RemS,
            (BinaryOperator::LessThan, true) => Instruction::I64LtU,
            (BinaryOperator::LessThan, false) => Instruction::I64LtS,
            (BinaryOperator::GreaterThan, true) => Instruction::I64GtU,
            (BinaryOperator::GreaterThan, false) => Instruction::I64GtS,
            (BinaryOperator::LessThanOrEqual, true) => Instruction::I64LeU,
            (BinaryOperator::LessThanOrEqual, false) => Instruction::I64LeS,
            (BinaryOperator::GreaterThanOrEqual, true) => Instruction::I64GeU,
            (BinaryOperator::GreaterThanOrEqual, false) => Instruction::I64GeS,
            (BinaryOperator::Exponent, _) => return None,
        }
    } else {
        match (operator, unsigned) {
            (BinaryOperator::Add, _) => Instruction::I32Add,
            (BinaryOperator::Subtract, _) => Instruction::I32Sub,
            (BinaryOperator::Multiply, _) => Instruction::I32Mul,
            (BinaryOperator::Equal, _) => Instruction::I32Eq,
            (BinaryOperator::NotEqual, _) => Instruction::I32Ne,
            (BinaryOperator::Divide, true) => Instruction::I32DivU,
            (BinaryOperator::Divide, false) => Instruction::I32DivS,
            (BinaryOperator::Modulus, true) => Instruction::I32RemU,
            (BinaryOperator::Modulus, false) => Instruction::I32RemS,
            (BinaryOperator::LessThan, true) => Instruction::I32LtU,
            (BinaryOperator::LessThan, false) => Instruction::I32LtS,
            (BinaryOperator::GreaterThan, true) => Instruction::I32GtU,
            (BinaryOperator::GreaterThan, false) => Instruction::I32GtS,
            (BinaryOperator::LessThanOrEqual, true) => Instruction::I32LeU,
            (BinaryOperator::LessThanOrEqual, false) => Instruction::I32LeS,
            (BinaryOperator::GreaterThanOrEqual, true) => Instruction::I32GeU,
            (BinaryOperator::GreaterThanOrEqual, false) => Instruction::I32GeS,
            (BinaryOperator::Exponent, _) => return None,
        }
    };

    Some(instruction)
}

// -----------------------------------------------------------------------
// Single-purpose instructions the code generator synthesizes on its own
// -----------------------------------------------------------------------

/// Compares against zero of the same cell. Floats have no eqz instruction,
/// so for them the caller pushes a zero constant first and this returns `eq`.
pub fn equals_zero(cell: MachineCell) -> Instruction<'static> {
    match cell {
        MachineCell::I32 => Instruction::I32Eqz,
        MachineCell::I64 => Instruction::I64Eqz,
        MachineCell::F32 => Instruction::F32Eq,
        MachineCell::F64 => Instruction::F64Eq,
    }
}

pub fn not_equal(cell: MachineCell) -> Instruction<'static> {
    match cell {
        MachineCell::I32 => Instruction::I32Ne,
        MachineCell::I64 => Instruction::I64Ne,
        MachineCell::F32 => Instruction::F32Ne,
        MachineCell::F64 => Instruction::F64Ne,
    }
}

pub fn multiply(cell: MachineCell) -> Instruction<'static> {
    match cell {
        MachineCell::I32 => Instruction::I32Mul,
        MachineCell::I64 => Instruction::I64Mul,
        MachineCell::F32 => Instruction::F32Mul,
        MachineCell::F64 => Instruction::F64Mul,
    }
}

/// Only floats have a dedicated negate instruction
pub fn float_negate(cell: MachineCell) -> Option<Instruction<'static>> {
    match cell {
        MachineCell::F32 => Some(Instruction::F32Neg),
        MachineCell::F64 => Some(Instruction::F64Neg),
        MachineCell::I32 | MachineCell::I64 => None,
    }
}
