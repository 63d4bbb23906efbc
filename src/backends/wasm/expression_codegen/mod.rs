//! # Expression Codegen
//!
//! Walks the precedence layered parse tree of one expression and produces the
//! WASM instruction bytes that leave its value on the operand stack,
//! along with the Slate type that value has.
//!
//! Compilation is bottom-up. Every layer compiles its children into their own
//! `CompiledExpression`s first and only then builds its own bytes from them,
//! so an error anywhere in a subtree means no bytes at all are returned for it.
//! A layer with a single operand and no operator hands its child back untouched.
//!
//! ```text
//! logical-or -> logical-and -> equality -> relational -> additive
//!     -> multiplicative -> power -> unary -> postfix -> primary
//! ```
//!
//! `&&` and `||` have no instruction of their own. Both are lowered to an
//! `if (result i32)` block that only evaluates the right operand when it can still
//! change the result:
//!
//! ```text
//! a || b    a, normalize, if (i32)  i32.const 1               else  b, normalize  end
//! a && b    a, normalize, i32.eqz, if (i32)  i32.const 0      else  b, normalize  end
//! ```

mod binary_layers;
mod primary;
mod unary;


use crate::backends::host_function_registry::HostImports;
use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::backends::wasm::opcode_selection::not_equal;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::{MachineCell, Type};
use crate::compiler_frontend::parse_tree::{
    Expression, LogicalAndExpression, LogicalOrExpression,
};
use crate::compiler_frontend::scope::VariableScope;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{codegen_log, return_structural_error, return_type_error};
use wasm_encoder::{BlockType, Instruction, ValType};

/// Instruction bytes of a compiled subtree and the type of the value they leave on the stack
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    pub bytes: Vec<u8>,
    pub result_type: Type,
}

impl CompiledExpression {
    pub fn new(bytes: Vec<u8>, result_type: Type) -> Self {
        CompiledExpression { bytes, result_type }
    }

    fn from_encoder(encoder: InstructionEncoder, result_type: Type) -> Self {
        CompiledExpression {
            bytes: encoder.into_bytes(),
            result_type,
        }
    }
}

/// Compiles expressions against one variable scope and one set of host imports.
///
/// Holds no mutable state, so a single compiler can be shared between threads
/// as long as the scope can.
pub struct ExpressionCompiler<'a, S: VariableScope + ?Sized> {
    scope: &'a S,
    host_imports: &'a HostImports,
}

impl<'a, S: VariableScope + ?Sized> ExpressionCompiler<'a, S> {
    pub fn new(scope: &'a S, host_imports: &'a HostImports) -> Self {
        ExpressionCompiler {
            scope,
            host_imports,
        }
    }

    pub fn compile_expression(
        &self,
        expression: &Expression,
    ) -> Result<CompiledExpression, CompileError> {
        let Some(logical_or) = &expression.logical_or else {
            return_structural_error!("expression has no logical-or layer", expression.location)
        };

        let compiled = self.compile_logical_or(logical_or)?;

        codegen_log!("Compiled expression of type ", {&compiled.result_type});

        Ok(compiled)
    }

    // ---------------------------
    //        LOGICAL OR
    // ---------------------------
    pub(crate) fn compile_logical_or(
        &self,
        node: &LogicalOrExpression,
    ) -> Result<CompiledExpression, CompileError> {
        let Some((first, rest)) = node.operands.split_first() else {
            return_structural_error!("logical-or expression has no operands", node.location)
        };

        let first = self.compile_logical_and(first)?;
        if rest.is_empty() {
            return Ok(first);
        }

        let mut encoder = InstructionEncoder::new();
        encoder.append(&first.bytes);
        normalize_to_bool(&mut encoder, &first.result_type, node.location)?;

        for operand in rest {
            let next = self.compile_logical_and(operand)?;
            let next_bytes = normalized_bytes(next, operand.location)?;

            // Left side already true: the result is 1 without touching the right side
            encoder.write_if_else(
                BlockType::Result(ValType::I32),
                |then_arm| then_arm.push_int_const(MachineCell::I32, 1),
                |else_arm| else_arm.append(&next_bytes),
            );
        }

        Ok(CompiledExpression::from_encoder(encoder, Type::U8))
    }

    // ---------------------------
    //        LOGICAL AND
    // ---------------------------
    pub(crate) fn compile_logical_and(
        &self,
        node: &LogicalAndExpression,
    ) -> Result<CompiledExpression, CompileError> {
        let Some((first, rest)) = node.operands.split_first() else {
            return_structural_error!("logical-and expression has no operands", node.location)
        };

        let first = self.compile_equality(first)?;
        if rest.is_empty() {
            return Ok(first);
        }

        let mut encoder = InstructionEncoder::new();
        encoder.append(&first.bytes);
        normalize_to_bool(&mut encoder, &first.result_type, node.location)?;

        for operand in rest {
            let next = self.compile_equality(operand)?;
            let next_bytes = normalized_bytes(next, operand.location)?;

            // Left side false: the result is 0 without touching the right side
            encoder.write_opcode(&Instruction::I32Eqz);
            encoder.write_if_else(
                BlockType::Result(ValType::I32),
                |then_arm| then_arm.push_int_const(MachineCell::I32, 0),
                |else_arm| else_arm.append(&next_bytes),
            );
        }

        Ok(CompiledExpression::from_encoder(encoder, Type::U8))
    }
}

/// Turns the value on top of the stack into exactly 0 or 1 in an i32 cell
fn normalize_to_bool(
    encoder: &mut InstructionEncoder,
    data_type: &Type,
    location: TextLocation,
) -> Result<(), CompileError> {
    let Some(cell) = data_type.machine_cell() else {
        return_type_error!(
            format!("type {data_type} can't be used as a boolean"),
            location,
            {
                CompilationStage => "Expression Codegen",
                PrimarySuggestion => "Logical operators need numeric or u8 operands",
            }
        )
    };

    encoder.push_int_const(cell, 0);
    encoder.write_opcode(&not_equal(cell));

    Ok(())
}

fn normalized_bytes(
    operand: CompiledExpression,
    location: TextLocation,
) -> Result<Vec<u8>, CompileError> {
    let mut encoder = InstructionEncoder::with_capacity(operand.bytes.len() + 4);
    encoder.append(&operand.bytes);
    normalize_to_bool(&mut encoder, &operand.result_type, location)?;

    Ok(encoder.into_bytes())
}
