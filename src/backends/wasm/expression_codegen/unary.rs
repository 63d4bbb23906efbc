use super::{CompiledExpression, ExpressionCompiler};
use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::backends::wasm::opcode_selection::{equals_zero, float_negate, multiply};
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::Type;
use crate::compiler_frontend::parse_tree::UnaryExpression;
use crate::compiler_frontend::scope::VariableScope;
use crate::{
    codegen_log, return_compile_error, return_not_implemented_error, return_structural_error,
    return_type_error,
};

impl<S: VariableScope + ?Sized> ExpressionCompiler<'_, S> {
    pub(crate) fn compile_unary(
        &self,
        node: &UnaryExpression,
    ) -> Result<CompiledExpression, CompileError> {
        match node {
            UnaryExpression::Postfix(postfix) => self.compile_postfix(postfix),

            UnaryExpression::Negate { operand, location } => {
                let Some(operand) = operand else {
                    return_structural_error!("unary minus has no operand", *location)
                };

                let inner = self.compile_unary(operand)?;
                let Some(cell) = inner.result_type.machine_cell() else {
                    return_compile_error!(
                        UnsupportedNegation,
                        format!("cannot negate type {}", inner.result_type),
                        *location,
                        {
                            CompilationStage => "Expression Codegen",
                            Operator => "-",
                            FoundType => inner.result_type.keyword(),
                        }
                    )
                };

                let mut encoder = InstructionEncoder::new();
                encoder.append(&inner.bytes);

                match float_negate(cell) {
                    Some(negate) => encoder.write_opcode(&negate),

                    // WASM has no integer negate, multiply by -1 instead
                    None => {
                        encoder.push_int_const(cell, -1);
                        encoder.write_opcode(&multiply(cell));
                    }
                }

                codegen_log!("Negate ", {&inner.result_type});

                Ok(CompiledExpression::from_encoder(encoder, inner.result_type))
            }

            UnaryExpression::Not { operand, location } => {
                let Some(operand) = operand else {
                    return_structural_error!("unary not has no operand", *location)
                };

                let inner = self.compile_unary(operand)?;
                let Some(cell) = inner.result_type.machine_cell() else {
                    return_type_error!(
                        format!("cannot apply '!' to type {}", inner.result_type),
                        *location,
                        {
                            CompilationStage => "Expression Codegen",
                            ExpectedType => "u8",
                            FoundType => inner.result_type.keyword(),
                            Operator => "!",
                        }
                    )
                };

                let mut encoder = InstructionEncoder::new();
                encoder.append(&inner.bytes);

                if cell.is_float() {
                    encoder.push_int_const(cell, 0);
                }
                encoder.write_opcode(&equals_zero(cell));

                Ok(CompiledExpression::from_encoder(encoder, Type::U8))
            }

            UnaryExpression::BlockingRead { channel, location } => {
                return_not_implemented_error!(
                    format!("blocking read from channel '{channel}'"),
                    *location
                )
            }
        }
    }
}
