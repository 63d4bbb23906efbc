use super::{CompiledExpression, ExpressionCompiler};
use crate::backends::host_function_registry::HostFunctionId;
use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::backends::wasm::opcode_selection::select_binary_opcode;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::Type;
use crate::compiler_frontend::parse_tree::{
    AdditiveExpression, BinaryOperator, EqualityExpression, MultiplicativeExpression,
    OperatorToken, PowerExpression, RelationalExpression,
};
use crate::compiler_frontend::scope::VariableScope;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{codegen_log, return_structural_error};
use wasm_encoder::Instruction;

impl<S: VariableScope + ?Sized> ExpressionCompiler<'_, S> {
    pub(crate) fn compile_equality(
        &self,
        node: &EqualityExpression,
    ) -> Result<CompiledExpression, CompileError> {
        self.fold_binary_layer(
            "equality",
            &node.operands,
            &node.operators,
            node.location,
            Self::compile_relational,
        )
    }

    pub(crate) fn compile_relational(
        &self,
        node: &RelationalExpression,
    ) -> Result<CompiledExpression, CompileError> {
        self.fold_binary_layer(
            "relational",
            &node.operands,
            &node.operators,
            node.location,
            Self::compile_additive,
        )
    }

    pub(crate) fn compile_additive(
        &self,
        node: &AdditiveExpression,
    ) -> Result<CompiledExpression, CompileError> {
        self.fold_binary_layer(
            "additive",
            &node.operands,
            &node.operators,
            node.location,
            Self::compile_multiplicative,
        )
    }

    pub(crate) fn compile_multiplicative(
        &self,
        node: &MultiplicativeExpression,
    ) -> Result<CompiledExpression, CompileError> {
        self.fold_binary_layer(
            "multiplicative",
            &node.operands,
            &node.operators,
            node.location,
            Self::compile_power,
        )
    }

    /// `base ^ exponent`
    ///
    /// Only floats can be raised to a power, and only through the host's pow import.
    pub(crate) fn compile_power(
        &self,
        node: &PowerExpression,
    ) -> Result<CompiledExpression, CompileError> {
        let Some(base) = &node.base else {
            return_structural_error!("power expression has no base", node.location)
        };

        let base = self.compile_unary(base)?;
        let Some(exponent) = &node.exponent else {
            return Ok(base);
        };

        let exponent = self.compile_power(exponent)?;

        let mut encoder = InstructionEncoder::new();
        encoder.append(&base.bytes);
        encoder.append(&exponent.bytes);

        let result_type = self.emit_binary_operator(
            BinaryOperator::Exponent,
            &base.result_type,
            &mut encoder,
            node.location,
        )?;

        Ok(CompiledExpression::from_encoder(encoder, result_type))
    }

    /// Compiles every operand left to right and folds them pairwise:
    /// `a - b - c` is `(a - b) - c`.
    ///
    /// The left side of each pair is the carrier type the opcode is selected for.
    fn fold_binary_layer<T>(
        &self,
        layer_name: &str,
        operands: &[T],
        operators: &[OperatorToken],
        location: TextLocation,
        compile_operand: impl Fn(&Self, &T) -> Result<CompiledExpression, CompileError>,
    ) -> Result<CompiledExpression, CompileError> {
        let Some((first, rest)) = operands.split_first() else {
            return_structural_error!(format!("{layer_name} expression has no operands"), location)
        };

        if operators.len() != rest.len() {
            return_structural_error!(
                format!(
                    "{layer_name} expression has {} operands but {} operators",
                    operands.len(),
                    operators.len()
                ),
                location
            )
        }

        let first = compile_operand(self, first)?;
        if rest.is_empty() {
            return Ok(first);
        }

        let mut encoder = InstructionEncoder::new();
        encoder.append(&first.bytes);
        let mut carrier = first.result_type;

        for (token, operand) in operators.iter().zip(rest) {
            let operator = BinaryOperator::from_token(token)?;
            let right = compile_operand(self, operand)?;

            encoder.append(&right.bytes);
            carrier = self.emit_binary_operator(operator, &carrier, &mut encoder, token.location)?;
        }

        Ok(CompiledExpression::from_encoder(encoder, carrier))
    }

    /// Emits the instruction (or host call) for one operator,
    /// with both operands already on the stack. Returns the type of the result.
    fn emit_binary_operator(
        &self,
        operator: BinaryOperator,
        carrier: &Type,
        encoder: &mut InstructionEncoder,
        location: TextLocation,
    ) -> Result<Type, CompileError> {
        if let Some(result_type) = self.emit_host_operator(operator, carrier, encoder) {
            return Ok(result_type);
        }

        let instruction = select_binary_opcode(operator, carrier, location)?;
        codegen_log!("Binary ", {operator.symbol()}, " on ", carrier);
        encoder.write_opcode(&instruction);

        Ok(operator.result_type(carrier))
    }

    /// Operators that lower to a host call when the unit imports it.
    /// Returns None when the operator has no host lowering for this carrier
    /// or the import isn't registered.
    fn emit_host_operator(
        &self,
        operator: BinaryOperator,
        carrier: &Type,
        encoder: &mut InstructionEncoder,
    ) -> Option<Type> {
        let (host_function, result_type) = match (operator, carrier) {
            (BinaryOperator::Exponent, base) => {
                (HostFunctionId::math_pow_for(base)?, base.to_owned())
            }
            (BinaryOperator::Add, Type::String) => (HostFunctionId::StringConcat, Type::String),
            (BinaryOperator::Equal | BinaryOperator::NotEqual, Type::String) => {
                (HostFunctionId::StringEqual, Type::U8)
            }
            _ => return None,
        };

        let function_index = self.host_imports.index_of(host_function)?;
        codegen_log!("Host call ", host_function, " for ", {operator.symbol()});
        encoder.write_call(function_index);

        if operator == BinaryOperator::NotEqual {
            encoder.write_opcode(&Instruction::I32Eqz);
        }

        Some(result_type)
    }
}
