use super::{CompiledExpression, ExpressionCompiler};
use crate::backends::host_function_registry::HostFunctionId;
use crate::backends::wasm::casts::emit_cast;
use crate::backends::wasm::instruction_encoder::InstructionEncoder;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::{MachineCell, Type};
use crate::compiler_frontend::parse_tree::{
    BuiltinCall, Expression, Literal, PostfixExpression, PostfixSuffix, PrimaryExpression,
};
use crate::compiler_frontend::scope::VariableScope;
use crate::compiler_frontend::tokenizer::literals::{
    LexedLiteral, lex_numeric_literal, lex_temporal_literal,
};
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{
    codegen_log, return_compile_error, return_not_implemented_error, return_structural_error,
    return_type_error,
};

impl<S: VariableScope + ?Sized> ExpressionCompiler<'_, S> {
    pub(crate) fn compile_postfix(
        &self,
        node: &PostfixExpression,
    ) -> Result<CompiledExpression, CompileError> {
        let Some(primary) = &node.primary else {
            return_structural_error!("postfix expression has no primary", node.location)
        };

        let mut compiled = self.compile_primary(primary)?;

        for suffix in &node.suffixes {
            compiled = match suffix {
                PostfixSuffix::Index { index, location } => {
                    self.compile_series_index(compiled, index, *location)?
                }

                PostfixSuffix::Slice {
                    start,
                    end,
                    location,
                } => self.compile_series_slice(
                    compiled,
                    start.as_deref(),
                    end.as_deref(),
                    *location,
                )?,

                PostfixSuffix::Call { location, .. } => {
                    return_not_implemented_error!(
                        format!("calling a value ({})", compiled.result_type),
                        *location
                    )
                }
            };
        }

        Ok(compiled)
    }

    /// `series[i]` lowers to `series_index_<element>(handle, i)`
    fn compile_series_index(
        &self,
        series: CompiledExpression,
        index: &Expression,
        location: TextLocation,
    ) -> Result<CompiledExpression, CompileError> {
        let Type::Series(element) = &series.result_type else {
            return_type_error!(
                format!(
                    "indexing is only supported on series types, found {}",
                    series.result_type
                ),
                location,
                {
                    CompilationStage => "Expression Codegen",
                    ExpectedType => "series",
                    FoundType => series.result_type.keyword(),
                }
            )
        };

        let mut encoder = InstructionEncoder::new();
        encoder.append(&series.bytes);
        self.emit_series_position(index, &mut encoder)?;

        let host_function = HostFunctionId::series_index_for(element);
        let Some(function_index) = host_function.and_then(|id| self.host_imports.index_of(id))
        else {
            return_not_implemented_error!(
                format!("indexing ({})", series.result_type),
                location
            )
        };
        encoder.write_call(function_index);

        codegen_log!("Series index into ", {&series.result_type});

        Ok(CompiledExpression::from_encoder(
            encoder,
            element.as_ref().to_owned(),
        ))
    }

    /// `series[start:end]` lowers to `series_slice(handle, start, end)`.
    /// A missing start is 0 and a missing end is -1, meaning "to the end".
    fn compile_series_slice(
        &self,
        series: CompiledExpression,
        start: Option<&Expression>,
        end: Option<&Expression>,
        location: TextLocation,
    ) -> Result<CompiledExpression, CompileError> {
        if !matches!(series.result_type, Type::Series(_)) {
            return_type_error!(
                format!(
                    "slicing is only supported on series types, found {}",
                    series.result_type
                ),
                location,
                {
                    CompilationStage => "Expression Codegen",
                    ExpectedType => "series",
                    FoundType => series.result_type.keyword(),
                }
            )
        }

        let mut encoder = InstructionEncoder::new();
        encoder.append(&series.bytes);

        match start {
            Some(start) => self.emit_series_position(start, &mut encoder)?,
            None => encoder.push_int_const(MachineCell::I32, 0),
        }

        match end {
            Some(end) => self.emit_series_position(end, &mut encoder)?,
            None => encoder.push_int_const(MachineCell::I32, -1),
        }

        let Some(function_index) = self.host_imports.index_of(HostFunctionId::SeriesSlice) else {
            return_not_implemented_error!(
                format!("slicing ({})", series.result_type),
                location
            )
        };
        encoder.write_call(function_index);

        Ok(CompiledExpression::from_encoder(encoder, series.result_type))
    }

    // Positions cross the host boundary as i32
    fn emit_series_position(
        &self,
        position: &Expression,
        encoder: &mut InstructionEncoder,
    ) -> Result<(), CompileError> {
        let compiled = self.compile_expression(position)?;

        if !compiled.result_type.is_integer() || compiled.result_type.is_temporal() {
            return_type_error!(
                format!(
                    "series positions must be integers, found {}",
                    compiled.result_type
                ),
                position.location,
                {
                    CompilationStage => "Expression Codegen",
                    ExpectedType => "integer",
                    FoundType => compiled.result_type.keyword(),
                }
            )
        }

        encoder.append(&compiled.bytes);
        emit_cast(&compiled.result_type, &Type::I32, encoder, position.location)
    }

    pub(crate) fn compile_primary(
        &self,
        node: &PrimaryExpression,
    ) -> Result<CompiledExpression, CompileError> {
        match node {
            PrimaryExpression::Literal(literal) => compile_literal(literal),

            PrimaryExpression::Identifier { name, location } => {
                self.compile_identifier(name, *location)
            }

            PrimaryExpression::Parenthesized { inner, location } => {
                let Some(inner) = inner else {
                    return_structural_error!("parentheses contain no expression", *location)
                };
                self.compile_expression(inner)
            }

            PrimaryExpression::TypeCast {
                target_type,
                expression,
                location,
            } => self.compile_type_cast(target_type, expression.as_deref(), *location),

            PrimaryExpression::Builtin(builtin) => self.compile_builtin(builtin),
        }
    }

    fn compile_identifier(
        &self,
        name: &str,
        location: TextLocation,
    ) -> Result<CompiledExpression, CompileError> {
        // Boolean literals reach the code generator as identifiers
        let boolean = match name {
            "true" => Some(1),
            "false" => Some(0),
            _ => None,
        };

        if let Some(value) = boolean {
            let mut encoder = InstructionEncoder::new();
            encoder.push_int_const(MachineCell::I32, value);
            return Ok(CompiledExpression::from_encoder(encoder, Type::U8));
        }

        let Some(symbol) = self.scope.lookup(name) else {
            return_compile_error!(
                UnresolvedIdentifier,
                format!("undefined variable '{name}'"),
                location,
                {
                    CompilationStage => "Expression Codegen",
                    PrimarySuggestion => "Declare the variable before using it in this function or task",
                    AlternativeSuggestion => "Pass the value in as a parameter",
                }
            )
        };

        codegen_log!("Local get ", name, " (slot ", {symbol.slot}, ")");

        let mut encoder = InstructionEncoder::new();
        encoder.write_local_get(symbol.slot);

        Ok(CompiledExpression::from_encoder(
            encoder,
            symbol.data_type.to_owned(),
        ))
    }

    fn compile_type_cast(
        &self,
        target_type: &str,
        expression: Option<&Expression>,
        location: TextLocation,
    ) -> Result<CompiledExpression, CompileError> {
        let Some(target) = Type::from_keyword(target_type) else {
            return_compile_error!(
                UnsupportedCast,
                format!("cannot cast to unknown type '{target_type}'"),
                location,
                {
                    CompilationStage => "Expression Codegen",
                }
            )
        };

        let Some(expression) = expression else {
            return_structural_error!(
                format!("cast to {target} has no expression to convert"),
                location
            )
        };

        let inner = self.compile_expression(expression)?;

        let mut encoder = InstructionEncoder::new();
        encoder.append(&inner.bytes);
        emit_cast(&inner.result_type, &target, &mut encoder, location)?;

        Ok(CompiledExpression::from_encoder(encoder, target))
    }

    fn compile_builtin(&self, builtin: &BuiltinCall) -> Result<CompiledExpression, CompileError> {
        match builtin {
            BuiltinCall::Now { location } => {
                let Some(function_index) = self.host_imports.index_of(HostFunctionId::Now) else {
                    return_not_implemented_error!("builtin now()", *location)
                };

                let mut encoder = InstructionEncoder::new();
                encoder.write_call(function_index);

                Ok(CompiledExpression::from_encoder(encoder, Type::TimeStamp))
            }

            BuiltinCall::Len { argument, location } => {
                let Some(argument) = argument else {
                    return_structural_error!("len() has no argument", *location)
                };

                let inner = self.compile_expression(argument)?;

                let (host_function, result_type) = match &inner.result_type {
                    Type::Series(_) => (HostFunctionId::SeriesLen, Type::I64),
                    Type::String => (HostFunctionId::StringLen, Type::I32),
                    other => {
                        return_type_error!(
                            format!("cannot take len of type {other}"),
                            *location,
                            {
                                CompilationStage => "Expression Codegen",
                                ExpectedType => "series or string",
                            }
                        )
                    }
                };

                let Some(function_index) = self.host_imports.index_of(host_function) else {
                    return_not_implemented_error!(
                        format!("builtin len() on {}", inner.result_type),
                        *location
                    )
                };

                let mut encoder = InstructionEncoder::new();
                encoder.append(&inner.bytes);
                encoder.write_call(function_index);

                Ok(CompiledExpression::from_encoder(encoder, result_type))
            }
        }
    }
}

fn compile_literal(literal: &Literal) -> Result<CompiledExpression, CompileError> {
    let LexedLiteral { value, data_type } = match literal {
        Literal::Numeric {
            kind,
            text,
            location,
        } => lex_numeric_literal(text, *kind, *location)?,

        Literal::Temporal { text, location } => lex_temporal_literal(text, *location)?,

        Literal::String { text, location } => {
            return_compile_error!(
                UnsupportedLiteral,
                format!("string literal \"{text}\" is not yet implemented"),
                *location,
                {
                    CompilationStage => "Expression Codegen",
                }
            )
        }

        Literal::Series { elements, location } => {
            return_compile_error!(
                UnsupportedLiteral,
                format!(
                    "series literal with {} elements is not yet implemented",
                    elements.len()
                ),
                *location,
                {
                    CompilationStage => "Expression Codegen",
                }
            )
        }
    };

    let Some(cell) = data_type.machine_cell() else {
        return_compile_error!(
            UnsupportedLiteral,
            format!("literal of type {data_type} can't be pushed as a constant"),
            literal.location()
        )
    };

    let mut encoder = InstructionEncoder::new();
    encoder.push_const(cell, value);

    Ok(CompiledExpression::from_encoder(encoder, data_type))
}
