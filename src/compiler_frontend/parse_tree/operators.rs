use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::Type;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::return_compile_error;
use std::fmt::{Display, Formatter};

/// Operator token exactly as the parser captured it between two operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorToken {
    pub text: String,
    pub location: TextLocation,
}

impl OperatorToken {
    pub fn new(text: impl Into<String>, location: TextLocation) -> Self {
        OperatorToken {
            text: text.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Exponent,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn from_token(token: &OperatorToken) -> Result<BinaryOperator, CompileError> {
        let operator = match token.text.as_str() {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Modulus,
            "^" => BinaryOperator::Exponent,
            "==" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            "<" => BinaryOperator::LessThan,
            ">" => BinaryOperator::GreaterThan,
            "<=" => BinaryOperator::LessThanOrEqual,
            ">=" => BinaryOperator::GreaterThanOrEqual,
            unknown => {
                return_compile_error!(
                    UnknownOperator,
                    format!("unknown operator '{unknown}'"),
                    token.location,
                    {
                        CompilationStage => "Expression Codegen",
                    }
                )
            }
        };

        Ok(operator)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::Exponent => "^",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::GreaterThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    /// Comparisons always produce the u8 boolean, everything else keeps the carrier type
    pub fn result_type(&self, carrier: &Type) -> Type {
        if self.is_comparison() {
            Type::U8
        } else {
            carrier.to_owned()
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
