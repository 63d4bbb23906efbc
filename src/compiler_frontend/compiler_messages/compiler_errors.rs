use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorMetaDataKey {
    CompilationStage,

    // Optional suggestions
    PrimarySuggestion,     // One-line fix or top-level idea
    AlternativeSuggestion, // Secondary alternative

    // Data type information
    ExpectedType,
    FoundType,
    Operator,
}

/// Every error the expression compiler can produce.
///
/// Compilation stops at the first error. No bytecode is ever returned alongside one,
/// so the message has to carry everything the language user needs to fix the code:
/// the offending operator, type name or literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub msg: String,
    pub location: TextLocation,
    pub error_type: ErrorType,

    // Structured context for tooling (LSP, JSON diagnostics)
    pub metadata: HashMap<ErrorMetaDataKey, &'static str>,
}

impl CompileError {
    pub fn new(
        msg: impl Into<String>,
        location: TextLocation,
        error_type: ErrorType,
    ) -> CompileError {
        CompileError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    pub fn with_location(mut self, location: TextLocation) -> Self {
        self.location = location;
        self
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: &'static str) {
        self.metadata.insert(key, value);
    }

    /// Create a structural error (the parse tree handed to the compiler is malformed)
    pub fn new_structural_error(msg: impl Into<String>, location: TextLocation) -> Self {
        CompileError::new(msg, location, ErrorType::Structural)
    }

    /// Create a type error with type information
    pub fn new_type_error(msg: impl Into<String>, location: TextLocation) -> Self {
        CompileError::new(msg, location, ErrorType::Type)
    }

    /// Create a config error, settings are not tied to a source location
    pub fn new_config_error(msg: impl Into<String>) -> Self {
        CompileError::new(msg, TextLocation::default(), ErrorType::Config)
    }

    pub fn is_not_implemented(&self) -> bool {
        self.error_type == ErrorType::NotImplemented
    }

    pub fn to_json(&self) -> serde_json::Value {
        let metadata: HashMap<String, &'static str> = self
            .metadata
            .iter()
            .map(|(key, value)| (format!("{:?}", key), *value))
            .collect();

        serde_json::json!({
            "type": error_type_to_str(&self.error_type),
            "message": self.msg,
            "line": self.location.start_pos.line_number + 1,
            "column": self.location.start_pos.char_column + 1,
            "metadata": metadata,
        })
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}: {}",
            error_type_to_str(&self.error_type),
            self.location,
            self.msg
        )
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    // A required child node was missing or the operand/operator lists don't line up.
    // This is a bug in whatever produced the parse tree.
    Structural,
    UnresolvedIdentifier,
    MalformedLiteral,
    UnsupportedLiteral,
    UnknownOperator,
    Type,
    UnsupportedCast,
    UnsupportedNegation,
    NotImplemented,
    Config,
    WasmValidation,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Structural => "Malformed Parse Tree",
        ErrorType::UnresolvedIdentifier => "Unresolved Identifier",
        ErrorType::MalformedLiteral => "Malformed Literal",
        ErrorType::UnsupportedLiteral => "Unsupported Literal",
        ErrorType::UnknownOperator => "Unknown Operator",
        ErrorType::Type => "Type Error",
        ErrorType::UnsupportedCast => "Unsupported Cast",
        ErrorType::UnsupportedNegation => "Unsupported Negation",
        ErrorType::NotImplemented => "Not Implemented",
        ErrorType::Config => "Malformed Config",
        ErrorType::WasmValidation => "WASM Validation",
    }
}

/// Returns a new CompileError of the given ErrorType.
///
/// Usage:
/// `return_compile_error!(UnknownOperator, format!("unknown operator '{}'", text), location, {
///     CompilationStage => "Expression Codegen",
/// })`;
#[macro_export]
macro_rules! return_compile_error {
    ($error_type:ident, $msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_messages::compiler_errors::CompileError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType::$error_type,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_messages::compiler_errors::ErrorMetaDataKey::$key, $value); )*
                map
            },
        })
    };
    ($error_type:ident, $msg:expr, $location:expr) => {
        return Err($crate::compiler_frontend::compiler_messages::compiler_errors::CompileError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType::$error_type,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompileError for a missing or inconsistent parse tree node.
///
/// Structural errors mean the parser handed over a tree that breaks the layer contract.
///
/// Usage: `return_structural_error!("additive expression has no operands", location)`;
#[macro_export]
macro_rules! return_structural_error {
    ($msg:expr, $location:expr) => {
        $crate::return_compile_error!(Structural, $msg, $location, {
            CompilationStage => "Expression Codegen",
            PrimarySuggestion => "This is a parser bug, the expression tree is missing a required node",
        })
    };
}

/// Returns a new CompileError for type system violations.
///
/// Usage:
/// `return_type_error!("cannot take len of i32", location, { FoundType => "i32" })`;
#[macro_export]
macro_rules! return_type_error {
    ($msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        $crate::return_compile_error!(Type, $msg, $location, { $( $key => $value ),* })
    };
    ($msg:expr, $location:expr) => {
        $crate::return_compile_error!(Type, $msg, $location)
    };
}

/// Returns a new CompileError for features the code generator deliberately defers.
///
/// The message always contains "not yet implemented" so tooling can match on it.
///
/// Usage: `return_not_implemented_error!("operator ^", location)`;
#[macro_export]
macro_rules! return_not_implemented_error {
    ($feature:expr, $location:expr) => {
        $crate::return_compile_error!(
            NotImplemented,
            format!("{} is not yet implemented", $feature),
            $location,
            {
                CompilationStage => "Expression Codegen",
                PrimarySuggestion => "This needs host function support that is not wired up yet",
            }
        )
    };
}
