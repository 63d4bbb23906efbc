//! # Slate
//!
//! Expression code generator for the Slate language.
//! Takes an already parsed expression, split into its precedence layers, and emits the
//! WebAssembly instructions that compute it along with the Slate type of the result.
//!
//! ```text
//! parse tree + scope -> SlateCompiler -> bytes, result type
//! ```

pub mod backends {
    pub mod host_function_registry;
    pub mod wasm;

    #[cfg(test)]
    mod tests;
}

pub mod compiler_frontend {
    pub mod compiler_messages {
        pub mod compiler_dev_logging;
        pub mod compiler_errors;
        pub mod display_messages;

        #[cfg(test)]
        mod tests;
    }
    pub mod datatypes;
    pub mod parse_tree;
    pub mod scope;
    pub mod tokenizer {
        pub mod literals;
        pub mod tokens;

        #[cfg(test)]
        mod tests;
    }

    #[cfg(test)]
    mod tests;
}

pub mod settings;

#[cfg(test)]
mod tests;

use crate::backends::host_function_registry::HostImports;
use crate::backends::wasm::expression_codegen::{CompiledExpression, ExpressionCompiler};
use crate::backends::wasm::validator::validate_expression;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::parse_tree::Expression;
use crate::compiler_frontend::scope::{LocalScope, VariableScope};
use crate::settings::CodegenSettings;
use rayon::prelude::*;
use std::time::Instant;

/// Entry point for compiling expressions of one compilation unit.
///
/// Owns the unit's settings and host import table. Every call compiles into fresh
/// buffers, so one compiler can serve any number of expressions, in parallel if needed.
#[derive(Debug, Clone, Default)]
pub struct SlateCompiler {
    settings: CodegenSettings,
    host_imports: HostImports,
}

impl SlateCompiler {
    /// Builds the host import table from the settings.
    /// Fails when the settings name a host function the runtime doesn't provide.
    pub fn new(settings: CodegenSettings) -> Result<SlateCompiler, CompileError> {
        let host_imports = settings.host_import_table()?;

        Ok(SlateCompiler {
            settings,
            host_imports,
        })
    }

    pub fn with_host_imports(settings: CodegenSettings, host_imports: HostImports) -> Self {
        SlateCompiler {
            settings,
            host_imports,
        }
    }

    pub fn settings(&self) -> &CodegenSettings {
        &self.settings
    }

    pub fn host_imports(&self) -> &HostImports {
        &self.host_imports
    }

    /// An expression compiler over any scope implementation.
    /// Output validation needs a `LocalScope` and is skipped on this path.
    pub fn expression_compiler<'a, S: VariableScope + ?Sized>(
        &'a self,
        scope: &'a S,
    ) -> ExpressionCompiler<'a, S> {
        ExpressionCompiler::new(scope, &self.host_imports)
    }

    pub fn compile_expression(
        &self,
        expression: &Expression,
        scope: &LocalScope,
    ) -> Result<CompiledExpression, CompileError> {
        let compiled = self
            .expression_compiler(scope)
            .compile_expression(expression)?;

        if self.settings.validate_output {
            validate_expression(&compiled, scope, &self.host_imports, expression.location)?;
        }

        Ok(compiled)
    }

    /// Compiles independent expressions in parallel.
    /// Results come back in the same order as the input.
    pub fn compile_batch(
        &self,
        expressions: &[Expression],
        scope: &LocalScope,
    ) -> Vec<Result<CompiledExpression, CompileError>> {
        let time = Instant::now();

        let results: Vec<Result<CompiledExpression, CompileError>> = expressions
            .par_iter()
            .map(|expression| self.compile_expression(expression, scope))
            .collect();

        timer_log!(time, "Expression batch compiled in: ");

        results
    }
}
