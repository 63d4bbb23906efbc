//! WASM Output Validation
//!
//! Compiled expression bytes are only an instruction sequence, which wasmparser can't check
//! on its own. They are wrapped as the body of a throwaway function instead:
//!
//! - params and locals come from the scope the expression was compiled against
//! - the result is the value type of the expression
//! - every registered host function is imported from the `env` module, in index order
//!
//! The resulting module is then validated in full.

use crate::backends::host_function_registry::{HOST_MODULE_NAME, HostImports};
use crate::backends::wasm::expression_codegen::CompiledExpression;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::scope::LocalScope;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{codegen_log, return_compile_error};
use wasm_encoder::{
    CodeSection, EntityType, Function, FunctionSection, ImportSection, Instruction, Module,
    TypeSection,
};

/// Validates the compiled expression as the body of a function over `scope`.
pub fn validate_expression(
    compiled: &CompiledExpression,
    scope: &LocalScope,
    host_imports: &HostImports,
    location: TextLocation,
) -> Result<(), CompileError> {
    let module_bytes = build_expression_module(compiled, scope, host_imports, location)?;

    match wasmparser::validate(&module_bytes) {
        Ok(_) => {
            codegen_log!("Validated expression module (", {module_bytes.len()}, " bytes)");
            Ok(())
        }
        Err(error) => {
            return_compile_error!(
                WasmValidation,
                format!(
                    "generated code failed validation at offset {}: {}",
                    error.offset(),
                    error.message()
                ),
                location,
                {
                    CompilationStage => "WASM Validation",
                    PrimarySuggestion => "The code generator produced an invalid instruction sequence for this expression",
                }
            )
        }
    }
}

/// Builds the module that `validate_expression` checks.
/// The expression's function comes after the imports, at index `host_imports.len()`.
pub fn build_expression_module(
    compiled: &CompiledExpression,
    scope: &LocalScope,
    host_imports: &HostImports,
    location: TextLocation,
) -> Result<Vec<u8>, CompileError> {
    let Some(result_type) = compiled.result_type.val_type() else {
        return_compile_error!(
            WasmValidation,
            format!(
                "expression of type {} has no WASM value type",
                compiled.result_type
            ),
            location
        )
    };

    let mut module = Module::new();

    // One type per import, then the expression's own signature
    let mut types = TypeSection::new();
    for host_function in host_imports.iter() {
        let signature = host_function.signature();
        types.ty().function(signature.params, signature.results);
    }
    types
        .ty()
        .function(scope.param_types().to_vec(), vec![result_type]);
    module.section(&types);

    if !host_imports.is_empty() {
        let mut imports = ImportSection::new();
        for (type_index, host_function) in host_imports.iter().enumerate() {
            imports.import(
                HOST_MODULE_NAME,
                host_function.import_name(),
                EntityType::Function(type_index as u32),
            );
        }
        module.section(&imports);
    }

    let mut functions = FunctionSection::new();
    functions.function(host_imports.len());
    module.section(&functions);

    let mut function = Function::new(scope.local_declarations());
    function.raw(compiled.bytes.iter().copied());
    function.instruction(&Instruction::End);

    let mut code = CodeSection::new();
    code.function(&function);
    module.section(&code);

    Ok(module.finish())
}
