#![cfg(test)]

use crate::compiler_frontend::compiler_messages::compiler_errors::{
    CompileError, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_frontend::compiler_messages::display_messages::print_compile_errors;
use crate::compiler_frontend::tokenizer::tokens::{CharPosition, TextLocation};
use crate::{return_not_implemented_error, return_structural_error, return_type_error};

fn location() -> TextLocation {
    TextLocation::new(
        CharPosition {
            line_number: 4,
            char_column: 7,
        },
        CharPosition {
            line_number: 4,
            char_column: 12,
        },
    )
}

fn structural() -> Result<(), CompileError> {
    return_structural_error!("additive expression has no operands", location())
}

fn not_implemented() -> Result<(), CompileError> {
    return_not_implemented_error!("operator ^ on i32", location())
}

fn type_error() -> Result<(), CompileError> {
    return_type_error!("cannot take len of type i32", location(), {
        FoundType => "i32",
    })
}

#[test]
fn display_leads_with_the_kind_and_one_based_position() {
    let error = CompileError::new("undefined variable 'x'", location(), ErrorType::UnresolvedIdentifier);

    assert_eq!(
        error.to_string(),
        "Unresolved Identifier at line 5, col 8: undefined variable 'x'"
    );
}

#[test]
fn macros_attach_kind_and_metadata() {
    let error = structural().unwrap_err();
    assert_eq!(error.error_type, ErrorType::Structural);
    assert_eq!(error.location, location());
    assert!(error.metadata.contains_key(&ErrorMetaDataKey::PrimarySuggestion));

    let error = not_implemented().unwrap_err();
    assert!(error.is_not_implemented());
    assert_eq!(error.msg, "operator ^ on i32 is not yet implemented");

    let error = type_error().unwrap_err();
    assert_eq!(error.error_type, ErrorType::Type);
    assert_eq!(error.metadata.get(&ErrorMetaDataKey::FoundType), Some(&"i32"));
}

#[test]
fn builders_replace_kind_and_location() {
    let error = CompileError::new_type_error("bad", TextLocation::default())
        .with_error_type(ErrorType::UnsupportedCast)
        .with_location(location());

    assert_eq!(error.error_type, ErrorType::UnsupportedCast);
    assert_eq!(error.location, location());

    let config = CompileError::new_config_error("unknown host import 'sqrt'");
    assert_eq!(config.error_type, ErrorType::Config);
    assert_eq!(config.location, TextLocation::default());
}

#[test]
fn json_diagnostics() {
    let mut error = CompileError::new_structural_error("power expression has no base", location());
    error.new_metadata_entry(ErrorMetaDataKey::CompilationStage, "Expression Codegen");

    let json = error.to_json();

    assert_eq!(json["type"], "Malformed Parse Tree");
    assert_eq!(json["message"], "power expression has no base");
    assert_eq!(json["line"], 5);
    assert_eq!(json["column"], 8);
    assert_eq!(json["metadata"]["CompilationStage"], "Expression Codegen");
}

#[test]
fn printing_handles_every_kind() {
    let source = "a\nb\nc\nd\n    reading + \"text\"\n";
    let errors = vec![
        structural().unwrap_err(),
        not_implemented().unwrap_err(),
        type_error().unwrap_err(),
        CompileError::new_config_error("invalid codegen settings"),
        CompileError::new("bad module", location(), ErrorType::WasmValidation),
    ];

    print_compile_errors(&errors, Some(source));
    print_compile_errors(&errors, None);
}
