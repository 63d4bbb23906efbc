use crate::compiler_frontend::compiler_messages::compiler_errors::{
    CompileError, ErrorMetaDataKey, ErrorType, error_type_to_str,
};
use saying::say;

pub fn print_compile_errors(errors: &[CompileError], source: Option<&str>) {
    for err in errors {
        print_formatted_error(err, source);
    }
}

/// Prints the error for the language author.
/// When the source text of the compilation unit is available the offending line is shown
/// with a marker under the column the error starts at.
pub fn print_formatted_error(e: &CompileError, source: Option<&str>) {
    let line_number = e.location.start_pos.line_number.max(0) as usize;
    let column = e.location.start_pos.char_column.max(0) as usize;

    match e.error_type {
        ErrorType::Structural => {
            say!(Yellow "COMPILER BUG - ");
            say!(Dark Yellow "the expression tree handed to the code generator is malformed (not your fault)");
        }

        ErrorType::Config => {
            say!(Yellow "CONFIG FILE ISSUE - ");
            say!(e.msg);
            return;
        }

        ErrorType::WasmValidation => {
            say!(Yellow "COMPILER BUG - ");
            say!(Dark Yellow "generated WebAssembly failed validation (not your fault)");
        }

        ErrorType::NotImplemented => {
            say!(Yellow "Not supported yet");
        }

        _ => {
            let heading = error_type_to_str(&e.error_type);
            say!(Red heading);
        }
    }

    say!(Dark Magenta "Line ", Bright {line_number + 1});

    if let Some(line) = source.and_then(|src| src.lines().nth(line_number)) {
        say!(line);
        let marker = format!("{}^", " ".repeat(column));
        say!(Red marker);
    }

    say!(e.msg);

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Dark Yellow "help: ", suggestion);
    }
}
