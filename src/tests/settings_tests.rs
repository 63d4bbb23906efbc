#![cfg(test)]

use crate::backends::host_function_registry::HostFunctionId;
use crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType;
use crate::settings::{CodegenSettings, SETTINGS_FILE_NAME};
use std::fs;

#[test]
fn empty_settings_are_the_defaults() {
    let settings = CodegenSettings::from_toml_str("").expect("empty settings should parse");

    assert_eq!(settings, CodegenSettings::default());
    assert!(!settings.validate_output);
    assert!(settings.host_imports.is_empty());
}

#[test]
fn parses_every_field() {
    let settings = CodegenSettings::from_toml_str(
        r#"
        validate_output = true
        host_imports = ["now", "series_len"]
        "#,
    )
    .expect("settings should parse");

    assert!(settings.validate_output);
    assert_eq!(settings.host_imports, ["now", "series_len"]);

    let host_imports = settings
        .host_import_table()
        .expect("known host imports");
    assert_eq!(host_imports.index_of(HostFunctionId::Now), Some(0));
    assert_eq!(host_imports.index_of(HostFunctionId::SeriesLen), Some(1));
}

#[test]
fn unknown_fields_are_config_errors() {
    let error = CodegenSettings::from_toml_str("optimise = true").unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.starts_with("invalid codegen settings"));

    let error = CodegenSettings::from_toml_str("validate_output = \"yes\"").unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
}

#[test]
fn unknown_host_imports_are_config_errors() {
    let settings = CodegenSettings {
        validate_output: false,
        host_imports: vec!["now".to_string(), "print".to_string()],
    };

    let error = settings.host_import_table().unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.contains("'print'"));
}

#[test]
fn loads_from_a_directory() {
    let dir = tempfile::tempdir().expect("temp dir");

    let settings = CodegenSettings::load_from_dir(dir.path()).expect("missing file is fine");
    assert_eq!(settings, CodegenSettings::default());

    fs::write(
        dir.path().join(SETTINGS_FILE_NAME),
        "validate_output = true\nhost_imports = [\"string_len\"]\n",
    )
    .expect("write settings");

    let settings = CodegenSettings::load_from_dir(dir.path()).expect("settings should load");
    assert!(settings.validate_output);
    assert_eq!(settings.host_imports, ["string_len"]);
}

#[test]
fn unreadable_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");

    let error = CodegenSettings::load(&dir.path().join("missing.toml")).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.contains("missing.toml"));
}
