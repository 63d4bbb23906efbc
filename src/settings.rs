use crate::backends::host_function_registry::HostImports;
use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE_NAME: &str = "slate.toml";

/// Settings for one compilation unit, read from a `slate.toml` file or built directly.
///
/// ```toml
/// validate_output = true
/// host_imports = ["now", "math_pow_f64"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenSettings {
    /// Run wasmparser over every compiled expression
    pub validate_output: bool,

    /// Host functions the unit imports, in import index order
    pub host_imports: Vec<String>,
}

impl CodegenSettings {
    pub fn from_toml_str(source: &str) -> Result<CodegenSettings, CompileError> {
        match toml::from_str::<CodegenSettings>(source) {
            Ok(settings) => Ok(settings),
            Err(error) => Err(CompileError::new_config_error(format!(
                "invalid codegen settings: {}",
                error.message()
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<CodegenSettings, CompileError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                return Err(CompileError::new_config_error(format!(
                    "could not read settings file {}: {error}",
                    path.display()
                )));
            }
        };

        CodegenSettings::from_toml_str(&source)
    }

    /// Loads `slate.toml` from the directory, falling back to the defaults when there isn't one
    pub fn load_from_dir(dir: &Path) -> Result<CodegenSettings, CompileError> {
        let path = dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return Ok(CodegenSettings::default());
        }

        CodegenSettings::load(&path)
    }

    /// Registers every configured host import. Fails on the first unknown name.
    pub fn host_import_table(&self) -> Result<HostImports, CompileError> {
        let mut host_imports = HostImports::new();
        for name in &self.host_imports {
            host_imports.register_by_name(name)?;
        }

        Ok(host_imports)
    }
}
