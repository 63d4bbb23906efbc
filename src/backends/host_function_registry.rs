use crate::compiler_frontend::compiler_messages::compiler_errors::CompileError;
use crate::compiler_frontend::datatypes::Type;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display};
use wasm_encoder::ValType;

/// Module name every Slate runtime binding is imported from
pub const HOST_MODULE_NAME: &str = "env";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFunctionId {
    Now,
    MathPowF32,
    MathPowF64,
    MathPowU8,
    MathPowU16,
    MathPowU32,
    MathPowU64,
    MathPowI8,
    MathPowI16,
    MathPowI32,
    MathPowI64,
    SeriesLen,
    SeriesIndexU8,
    SeriesIndexU16,
    SeriesIndexU32,
    SeriesIndexU64,
    SeriesIndexI8,
    SeriesIndexI16,
    SeriesIndexI32,
    SeriesIndexI64,
    SeriesIndexF32,
    SeriesIndexF64,
    SeriesSlice,
    StringLen,
    StringConcat,
    StringEqual,
}

impl HostFunctionId {
    pub const ALL: [HostFunctionId; 26] = [
        HostFunctionId::Now,
        HostFunctionId::MathPowF32,
        HostFunctionId::MathPowF64,
        HostFunctionId::MathPowU8,
        HostFunctionId::MathPowU16,
        HostFunctionId::MathPowU32,
        HostFunctionId::MathPowU64,
        HostFunctionId::MathPowI8,
        HostFunctionId::MathPowI16,
        HostFunctionId::MathPowI32,
        HostFunctionId::MathPowI64,
        HostFunctionId::SeriesLen,
        HostFunctionId::SeriesIndexU8,
        HostFunctionId::SeriesIndexU16,
        HostFunctionId::SeriesIndexU32,
        HostFunctionId::SeriesIndexU64,
        HostFunctionId::SeriesIndexI8,
        HostFunctionId::SeriesIndexI16,
        HostFunctionId::SeriesIndexI32,
        HostFunctionId::SeriesIndexI64,
        HostFunctionId::SeriesIndexF32,
        HostFunctionId::SeriesIndexF64,
        HostFunctionId::SeriesSlice,
        HostFunctionId::StringLen,
        HostFunctionId::StringConcat,
        HostFunctionId::StringEqual,
    ];

    /// The `math_pow_*` binding for a base of this type.
    /// Temporal and non-numeric types have none.
    pub fn math_pow_for(base: &Type) -> Option<HostFunctionId> {
        let id = match base {
            Type::U8 => HostFunctionId::MathPowU8,
            Type::U16 => HostFunctionId::MathPowU16,
            Type::U32 => HostFunctionId::MathPowU32,
            Type::U64 => HostFunctionId::MathPowU64,
            Type::I8 => HostFunctionId::MathPowI8,
            Type::I16 => HostFunctionId::MathPowI16,
            Type::I32 => HostFunctionId::MathPowI32,
            Type::I64 => HostFunctionId::MathPowI64,
            Type::F32 => HostFunctionId::MathPowF32,
            Type::F64 => HostFunctionId::MathPowF64,
            _ => return None,
        };

        Some(id)
    }

    /// The `series_index_*` binding for a series of this element type
    pub fn series_index_for(element: &Type) -> Option<HostFunctionId> {
        let id = match element {
            Type::U8 => HostFunctionId::SeriesIndexU8,
            Type::U16 => HostFunctionId::SeriesIndexU16,
            Type::U32 => HostFunctionId::SeriesIndexU32,
            Type::U64 => HostFunctionId::SeriesIndexU64,
            Type::I8 => HostFunctionId::SeriesIndexI8,
            Type::I16 => HostFunctionId::SeriesIndexI16,
            Type::I32 => HostFunctionId::SeriesIndexI32,
            Type::I64 => HostFunctionId::SeriesIndexI64,
            Type::F32 => HostFunctionId::SeriesIndexF32,
            Type::F64 => HostFunctionId::SeriesIndexF64,
            _ => return None,
        };

        Some(id)
    }

    /// Export name of the function in the runtime's host module
    pub fn import_name(&self) -> &'static str {
        match self {
            HostFunctionId::Now => "now",
            HostFunctionId::MathPowF32 => "math_pow_f32",
            HostFunctionId::MathPowF64 => "math_pow_f64",
            HostFunctionId::MathPowU8 => "math_pow_u8",
            HostFunctionId::MathPowU16 => "math_pow_u16",
            HostFunctionId::MathPowU32 => "math_pow_u32",
            HostFunctionId::MathPowU64 => "math_pow_u64",
            HostFunctionId::MathPowI8 => "math_pow_i8",
            HostFunctionId::MathPowI16 => "math_pow_i16",
            HostFunctionId::MathPowI32 => "math_pow_i32",
            HostFunctionId::MathPowI64 => "math_pow_i64",
            HostFunctionId::SeriesLen => "series_len",
            HostFunctionId::SeriesIndexU8 => "series_index_u8",
            HostFunctionId::SeriesIndexU16 => "series_index_u16",
            HostFunctionId::SeriesIndexU32 => "series_index_u32",
            HostFunctionId::SeriesIndexU64 => "series_index_u64",
            HostFunctionId::SeriesIndexI8 => "series_index_i8",
            HostFunctionId::SeriesIndexI16 => "series_index_i16",
            HostFunctionId::SeriesIndexI32 => "series_index_i32",
            HostFunctionId::SeriesIndexI64 => "series_index_i64",
            HostFunctionId::SeriesIndexF32 => "series_index_f32",
            HostFunctionId::SeriesIndexF64 => "series_index_f64",
            HostFunctionId::SeriesSlice => "series_slice",
            HostFunctionId::StringLen => "string_len",
            HostFunctionId::StringConcat => "string_concat",
            HostFunctionId::StringEqual => "string_equal",
        }
    }

    pub fn from_import_name(name: &str) -> Option<HostFunctionId> {
        HostFunctionId::ALL
            .into_iter()
            .find(|id| id.import_name() == name)
    }

    pub fn signature(&self) -> HostSignature {
        use ValType::{F32, F64, I32, I64};

        let (params, results): (&[ValType], &[ValType]) = match self {
            HostFunctionId::Now => (&[], &[I64]),
            HostFunctionId::MathPowF32 => (&[F32, F32], &[F32]),
            HostFunctionId::MathPowF64 => (&[F64, F64], &[F64]),

            // Narrow integers travel in i32
            HostFunctionId::MathPowU8
            | HostFunctionId::MathPowU16
            | HostFunctionId::MathPowU32
            | HostFunctionId::MathPowI8
            | HostFunctionId::MathPowI16
            | HostFunctionId::MathPowI32 => (&[I32, I32], &[I32]),
            HostFunctionId::MathPowU64 | HostFunctionId::MathPowI64 => (&[I64, I64], &[I64]),

            HostFunctionId::SeriesLen => (&[I32], &[I64]),

            // (series handle, index) -> element
            HostFunctionId::SeriesIndexU8
            | HostFunctionId::SeriesIndexU16
            | HostFunctionId::SeriesIndexU32
            | HostFunctionId::SeriesIndexI8
            | HostFunctionId::SeriesIndexI16
            | HostFunctionId::SeriesIndexI32 => (&[I32, I32], &[I32]),
            HostFunctionId::SeriesIndexU64 | HostFunctionId::SeriesIndexI64 => {
                (&[I32, I32], &[I64])
            }
            HostFunctionId::SeriesIndexF32 => (&[I32, I32], &[F32]),
            HostFunctionId::SeriesIndexF64 => (&[I32, I32], &[F64]),

            // (series handle, start, end) -> new series handle, end -1 means "to the end"
            HostFunctionId::SeriesSlice => (&[I32, I32, I32], &[I32]),

            HostFunctionId::StringLen => (&[I32], &[I32]),
            HostFunctionId::StringConcat => (&[I32, I32], &[I32]),
            HostFunctionId::StringEqual => (&[I32, I32], &[I32]),
        };

        HostSignature {
            params: params.to_vec(),
            results: results.to_vec(),
        }
    }
}

impl Display for HostFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.import_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSignature {
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
}

// ======================================================
//                    REGISTRY
// ======================================================

/// Host functions imported by one compilation unit.
///
/// Import indices are handed out in registration order, which is also the order the
/// imports must appear in the module's import section.
/// An empty registry means no host calls can be emitted, every feature that needs one
/// reports itself as not yet implemented.
#[derive(Debug, Clone, Default)]
pub struct HostImports {
    indices: FxHashMap<HostFunctionId, u32>,
    ordered: Vec<HostFunctionId>,
}

impl HostImports {
    pub fn new() -> Self {
        HostImports::default()
    }

    /// Registers the import, returning its function index.
    /// Registering the same function twice returns the existing index.
    pub fn register(&mut self, id: HostFunctionId) -> u32 {
        if let Some(index) = self.indices.get(&id) {
            return *index;
        }

        let index = self.ordered.len() as u32;
        self.indices.insert(id, index);
        self.ordered.push(id);
        index
    }

    pub fn register_by_name(&mut self, name: &str) -> Result<u32, CompileError> {
        match HostFunctionId::from_import_name(name) {
            Some(id) => Ok(self.register(id)),
            None => Err(CompileError::new_config_error(format!(
                "unknown host import '{name}'"
            ))),
        }
    }

    pub fn index_of(&self, id: HostFunctionId) -> Option<u32> {
        self.indices.get(&id).copied()
    }

    pub fn len(&self) -> u32 {
        self.ordered.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HostFunctionId> + '_ {
        self.ordered.iter().copied()
    }
}
