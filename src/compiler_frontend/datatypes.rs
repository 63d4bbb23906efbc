use std::fmt::{Display, Formatter};
use wasm_encoder::ValType;

/// The closed set of Slate value types.
///
/// `u8` doubles as the language's boolean representation.
/// Temporal values are signed 64-bit nanosecond counts.
/// Strings, series and channels are runtime handles and are never numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    TimeStamp,
    TimeSpan,
    Series(Box<Type>),
    Chan(Box<Type>),
    Function {
        params: Vec<Type>,
        return_type: Option<Box<Type>>,
    },
    Task {
        config: Vec<Type>,
        params: Vec<Type>,
        return_type: Option<Box<Type>>,
    },
}

/// Physical storage representation of a numeric value on the WASM operand stack.
///
/// Integers narrower than 32 bits live in an I32 cell.
/// Sign or zero extension only happens at cast boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineCell {
    I32,
    I64,
    F32,
    F64,
}

impl MachineCell {
    pub fn val_type(self) -> ValType {
        match self {
            MachineCell::I32 => ValType::I32,
            MachineCell::I64 => ValType::I64,
            MachineCell::F32 => ValType::F32,
            MachineCell::F64 => ValType::F64,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, MachineCell::F32 | MachineCell::F64)
    }
}

impl Display for MachineCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MachineCell::I32 => "i32",
            MachineCell::I64 => "i64",
            MachineCell::F32 => "f32",
            MachineCell::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

impl Type {
    /// The ten primitive numeric types, in the order the runtime binds them
    pub const NUMERICS: [Type; 10] = [
        Type::U8,
        Type::U16,
        Type::U32,
        Type::U64,
        Type::I8,
        Type::I16,
        Type::I32,
        Type::I64,
        Type::F32,
        Type::F64,
    ];

    /// Resolves a primitive type keyword (`i32`, `f64`, `timespan` ...).
    /// Composite types have no single keyword and return None.
    pub fn from_keyword(keyword: &str) -> Option<Type> {
        let data_type = match keyword {
            "u8" => Type::U8,
            "u16" => Type::U16,
            "u32" => Type::U32,
            "u64" => Type::U64,
            "i8" => Type::I8,
            "i16" => Type::I16,
            "i32" => Type::I32,
            "i64" => Type::I64,
            "f32" => Type::F32,
            "f64" => Type::F64,
            "string" => Type::String,
            "timestamp" => Type::TimeStamp,
            "timespan" => Type::TimeSpan,
            _ => return None,
        };

        Some(data_type)
    }

    /// Static name for error metadata. Composite types only give their outer keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Type::U8 => "u8",
            Type::U16 => "u16",
            Type::U32 => "u32",
            Type::U64 => "u64",
            Type::I8 => "i8",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F32 => "f32",
            Type::F64 => "f64",
            Type::String => "string",
            Type::TimeStamp => "timestamp",
            Type::TimeSpan => "timespan",
            Type::Series(_) => "series",
            Type::Chan(_) => "chan",
            Type::Function { .. } => "func",
            Type::Task { .. } => "task",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    pub fn is_64_bit(&self) -> bool {
        matches!(
            self,
            Type::U64 | Type::I64 | Type::F64 | Type::TimeStamp | Type::TimeSpan
        )
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::TimeStamp | Type::TimeSpan
        )
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(self, Type::U8 | Type::U16 | Type::U32 | Type::U64)
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::U8)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Type::TimeStamp | Type::TimeSpan)
    }

    /// Which of the four machine cells a numeric value occupies.
    /// Returns None for every non-numeric type, callers treat that as "not a number".
    pub fn machine_cell(&self) -> Option<MachineCell> {
        let cell = match self {
            Type::U8 | Type::U16 | Type::U32 | Type::I8 | Type::I16 | Type::I32 => {
                MachineCell::I32
            }
            Type::U64 | Type::I64 | Type::TimeStamp | Type::TimeSpan => MachineCell::I64,
            Type::F32 => MachineCell::F32,
            Type::F64 => MachineCell::F64,

            Type::String
            | Type::Series(_)
            | Type::Chan(_)
            | Type::Function { .. }
            | Type::Task { .. } => return None,
        };

        Some(cell)
    }

    /// The WASM value type used when this type is stored in a local.
    /// Strings, series and channels are 32-bit runtime handles.
    pub fn val_type(&self) -> Option<ValType> {
        match self {
            Type::String | Type::Series(_) | Type::Chan(_) => Some(ValType::I32),
            Type::Function { .. } | Type::Task { .. } => None,
            numeric => numeric.machine_cell().map(MachineCell::val_type),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::U8 => write!(f, "u8"),
            Type::U16 => write!(f, "u16"),
            Type::U32 => write!(f, "u32"),
            Type::U64 => write!(f, "u64"),
            Type::I8 => write!(f, "i8"),
            Type::I16 => write!(f, "i16"),
            Type::I32 => write!(f, "i32"),
            Type::I64 => write!(f, "i64"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
            Type::String => write!(f, "string"),
            Type::TimeStamp => write!(f, "timestamp"),
            Type::TimeSpan => write!(f, "timespan"),
            Type::Series(inner) => write!(f, "series {inner}"),
            Type::Chan(inner) => write!(f, "chan {inner}"),
            Type::Function {
                params,
                return_type,
            } => {
                write!(f, "func({})", join_types(params))?;
                if let Some(return_type) = return_type {
                    write!(f, " {return_type}")?;
                }
                Ok(())
            }
            Type::Task {
                config,
                params,
                return_type,
            } => {
                write!(f, "task{{{}}}({})", join_types(config), join_types(params))?;
                if let Some(return_type) = return_type {
                    write!(f, " {return_type}")?;
                }
                Ok(())
            }
        }
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
