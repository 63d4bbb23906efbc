use crate::compiler_frontend::datatypes::Type;
use rustc_hash::FxHashMap;
use wasm_encoder::ValType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Param,
}

/// What the code generator needs to know about a variable: where it lives and what it holds
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub slot: u32,
    pub data_type: Type,
    pub kind: SymbolKind,
}

/// Read-only name lookup over the variables visible to one compilation unit.
///
/// Slot indices only mean something inside the function or task they were assigned in.
pub trait VariableScope {
    fn lookup(&self, name: &str) -> Option<&Symbol>;
}

/// Variables of a single function or task body.
///
/// Parameters take the first slots and locals follow them, the same order
/// WebAssembly numbers a function's params and declared locals.
/// Every parameter has to be declared before the first local.
#[derive(Debug, Default, Clone)]
pub struct LocalScope {
    symbols: FxHashMap<String, Symbol>,
    slot_types: Vec<ValType>,
    param_count: u32,
}

impl LocalScope {
    pub fn new() -> LocalScope {
        LocalScope::default()
    }

    /// Returns the slot assigned to the parameter, or None when the type can't live in a local
    /// or a local has already been declared.
    pub fn declare_param(&mut self, name: impl Into<String>, data_type: Type) -> Option<u32> {
        if self.slot_types.len() as u32 != self.param_count {
            return None;
        }

        let slot = self.declare(name.into(), data_type, SymbolKind::Param)?;
        self.param_count += 1;
        Some(slot)
    }

    /// Returns the slot assigned to the local, or None when the type can't live in a local
    pub fn declare_local(&mut self, name: impl Into<String>, data_type: Type) -> Option<u32> {
        self.declare(name.into(), data_type, SymbolKind::Local)
    }

    fn declare(&mut self, name: String, data_type: Type, kind: SymbolKind) -> Option<u32> {
        let val_type = data_type.val_type()?;
        let slot = self.slot_types.len() as u32;

        self.slot_types.push(val_type);
        self.symbols.insert(
            name,
            Symbol {
                slot,
                data_type,
                kind,
            },
        );

        Some(slot)
    }

    pub fn param_types(&self) -> &[ValType] {
        &self.slot_types[..self.param_count as usize]
    }

    /// Declared locals in the run-length form a WASM function body expects
    pub fn local_declarations(&self) -> Vec<(u32, ValType)> {
        let mut declarations: Vec<(u32, ValType)> = Vec::new();

        for val_type in &self.slot_types[self.param_count as usize..] {
            match declarations.last_mut() {
                Some((count, last)) if last == val_type => *count += 1,
                _ => declarations.push((1, *val_type)),
            }
        }

        declarations
    }
}

impl VariableScope for LocalScope {
    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}
