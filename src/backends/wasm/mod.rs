//! # WASM Backend
//!
//! Lowers Slate expressions straight to WebAssembly instruction bytes.
//!
//! ```text
//! parse tree -> expression_codegen -> bytes + result type -> (validator)
//!                    |
//!                    +-- opcode_selection, casts
//!                    +-- instruction_encoder (wasm_encoder::Instruction)
//! ```
//!
//! - `instruction_encoder` is the only place bytes get written
//! - `opcode_selection` and `casts` are pure lookups from types to instructions
//! - `validator` wraps a compiled expression in a module and runs wasmparser over it

pub mod casts;
pub mod expression_codegen;
pub mod instruction_encoder;
pub mod opcode_selection;
pub mod validator;

#[cfg(test)]
mod tests;
