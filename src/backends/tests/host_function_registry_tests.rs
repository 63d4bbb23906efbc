#![cfg(test)]

use crate::backends::host_function_registry::{HostFunctionId, HostImports};
use crate::compiler_frontend::compiler_messages::compiler_errors::ErrorType;
use crate::compiler_frontend::datatypes::Type;
use wasm_encoder::ValType;

#[test]
fn indices_follow_registration_order() {
    let mut host_imports = HostImports::new();
    assert!(host_imports.is_empty());

    assert_eq!(host_imports.register(HostFunctionId::StringLen), 0);
    assert_eq!(host_imports.register(HostFunctionId::Now), 1);
    assert_eq!(host_imports.register(HostFunctionId::StringLen), 0);

    assert_eq!(host_imports.len(), 2);
    assert_eq!(host_imports.index_of(HostFunctionId::Now), Some(1));
    assert_eq!(host_imports.index_of(HostFunctionId::MathPowF64), None);
    assert_eq!(
        host_imports.iter().collect::<Vec<_>>(),
        [HostFunctionId::StringLen, HostFunctionId::Now]
    );
}

#[test]
fn registration_by_name() {
    let mut host_imports = HostImports::new();

    assert_eq!(host_imports.register_by_name("math_pow_f32"), Ok(0));
    assert_eq!(host_imports.index_of(HostFunctionId::MathPowF32), Some(0));

    let error = host_imports.register_by_name("math_sqrt").unwrap_err();
    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.contains("math_sqrt"));
    assert_eq!(host_imports.len(), 1);
}

#[test]
fn import_names_are_unique_and_resolvable() {
    for id in HostFunctionId::ALL {
        assert_eq!(HostFunctionId::from_import_name(id.import_name()), Some(id));
        assert_eq!(id.to_string(), id.import_name());
    }
}

#[test]
fn signatures_match_the_runtime_bindings() {
    let now = HostFunctionId::Now.signature();
    assert!(now.params.is_empty());
    assert_eq!(now.results, [ValType::I64]);

    let pow = HostFunctionId::MathPowF64.signature();
    assert_eq!(pow.params, [ValType::F64, ValType::F64]);
    assert_eq!(pow.results, [ValType::F64]);

    let series_len = HostFunctionId::SeriesLen.signature();
    assert_eq!(series_len.params, [ValType::I32]);
    assert_eq!(series_len.results, [ValType::I64]);

    for id in [HostFunctionId::StringConcat, HostFunctionId::StringEqual] {
        assert_eq!(id.signature().params, [ValType::I32, ValType::I32]);
        assert_eq!(id.signature().results, [ValType::I32]);
    }
}

#[test]
fn integer_pow_bindings_use_the_base_cell() {
    let narrow = HostFunctionId::MathPowU16.signature();
    assert_eq!(narrow.params, [ValType::I32, ValType::I32]);
    assert_eq!(narrow.results, [ValType::I32]);

    let wide = HostFunctionId::MathPowI64.signature();
    assert_eq!(wide.params, [ValType::I64, ValType::I64]);
    assert_eq!(wide.results, [ValType::I64]);

    assert_eq!(
        HostFunctionId::math_pow_for(&Type::U8),
        Some(HostFunctionId::MathPowU8)
    );
    assert_eq!(
        HostFunctionId::math_pow_for(&Type::F32),
        Some(HostFunctionId::MathPowF32)
    );
    assert_eq!(HostFunctionId::math_pow_for(&Type::TimeSpan), None);
    assert_eq!(HostFunctionId::math_pow_for(&Type::String), None);
}

#[test]
fn series_bindings_take_a_handle_and_return_the_element() {
    for element in Type::NUMERICS {
        let Some(id) = HostFunctionId::series_index_for(&element) else {
            panic!("series of {element} should have an index binding");
        };
        assert_eq!(id.import_name(), format!("series_index_{element}"));

        let signature = id.signature();
        assert_eq!(signature.params, [ValType::I32, ValType::I32]);
        assert_eq!(signature.results, [element.val_type().expect("numeric")]);
    }

    assert_eq!(HostFunctionId::series_index_for(&Type::String), None);

    let slice = HostFunctionId::SeriesSlice.signature();
    assert_eq!(slice.params, [ValType::I32, ValType::I32, ValType::I32]);
    assert_eq!(slice.results, [ValType::I32]);
}
