mod property_tests;
mod query_compat_transformer_tests;
mod variable_bindings_tests;
