mod host_function_registry_tests;
