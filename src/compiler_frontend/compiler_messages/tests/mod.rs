mod compiler_errors_tests;
