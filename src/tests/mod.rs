mod settings_tests;
