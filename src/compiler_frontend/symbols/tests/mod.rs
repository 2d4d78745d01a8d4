mod symbol_table_tests;
