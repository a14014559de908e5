mod entry_test;
