mod fragment_cycles_tests;
mod validate_tests;
