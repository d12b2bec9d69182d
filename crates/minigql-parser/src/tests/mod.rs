mod graphql_parse_error_tests;
mod graphql_parser_error_tests;
mod graphql_parser_fuzz_tests;
mod utils;
