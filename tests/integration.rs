// Driver for integration tests under tests/integration/
// Keeps tests organized in a subdirectory while remaining visible to Cargo.
//
#[path = "integration/cli_gen_man.rs"]
mod cli_gen_man;
#[path = "integration/cli_end_to_end.rs"]
mod cli_end_to_end;
#[path = "integration/cli_errors.rs"]
mod cli_errors;
#[path = "integration/library_collection.rs"]
mod library_collection;
