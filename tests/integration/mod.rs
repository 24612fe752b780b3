//! Integration tests for the gat storage engine

mod branch_switching;
mod cli_commands;
mod commit_history;
mod single_file_scenario;
mod snapshot_roundtrip;
mod test_utils;
