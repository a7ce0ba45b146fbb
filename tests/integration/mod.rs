//! Integration tests for shell routing, guest messaging and the CLI

mod cli_binary;
mod hash_routing;
mod host_guest;
mod test_utils;
