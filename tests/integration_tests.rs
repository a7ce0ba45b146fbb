//! Integration tests entry point
//!
//! Pulls in every module under integration/ as one test binary.

mod integration;
