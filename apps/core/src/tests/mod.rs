//! Test Module
//!
//! Cross-module suites for the EmoTwin backend. Unit tests live next to
//! their code.
//!
//! ## Test Categories
//! - `database_tests`: record store appends, ordering, concurrency, failures
//! - `api_tests`: HTTP contract of `/analyze`, `/chat` and `/health`
//! - `startup_tests`: state assembly from configuration

pub mod api_tests;
