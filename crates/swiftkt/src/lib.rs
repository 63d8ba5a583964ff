//! Command-line driver for `swiftkt-translate`.
//!
//! Everything that touches the file system lives here: reading dumps,
//! writing `.kt` files, loading layered configuration and deciding which
//! outputs are stale.

pub mod commands;
pub mod config;
pub mod labels;
pub mod staleness;
