//! CLI command implementations
//!
//! Every command returns a process exit code:
//! `0` success, `1` completed with errors, `2` configuration error,
//! `5` fatal error, `130` interrupted.

pub mod anonymize;
pub mod evaluate;
pub mod export;
pub mod init;
pub mod validate;
