//! Shared library modules providing error types, credential encoding, and telemetry initialization.

pub mod basic_auth;
pub mod errors;
pub mod telemetry;
