// ABOUTME: Library root for projenv - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod naming;
pub mod orchestrate;
pub mod output;
pub mod routing;
pub mod runtime;
pub mod scaffold;
pub mod types;
