pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod mcp;
pub mod run;
pub mod tools;

pub use error::{BridgeError, Result};
