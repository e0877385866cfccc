//! Privscope Core - Types, message protocol, host traits, and error handling

pub mod classify;
pub mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod types;

pub use classify::{host_of, is_first_party_cookie, is_third_party};
pub use config::PrivscopeConfig;
pub use error::{Error, Result};
pub use host::*;
pub use protocol::*;
pub use types::*;
