//! HTTP API module.
//!
//! Read-only JSON endpoints over the loaded catalogue, plus the log stream.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
