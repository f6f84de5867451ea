//! Line-oriented TCP server: every client gets its own session that answers
//! newline-terminated messages and appends them to a per-client history file.

pub mod channel;
pub mod config;
pub mod error;
pub mod helpers;
pub mod server;
pub mod session;

pub use crate::channel::LineChannel;
pub use crate::config::ServerConfig;
pub use crate::error::{ReadError, ServerError};
pub use crate::server::Server;
pub use crate::session::{router::{decide, CommandResult}, Session, SessionState};
