//! Error kinds the core distinguishes at its API boundary.
//!
//! The core never panics or unwinds across its public API (spec.md §7):
//! every fallible operation returns a [`Result`] carrying one of the
//! variants below plus a human-readable message. `anyhow` remains the
//! error type of choice at the CLI/TUI layer; this enum is what the
//! engine itself hands back so callers can match on failure kind.

use thiserror::Error;

use crate::address::Address;
use crate::stoppoint::StoppointId;

pub type Result<T> = std::result::Result<T, DebugError>;

#[derive(Debug, Error)]
pub enum DebugError {
    /// Operation not legal in the process's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// OS-level failure surfaced by the native backend.
    #[error("backend error (platform code {platform_code:?}): {message}")]
    Backend {
        platform_code: Option<i32>,
        message: String,
    },

    /// A memory read/write failed at or after a partial transfer.
    #[error("memory error at {address:?}, reached offset {offset_reached}: {message}")]
    Memory {
        address: Address,
        offset_reached: usize,
        message: String,
    },

    /// Backend lacks the requested capability.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A bounded wait elapsed before completion.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// A thread id did not resolve to a live thread.
    #[error("unknown thread id {0}")]
    UnknownThread(i32),

    /// A breakpoint/watchpoint id did not resolve.
    #[error("unknown breakpoint/watchpoint id {0:?}")]
    UnknownBreakpoint(StoppointId),

    /// An address did not resolve to anything the core tracks.
    #[error("unknown address {0:?}")]
    UnknownAddress(Address),

    /// Enabling a site would overwrite memory the user had not written
    /// through the core, or disabling found unexpected bytes (tamper
    /// detected).
    #[error("breakpoint conflict at {address:?}: {message}")]
    BreakpointConflict { address: Address, message: String },
}

impl DebugError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        DebugError::InvalidState(msg.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        DebugError::Backend {
            platform_code: None,
            message: message.into(),
        }
    }

    pub fn backend_with_code(platform_code: i32, message: impl Into<String>) -> Self {
        DebugError::Backend {
            platform_code: Some(platform_code),
            message: message.into(),
        }
    }
}

impl From<nix::Error> for DebugError {
    fn from(e: nix::Error) -> Self {
        DebugError::backend_with_code(e as i32, e.to_string())
    }
}

impl From<std::io::Error> for DebugError {
    fn from(e: std::io::Error) -> Self {
        DebugError::backend(e.to_string())
    }
}
