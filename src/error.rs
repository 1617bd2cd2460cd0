//! Errors raised when raw input is rejected at the boundary of the store.
//!
//! None of the core operations can fail. The only way to misuse the store
//! is to hand it a key that is not well-formed text, and that is caught
//! before the tree is touched.

use core::str::Utf8Error;
use thiserror::Error;


/// Errors produced by the fallible entry points of the store.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// The key bytes are not valid UTF-8.
    #[error("key is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
