//! Error Types
//!
//! This module defines the error types used throughout the engine registries.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the failure modes of the cache core:
//! - Element construction failures (a producer rejected its arguments)
//! - Scene-graph attachment to an invalid parent
//! - Plugin libraries that do not satisfy the entry-point/version contract
//!
//! An absent key is *not* an error anywhere in the cache API: `find` returns
//! `Option`, `remove` returns `bool`. Only conditions that leave the caller
//! without a usable element surface as [`Error`].
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.

use thiserror::Error;

/// The main error type for the engine registry core.
///
/// Every variant is recoverable and surfaced as an ordinary return value;
/// a failed operation leaves the affected cache in exactly the state it was
/// in before the call.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Cache Errors
    // ========================================================================
    /// The producer could not build an element for the given key.
    ///
    /// The key is not inserted; a later `add` with well-formed arguments
    /// starts from a clean slate.
    #[error("failed to construct element `{key}`: {reason}")]
    ConstructionFailed {
        /// Key the element would have been registered under
        key: String,
        /// Producer-supplied failure description
        reason: String,
    },

    // ========================================================================
    // Scene-Graph Errors
    // ========================================================================
    /// An object-cache attach/re-attach targeted a retired or absent parent.
    #[error("invalid parent for `{key}`: {reason}")]
    InvalidParent {
        /// Key of the element being attached
        key: String,
        /// Why the parent was rejected
        reason: String,
    },

    // ========================================================================
    // Plugin Errors
    // ========================================================================
    /// A plugin library failed the entry-point or version contract.
    ///
    /// The library is closed immediately and nothing is registered.
    #[error("incompatible plugin `{path}`: {reason}")]
    IncompatiblePlugin {
        /// Path of the offending library file
        path: String,
        /// Missing symbol, malformed metadata, or version mismatch
        reason: String,
    },

    /// The OS failed to open or resolve a dynamic library.
    #[error("plugin library error: {0}")]
    PluginLibrary(#[from] libloading::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error (e.g. while listing a plugin folder).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
