//! # dirsync-core
//!
//! Core library for bidirectional directory synchronization.
//!
//! After [`sync::SyncEngine::sync`] runs on two directory trees, both trees
//! contain the union of the files and subdirectories present in either, with
//! the more recently modified version of any diverging file copied over the
//! other. Nothing is ever deleted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

/// Cooperative stop requests from signal handlers
pub mod interrupt;

/// Directory scanning: entries, sorted collections and snapshots
pub mod scanner;

/// Newer-wins decisions and the directory cycle guard
pub mod comparison;

/// Content and metadata replication between the two trees
pub mod replicator;

/// Configuration file parsing and management
pub mod config;

/// Bidirectional synchronization engine
pub mod sync;

pub use config::Config;
pub use error::{Result, SyncError};
pub use interrupt::Interrupt;
pub use sync::{SyncEngine, SyncReporter, SyncResult};
