//! Battle summaries: record attacker→target pairs during a combat round, report them in a
//! deterministic order, and persist them in per-object attribute storage.

pub mod cli;
pub mod combat;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

pub use error::{RosterError, StorageError, SummaryError};
