//! satchel-core - Core library for Satchel
//!
//! This crate contains the shared models, the local SQLite note store, the
//! remote file-store interface, and the bidirectional sync engine used by
//! the Satchel interfaces.

pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Note, NoteId};
