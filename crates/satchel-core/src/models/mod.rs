//! Data models for Satchel

mod note;

pub use note::{normalize_folder, Note, NoteId};
