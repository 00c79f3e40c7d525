//! Note graph over a directory of timestamp-named markdown files.
//!
//! Filenames are eight lowercase hex digits plus `.md`; the hex decodes to
//! the note's creation epoch. Notes reference each other with markdown
//! links of the form `](xxxxxxxx.md)`, and the cache maintains the full
//! bidirectional link graph, rebuilt wholesale from disk.

pub mod cache;
pub mod error;
pub mod file_ops;
pub mod parser;
pub mod query;

pub use cache::NoteCache;
