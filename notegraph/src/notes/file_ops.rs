//! File operations for the notes directory.
//!
//! Thin wrappers over std::fs scoped to the configured notes root. The
//! cache and controllers go through these instead of touching the
//! filesystem directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// List regular `.md` files directly under the notes directory.
/// Non-recursive; subdirectories and non-markdown files are skipped.
pub fn list_notes(notes_dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(notes_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => continue,
        };
        if name.ends_with(".md") {
            files.push(name);
        }
    }
    Ok(files)
}

/// Read a note file, lossily converting to UTF-8.
pub fn read_note(path: &Path) -> io::Result<String> {
    let raw = fs::read(path)?;
    Ok(String::from_utf8_lossy(&raw).to_string())
}

/// Overwrite a note file's entire content. No merge, no append.
pub fn write_note(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content.as_bytes())
}

/// Path for a brand new note, named after the current unix epoch as
/// eight lowercase hex digits. The file itself is not created.
pub fn new_note_path(notes_dir: &Path) -> PathBuf {
    notes_dir.join(format!("{:08x}.md", Utc::now().timestamp()))
}
