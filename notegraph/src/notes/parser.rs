//! Note parsing — one markdown file into a `Note` record.
//!
//! The first line is the title (a leading `# ` is stripped); every later
//! line is scanned for embedded links to other notes. Creation time is
//! decoded from the hex filename, modification time comes from the
//! filesystem.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::error::NoteError;

static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\(([0-9a-f]{8}\.md)\)").unwrap());
static FILENAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{8}\.md$").unwrap());

/// A directed reference between two notes.
///
/// In `outgoing_links` the filename is the link target; in
/// `incoming_links` it is the source. The line number is 1-based and
/// counts from the start of the source file, title line included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    pub filename: String,
    pub line_number: usize,
}

/// One parsed note. `incoming_links` is always empty straight out of the
/// parser; the cache fills it in during a rebuild.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Note {
    pub filename: String,
    pub title: String,
    pub is_label: bool,
    pub outgoing_links: Vec<Link>,
    pub incoming_links: Vec<Link>,
    pub ctime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
}

/// Extract every note link embedded in a single line, left to right.
pub fn extract_links(line: &str) -> Vec<String> {
    LINK_RE
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Decode a note's creation time from its filename (eight lowercase hex
/// digits, big-endian unix epoch, plus `.md`).
pub fn ctime_from_filename(filename: &str) -> Result<DateTime<Utc>, NoteError> {
    if !FILENAME_RE.is_match(filename) {
        return Err(NoteError::InvalidFilename(filename.to_string()));
    }
    let hex = filename.trim_end_matches(".md");
    let epoch = i64::from_str_radix(hex, 16)
        .map_err(|_| NoteError::InvalidFilename(filename.to_string()))?;
    Utc.timestamp_opt(epoch, 0)
        .single()
        .ok_or_else(|| NoteError::InvalidFilename(filename.to_string()))
}

/// Parse a single note file from the notes directory.
pub fn parse_note(notes_dir: &Path, filename: &str) -> Result<Note, NoteError> {
    let ctime = ctime_from_filename(filename)?;

    let path = notes_dir.join(filename);
    let metadata = fs::metadata(&path)?;
    let mtime: DateTime<Utc> = metadata.modified()?.into();

    let raw = fs::read(&path)?;
    let text = String::from_utf8_lossy(&raw);

    let mut title = String::new();
    let mut is_label = false;
    let mut outgoing_links = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if idx == 0 {
            // Title extraction never fails: without the "# " prefix the
            // raw first line is kept verbatim.
            title = line.strip_prefix("# ").unwrap_or(line).to_string();
            is_label = title.split_whitespace().count() == 1;
            continue;
        }
        for target in extract_links(line) {
            outgoing_links.push(Link {
                filename: target,
                line_number: idx + 1,
            });
        }
    }

    Ok(Note {
        filename: filename.to_string(),
        title,
        is_label,
        outgoing_links,
        incoming_links: Vec::new(),
        ctime,
        mtime,
    })
}
