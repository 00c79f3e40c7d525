//! Graph cache — the single source of truth for link resolution.
//!
//! The cache holds an immutable snapshot of every parsed note. A rebuild
//! parses the whole directory off to the side and publishes the fresh map
//! with one pointer swap, so readers always see either the old or the new
//! state in full, never a half-built map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::NoteError;
use super::file_ops;
use super::parser::{self, Link, Note};

/// A published, immutable view of the cache, keyed by filename.
pub type Snapshot = Arc<HashMap<String, Note>>;

pub struct NoteCache {
    notes_dir: PathBuf,
    read_only: bool,
    snapshot: RwLock<Snapshot>,
}

impl NoteCache {
    pub fn new(notes_dir: PathBuf) -> Self {
        Self::with_read_only(notes_dir, false)
    }

    pub fn with_read_only(notes_dir: PathBuf, read_only: bool) -> Self {
        Self {
            notes_dir,
            read_only,
            snapshot: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// The current snapshot. Cheap to clone; stays valid across
    /// concurrent rebuilds.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    /// Rebuild the whole cache from the notes directory.
    ///
    /// Every `.md` file must parse; a single failure aborts the rebuild
    /// and leaves the previous snapshot in place. Only the final swap
    /// takes the write lock, so readers are never blocked on the
    /// directory scan.
    pub fn rebuild(&self) -> Result<(), NoteError> {
        let mut fresh: HashMap<String, Note> = HashMap::new();
        for filename in file_ops::list_notes(&self.notes_dir)? {
            let note = parser::parse_note(&self.notes_dir, &filename)?;
            fresh.insert(filename, note);
        }

        link_notes(&mut fresh);

        log::debug!(
            "rebuilt note cache: {} notes from {:?}",
            fresh.len(),
            self.notes_dir
        );

        *self.snapshot.write() = Arc::new(fresh);
        Ok(())
    }

    /// Overwrite an existing note's content and rebuild.
    ///
    /// Never creates notes: the filename must already be in the cache.
    /// Empty content is rejected before anything touches the disk.
    pub fn update_content(&self, filename: &str, content: &str) -> Result<(), NoteError> {
        if self.read_only {
            return Err(NoteError::ReadOnly);
        }
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        if !self.snapshot.read().contains_key(filename) {
            return Err(NoteError::NotFound(filename.to_string()));
        }

        file_ops::write_note(&self.notes_dir.join(filename), content)?;
        self.rebuild()
    }
}

/// Second pass of a rebuild: fill in every note's incoming links from the
/// other notes' outgoing links. Links whose target is not in the map are
/// left dangling on the source side and indexed nowhere else. Sources are
/// visited in filename order so the incoming sequences are deterministic.
pub(crate) fn link_notes(notes: &mut HashMap<String, Note>) {
    let mut sources: Vec<String> = notes.keys().cloned().collect();
    sources.sort();

    for source in sources {
        let outgoing = notes[&source].outgoing_links.clone();
        for link in outgoing {
            if let Some(target) = notes.get_mut(&link.filename) {
                target.incoming_links.push(Link {
                    filename: source.clone(),
                    line_number: link.line_number,
                });
            }
        }
    }
}
