//! Read-only queries over a cache snapshot: filtered/sorted note
//! listings and link listings by direction or validity.
//!
//! Wherever no explicit sort is requested, notes iterate in ascending
//! filename order so output is deterministic.

use std::collections::HashMap;
use std::fmt;

use super::error::NoteError;
use super::parser::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending filename order.
    #[default]
    None,
    /// Creation time, newest first.
    Ctime,
    /// Modification time, newest first.
    Mtime,
    /// Title, ascending.
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteFilter {
    #[default]
    None,
    /// Notes whose title is a single word.
    Labels,
    /// Notes with no outgoing and no incoming links.
    Orphans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePrefix {
    #[default]
    None,
    /// Prefix the title with the creation date, `YYYY-MM-DD`.
    Ctime,
    /// Prefix the title with the modification date, `YYYY-MM-DD`.
    Mtime,
    /// Prefix the title with each linked label note's title.
    Label,
}

/// Validated listing options, constructed once by the CLI or HTTP layer.
/// A filter short-circuits: when one is set the prefix is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub sort: SortOrder,
    pub filter: NoteFilter,
    pub prefix: TitlePrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Outgoing,
    Incoming,
    Both,
}

/// One output row, rendered as `filename:line: text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub filename: String,
    pub line: usize,
    pub text: String,
}

impl Row {
    fn new(filename: &str, line: usize, text: String) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            text,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.filename, self.line, self.text)
    }
}

fn sorted_notes(notes: &HashMap<String, Note>, sort: SortOrder) -> Vec<&Note> {
    let mut list: Vec<&Note> = notes.values().collect();
    match sort {
        SortOrder::None => list.sort_by(|a, b| a.filename.cmp(&b.filename)),
        SortOrder::Ctime => {
            list.sort_by(|a, b| b.ctime.cmp(&a.ctime).then_with(|| a.filename.cmp(&b.filename)))
        }
        SortOrder::Mtime => {
            list.sort_by(|a, b| b.mtime.cmp(&a.mtime).then_with(|| a.filename.cmp(&b.filename)))
        }
        SortOrder::Title => {
            list.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.filename.cmp(&b.filename)))
        }
    }
    list
}

fn title_row(note: &Note) -> Row {
    Row::new(&note.filename, 1, note.title.clone())
}

/// List notes as `filename:1: text` rows per the given options.
pub fn list(notes: &HashMap<String, Note>, opts: &ListOptions) -> Vec<Row> {
    let sorted = sorted_notes(notes, opts.sort);

    match opts.filter {
        NoteFilter::Labels => {
            return sorted.into_iter().filter(|n| n.is_label).map(title_row).collect();
        }
        NoteFilter::Orphans => {
            return sorted
                .into_iter()
                .filter(|n| n.outgoing_links.is_empty() && n.incoming_links.is_empty())
                .map(title_row)
                .collect();
        }
        NoteFilter::None => {}
    }

    match opts.prefix {
        TitlePrefix::Ctime => sorted
            .into_iter()
            .map(|n| {
                Row::new(
                    &n.filename,
                    1,
                    format!("{} {}", n.ctime.format("%Y-%m-%d"), n.title),
                )
            })
            .collect(),
        TitlePrefix::Mtime => sorted
            .into_iter()
            .map(|n| {
                Row::new(
                    &n.filename,
                    1,
                    format!("{} {}", n.mtime.format("%Y-%m-%d"), n.title),
                )
            })
            .collect(),
        TitlePrefix::Label => label_prefixed(notes, &sorted, opts.sort),
        TitlePrefix::None => sorted.into_iter().map(title_row).collect(),
    }
}

/// Label-prefixed listing: one row per outgoing link to a label note,
/// then a plain row for every note without any label link.
///
/// Under the title sort the label-prefixed rows form their own group,
/// ordered by the note title (the text after the label prefix) and
/// printed before the plain rows.
fn label_prefixed(notes: &HashMap<String, Note>, sorted: &[&Note], sort: SortOrder) -> Vec<Row> {
    let mut labeled: Vec<(&str, Row)> = Vec::new();
    let mut plain: Vec<Row> = Vec::new();

    for note in sorted {
        let mut label_linked = false;
        for link in &note.outgoing_links {
            if let Some(target) = notes.get(&link.filename) {
                if target.is_label {
                    labeled.push((
                        note.title.as_str(),
                        Row::new(
                            &note.filename,
                            1,
                            format!("{} {}", target.title, note.title),
                        ),
                    ));
                    label_linked = true;
                }
            }
        }
        if !label_linked {
            plain.push(title_row(note));
        }
    }

    if sort == SortOrder::Title {
        labeled.sort_by(|a, b| a.0.cmp(b.0));
    }

    labeled.into_iter().map(|(_, row)| row).chain(plain).collect()
}

/// Links of a single note. Outgoing rows keep the historical fixed `:1:`
/// line number; incoming rows carry the link's real source line.
pub fn links_for(
    notes: &HashMap<String, Note>,
    filename: &str,
    direction: LinkDirection,
) -> Result<Vec<Row>, NoteError> {
    let note = notes
        .get(filename)
        .ok_or_else(|| NoteError::NotFound(filename.to_string()))?;

    let both = direction == LinkDirection::Both;
    let mut rows = Vec::new();

    if direction != LinkDirection::Incoming {
        let prefix = if both { "outgoing " } else { "" };
        for link in &note.outgoing_links {
            if let Some(target) = notes.get(&link.filename) {
                rows.push(Row::new(
                    &target.filename,
                    1,
                    format!("{}{}", prefix, target.title),
                ));
            }
        }
    }
    if direction != LinkDirection::Outgoing {
        let prefix = if both { "incoming " } else { "" };
        for link in &note.incoming_links {
            if let Some(source) = notes.get(&link.filename) {
                rows.push(Row::new(
                    &source.filename,
                    link.line_number,
                    format!("{}{}", prefix, source.title),
                ));
            }
        }
    }
    Ok(rows)
}

/// Every outgoing link of every note, valid or dangling, as
/// `title → target title` rows (target filename when dangling).
pub fn all_links(notes: &HashMap<String, Note>) -> Vec<Row> {
    let mut rows = Vec::new();
    for note in sorted_notes(notes, SortOrder::None) {
        for link in &note.outgoing_links {
            let target_title = notes
                .get(&link.filename)
                .map(|t| t.title.as_str())
                .unwrap_or(link.filename.as_str());
            rows.push(Row::new(
                &note.filename,
                link.line_number,
                format!("{} → {}", note.title, target_title),
            ));
        }
    }
    rows
}

/// Outgoing links whose target does not exist in the cache.
pub fn dangling_links(notes: &HashMap<String, Note>) -> Vec<Row> {
    let mut rows = Vec::new();
    for note in sorted_notes(notes, SortOrder::None) {
        for link in &note.outgoing_links {
            if !notes.contains_key(&link.filename) {
                rows.push(Row::new(
                    &note.filename,
                    link.line_number,
                    format!("{} → {}", note.title, link.filename),
                ));
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::cache::link_notes;
    use crate::notes::parser::{ctime_from_filename, Link};
    use chrono::{Duration, Utc};

    fn note(filename: &str, title: &str, outgoing: &[(&str, usize)]) -> Note {
        Note {
            filename: filename.to_string(),
            title: title.to_string(),
            is_label: title.split_whitespace().count() == 1,
            outgoing_links: outgoing
                .iter()
                .map(|(target, line)| Link {
                    filename: target.to_string(),
                    line_number: *line,
                })
                .collect(),
            incoming_links: Vec::new(),
            ctime: ctime_from_filename(filename).unwrap(),
            mtime: Utc::now(),
        }
    }

    fn graph(notes: Vec<Note>) -> HashMap<String, Note> {
        let mut map: HashMap<String, Note> =
            notes.into_iter().map(|n| (n.filename.clone(), n)).collect();
        link_notes(&mut map);
        map
    }

    fn rendered(rows: Vec<Row>) -> Vec<String> {
        rows.into_iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_list_default_filename_order() {
        let map = graph(vec![
            note("5f000002.md", "Beta", &[]),
            note("5f000001.md", "Alpha", &[]),
        ]);
        assert_eq!(
            rendered(list(&map, &ListOptions::default())),
            vec!["5f000001.md:1: Alpha", "5f000002.md:1: Beta"]
        );
    }

    #[test]
    fn test_list_sort_ctime_descending() {
        let map = graph(vec![
            note("5f000001.md", "Old", &[]),
            note("5f000009.md", "New", &[]),
        ]);
        let opts = ListOptions { sort: SortOrder::Ctime, ..Default::default() };
        assert_eq!(
            rendered(list(&map, &opts)),
            vec!["5f000009.md:1: New", "5f000001.md:1: Old"]
        );
    }

    #[test]
    fn test_list_sort_mtime_descending() {
        let mut older = note("5f000001.md", "Alpha", &[]);
        older.mtime = Utc::now() - Duration::hours(1);
        let newer = note("5f000002.md", "Beta", &[]);

        let map = graph(vec![older, newer]);
        let opts = ListOptions { sort: SortOrder::Mtime, ..Default::default() };
        assert_eq!(
            rendered(list(&map, &opts)),
            vec!["5f000002.md:1: Beta", "5f000001.md:1: Alpha"]
        );
    }

    #[test]
    fn test_list_sort_title_ascending() {
        let map = graph(vec![
            note("5f000001.md", "zebra", &[]),
            note("5f000002.md", "apple", &[]),
        ]);
        let opts = ListOptions { sort: SortOrder::Title, ..Default::default() };
        assert_eq!(
            rendered(list(&map, &opts)),
            vec!["5f000002.md:1: apple", "5f000001.md:1: zebra"]
        );
    }

    #[test]
    fn test_list_labels_filter() {
        // Both one-word titles count as labels, per the definition
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[]),
            note("5f000002.md", "Beta", &[("5f000001.md", 3)]),
            note("5f000003.md", "Not a label", &[]),
        ]);
        let opts = ListOptions { filter: NoteFilter::Labels, ..Default::default() };
        assert_eq!(
            rendered(list(&map, &opts)),
            vec!["5f000001.md:1: Alpha", "5f000002.md:1: Beta"]
        );
    }

    #[test]
    fn test_list_orphans_filter() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[]),
            note("5f000002.md", "Beta", &[("5f000001.md", 2)]),
            note("5f000003.md", "Loner", &[]),
        ]);
        let opts = ListOptions { filter: NoteFilter::Orphans, ..Default::default() };
        // Alpha has an incoming link, Beta an outgoing one
        assert_eq!(rendered(list(&map, &opts)), vec!["5f000003.md:1: Loner"]);
    }

    #[test]
    fn test_list_filter_ignores_prefix() {
        let map = graph(vec![note("5f000001.md", "Alpha", &[])]);
        let opts = ListOptions {
            filter: NoteFilter::Labels,
            prefix: TitlePrefix::Ctime,
            ..Default::default()
        };
        assert_eq!(rendered(list(&map, &opts)), vec!["5f000001.md:1: Alpha"]);
    }

    #[test]
    fn test_list_prefix_ctime_date() {
        let map = graph(vec![note("5f000001.md", "Alpha", &[])]);
        let opts = ListOptions { prefix: TitlePrefix::Ctime, ..Default::default() };
        // 0x5f000001 decodes to 2020-07-04 UTC
        assert_eq!(
            rendered(list(&map, &opts)),
            vec!["5f000001.md:1: 2020-07-04 Alpha"]
        );
    }

    #[test]
    fn test_list_prefix_label_rows() {
        let map = graph(vec![
            note("5f000001.md", "rust", &[]),
            note("5f000002.md", "tools", &[]),
            note("5f000003.md", "Borrow checker notes", &[("5f000001.md", 2), ("5f000002.md", 3)]),
            note("5f000004.md", "Unrelated note", &[]),
        ]);
        let opts = ListOptions { prefix: TitlePrefix::Label, ..Default::default() };
        assert_eq!(
            rendered(list(&map, &opts)),
            vec![
                // labels themselves have no label links -> plain rows at the end
                "5f000003.md:1: rust Borrow checker notes",
                "5f000003.md:1: tools Borrow checker notes",
                "5f000001.md:1: rust",
                "5f000002.md:1: tools",
                "5f000004.md:1: Unrelated note",
            ]
        );
    }

    #[test]
    fn test_list_prefix_label_alpha_two_tier() {
        let map = graph(vec![
            note("5f000001.md", "zoo", &[]),
            note("5f000002.md", "art", &[]),
            // linked to label "zoo"; title sorts before the other labeled note
            note("5f000003.md", "Alpha topic", &[("5f000001.md", 2)]),
            note("5f000004.md", "Middle topic", &[("5f000002.md", 2)]),
            note("5f000005.md", "a plain note", &[]),
        ]);
        let opts = ListOptions {
            sort: SortOrder::Title,
            prefix: TitlePrefix::Label,
            ..Default::default()
        };
        // Labeled rows sort by the text after the label prefix
        // ("Alpha topic" < "Middle topic" even though "zoo" > "art"),
        // and the whole group prints before the plain rows.
        assert_eq!(
            rendered(list(&map, &opts)),
            vec![
                "5f000003.md:1: zoo Alpha topic",
                "5f000004.md:1: art Middle topic",
                "5f000005.md:1: a plain note",
                "5f000002.md:1: art",
                "5f000001.md:1: zoo",
            ]
        );
    }

    #[test]
    fn test_links_for_outgoing_fixed_line_number() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[]),
            note("5f000002.md", "Beta", &[("5f000001.md", 3)]),
        ]);
        // Outgoing rows always print line 1, not the real source line
        assert_eq!(
            rendered(links_for(&map, "5f000002.md", LinkDirection::Outgoing).unwrap()),
            vec!["5f000001.md:1: Alpha"]
        );
        assert!(links_for(&map, "5f000002.md", LinkDirection::Incoming)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_links_for_incoming_real_line_number() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[]),
            note("5f000002.md", "Beta", &[("5f000001.md", 3)]),
        ]);
        assert_eq!(
            rendered(links_for(&map, "5f000001.md", LinkDirection::Incoming).unwrap()),
            vec!["5f000002.md:3: Beta"]
        );
    }

    #[test]
    fn test_links_for_both_prefixes() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[("5f000002.md", 2)]),
            note("5f000002.md", "Beta", &[("5f000001.md", 3)]),
        ]);
        assert_eq!(
            rendered(links_for(&map, "5f000001.md", LinkDirection::Both).unwrap()),
            vec!["5f000002.md:1: outgoing Beta", "5f000002.md:3: incoming Beta"]
        );
    }

    #[test]
    fn test_links_for_unknown_note() {
        let map = graph(vec![note("5f000001.md", "Alpha", &[])]);
        assert!(matches!(
            links_for(&map, "5f00dead.md", LinkDirection::Both),
            Err(NoteError::NotFound(_))
        ));
    }

    #[test]
    fn test_links_for_outgoing_skips_dangling() {
        let map = graph(vec![note("5f000001.md", "Alpha", &[("5f00dead.md", 2)])]);
        assert!(links_for(&map, "5f000001.md", LinkDirection::Outgoing)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_all_links_includes_dangling_targets() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[("5f000002.md", 4), ("5f00dead.md", 5)]),
            note("5f000002.md", "Beta", &[]),
        ]);
        assert_eq!(
            rendered(all_links(&map)),
            vec![
                "5f000001.md:4: Alpha → Beta",
                "5f000001.md:5: Alpha → 5f00dead.md",
            ]
        );
    }

    #[test]
    fn test_dangling_links_once_per_occurrence() {
        let map = graph(vec![
            note("5f000001.md", "Alpha", &[("5f00dead.md", 2), ("5f00dead.md", 7)]),
            note("5f000002.md", "Beta", &[("5f000001.md", 3)]),
        ]);
        assert_eq!(
            rendered(dangling_links(&map)),
            vec![
                "5f000001.md:2: Alpha → 5f00dead.md",
                "5f000001.md:7: Alpha → 5f00dead.md",
            ]
        );
    }
}
