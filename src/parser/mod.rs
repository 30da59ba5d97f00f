// ABOUTME: Parser for indented .ckl checklist files with `from:` inheritance
// Tracks where every item came from so duplicate names can be reported

pub mod error;

pub use error::ParseError;

use crate::models::Item;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CHECKLIST_EXTENSION: &str = "ckl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

/// An item name that was declared more than once across a checklist and its parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone)]
struct Occurrence {
    name: String,
    location: Location,
}

pub struct ChecklistParser {
    lists_root: PathBuf,
    occurrences: Vec<Occurrence>,
    loading: Vec<PathBuf>,
}

/// Checklist name for a file: its file name with the `.ckl` extension removed.
pub fn checklist_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    file_name
        .strip_suffix(&format!(".{CHECKLIST_EXTENSION}"))
        .map(str::to_string)
        .unwrap_or(file_name)
}

impl ChecklistParser {
    pub fn new(lists_root: impl Into<PathBuf>) -> Self {
        Self {
            lists_root: lists_root.into(),
            occurrences: Vec::new(),
            loading: Vec::new(),
        }
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<Item, ParseError> {
        if self.loading.iter().any(|p| p == path) {
            return Err(ParseError::InheritanceCycle(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.loading.push(path.to_path_buf());
        let result = self.parse_str(&checklist_name(path), path, &text);
        self.loading.pop();
        result
    }

    /// Parse checklist text; `path` is used for locations and error messages.
    pub fn parse_str(&mut self, name: &str, path: &Path, text: &str) -> Result<Item, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut cursor = 0;
        self.parse_block(path, &lines, &mut cursor, 0, name)
    }

    /// Names seen more than once, in order of first appearance.
    pub fn duplicates(&self) -> Vec<Duplicate> {
        let mut dups: Vec<Duplicate> = Vec::new();
        for occ in &self.occurrences {
            if let Some(dup) = dups.iter_mut().find(|d| d.name == occ.name) {
                dup.locations.push(occ.location.clone());
            } else {
                dups.push(Duplicate {
                    name: occ.name.clone(),
                    locations: vec![occ.location.clone()],
                });
            }
        }
        dups.retain(|d| d.locations.len() > 1);
        dups
    }

    fn parse_block(
        &mut self,
        path: &Path,
        lines: &[&str],
        cursor: &mut usize,
        indent: usize,
        name: &str,
    ) -> Result<Item, ParseError> {
        let mut list = Item::list(name, Vec::new());
        let mut parents: Vec<Item> = Vec::new();
        let mut last_leaf_line: Option<usize> = None;

        while let Some(raw) = lines.get(*cursor) {
            let line_no = *cursor + 1;
            debug!("file: {} line: {} [{}]", path.display(), line_no, raw.trim());

            if raw.starts_with('#') {
                *cursor += 1;
                continue;
            }

            if let Some(rest) = raw.strip_prefix("from:") {
                let parent_name = rest.trim();
                if parent_name.is_empty() {
                    return Err(ParseError::EmptyParent {
                        path: path.to_path_buf(),
                        line: line_no,
                    });
                }
                *cursor += 1;
                let parent_path = self
                    .lists_root
                    .join(format!("{parent_name}.{CHECKLIST_EXTENSION}"));
                let mut parent = self.parse_file(&parent_path)?;
                parent.merge(&list);
                parents.push(parent);
                continue;
            }

            if raw.trim().is_empty() {
                *cursor += 1;
                continue;
            }

            let new_indent = raw.len() - raw.trim_start_matches(' ').len();
            match new_indent.cmp(&indent) {
                Ordering::Equal => {
                    let item = Item::leaf(raw);
                    self.occurrences.push(Occurrence {
                        name: item.name.clone(),
                        location: Location {
                            file: path.to_path_buf(),
                            line: line_no,
                        },
                    });
                    list.items.get_or_insert_with(Vec::new).push(item);
                    last_leaf_line = Some(line_no);
                    *cursor += 1;
                }
                Ordering::Greater => {
                    // The previous leaf becomes the head of a sublist.
                    let (Some(head_line), Some(head)) = (
                        last_leaf_line.take(),
                        list.items.as_mut().and_then(Vec::pop),
                    ) else {
                        return Err(ParseError::UnexpectedIndent {
                            path: path.to_path_buf(),
                            line: line_no,
                        });
                    };
                    self.occurrences
                        .retain(|o| !(o.name == head.name && o.location.file == path && o.location.line == head_line));

                    let sublist = self.parse_block(path, lines, cursor, new_indent, &head.name)?;
                    list.items.get_or_insert_with(Vec::new).push(sublist);
                }
                Ordering::Less => break,
            }
        }

        if parents.is_empty() {
            return Ok(list);
        }

        let mut merged = parents.remove(0);
        for parent in &parents {
            merged.merge(parent);
        }
        merged.merge(&list);
        merged.name = list.name;
        Ok(merged)
    }
}
