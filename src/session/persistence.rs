// ABOUTME: Checklist session persistence so progress survives restarts
// Mirrors lists/ into sessions/ and stores the checked state of the whole tree as JSON

use crate::models::Item;
use crate::parser::{ChecklistParser, Duplicate, ParseError};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path} is not valid: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of opening a checklist: either a resumed session or a fresh parse.
#[derive(Debug)]
pub struct LoadedChecklist {
    pub checklist: Item,
    /// Only populated on a fresh parse
    pub duplicates: Vec<Duplicate>,
    pub resumed: bool,
}

#[derive(Debug, Clone)]
pub struct ChecklistSession {
    checklist_path: PathBuf,
    session_path: PathBuf,
    lists_root: PathBuf,
}

impl ChecklistSession {
    pub fn new(checklist_path: &Path, lists_root: &Path, sessions_root: &Path) -> Self {
        Self {
            checklist_path: checklist_path.to_path_buf(),
            session_path: Self::session_path_for(checklist_path, lists_root, sessions_root),
            lists_root: lists_root.to_path_buf(),
        }
    }

    pub fn checklist_path(&self) -> &Path {
        &self.checklist_path
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Where the session for `checklist_path` lives. Paths under the lists root
    /// are mirrored, paths already under the sessions root are their own
    /// session, anything else lands directly in the sessions root. Paths and
    /// roots are compared as absolute paths, so `./lists/x.ckl` and
    /// `$PWD/lists/x.ckl` share a session.
    pub fn session_path_for(checklist_path: &Path, lists_root: &Path, sessions_root: &Path) -> PathBuf {
        let path = absolute(checklist_path);
        let sessions_base = normalize(sessions_root);

        if path.starts_with(absolute(sessions_root)) {
            return normalize(checklist_path);
        }
        if let Ok(rest) = path.strip_prefix(absolute(lists_root)) {
            return sessions_base.join(rest);
        }
        match path.file_name() {
            Some(name) => sessions_base.join(name),
            None => sessions_base.join("checklist"),
        }
    }

    pub fn load(&self) -> Result<LoadedChecklist, SessionError> {
        if self.session_path.exists() {
            let content = fs::read_to_string(&self.session_path).map_err(|source| SessionError::Io {
                path: self.session_path.clone(),
                source,
            })?;
            let checklist = Self::loads(&content).map_err(|source| SessionError::Format {
                path: self.session_path.clone(),
                source,
            })?;
            info!("Resumed session {}", self.session_path.display());
            return Ok(LoadedChecklist {
                checklist,
                duplicates: Vec::new(),
                resumed: true,
            });
        }

        let mut parser = ChecklistParser::new(&self.lists_root);
        let checklist = parser.parse_file(&self.checklist_path)?;
        let duplicates = parser.duplicates();
        for dup in &duplicates {
            for loc in &dup.locations {
                warn!("duplicate item: {} in {} line {}", dup.name, loc.file.display(), loc.line);
            }
        }
        info!("Loaded checklist {}", self.checklist_path.display());
        Ok(LoadedChecklist {
            checklist,
            duplicates,
            resumed: false,
        })
    }

    pub fn dump(&self, checklist: &Item) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.session_path.clone(),
            source,
        };
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = Self::dumps(checklist).map_err(|source| SessionError::Format {
            path: self.session_path.clone(),
            source,
        })?;
        fs::write(&self.session_path, json).map_err(io_err)?;
        info!("Saved session {}", self.session_path.display());
        Ok(())
    }

    pub fn dumps(checklist: &Item) -> serde_json::Result<String> {
        serde_json::to_string_pretty(checklist)
    }

    pub fn loads(content: &str) -> serde_json::Result<Item> {
        let mut checklist: Item = serde_json::from_str(content)?;
        // A root written without children is still a checklist.
        checklist.items.get_or_insert_with(Vec::new);
        Ok(checklist)
    }
}

/// Remove everything inside the sessions directory, keeping the directory itself.
pub fn clear_sessions(sessions_root: &Path) -> std::io::Result<usize> {
    if !sessions_root.exists() {
        fs::create_dir_all(sessions_root)?;
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(sessions_root)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    info!("Cleared {} entries from {}", removed, sessions_root.display());
    Ok(removed)
}

/// Drop `.` components and fold `..` into its parent, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// `path` anchored at the working directory when relative, then normalized.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}
