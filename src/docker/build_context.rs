// ABOUTME: Packs a directory into the tar archive sent to the engine as build context
// Honours .dockerignore glob patterns and always leaves out build output and VCS data

use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

const ALWAYS_IGNORED: &[&str] = &["target", ".git"];

/// Patterns from `<context>/.dockerignore`; comments and blank lines dropped.
pub fn load_ignore_patterns(context: &Path) -> io::Result<Vec<String>> {
    let path = context.join(".dockerignore");
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(parse_ignore_patterns(&fs::read_to_string(path)?))
}

pub fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.trim_start_matches("./").trim_matches('/').to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// `rel` uses `/` separators and is relative to the context root. A pattern
/// that matches a parent directory ignores everything below it.
pub fn is_ignored(rel: &str, patterns: &[String]) -> bool {
    let rules = compile_patterns(patterns);
    is_ignored_by(rel, &rules)
}

/// `*` and `?` never cross a `/`, as in `.dockerignore`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    ALWAYS_IGNORED
        .iter()
        .copied()
        .chain(patterns.iter().map(String::as_str))
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring invalid .dockerignore pattern {:?}: {}", raw, e);
                None
            }
        })
        .collect()
}

fn is_ignored_by(rel: &str, rules: &[Pattern]) -> bool {
    // Every ancestor directory, then the path itself; '/' is ASCII so the slices are valid
    let mut prefixes = rel
        .match_indices('/')
        .map(|(idx, _)| &rel[..idx])
        .chain(std::iter::once(rel));

    prefixes.any(|candidate| rules.iter().any(|rule| rule.matches_with(candidate, MATCH_OPTIONS)))
}

/// Tar every non-ignored file under `context`.
pub fn build_context_tar(context: &Path) -> io::Result<Vec<u8>> {
    let rules = compile_patterns(&load_ignore_patterns(context)?);
    let mut builder = tar::Builder::new(Vec::new());
    builder.follow_symlinks(false);
    append_dir(&mut builder, context, "", &rules)?;
    builder.into_inner()
}

fn append_dir(
    builder: &mut tar::Builder<Vec<u8>>,
    dir: &Path,
    prefix: &str,
    rules: &[Pattern],
) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if is_ignored_by(&rel, rules) {
            debug!("Skipping {} in build context", rel);
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            builder.append_dir(&rel, &path)?;
            append_dir(builder, &path, &rel, rules)?;
        } else {
            builder.append_path_with_name(&path, &rel)?;
        }
    }
    Ok(())
}
