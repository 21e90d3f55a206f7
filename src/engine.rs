use crate::errors::{ReplaceError, WriteStage};
use crate::model::{MatchLocation, PatternKind, ReplaceMode};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

const EXCERPT_MAX_CHARS: usize = 80;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// A text file loaded fully into memory, with enough metadata to detect
/// staleness and report digests.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub contents: String,
    pub bytes: u64,
    pub digest: String,
    pub modified_at: Option<SystemTime>,
}

/// Load `path`, enforcing the size cap and rejecting non-UTF-8 content.
pub fn load_document(path: &Path, max_file_bytes: u64) -> Result<LoadedDocument, ReplaceError> {
    let metadata = fs::metadata(path).map_err(|e| ReplaceError::from_io(path, e))?;

    if !metadata.is_file() {
        return Err(ReplaceError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > max_file_bytes {
        return Err(ReplaceError::FileTooLarge {
            path: path.to_path_buf(),
            bytes: metadata.len(),
            limit: max_file_bytes,
        });
    }

    let raw = fs::read(path).map_err(|e| ReplaceError::from_io(path, e))?;
    let digest = digest_hex(&raw);
    let bytes = raw.len() as u64;
    let contents = String::from_utf8(raw).map_err(|_| ReplaceError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;

    Ok(LoadedDocument {
        path: path.to_path_buf(),
        contents,
        bytes,
        digest,
        modified_at: metadata.modified().ok(),
    })
}

/// Compiled search pattern. Compilation happens before a job is scheduled
/// so bad input rejects synchronously.
#[derive(Debug, Clone)]
pub enum SearchPattern {
    Literal(String),
    Regex(Regex),
}

impl SearchPattern {
    pub fn compile(from: &str, kind: PatternKind) -> Result<Self, ReplaceError> {
        if from.is_empty() {
            return Err(ReplaceError::EmptyPattern);
        }
        match kind {
            PatternKind::Literal => Ok(Self::Literal(from.to_string())),
            PatternKind::Regex => Ok(Self::Regex(Regex::new(from)?)),
        }
    }

    /// Byte ranges of every non-overlapping match, left to right.
    pub fn find_ranges(&self, haystack: &str) -> Vec<(usize, usize)> {
        match self {
            Self::Literal(needle) => haystack
                .match_indices(needle.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
            Self::Regex(re) => re
                .find_iter(haystack)
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }
}

/// Rewritten content plus how many occurrences were replaced.
#[derive(Debug, Clone)]
pub struct ReplacePlan {
    pub replacements: usize,
    pub output: String,
}

/// Apply `pattern -> to` over `contents` under the given mode. For regex
/// patterns `to` may reference capture groups (`$1`, `${name}`).
pub fn plan_replacement(
    contents: &str,
    pattern: &SearchPattern,
    to: &str,
    mode: ReplaceMode,
) -> ReplacePlan {
    match pattern {
        SearchPattern::Literal(needle) => {
            let matches = contents.match_indices(needle.as_str()).count();
            let (replacements, output) = match mode {
                ReplaceMode::First if matches > 0 => (1, contents.replacen(needle.as_str(), to, 1)),
                ReplaceMode::All if matches > 0 => (matches, contents.replace(needle.as_str(), to)),
                _ => (0, contents.to_string()),
            };
            ReplacePlan {
                replacements,
                output,
            }
        }
        SearchPattern::Regex(re) => {
            let matches = re.find_iter(contents).count();
            let (replacements, output) = match mode {
                ReplaceMode::First if matches > 0 => (1, re.replacen(contents, 1, to).into_owned()),
                ReplaceMode::All if matches > 0 => (matches, re.replace_all(contents, to).into_owned()),
                _ => (0, contents.to_string()),
            };
            ReplacePlan {
                replacements,
                output,
            }
        }
    }
}

/// Locate matches for preview: total count plus line/column positions for
/// up to `limit` of them, each with a single-line excerpt.
pub fn locate_matches(
    contents: &str,
    pattern: &SearchPattern,
    limit: usize,
) -> (usize, Vec<MatchLocation>) {
    let ranges = pattern.find_ranges(contents);
    let total = ranges.len();

    let locations = ranges
        .into_iter()
        .take(limit)
        .map(|(start, _)| {
            let before = &contents[..start];
            let line = before.bytes().filter(|b| *b == b'\n').count() + 1;
            let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
            let column = contents[line_start..start].chars().count() + 1;
            let line_end = contents[start..]
                .find('\n')
                .map(|idx| start + idx)
                .unwrap_or(contents.len());
            MatchLocation {
                line,
                column,
                excerpt: excerpt_of(&contents[line_start..line_end]),
            }
        })
        .collect();

    (total, locations)
}

fn excerpt_of(line: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(line.trim(), " ");
    if collapsed.chars().count() <= EXCERPT_MAX_CHARS {
        collapsed.into_owned()
    } else {
        let truncated: String = collapsed.chars().take(EXCERPT_MAX_CHARS).collect();
        format!("{truncated}…")
    }
}

/// Write `contents` to `path` atomically: temp file in the target
/// directory, original permissions carried over, then rename. A failure at
/// any stage leaves the original file untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ReplaceError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| ReplaceError::WriteFailed {
        path: path.to_path_buf(),
        stage: WriteStage::Create,
        source: e,
    })?;

    tmp.write_all(contents.as_bytes())
        .map_err(|e| ReplaceError::WriteFailed {
            path: path.to_path_buf(),
            stage: WriteStage::Write,
            source: e,
        })?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| ReplaceError::WriteFailed {
                path: path.to_path_buf(),
                stage: WriteStage::Write,
                source: e,
            })?;
    }

    tmp.persist(path).map_err(|e| ReplaceError::WriteFailed {
        path: path.to_path_buf(),
        stage: WriteStage::Rename,
        source: e.error,
    })?;

    Ok(())
}

pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
