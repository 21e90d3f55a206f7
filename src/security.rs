use crate::errors::InvalidParamsError;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

/// Canonicalize `candidate` and ensure it stays inside `workspace_root`.
///
/// Symlink-aware: both the root and the candidate are canonicalized. A
/// candidate that does not exist yet is checked through its parent
/// directory with the final segment re-joined, which is enough to enforce
/// the boundary before a write creates it.
pub fn enforce_within_workspace(
    workspace_root: &Path,
    candidate: &Path,
    op: &'static str,
    field: &'static str,
) -> Result<PathBuf> {
    let workspace_root = workspace_root
        .canonicalize()
        .map_err(|e| anyhow!("failed to canonicalize workspace root: {e}"))?;

    let canonical = if candidate.exists() {
        candidate.canonicalize().map_err(|e| {
            InvalidParamsError::new(op, format!("{field} could not be canonicalized: {e}"))
                .with_field(field)
        })?
    } else {
        let parent = candidate.parent().ok_or_else(|| {
            InvalidParamsError::new(op, format!("{field} must have a parent directory"))
                .with_field(field)
        })?;
        let file_name = candidate.file_name().ok_or_else(|| {
            InvalidParamsError::new(op, format!("{field} must include a file name"))
                .with_field(field)
        })?;
        let canonical_parent = parent.canonicalize().map_err(|e| {
            InvalidParamsError::new(
                op,
                format!("{field} parent directory could not be canonicalized: {e}"),
            )
            .with_field(field)
        })?;
        canonical_parent.join(file_name)
    };

    if !canonical.starts_with(&workspace_root) {
        return Err(InvalidParamsError::new(
            op,
            format!(
                "{field} must stay within the workspace root after canonicalization (got '{}', root '{}')",
                canonical.display(),
                workspace_root.display(),
            ),
        )
        .with_field(field)
        .into());
    }

    Ok(canonical)
}
