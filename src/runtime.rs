use crate::config::{ConfigArgs, ReplacerConfig};
use crate::state::ReplacerState;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builds short-lived state for one CLI invocation.
#[derive(Debug, Default, Clone)]
pub struct StatelessRuntime;

impl StatelessRuntime {
    pub fn normalize_existing_file(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|e| anyhow!("cannot open '{}': {e}", path.display()))?;
        anyhow::ensure!(
            canonical.is_file(),
            "'{}' is not a regular file",
            canonical.display()
        );
        Ok(canonical)
    }

    /// State for single-file commands, rooted at the file's parent
    /// directory so the workspace boundary always admits the target.
    pub fn state_for_file(
        &self,
        path: &Path,
        args: &ConfigArgs,
    ) -> Result<(Arc<ReplacerState>, PathBuf)> {
        let absolute = self.normalize_existing_file(path)?;
        let mut config = ReplacerConfig::from_args(args.clone())?;
        config.workspace_root = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let state = Arc::new(ReplacerState::new(Arc::new(config)));
        Ok((state, absolute))
    }

    /// State for workspace-wide commands (`batch`, `list`).
    pub fn state_for_workspace(&self, args: &ConfigArgs) -> Result<Arc<ReplacerState>> {
        let config = ReplacerConfig::from_args(args.clone())?;
        config.ensure_workspace_root()?;
        Ok(Arc::new(ReplacerState::new(Arc::new(config))))
    }
}
