use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Command that hands `path` to the desktop's default application.
pub fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // The empty string is the window title `start` expects before the path.
        cmd.arg("/C").arg("start").arg("").arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

pub fn open_with_default(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("file no longer exists: {}", path.display());
    }
    let mut cmd = opener_command(path);
    debug!(?cmd, "launching default application");
    let status = cmd
        .status()
        .with_context(|| format!("launching default application for {}", path.display()))?;
    if !status.success() {
        bail!("default application exited with {status}");
    }
    Ok(())
}
