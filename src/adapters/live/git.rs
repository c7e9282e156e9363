//! Live git adapter using the `git` CLI.

use std::process::Command;

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to `git` in the working directory.
pub struct LiveGitRepo;

impl GitRepo for LiveGitRepo {
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git").args(["rev-parse", "HEAD"]).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git rev-parse HEAD failed: {}", stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
