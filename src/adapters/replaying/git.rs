//! Replaying adapter for the `GitRepo` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::git::GitRepo;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "git", "current_commit");
        replay_result(&output, "git::current_commit")
    }
}
