//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::credentials::{EnvTokenProvider, StaticTokenProvider};
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitRepo;
use crate::adapters::live::registry::LiveRegistry;
use crate::adapters::recording::clock::RecordingClock;
use crate::adapters::recording::git::RecordingGitRepo;
use crate::adapters::recording::registry::RecordingRegistry;
use crate::adapters::replaying::{ReplayingClock, ReplayingGitRepo, ReplayingRegistry};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Settings;
use crate::ports::{Clock, FileSystem, GitRepo, RemoteRegistry, TokenProvider};

/// Token handed to replayed registry calls; recorded cassettes never carry one.
pub const REPLAY_TOKEN: &str = "replay-token";

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock for the generation stamp.
    pub clock: Box<dyn Clock>,
    /// Git repository for the source revision.
    pub git: Box<dyn GitRepo>,
    /// Filesystem for input documents and report artifacts.
    pub fs: Box<dyn FileSystem>,
    /// Design registry fetch capability.
    pub registry: Box<dyn RemoteRegistry>,
    /// Registry credential.
    pub tokens: Box<dyn TokenProvider>,
    /// Optional cassette recorder; flushed to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Builds a context from explicit port implementations.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        git: Box<dyn GitRepo>,
        fs: Box<dyn FileSystem>,
        registry: Box<dyn RemoteRegistry>,
        tokens: Box<dyn TokenProvider>,
    ) -> Self {
        Self { clock, git, fs, registry, tokens, recorder: None }
    }

    /// Creates a live context talking to the real registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(settings: &Settings) -> Result<Self, String> {
        let registry = LiveRegistry::new(&settings.api_base, settings.http_timeout)?;
        Ok(Self::new(
            Box::new(LiveClock),
            Box::new(LiveGitRepo),
            Box::new(LiveFileSystem),
            Box::new(registry),
            Box::new(EnvTokenProvider::new(&settings.token_env)),
        ))
    }

    /// Creates a recording context that writes a cassette to `path` on drop.
    ///
    /// Uses live adapters for actual work; clock, git, and registry calls are
    /// captured. The filesystem and token are not recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(path: &Path, settings: &Settings) -> Result<Self, String> {
        let commit = LiveGitRepo.current_commit().unwrap_or_else(|_| "unknown".into());
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "propaudit-session", commit)));
        let registry = LiveRegistry::new(&settings.api_base, settings.http_timeout)?;

        Ok(Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            git: Box::new(RecordingGitRepo::new(Box::new(LiveGitRepo), Arc::clone(&recorder))),
            fs: Box::new(LiveFileSystem),
            registry: Box::new(RecordingRegistry::new(Box::new(registry), Arc::clone(&recorder))),
            tokens: Box::new(EnvTokenProvider::new(&settings.token_env)),
            recorder: Some(recorder),
        })
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Clock, git, and registry are served from the cassette, each port with
    /// its own cursor. Files are read from disk and a fixed token is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;

        Ok(Self::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingGitRepo::new(CassetteReplayer::new(&cassette))),
            Box::new(LiveFileSystem),
            Box::new(ReplayingRegistry::new(CassetteReplayer::new(&cassette))),
            Box::new(StaticTokenProvider::new(Some(REPLAY_TOKEN.into()), "cassette")),
        ))
    }

    /// Flushes the recorder, if any, without ending the session.
    ///
    /// # Errors
    ///
    /// Returns an error string if the cassette cannot be written.
    pub fn flush_recording(&self) -> Result<(), String> {
        let Some(recorder) = &self.recorder else {
            return Ok(());
        };
        let guard = recorder.lock().map_err(|_| "recorder lock poisoned".to_string())?;
        if let Err(e) = guard.save() {
            return Err(format!("failed to write cassette {}: {e}", guard.path().display()));
        }
        Ok(())
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Err(e) = self.flush_recording() {
            warn!(error = %e, "cassette not written");
        }
    }
}
