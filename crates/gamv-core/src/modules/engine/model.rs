use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

pub const UNIX_DEFAULT_ENGINE: &str = "~/gslib/gamv";
pub const WINDOWS_DEFAULT_ENGINE: &str = r"c:\gslib\gamv.exe";

/// How the engine process is located and supervised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    executable: Option<PathBuf>,
    launcher_args: Vec<OsString>,
    verbose: bool,
    timeout: Option<Duration>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    /// Arguments placed between the executable and the parameter file, for
    /// engines started through a shell or an emulator.
    pub fn with_launcher_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.launcher_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> Option<&PathBuf> {
        self.executable.as_ref()
    }

    pub fn launcher_args(&self) -> &[OsString] {
        &self.launcher_args
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The configured executable, or the platform default.
    pub fn resolved_executable(&self) -> PathBuf {
        self.executable.clone().unwrap_or_else(default_engine_path)
    }
}

/// Captured streams of a finished engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

pub fn default_engine_path() -> PathBuf {
    platform_default_engine_path(cfg!(windows), std::env::var_os("HOME").as_deref())
}

pub(crate) fn platform_default_engine_path(windows: bool, home: Option<&OsStr>) -> PathBuf {
    if windows {
        return PathBuf::from(WINDOWS_DEFAULT_ENGINE);
    }
    match (home, UNIX_DEFAULT_ENGINE.strip_prefix("~/")) {
        (Some(home), Some(relative)) if !home.is_empty() => PathBuf::from(home).join(relative),
        _ => PathBuf::from(UNIX_DEFAULT_ENGINE),
    }
}
