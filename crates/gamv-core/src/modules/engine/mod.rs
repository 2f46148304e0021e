mod model;

pub use model::{
    EngineOptions, EngineOutput, UNIX_DEFAULT_ENGINE, WINDOWS_DEFAULT_ENGINE, default_engine_path,
};

use super::traits::EngineExecutor;
use crate::domain::{GamvError, GamvResult};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs the engine as a child process and waits for it.
#[derive(Debug, Clone, Default)]
pub struct ProcessEngine {
    options: EngineOptions,
}

impl ProcessEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

impl EngineExecutor for ProcessEngine {
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(parameter_file = %parameter_file.display())
    )]
    fn execute(&self, parameter_file: &Path, working_dir: &Path) -> GamvResult<EngineOutput> {
        let executable = self.options.resolved_executable();
        let mut command = Command::new(&executable);
        command
            .current_dir(working_dir)
            .args(self.options.launcher_args())
            .arg(parameter_file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(executable = %executable.display(), "starting engine");
        let child = command.spawn().map_err(|source| {
            GamvError::io_system(
                "IO.ENGINE_SPAWN",
                format!(
                    "failed to start engine '{}': {}",
                    executable.display(),
                    source
                ),
            )
        })?;

        let (status, output) = match self.options.timeout() {
            None => wait_for_exit(child, &executable)?,
            Some(timeout) => wait_with_deadline(child, &executable, timeout)?,
        };

        if !status.success() {
            let status_text = status.code().map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit code {}", code),
            );
            return Err(GamvError::engine_failure(
                "RUN.ENGINE_EXIT",
                format!(
                    "engine '{}' failed with {}: {}",
                    executable.display(),
                    status_text,
                    output.stderr
                ),
            ));
        }

        if self.options.verbose() {
            for line in output.stdout.lines() {
                info!(target: "gamv::engine", "{line}");
            }
        }
        if !output.stderr.trim().is_empty() {
            warn!(
                stderr = %output.stderr.trim_end(),
                "engine succeeded with diagnostics on stderr"
            );
        }
        Ok(output)
    }
}

fn wait_for_exit(child: Child, executable: &Path) -> GamvResult<(ExitStatus, EngineOutput)> {
    let output = child
        .wait_with_output()
        .map_err(|source| wait_error(executable, source))?;
    Ok((
        output.status,
        EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
    ))
}

/// Both pipes are drained on their own threads so a chatty engine cannot
/// block on a full pipe while the deadline is polled.
fn wait_with_deadline(
    mut child: Child,
    executable: &Path,
    timeout: Duration,
) -> GamvResult<(ExitStatus, EngineOutput)> {
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);
    let deadline = Instant::now() + timeout;

    let status = loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|source| wait_error(executable, source))?
        {
            break status;
        }
        if Instant::now() >= deadline {
            if let Err(source) = child.kill() {
                warn!(error = %source, "failed to kill timed-out engine");
            }
            let _ = child.wait();
            return Err(GamvError::engine_failure(
                "RUN.ENGINE_TIMEOUT",
                format!(
                    "engine '{}' did not finish within {:.3}s and was killed",
                    executable.display(),
                    timeout.as_secs_f64()
                ),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok((
        status,
        EngineOutput {
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
        },
    ))
}

fn spawn_reader<R>(mut pipe: R) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(source) = pipe.read_to_end(&mut buffer) {
            warn!(error = %source, "failed to drain engine pipe");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn join_reader(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_error(executable: &Path, source: std::io::Error) -> GamvError {
    GamvError::io_system(
        "IO.ENGINE_WAIT",
        format!(
            "failed while waiting for engine '{}': {}",
            executable.display(),
            source
        ),
    )
}
