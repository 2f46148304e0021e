mod workspace;

pub use workspace::{SCRATCH_PREFIX, ScratchWorkspace};

use crate::config::{GamvConfig, render_data_table};
use crate::domain::{DataSource, GamvError, GamvResult, OutputTarget};
use crate::modules::EngineExecutor;
use crate::modules::engine::{EngineOptions, ProcessEngine};
use crate::modules::output::{OUTPUT_FILE_NAME, VariogramTable, read_output_table};
use crate::modules::parameters::{
    PARAMETER_FILE_NAME, ParameterPaths, render_parameter_file, write_parameter_file,
};
use crate::modules::serialization::write_text_artifact;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Input name the engine falls back to when no data source is configured.
pub const DEFAULT_DATA_FILE_NAME: &str = "gamv.dat";
/// Scratch name of a materialized in-memory table.
pub const TABLE_FILE_NAME: &str = "gamv_table.dat";

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct GamvRun {
    pub table: VariogramTable,
    pub engine_stdout: String,
    /// Set only when the caller asked for the output file to be kept.
    pub output_path: Option<PathBuf>,
}

/// Drives serialize, invoke, parse and clean for one configuration at a time.
#[derive(Debug, Clone)]
pub struct Gamv<E = ProcessEngine> {
    executor: E,
    working_dir: Option<PathBuf>,
}

impl Gamv<ProcessEngine> {
    pub fn with_engine_options(options: EngineOptions) -> Self {
        Self::new(ProcessEngine::new(options))
    }
}

impl<E> Gamv<E>
where
    E: EngineExecutor,
{
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            working_dir: None,
        }
    }

    /// Directory the engine runs in and relative paths resolve against.
    /// Defaults to the process current directory.
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    #[tracing::instrument(
        skip(self, config),
        fields(
            variograms = config.variograms().len(),
            directions = config.directions().len(),
            lags = config.lag_count()
        )
    )]
    pub fn run(&self, config: &GamvConfig) -> GamvResult<GamvRun> {
        let working_dir = self.resolve_working_dir()?;
        ensure_data_file_exists(config.data_source(), &working_dir)?;

        let scratch = ScratchWorkspace::create(&working_dir)?;

        let data_file = match config.data_source() {
            DataSource::File(path) => path.clone(),
            DataSource::EngineDefault => PathBuf::from(DEFAULT_DATA_FILE_NAME),
            DataSource::Table(table) => {
                let path = scratch.absolute_path(TABLE_FILE_NAME);
                write_text_artifact(&path, &render_data_table(table)).map_err(|source| {
                    GamvError::io_system(
                        "IO.TABLE_WRITE",
                        format!(
                            "failed to materialize sample table '{}': {}",
                            path.display(),
                            source
                        ),
                    )
                })?;
                debug!(rows = table.row_count(), "materialized in-memory table");
                scratch.relative_path(TABLE_FILE_NAME)
            }
        };
        // The engine always writes inside scratch. A caller output path only
        // receives a copy once that output has parsed.
        let output_file = scratch.relative_path(OUTPUT_FILE_NAME);

        let parameter_file = scratch.relative_path(PARAMETER_FILE_NAME);
        let rendered = render_parameter_file(
            config,
            &ParameterPaths {
                data_file,
                output_file: output_file.clone(),
            },
        );
        write_parameter_file(&working_dir.join(&parameter_file), &rendered)?;
        debug!(
            parameter_file = %parameter_file.display(),
            parameters = %rendered,
            "wrote parameter file"
        );

        let engine_output = self.executor.execute(&parameter_file, &working_dir)?;

        let scratch_output = working_dir.join(&output_file);
        let table = read_output_table(&scratch_output, config)?;
        info!(rows = table.len(), "variogram run finished");

        let output_path = match config.output_target() {
            OutputTarget::File(path) => {
                let persisted = working_dir.join(path);
                persist_output(&scratch_output, &persisted)?;
                Some(persisted)
            }
            OutputTarget::EngineDefault => None,
        };
        scratch.close();
        Ok(GamvRun {
            table,
            engine_stdout: engine_output.stdout,
            output_path,
        })
    }

    fn resolve_working_dir(&self) -> GamvResult<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|source| {
                GamvError::io_system(
                    "IO.WORKING_DIR",
                    format!("failed to resolve current working directory: {}", source),
                )
            }),
        }
    }
}

fn persist_output(scratch_output: &Path, destination: &Path) -> GamvResult<()> {
    fs::copy(scratch_output, destination).map_err(|source| {
        GamvError::io_system(
            "IO.OUTPUT_PERSIST",
            format!(
                "failed to copy engine output to '{}': {}",
                destination.display(),
                source
            ),
        )
    })?;
    debug!(path = %destination.display(), "kept engine output");
    Ok(())
}

fn ensure_data_file_exists(source: &DataSource, working_dir: &Path) -> GamvResult<()> {
    let path = match source {
        DataSource::File(path) => path.as_path(),
        DataSource::EngineDefault => Path::new(DEFAULT_DATA_FILE_NAME),
        DataSource::Table(_) => return Ok(()),
    };
    let resolved = working_dir.join(path);
    if resolved.is_file() {
        return Ok(());
    }
    Err(GamvError::configuration(
        "CONFIG.DATA_FILE_MISSING",
        format!("data file '{}' does not exist", resolved.display()),
    ))
}
