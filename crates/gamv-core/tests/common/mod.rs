#![allow(dead_code)]

use gamv_core::modules::parameters::{ParameterFile, parse_parameter_file};
use gamv_core::{EngineExecutor, EngineOutput, GamvError, GamvResult};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Routes crate logs to the test harness; `RUST_LOG` overrides the default.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gamv_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// What the stand-in engine saw during one call.
#[derive(Debug, Clone)]
pub struct ObservedCall {
    pub parameter_file: PathBuf,
    pub parameters: ParameterFile,
    pub parameter_text: String,
    pub data_text: Option<String>,
}

/// In-process engine that reads the parameter file it is handed and writes an
/// output file with the block layout the real engine produces.
#[derive(Debug, Default)]
pub struct SyntheticEngine {
    pub pairless_lags: Vec<usize>,
    pub calls: RefCell<Vec<ObservedCall>>,
}

impl SyntheticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pairless_lags(lags: impl Into<Vec<usize>>) -> Self {
        Self {
            pairless_lags: lags.into(),
            ..Self::default()
        }
    }

    pub fn last_call(&self) -> ObservedCall {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("engine should have been called")
    }
}

impl EngineExecutor for SyntheticEngine {
    fn execute(&self, parameter_file: &Path, working_dir: &Path) -> GamvResult<EngineOutput> {
        let parameter_text = fs::read_to_string(working_dir.join(parameter_file))
            .map_err(|error| GamvError::io_system("IO.TEST_ENGINE", error.to_string()))?;
        let parameters = parse_parameter_file(&parameter_text)?;
        let data_text = fs::read_to_string(working_dir.join(&parameters.data_file)).ok();

        let output = synthetic_output(&parameters, &self.pairless_lags);
        fs::write(working_dir.join(&parameters.output_file), output)
            .map_err(|error| GamvError::io_system("IO.TEST_ENGINE", error.to_string()))?;

        self.calls.borrow_mut().push(ObservedCall {
            parameter_file: parameter_file.to_path_buf(),
            parameters,
            parameter_text,
            data_text,
        });
        Ok(EngineOutput {
            stdout: "GAMV Version: 3.000\n GAMV Finished\n".to_string(),
            stderr: String::new(),
        })
    }
}

/// Lag `i` (1-based) sits at separation `(i - 1) * xlag` with value
/// `0.1 * i + variogram`, so rows are distinguishable per block.
pub fn synthetic_output(parameters: &ParameterFile, pairless_lags: &[usize]) -> String {
    let variances = parameters
        .variograms
        .iter()
        .any(|variogram| variogram.type_code == 3);
    let mut text = String::new();
    for (variogram_index, variogram) in parameters.variograms.iter().enumerate() {
        for direction_index in 0..parameters.directions.len() {
            text.push_str(&format!(
                "Variogram type {}  tail:{}  head:{}  direction {}\n",
                variogram.type_code,
                variogram.tail,
                variogram.head,
                direction_index + 1
            ));
            for lag in 0..parameters.lag_count + 2 {
                let pairs = if pairless_lags.contains(&lag) {
                    0
                } else {
                    10 * (lag + 1)
                };
                text.push_str(&format!(
                    "{:4} {:11.3} {:11.5} {:9} {:13.5} {:13.5}",
                    lag + 1,
                    lag as f64 * parameters.lag_separation,
                    0.1 * (lag + 1) as f64 + variogram_index as f64,
                    pairs,
                    1.0,
                    1.1
                ));
                if variances {
                    text.push_str(&format!(" {:13.5} {:13.5}", 0.25, 0.5));
                }
                text.push('\n');
            }
        }
    }
    text
}

/// Entries of `dir` whose names start with the scratch prefix.
pub fn scratch_entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("working dir should be readable")
        .map(|entry| entry.expect("entry should be readable").path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(gamv_core::pipeline::SCRATCH_PREFIX))
        })
        .collect()
}

pub const CLUSTER_DATA: &str = "cluster sample subset
5
x
y
z
por
perm
0.0 0.0 0.0 0.12 15.0
5.0 0.0 0.0 0.15 18.0
10.0 0.0 0.0 0.11 12.0
0.0 5.0 0.0 0.14 20.0
";
