use super::engine::EngineOutput;
use crate::domain::GamvResult;
use std::path::Path;

/// Runs the engine against a parameter file. `parameter_file` is relative to
/// `working_dir`, which is also the engine's current directory.
pub trait EngineExecutor {
    fn execute(&self, parameter_file: &Path, working_dir: &Path) -> GamvResult<EngineOutput>;
}

impl<T> EngineExecutor for &T
where
    T: EngineExecutor + ?Sized,
{
    fn execute(&self, parameter_file: &Path, working_dir: &Path) -> GamvResult<EngineOutput> {
        (**self).execute(parameter_file, working_dir)
    }
}
