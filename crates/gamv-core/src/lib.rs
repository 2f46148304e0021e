//! Driver for the GSLIB `gamv` experimental variogram program: validated
//! run configuration, parameter file serialization, engine invocation and
//! reshaping of the engine output into a keyed table.

pub mod config;
pub mod domain;
pub mod modules;
pub mod pipeline;

pub use config::{GamvConfig, GamvConfigBuilder, load_config_document};
pub use domain::{GamvError, GamvErrorCategory, GamvResult};
pub use modules::EngineExecutor;
pub use modules::engine::{EngineOptions, EngineOutput, ProcessEngine};
pub use modules::output::{RowKey, VariogramRow, VariogramTable};
pub use pipeline::{Gamv, GamvRun};
