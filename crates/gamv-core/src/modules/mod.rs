pub mod engine;
pub mod output;
pub mod parameters;
pub mod serialization;

mod traits;

pub use traits::EngineExecutor;
