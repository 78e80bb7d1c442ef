//! Application layer: the mining use case
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod pipeline;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use pipeline::{CorpusRecord, MiningPipeline, MiningReport, NoTrace, RunStats, TraceSink};
