//! Infrastructure layer: corpus files, result tables and trace files

pub mod corpus;
pub mod error;
pub mod table;
pub mod trace;

pub use corpus::CorpusReader;
pub use error::{InfraError, InfraResult};
pub use table::{read_table, write_table};
pub use trace::FileTraceRecorder;
