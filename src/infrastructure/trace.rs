//! Diagnostic trace files: one numbered snapshot of the tree per growth round.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, TraceSink};
use crate::domain::{render_trace, UnitTree};
use crate::infrastructure::{InfraError, InfraResult};

/// Writes `0.txt` after root creation and `n.txt` after round `n`.
/// The counter belongs to the recorder, so every run starts at `0.txt`.
#[derive(Debug)]
pub struct FileTraceRecorder {
    dir: PathBuf,
    next_file: usize,
}

impl FileTraceRecorder {
    #[instrument(level = "debug")]
    pub fn create(dir: &Path) -> InfraResult<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| InfraError::io(format!("create trace directory {}", dir.display()), e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            next_file: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files_written(&self) -> usize {
        self.next_file
    }
}

impl TraceSink for FileTraceRecorder {
    fn record(&mut self, tree: &UnitTree) -> ApplicationResult<()> {
        let path = self.dir.join(format!("{}.txt", self.next_file));
        fs::write(&path, render_trace(tree).join("\n")).with_path_context("write trace", &path)?;
        debug!(path = %path.display(), nodes = tree.len(), "trace written");
        self.next_file += 1;
        Ok(())
    }
}
