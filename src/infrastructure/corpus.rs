//! Corpus reader for tab-separated sentence tables.
//!
//! Every input table has a header row; one column holds each sentence in the
//! tagging pipeline's literal form. Cells wrapped in double quotes by the
//! writing tool are unquoted first.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::application::CorpusRecord;
use crate::infrastructure::{InfraError, InfraResult};

pub const CORPUS_EXTENSION: &str = "tsv";

pub struct CorpusReader {
    column: String,
}

impl CorpusReader {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// Files behind `inputs`: plain files as given, directories walked
    /// recursively for `*.tsv` in sorted order.
    #[instrument(level = "debug")]
    pub fn input_files(inputs: &[PathBuf]) -> InfraResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for input in inputs {
            if input.is_file() {
                files.push(input.clone());
            } else if input.is_dir() {
                for entry in WalkDir::new(input).sort_by_file_name() {
                    let entry = entry.map_err(|e| InfraError::InvalidInput {
                        path: input.clone(),
                        reason: e.to_string(),
                    })?;
                    let is_corpus = entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext == CORPUS_EXTENSION);
                    if entry.file_type().is_file() && is_corpus {
                        files.push(entry.into_path());
                    }
                }
            } else {
                return Err(InfraError::InvalidInput {
                    path: input.clone(),
                    reason: "no such file or directory".to_string(),
                });
            }
        }
        debug!(files = files.len(), "resolved corpus inputs");
        Ok(files)
    }

    /// Read every record of every input.
    pub fn read_all(&self, inputs: &[PathBuf]) -> InfraResult<Vec<CorpusRecord>> {
        let mut records = Vec::new();
        for file in Self::input_files(inputs)? {
            records.extend(self.read_file(&file)?);
        }
        Ok(records)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn read_file(&self, path: &Path) -> InfraResult<Vec<CorpusRecord>> {
        let content = fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read corpus {}", path.display()), e))?;
        self.parse(path, &content)
    }

    /// Records of one table. A short row yields an empty record, which the
    /// pipeline then counts as malformed.
    pub fn parse(&self, path: &Path, content: &str) -> InfraResult<Vec<CorpusRecord>> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Ok(Vec::new());
        };
        let column = header
            .split('\t')
            .position(|name| unquote_cell(name) == self.column)
            .ok_or_else(|| InfraError::InvalidInput {
                path: path.to_path_buf(),
                reason: format!("missing column {:?}", self.column),
            })?;

        let records = lines
            .map(|(i, line)| {
                let cell = line.split('\t').nth(column).unwrap_or_default();
                CorpusRecord::new(
                    format!("{}:{}", path.display(), i + 1),
                    unquote_cell(cell).into_owned(),
                )
            })
            .collect();
        Ok(records)
    }
}

/// Strip writer-side quoting: `"a ""b"""` becomes `a "b"`.
pub fn unquote_cell(cell: &str) -> Cow<'_, str> {
    match cell
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => Cow::Owned(inner.replace("\"\"", "\"")),
        None => Cow::Borrowed(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("\"quoted\"", "quoted")]
    #[case("\"[('SYM', '\"\"')]\"", "[('SYM', '\"')]")]
    #[case("\"", "\"")]
    fn given_cell_when_unquoting_then_strips_writer_quotes(
        #[case] cell: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(unquote_cell(cell), expected);
    }

    #[test]
    fn given_table_when_parsing_then_reads_named_column() {
        let content = "pid\ttag_token_pairs\tyear\n\
                       1\t[('CD', '5'), ('NN', 'mL')]\t2020\n\
                       \n\
                       2\t[('NN', 'x')]\t2021\n";
        let reader = CorpusReader::new("tag_token_pairs");

        let records = reader.parse(Path::new("c.tsv"), content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "[('CD', '5'), ('NN', 'mL')]");
        assert_eq!(records[0].origin, "c.tsv:2");
        assert_eq!(records[1].origin, "c.tsv:4");
    }

    #[test]
    fn given_short_row_when_parsing_then_yields_empty_record() {
        let reader = CorpusReader::new("tag_token_pairs");

        let records = reader
            .parse(Path::new("c.tsv"), "pid\ttag_token_pairs\n7\n")
            .unwrap();

        assert_eq!(records, vec![CorpusRecord::new("c.tsv:2", "")]);
    }

    #[test]
    fn given_missing_column_when_parsing_then_errors() {
        let reader = CorpusReader::new("tag_token_pairs");

        let result = reader.parse(Path::new("c.tsv"), "pid\ttext\n1\tx\n");

        assert!(matches!(result, Err(InfraError::InvalidInput { .. })));
    }

    #[test]
    fn given_empty_file_when_parsing_then_no_records() {
        let reader = CorpusReader::new("tag_token_pairs");
        assert!(reader.parse(Path::new("c.tsv"), "").unwrap().is_empty());
    }
}
