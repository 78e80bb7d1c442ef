//! The mining use case: records → suffixes → grown tree → ranked and filtered rows.

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{
    extract_rows, parse_sequence, split_by_anchor, AcceptanceFilter, MiningPolicy, Suffix,
    TreeBuilder, UnitRow, UnitTree,
};

/// One sentence in its literal `[(tag, text), ...]` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// Where the record came from, e.g. `corpus.tsv:17`
    pub origin: String,
    pub text: String,
}

impl CorpusRecord {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }
}

/// Receives the tree after root creation and after every growth round.
pub trait TraceSink {
    fn record(&mut self, tree: &UnitTree) -> ApplicationResult<()>;
}

/// Sink that discards every snapshot.
#[derive(Debug, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _tree: &UnitTree) -> ApplicationResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    /// Records skipped because they could not be parsed
    pub malformed: usize,
    /// Records containing at least one anchor
    pub anchored: usize,
    pub suffixes: usize,
    pub rounds: usize,
    pub nodes: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct MiningReport {
    pub stats: RunStats,
    /// Every leaf, by descending count
    pub rows: Vec<UnitRow>,
    /// Rows passing the acceptance filter, same order
    pub accepted: Vec<UnitRow>,
}

pub struct MiningPipeline {
    builder: TreeBuilder,
    filter: AcceptanceFilter,
}

impl MiningPipeline {
    pub fn new(policy: MiningPolicy) -> ApplicationResult<Self> {
        policy.validate()?;
        Ok(Self {
            filter: AcceptanceFilter::new(&policy),
            builder: TreeBuilder::new(policy),
        })
    }

    pub fn policy(&self) -> &MiningPolicy {
        self.builder.policy()
    }

    /// Parse every record and split it at its anchors. Malformed records are
    /// logged and skipped.
    #[instrument(level = "debug", skip(self, records, stats))]
    pub fn collect_suffixes<I>(&self, records: I, stats: &mut RunStats) -> Vec<Suffix>
    where
        I: IntoIterator<Item = CorpusRecord>,
    {
        let anchor = self.policy().anchor_tag.as_str();
        let mut suffixes = Vec::new();
        for record in records {
            stats.records += 1;
            let tokens = match parse_sequence(&record.text) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(origin = %record.origin, "skipping record: {}", e);
                    stats.malformed += 1;
                    continue;
                }
            };
            let split = split_by_anchor(&tokens, anchor);
            if !split.is_empty() {
                stats.anchored += 1;
            }
            suffixes.extend(split);
        }
        stats.suffixes = suffixes.len();
        debug!(?stats, "collected suffixes");
        suffixes
    }

    /// Grow the tree to its fixed point, handing every snapshot to `sink`.
    #[instrument(level = "debug", skip(self, records, sink))]
    pub fn build_tree<I>(
        &self,
        records: I,
        sink: &mut dyn TraceSink,
    ) -> ApplicationResult<(UnitTree, RunStats)>
    where
        I: IntoIterator<Item = CorpusRecord>,
    {
        let mut stats = RunStats::default();
        let suffixes = self.collect_suffixes(records, &mut stats);

        let mut tree = self.builder.plant(suffixes);
        sink.record(&tree)?;
        loop {
            let outcome = self.builder.grow_round(&mut tree);
            stats.rounds += 1;
            sink.record(&tree)?;
            if !outcome.made_progress() {
                break;
            }
            debug!(round = stats.rounds, created = outcome.created, "tree grew");
        }
        stats.nodes = tree.len();
        stats.max_depth = tree.max_depth();
        Ok((tree, stats))
    }

    /// Full pass: build, extract, filter.
    #[instrument(level = "debug", skip(self, records, sink))]
    pub fn run<I>(&self, records: I, sink: &mut dyn TraceSink) -> ApplicationResult<MiningReport>
    where
        I: IntoIterator<Item = CorpusRecord>,
    {
        let (tree, stats) = self.build_tree(records, sink)?;
        let rows = extract_rows(&tree);
        let accepted = self.filter.apply(&rows);
        info!(
            records = stats.records,
            malformed = stats.malformed,
            rounds = stats.rounds,
            rows = rows.len(),
            accepted = accepted.len(),
            "mining finished"
        );
        Ok(MiningReport {
            stats,
            rows,
            accepted,
        })
    }

    /// Apply the acceptance filter to rows mined earlier.
    pub fn filter_rows(&self, rows: &[UnitRow]) -> Vec<UnitRow> {
        self.filter.apply(rows)
    }
}
