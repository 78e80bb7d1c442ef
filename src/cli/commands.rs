//! Command dispatch: settings are resolved once, then each command runs on
//! the application and infrastructure layers.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{CorpusRecord, MiningPipeline, MiningReport, NoTrace, TraceSink};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::TreeNodeConvert;
use crate::infrastructure::{read_table, write_table, CorpusReader, FileTraceRecorder};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Mine {
            inputs,
            units,
            filtered,
            trace_dir,
            min_support,
            min_count,
        } => {
            let mut settings = Settings::load(cli.config.as_deref())?;
            apply_overrides(&mut settings, *min_support, *min_count);
            if trace_dir.is_some() {
                settings.trace_dir = trace_dir.clone();
            }
            cmd_mine(&settings, inputs, units, filtered)
        }
        Commands::Filter {
            units,
            output,
            min_count,
        } => {
            let mut settings = Settings::load(cli.config.as_deref())?;
            apply_overrides(&mut settings, None, *min_count);
            cmd_filter(&settings, units, output)
        }
        Commands::Tree {
            inputs,
            min_support,
        } => {
            let mut settings = Settings::load(cli.config.as_deref())?;
            apply_overrides(&mut settings, *min_support, None);
            cmd_tree(&settings, inputs)
        }
        Commands::Config { command } => cmd_config(command, cli.config.as_deref()),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Command line flags win over every config layer.
fn apply_overrides(settings: &mut Settings, min_support: Option<usize>, min_count: Option<usize>) {
    if let Some(value) = min_support {
        settings.min_support = value;
    }
    if let Some(value) = min_count {
        settings.min_count = value;
    }
}

#[instrument(skip(settings))]
fn cmd_mine(settings: &Settings, inputs: &[PathBuf], units: &Path, filtered: &Path) -> CliResult<()> {
    let pipeline = MiningPipeline::new(settings.policy())?;
    let records = CorpusReader::new(settings.sequence_column.as_str()).read_all(inputs)?;
    if records.is_empty() {
        output::warning("no corpus records found");
    }

    let report = match &settings.trace_dir {
        Some(dir) => {
            let mut recorder = FileTraceRecorder::create(dir)?;
            let report = run(&pipeline, records, &mut recorder)?;
            output::action(
                "Traced",
                &format!("{} snapshots in {}", recorder.files_written(), dir.display()),
            );
            report
        }
        None => run(&pipeline, records, &mut NoTrace)?,
    };

    write_table(units, &report.rows)?;
    write_table(filtered, &report.accepted)?;

    let stats = &report.stats;
    if stats.malformed > 0 {
        output::warning(&format!("skipped {} malformed records", stats.malformed));
    }
    output::header("Mining summary");
    output::detail(&format!(
        "records: {} ({} with numbers)",
        stats.records, stats.anchored
    ));
    output::detail(&format!("suffixes: {}", stats.suffixes));
    output::detail(&format!(
        "tree: {} nodes, depth {}, {} rounds",
        stats.nodes, stats.max_depth, stats.rounds
    ));
    output::action(
        "Wrote",
        &format!("{} units to {}", report.rows.len(), units.display()),
    );
    output::action(
        "Wrote",
        &format!("{} accepted units to {}", report.accepted.len(), filtered.display()),
    );
    Ok(())
}

fn run(
    pipeline: &MiningPipeline,
    records: Vec<CorpusRecord>,
    sink: &mut dyn TraceSink,
) -> CliResult<MiningReport> {
    Ok(pipeline.run(records, sink)?)
}

#[instrument(skip(settings))]
fn cmd_filter(settings: &Settings, units: &Path, out: &Path) -> CliResult<()> {
    let pipeline = MiningPipeline::new(settings.policy())?;
    let rows = read_table(units)?;
    let accepted = pipeline.filter_rows(&rows);
    debug!(rows = rows.len(), accepted = accepted.len(), "filtered");
    write_table(out, &accepted)?;
    output::action(
        "Wrote",
        &format!("{} of {} units to {}", accepted.len(), rows.len(), out.display()),
    );
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, inputs: &[PathBuf]) -> CliResult<()> {
    let pipeline = MiningPipeline::new(settings.policy())?;
    let records = CorpusReader::new(settings.sequence_column.as_str()).read_all(inputs)?;
    let (tree, _) = pipeline.build_tree(records, &mut NoTrace)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

fn cmd_config(command: &ConfigCommands, local: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(local)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::detail(&format!("global: {}{}", path.display(), state));
                }
                None => {
                    return Err(CliError::InvalidArgs(
                        "cannot determine config directory".into(),
                    ))
                }
            }
            if let Some(path) = local {
                output::detail(&format!("local:  {}", path.display()));
            }
        }
    }
    Ok(())
}
