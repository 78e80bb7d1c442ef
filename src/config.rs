//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/unitminer/unitminer.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `UNITMINER_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::policy::{
    DEFAULT_ANCHOR_TAG, DEFAULT_FORBIDDEN_TAGS, DEFAULT_FORBIDDEN_WORDS, DEFAULT_MIN_COUNT,
    DEFAULT_MIN_SUPPORT, DEFAULT_NUMERIC_STOP_FROM,
};
use crate::domain::MiningPolicy;

/// Column holding the tagged sentence in corpus tables.
pub const DEFAULT_SEQUENCE_COLUMN: &str = "tag_token_pairs";

/// Unified configuration for unitminer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tag marking the numbers that precede unit phrases
    pub anchor_tag: String,
    /// Support a group needs to become a tree node
    pub min_support: usize,
    /// Support a mined row needs to be accepted
    pub min_count: usize,
    /// Anchor-tagged integers from this value upwards stop growth
    pub numeric_stop_from: u64,
    /// Tags that stop growth and disqualify rows
    pub forbidden_tags: Vec<String>,
    /// Words that disqualify rows (case-insensitive substring match)
    pub forbidden_words: Vec<String>,
    /// Corpus column with the tagged sentence
    pub sequence_column: String,
    /// Directory for per-round tree snapshots
    pub trace_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anchor_tag: DEFAULT_ANCHOR_TAG.into(),
            min_support: DEFAULT_MIN_SUPPORT,
            min_count: DEFAULT_MIN_COUNT,
            numeric_stop_from: DEFAULT_NUMERIC_STOP_FROM,
            forbidden_tags: DEFAULT_FORBIDDEN_TAGS.iter().map(|t| t.to_string()).collect(),
            forbidden_words: DEFAULT_FORBIDDEN_WORDS.iter().map(|w| w.to_string()).collect(),
            sequence_column: DEFAULT_SEQUENCE_COLUMN.into(),
            trace_dir: None,
        }
    }
}

/// Raw settings for intermediate parsing (everything optional to detect
/// "not specified").
///
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub anchor_tag: Option<String>,
    pub min_support: Option<usize>,
    pub min_count: Option<usize>,
    pub numeric_stop_from: Option<u64>,
    pub forbidden_tags: Option<Vec<String>>,
    pub forbidden_words: Option<Vec<String>>,
    pub sequence_column: Option<String>,
    pub trace_dir: Option<PathBuf>,
}

/// Get the XDG config directory for unitminer.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "unitminer").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("unitminer.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["IN", "CC"], &["TO"])        // → ["CC", "IN", "TO"]
    /// merge_array(&["IN", "CC"], &["!IN", "TO"]) // → ["CC", "TO"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Apply global config onto defaults.
    ///
    /// Arrays use REPLACE semantics: a global list completely replaces the
    /// compiled default list.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            anchor_tag: global.anchor_tag.clone().unwrap_or_else(|| self.anchor_tag.clone()),
            min_support: global.min_support.unwrap_or(self.min_support),
            min_count: global.min_count.unwrap_or(self.min_count),
            numeric_stop_from: global.numeric_stop_from.unwrap_or(self.numeric_stop_from),
            forbidden_tags: global
                .forbidden_tags
                .clone()
                .unwrap_or_else(|| self.forbidden_tags.clone()),
            forbidden_words: global
                .forbidden_words
                .clone()
                .unwrap_or_else(|| self.forbidden_words.clone()),
            sequence_column: global
                .sequence_column
                .clone()
                .unwrap_or_else(|| self.sequence_column.clone()),
            trace_dir: global.trace_dir.clone().or_else(|| self.trace_dir.clone()),
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut merged = self.apply_global(&RawSettings {
            forbidden_tags: None,
            forbidden_words: None,
            ..overlay.clone()
        });
        if let Some(tags) = &overlay.forbidden_tags {
            merged.forbidden_tags = Self::merge_array(&self.forbidden_tags, tags);
        }
        if let Some(words) = &overlay.forbidden_words {
            merged.forbidden_words = Self::merge_array(&self.forbidden_words, words);
        }
        merged
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional run-specific config file
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Load global config (REPLACES defaults)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Local config (UNION with global); an explicitly named file must exist
        if let Some(local_path) = local {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (replace - explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply UNITMINER_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("UNITMINER")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("forbidden_tags")
                .with_list_parse_key("forbidden_words")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("anchor_tag") {
            settings.anchor_tag = val;
        }
        if let Ok(val) = config.get::<usize>("min_support") {
            settings.min_support = val;
        }
        if let Ok(val) = config.get::<usize>("min_count") {
            settings.min_count = val;
        }
        if let Ok(val) = config.get::<u64>("numeric_stop_from") {
            settings.numeric_stop_from = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("forbidden_tags") {
            settings.forbidden_tags = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("forbidden_words") {
            settings.forbidden_words = val;
        }
        if let Ok(val) = config.get_string("sequence_column") {
            settings.sequence_column = val;
        }
        if let Ok(val) = config.get_string("trace_dir") {
            settings.trace_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields. Unknown variables
    /// leave the path untouched.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.trace_dir {
            let raw = dir.to_string_lossy().into_owned();
            if let Ok(expanded) = shellexpand::full(&raw) {
                self.trace_dir = Some(PathBuf::from(expanded.into_owned()));
            }
        }
    }

    /// Algorithm parameters derived from these settings.
    pub fn policy(&self) -> MiningPolicy {
        MiningPolicy {
            anchor_tag: self.anchor_tag.clone(),
            min_support: self.min_support,
            min_count: self.min_count,
            numeric_stop_from: self.numeric_stop_from,
            forbidden_tags: self.forbidden_tags.iter().cloned().collect(),
            forbidden_words: Vec::new(),
        }
        .with_forbidden_words(&self.forbidden_words)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# unitminer configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/unitminer/unitminer.toml  (defines your baseline)
#   Local:  file passed with --config            (run-specific additions)
#   Env:    UNITMINER_* environment variables    (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!item" to REMOVE an inherited item:
#     forbidden_tags = ["-LRB-", "!CC"]  # adds -LRB-, removes CC

# Tag marking the numbers that precede unit phrases
# anchor_tag = "CD"

# Support a group needs to become a tree node while growing
# min_support = 10

# Support a mined unit needs to be accepted
# min_count = 100

# Anchor-tagged integers from this value upwards stop growth (0-4 continue)
# numeric_stop_from = 5

# Tags that stop growth and disqualify units
# forbidden_tags = ["VBZ", "VBD", "VBN", "VBP", "IN", "IN-IN", "IN-OF", "IN-OVER",
#                   "IN-FOR", "IN-WITH", "IN-UNDER", "DT-THE", "TO", "COMMA",
#                   "STOP", "CC", "WRB", "COLON"]

# Words that disqualify units (case-insensitive substring match)
# forbidden_words = ["elsevier"]

# Corpus column holding the tagged sentence
# sequence_column = "tag_token_pairs"

# Directory for per-round tree snapshots (0.txt, 1.txt, ...)
# trace_dir = "~/unitminer-trace"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
