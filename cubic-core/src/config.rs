//! Search configuration
//!
//! Supplied by the caller (CLI flags or a JSON file); nothing is persisted.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{CubicError, Result};
use crate::eval::HeuristicKind;

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 3;

/// Default transposition table capacity in entries
pub const DEFAULT_TABLE_CAPACITY: usize = 1 << 20;

/// Deepest search the engine accepts; one ply per cell
pub const MAX_DEPTH: u32 = 64;

/// Tree search algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Full minimax, no pruning
    Minimax,
    /// Minimax with alpha-beta cutoffs
    #[default]
    AlphaBeta,
}

impl Algorithm {
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Minimax => "minimax",
            Algorithm::AlphaBeta => "alpha-beta",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = CubicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(Algorithm::Minimax),
            "alpha-beta" | "alphabeta" | "ab" => Ok(Algorithm::AlphaBeta),
            other => Err(CubicError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Lifetime of the transposition table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableScope {
    /// Cleared at the start of every decision
    #[default]
    PerMove,
    /// Kept for the lifetime of the engine
    Session,
}

impl fmt::Display for TableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableScope::PerMove => "per-move",
            TableScope::Session => "session",
        })
    }
}

impl FromStr for TableScope {
    type Err = CubicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-move" | "move" => Ok(TableScope::PerMove),
            "session" | "game" => Ok(TableScope::Session),
            other => Err(CubicError::UnknownTableScope(other.to_string())),
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to search from the root
    pub depth: u32,
    /// Leaf estimator
    pub heuristic: HeuristicKind,
    pub algorithm: Algorithm,
    pub use_transposition_table: bool,
    /// Share table entries between mirrored positions
    pub symmetry_reduction: bool,
    /// Try interior-node children best-first by a one-ply heuristic score
    pub heuristic_ordering: bool,
    pub table_scope: TableScope,
    /// Maximum number of stored positions
    pub table_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            heuristic: HeuristicKind::Advanced,
            algorithm: Algorithm::AlphaBeta,
            use_transposition_table: true,
            symmetry_reduction: false,
            heuristic_ordering: false,
            table_scope: TableScope::PerMove,
            table_capacity: DEFAULT_TABLE_CAPACITY,
        }
    }
}

impl SearchConfig {
    /// Alpha-beta search at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            depth,
            algorithm: Algorithm::AlphaBeta,
            ..Default::default()
        }
    }

    /// Plain minimax at given depth
    pub fn minimax(depth: u32) -> Self {
        Self {
            depth,
            algorithm: Algorithm::Minimax,
            ..Default::default()
        }
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }

    pub fn with_symmetry(mut self, enabled: bool) -> Self {
        self.symmetry_reduction = enabled;
        self
    }

    pub fn with_heuristic_ordering(mut self, enabled: bool) -> Self {
        self.heuristic_ordering = enabled;
        self
    }

    pub fn with_table_scope(mut self, scope: TableScope) -> Self {
        self.table_scope = scope;
        self
    }

    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(CubicError::InvalidConfig(
                "search depth must be at least 1".to_string(),
            ));
        }
        if self.depth > MAX_DEPTH {
            return Err(CubicError::InvalidConfig(format!(
                "search depth {} exceeds {}",
                self.depth, MAX_DEPTH
            )));
        }
        if self.use_transposition_table && self.table_capacity == 0 {
            return Err(CubicError::InvalidConfig(
                "table capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: SearchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Short description, e.g. "alpha-beta/advanced d3 +tt"
    pub fn describe(&self) -> String {
        let mut s = format!("{}/{} d{}", self.algorithm, self.heuristic, self.depth);
        if self.use_transposition_table {
            s.push_str(" +tt");
        }
        if self.symmetry_reduction {
            s.push_str(" +sym");
        }
        if self.heuristic_ordering {
            s.push_str(" +order");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.heuristic, HeuristicKind::Advanced);
        assert_eq!(config.algorithm, Algorithm::AlphaBeta);
        assert!(config.use_transposition_table);
        assert!(!config.symmetry_reduction);
        assert!(!config.heuristic_ordering);
        assert_eq!(config.table_scope, TableScope::PerMove);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = SearchConfig::minimax(2)
            .with_heuristic(HeuristicKind::Simple)
            .with_symmetry(true)
            .with_table_scope(TableScope::Session);
        assert_eq!(config.algorithm, Algorithm::Minimax);
        assert_eq!(config.depth, 2);
        assert_eq!(config.heuristic, HeuristicKind::Simple);
        assert!(config.symmetry_reduction);
        assert_eq!(config.describe(), "minimax/simple d2 +tt +sym");

        let ordered = SearchConfig::alpha_beta(4).with_heuristic_ordering(true);
        assert!(ordered.heuristic_ordering);
        assert_eq!(ordered.describe(), "alpha-beta/advanced d4 +tt +order");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            SearchConfig::alpha_beta(0).validate(),
            Err(CubicError::InvalidConfig(_))
        ));
        assert!(SearchConfig::alpha_beta(65).validate().is_err());
        assert!(SearchConfig::default().with_table_capacity(0).validate().is_err());
        assert!(SearchConfig::default()
            .with_table_capacity(0)
            .with_transposition_table(false)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_json_partial_config() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"depth": 4, "heuristic": "simple", "algorithm": "minimax"}"#)
                .unwrap();
        assert_eq!(config.depth, 4);
        assert_eq!(config.heuristic, HeuristicKind::Simple);
        assert_eq!(config.algorithm, Algorithm::Minimax);
        assert_eq!(config.table_capacity, DEFAULT_TABLE_CAPACITY);

        let json = serde_json::to_string(&SearchConfig::default()).unwrap();
        assert!(json.contains("\"alpha-beta\""));
        assert!(json.contains("\"per-move\""));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("cubic-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"depth": 2, "symmetry_reduction": true, "heuristic_ordering": true}"#,
        )
        .unwrap();
        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.depth, 2);
        assert!(config.symmetry_reduction);
        assert!(config.heuristic_ordering);

        std::fs::write(&path, r#"{"depth": 0}"#).unwrap();
        assert!(SearchConfig::load(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("alpha-beta".parse::<Algorithm>().unwrap(), Algorithm::AlphaBeta);
        assert_eq!("Minimax".parse::<Algorithm>().unwrap(), Algorithm::Minimax);
        assert!("mcts".parse::<Algorithm>().is_err());
        assert_eq!("session".parse::<TableScope>().unwrap(), TableScope::Session);
        assert!("forever".parse::<TableScope>().is_err());
    }
}
