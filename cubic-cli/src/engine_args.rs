//! Engine flags shared by the commands that run an AI player

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cubic_core::{Algorithm, HeuristicKind, SearchConfig, TableScope};

#[derive(Args, Clone, Debug)]
pub struct EngineArgs {
    /// Search depth in plies
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Leaf heuristic: simple or advanced
    #[arg(long, default_value = "advanced")]
    pub heuristic: HeuristicKind,

    /// Search algorithm: minimax or alpha-beta
    #[arg(long, default_value = "alpha-beta")]
    pub algorithm: Algorithm,

    /// Disable the transposition table
    #[arg(long)]
    pub no_table: bool,

    /// Share table entries between symmetric positions
    #[arg(long)]
    pub symmetry: bool,

    /// Order interior moves by a one-ply heuristic score
    #[arg(long)]
    pub ordering: bool,

    /// Table lifetime: per-move or session
    #[arg(long, default_value = "per-move")]
    pub table_scope: TableScope,

    /// JSON engine config (replaces the flags above)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl EngineArgs {
    /// Build a validated search configuration
    pub fn to_config(&self) -> Result<SearchConfig> {
        if let Some(path) = &self.config {
            return SearchConfig::load(path);
        }

        let config = SearchConfig {
            depth: self.depth,
            heuristic: self.heuristic,
            algorithm: self.algorithm,
            use_transposition_table: !self.no_table,
            symmetry_reduction: self.symmetry,
            heuristic_ordering: self.ordering,
            table_scope: self.table_scope,
            ..Default::default()
        };
        config.validate().context("Invalid engine flags")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EngineArgs {
        EngineArgs {
            depth: 2,
            heuristic: HeuristicKind::Simple,
            algorithm: Algorithm::Minimax,
            no_table: true,
            symmetry: false,
            ordering: true,
            table_scope: TableScope::Session,
            config: None,
        }
    }

    #[test]
    fn test_flags_to_config() {
        let config = args().to_config().unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.heuristic, HeuristicKind::Simple);
        assert_eq!(config.algorithm, Algorithm::Minimax);
        assert!(!config.use_transposition_table);
        assert!(config.heuristic_ordering);
        assert_eq!(config.table_scope, TableScope::Session);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut a = args();
        a.depth = 0;
        assert!(a.to_config().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let mut a = args();
        a.config = Some(PathBuf::from("/nonexistent/cubic-engine.json"));
        let err = a.to_config().unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
