use std::time::Duration;

use anyhow::{ensure, Result};
use common::{Config, ConfigLoader};
use engine::{PlayoutsStopper, StopperChain, TimeLimitStopper, VisitsStopper};
use serde::{Deserialize, Serialize};

/// Per-side play behavior options.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlayerSettings {
    /// Carry search statistics over from the previous move instead of
    /// discarding them.
    pub reuse_tree: bool,
    /// Resign when the win percentage drops below this value.
    pub resign_percentage: f32,
    /// Apply the resign percentage to any outcome probability rising above
    /// 100 minus the percentage, instead of the winrate dropping below it.
    pub resign_wdl_style: bool,
    /// Earliest move number at which resigning is allowed.
    pub resign_earliest_move: usize,
    /// Unless the selected move already has the most visits, discard and
    /// retry until its visit count reaches this threshold.
    pub minimum_allowed_visits: u32,
    /// Castling moves are encoded as king takes rook.
    pub alternate_castling: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            reuse_tree: false,
            resign_percentage: 0.0,
            resign_wdl_style: false,
            resign_earliest_move: 0,
            minimum_allowed_visits: 0,
            alternate_castling: false,
        }
    }
}

impl Config for PlayerSettings {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let resign_percentage = config
            .get("resign_percentage")
            .and_then(|v| v.as_f32())
            .unwrap_or(0.0);
        ensure!(
            (0.0..=100.0).contains(&resign_percentage),
            "resign_percentage must be within 0-100, got {}",
            resign_percentage
        );

        let resign_earliest_move = config
            .get("resign_earliest_move")
            .and_then(|v| v.as_usize())
            .unwrap_or(0);
        ensure!(
            resign_earliest_move <= 1000,
            "resign_earliest_move must be within 0-1000, got {}",
            resign_earliest_move
        );

        let minimum_allowed_visits = config
            .get("minimum_allowed_visits")
            .and_then(|v| v.as_usize())
            .unwrap_or(0);
        ensure!(
            minimum_allowed_visits <= 1_000_000,
            "minimum_allowed_visits must be within 0-1000000, got {}",
            minimum_allowed_visits
        );

        Ok(Self {
            reuse_tree: config
                .get("reuse_tree")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            resign_percentage,
            resign_wdl_style: config
                .get("resign_wdl_style")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            resign_earliest_move,
            minimum_allowed_visits: minimum_allowed_visits as u32,
            alternate_castling: config
                .get("alternate_castling")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }
}

/// Per-move search caps. An absent cap contributes nothing to the stopper
/// chain; with every cap absent the search is unbounded and termination is
/// the caller's responsibility.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SearchLimits {
    pub visits: Option<u64>,
    pub playouts: Option<u64>,
    pub movetime: Option<Duration>,
}

impl SearchLimits {
    pub fn make_search_stopper(&self) -> StopperChain {
        let mut chain = StopperChain::new();

        if let Some(visits) = self.visits {
            chain.add(Box::new(VisitsStopper::new(visits)));
        }
        if let Some(playouts) = self.playouts {
            chain.add(Box::new(PlayoutsStopper::new(playouts)));
        }
        if let Some(movetime) = self.movetime {
            chain.add(Box::new(TimeLimitStopper::new(movetime)));
        }

        chain
    }
}

impl Config for SearchLimits {
    fn load(config: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            visits: config.get("visits").and_then(|v| v.as_u64()),
            playouts: config.get("playouts").and_then(|v| v.as_u64()),
            movetime: config
                .get("movetime_ms")
                .and_then(|v| v.as_u64())
                .map(Duration::from_millis),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{SearchStats, SearchStopper};
    use std::fs;
    use std::path::PathBuf;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("self-play-options-{}.conf", name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn player_settings_defaults() {
        let path = write_config("defaults", "unrelated = 1\n");
        let loader = ConfigLoader::new(&path, "white".to_string()).unwrap();
        let settings: PlayerSettings = loader.load().unwrap();

        assert!(!settings.reuse_tree);
        assert_eq!(settings.resign_percentage, 0.0);
        assert!(!settings.resign_wdl_style);
        assert_eq!(settings.resign_earliest_move, 0);
        assert_eq!(settings.minimum_allowed_visits, 0);
        assert!(!settings.alternate_castling);
    }

    #[test]
    fn player_settings_reads_scoped_values() {
        let path = write_config(
            "scoped",
            "white {\n  reuse_tree = true\n  resign_percentage = 2.5\n  resign_wdl_style = true\n  resign_earliest_move = 20\n  minimum_allowed_visits = 100\n}\n",
        );
        let loader = ConfigLoader::new(&path, "white".to_string()).unwrap();
        let settings: PlayerSettings = loader.load().unwrap();

        assert!(settings.reuse_tree);
        assert_eq!(settings.resign_percentage, 2.5);
        assert!(settings.resign_wdl_style);
        assert_eq!(settings.resign_earliest_move, 20);
        assert_eq!(settings.minimum_allowed_visits, 100);
    }

    #[test]
    fn player_settings_rejects_out_of_range_values() {
        let path = write_config("range", "resign_percentage = 150.0\n");
        let loader = ConfigLoader::new(&path, "white".to_string()).unwrap();
        assert!(loader.load::<PlayerSettings>().is_err());

        let path = write_config("range2", "resign_earliest_move = 1001\n");
        let loader = ConfigLoader::new(&path, "white".to_string()).unwrap();
        assert!(loader.load::<PlayerSettings>().is_err());

        let path = write_config("range3", "minimum_allowed_visits = 1000001\n");
        let loader = ConfigLoader::new(&path, "white".to_string()).unwrap();
        assert!(loader.load::<PlayerSettings>().is_err());
    }

    #[test]
    fn unset_limits_build_an_empty_chain() {
        let chain = SearchLimits::default().make_search_stopper();
        assert!(chain.is_empty());
    }

    #[test]
    fn each_configured_cap_adds_one_stopper() {
        let limits = SearchLimits {
            visits: Some(800),
            playouts: None,
            movetime: Some(Duration::from_millis(100)),
        };
        let chain = limits.make_search_stopper();
        assert_eq!(chain.len(), 2);

        let stats = SearchStats {
            visits: 800,
            playouts: u64::MAX,
            elapsed: Duration::ZERO,
        };
        assert!(chain.should_stop(&stats));
    }
}
