//! Application configuration from environment variables.

use std::path::PathBuf;

use crate::types::{grid_size_for_level, Difficulty, PuzzleConfig, MAX_GRID_SIZE, MIN_GRID_SIZE};

pub const DEFAULT_SAVE_DIR: &str = ".jigsaw-saves";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Image to slice; `None` uses the procedural demo image
    pub image_path: Option<PathBuf>,
    pub level: u32,
    pub difficulty: Difficulty,
    pub grid_size: u8,
    /// `None` disables saving
    pub save_dir: Option<PathBuf>,
    pub seed: Option<u32>,
    pub log_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            level: 1,
            difficulty: Difficulty::Normal,
            grid_size: grid_size_for_level(1),
            save_dir: Some(PathBuf::from(DEFAULT_SAVE_DIR)),
            seed: None,
            log_path: None,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (used by `from_env` and tests).
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let level = non_empty("JIGSAW_LEVEL")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&l| l > 0)
            .unwrap_or(1);

        let difficulty = non_empty("JIGSAW_DIFFICULTY")
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();

        let grid_size = non_empty("JIGSAW_GRID_SIZE")
            .and_then(|s| s.parse::<u8>().ok())
            .map(|n| n.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE))
            .unwrap_or_else(|| grid_size_for_level(level));

        // Set but empty disables saving.
        let save_dir = match lookup("JIGSAW_SAVE_DIR") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s.trim())),
            None => Some(PathBuf::from(DEFAULT_SAVE_DIR)),
        };

        Self {
            image_path: non_empty("JIGSAW_IMAGE").map(PathBuf::from),
            level,
            difficulty,
            grid_size,
            save_dir,
            seed: non_empty("JIGSAW_SEED").and_then(|s| s.parse().ok()),
            log_path: non_empty("JIGSAW_LOG").map(PathBuf::from),
        }
    }

    pub fn puzzle_config(&self) -> PuzzleConfig {
        PuzzleConfig::preset(self.difficulty, self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn level_drives_grid_size() {
        let cfg = AppConfig::from_lookup(lookup(&[("JIGSAW_LEVEL", "25")]));
        assert_eq!(cfg.level, 25);
        assert_eq!(cfg.grid_size, 7);
    }

    #[test]
    fn explicit_grid_size_is_clamped() {
        let cfg = AppConfig::from_lookup(lookup(&[("JIGSAW_GRID_SIZE", "40")]));
        assert_eq!(cfg.grid_size, MAX_GRID_SIZE);
        let cfg = AppConfig::from_lookup(lookup(&[("JIGSAW_GRID_SIZE", "0")]));
        assert_eq!(cfg.grid_size, MIN_GRID_SIZE);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JIGSAW_LEVEL", "zero"),
            ("JIGSAW_DIFFICULTY", "nightmare"),
            ("JIGSAW_SEED", "-4"),
        ]));
        assert_eq!(cfg.level, 1);
        assert_eq!(cfg.difficulty, Difficulty::Normal);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn empty_save_dir_disables_saving() {
        let cfg = AppConfig::from_lookup(lookup(&[("JIGSAW_SAVE_DIR", " ")]));
        assert_eq!(cfg.save_dir, None);
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JIGSAW_SAVE_DIR", "/tmp/puzzles"),
            ("JIGSAW_DIFFICULTY", "Insane"),
        ]));
        assert_eq!(cfg.save_dir, Some(PathBuf::from("/tmp/puzzles")));
        assert!(!cfg.puzzle_config().auto_connect_correct_pieces);
    }
}
