use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use scavenger_core::CountRange;
use scavenger_system_layout::LevelPlan;
use scavenger_system_turns::TurnConfig;
use scavenger_world::WorldConfig;
use serde::Deserialize;

/// Tuning loaded from an optional TOML file; absent keys keep the classic values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) seed: u64,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) walls: RangeConfig,
    pub(crate) resources: RangeConfig,
    pub(crate) starting_food: u32,
    pub(crate) wall_health: i32,
    pub(crate) wall_damage: i32,
    pub(crate) food_points: u32,
    pub(crate) soda_points: u32,
    pub(crate) zombie_damage: u32,
    pub(crate) vampire_damage: u32,
    pub(crate) move_time_ms: u64,
    pub(crate) turn_delay_ms: u64,
    pub(crate) level_start_delay_ms: u64,
    pub(crate) level_restart_delay_ms: u64,
}

/// Inclusive count range as written in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RangeConfig {
    pub(crate) min: i32,
    pub(crate) max: i32,
}

impl From<RangeConfig> for CountRange {
    fn from(range: RangeConfig) -> Self {
        CountRange::new(range.min, range.max)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            columns: 8,
            rows: 8,
            walls: RangeConfig { min: 5, max: 9 },
            resources: RangeConfig { min: 1, max: 5 },
            starting_food: 100,
            wall_health: 4,
            wall_damage: 1,
            food_points: 10,
            soda_points: 20,
            zombie_damage: 10,
            vampire_damage: 20,
            move_time_ms: 100,
            turn_delay_ms: 100,
            level_start_delay_ms: 2_000,
            level_restart_delay_ms: 1_000,
        }
    }
}

impl GameConfig {
    /// Reads and validates a config file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            self.columns >= 3 && self.rows >= 3,
            "board must be at least 3x3, got {}x{}",
            self.columns,
            self.rows
        );
        ensure!(
            self.columns > 3 || self.rows > 3,
            "a 3x3 board puts the exit on the player start"
        );
        ensure!(self.wall_health > 0, "wall_health must be positive");
        ensure!(self.wall_damage > 0, "wall_damage must be positive");
        for (name, range) in [("walls", self.walls), ("resources", self.resources)] {
            ensure!(
                CountRange::from(range).is_valid(),
                "{name} range {}..={} is malformed",
                range.min,
                range.max
            );
        }
        Ok(())
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        let move_time = Duration::from_millis(self.move_time_ms);
        WorldConfig {
            starting_food: self.starting_food,
            wall_health: self.wall_health,
            wall_damage: self.wall_damage,
            food_points: self.food_points,
            soda_points: self.soda_points,
            zombie_damage: self.zombie_damage,
            vampire_damage: self.vampire_damage,
            player_move_time: move_time,
            hazard_move_time: move_time,
        }
    }

    pub(crate) fn level_plan(&self) -> LevelPlan {
        LevelPlan {
            columns: self.columns,
            rows: self.rows,
            walls: self.walls.into(),
            resources: self.resources.into(),
            seed: self.seed,
        }
    }

    pub(crate) fn turn_config(&self) -> TurnConfig {
        TurnConfig::new(
            Duration::from_millis(self.level_start_delay_ms),
            Duration::from_millis(self.turn_delay_ms),
            Duration::from_millis(self.level_restart_delay_ms),
        )
    }
}
