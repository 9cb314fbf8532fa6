//! Tunable game constants, loadable from a TOML file.

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::grid::Grid;

pub const DEFAULT_SCREEN_WIDTH: i32 = 950;
pub const DEFAULT_SCREEN_HEIGHT: i32 = 600;
pub const DEFAULT_CELL_SIZE: i32 = 50;
pub const DEFAULT_FPS: u32 = 7;
pub const DEFAULT_MIN_TICK_MS: u64 = 80;
pub const DEFAULT_SPEED_STEP_MS: u64 = 10;
pub const DEFAULT_MAX_LENGTH: usize = 30;
pub const DEFAULT_SPEED_THRESHOLD: u32 = 5;
pub const DEFAULT_STICK_DEAD_ZONE: i16 = 25_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(i32),
    #[error("play field {width}x{height} is smaller than one {cell}px cell")]
    FieldTooSmall { width: i32, height: i32, cell: i32 },
    #[error("fps must be positive")]
    Fps,
    #[error("max snake length must be at least 1")]
    MaxLength,
    #[error("speed-increase threshold must be positive")]
    SpeedThreshold,
    #[error("minimum tick of {min}ms exceeds the base tick of {base}ms")]
    TickRange { min: u64, base: u64 },
    #[error("swipe threshold must not be negative, got {0}")]
    SwipeThreshold(i32),
    #[error("stick dead zone must not be negative, got {0}")]
    DeadZone(i16),
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config toml")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub screen_width: i32,
    pub screen_height: i32,
    pub cell_size: i32,
    /// Base tick rate; the starting interval is `1000 / fps` milliseconds.
    pub fps: u32,
    pub min_tick_ms: u64,
    pub speed_step_ms: u64,
    pub max_length: usize,
    /// Every this many points the tick interval shrinks by one step.
    pub speed_threshold: u32,
    /// Pointer travel in play-field pixels before a drag counts as a swipe.
    /// `None` means half a cell.
    pub swipe_threshold: Option<i32>,
    pub stick_dead_zone: i16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            fps: DEFAULT_FPS,
            min_tick_ms: DEFAULT_MIN_TICK_MS,
            speed_step_ms: DEFAULT_SPEED_STEP_MS,
            max_length: DEFAULT_MAX_LENGTH,
            speed_threshold: DEFAULT_SPEED_THRESHOLD,
            swipe_threshold: None,
            stick_dead_zone: DEFAULT_STICK_DEAD_ZONE,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if self.screen_width < self.cell_size || self.screen_height < self.cell_size {
            return Err(ConfigError::FieldTooSmall {
                width: self.screen_width,
                height: self.screen_height,
                cell: self.cell_size,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::Fps);
        }
        if self.max_length == 0 {
            return Err(ConfigError::MaxLength);
        }
        if self.speed_threshold == 0 {
            return Err(ConfigError::SpeedThreshold);
        }
        let base = self.base_tick().as_millis() as u64;
        if self.min_tick_ms > base {
            return Err(ConfigError::TickRange { min: self.min_tick_ms, base });
        }
        if let Some(threshold) = self.swipe_threshold {
            if threshold < 0 {
                return Err(ConfigError::SwipeThreshold(threshold));
            }
        }
        if self.stick_dead_zone < 0 {
            return Err(ConfigError::DeadZone(self.stick_dead_zone));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.screen_width, self.screen_height, self.cell_size)
    }

    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    pub fn swipe_threshold(&self) -> i32 {
        self.swipe_threshold.unwrap_or(self.cell_size / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.base_tick(), Duration::from_millis(142));
        assert_eq!(config.swipe_threshold(), 25);
        assert_eq!(config.grid().columns(), 19);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("cell_size = 25\nmax_length = 12\n").unwrap();
        assert_eq!(config.cell_size, 25);
        assert_eq!(config.max_length, 12);
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.swipe_threshold(), 12);
    }

    #[test]
    fn explicit_swipe_threshold_wins() {
        let config = Config::from_toml_str("swipe_threshold = 4").unwrap();
        assert_eq!(config.swipe_threshold(), 4);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(Config::from_toml_str("speed = 3"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Config::from_toml_str("cell_size = 0"), Err(ConfigError::CellSize(0))));
        assert!(matches!(
            Config::from_toml_str("screen_width = 10"),
            Err(ConfigError::FieldTooSmall { .. })
        ));
        assert!(matches!(Config::from_toml_str("fps = 0"), Err(ConfigError::Fps)));
        assert!(matches!(Config::from_toml_str("max_length = 0"), Err(ConfigError::MaxLength)));
        assert!(matches!(
            Config::from_toml_str("min_tick_ms = 500"),
            Err(ConfigError::TickRange { min: 500, base: 142 })
        ));
    }

    #[test]
    fn example_file_matches_defaults() {
        let config = Config::from_toml_str(include_str!("../snake.example.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
