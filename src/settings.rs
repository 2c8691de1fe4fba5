//! Game settings
//!
//! Static configuration read once at startup. Stored as JSON next to the
//! high score file; missing fields fall back to the defaults in `consts`.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Grid;

/// Grid, cadence and starting length of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board width in the same units as `unit_size`
    pub grid_width: i32,
    /// Board height in the same units as `unit_size`
    pub grid_height: i32,
    /// Edge length of one cell
    pub unit_size: i32,
    /// Delay between the end of one tick and the start of the next
    pub tick_interval_ms: u64,
    /// Number of segments at game start
    pub initial_snake_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            unit_size: UNIT_SIZE,
            tick_interval_ms: TICK_INTERVAL_MS,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
        }
    }
}

impl Settings {
    /// Check the settings describe a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("unit_size", i64::from(self.unit_size))?;
        positive("grid_width", i64::from(self.grid_width))?;
        positive("grid_height", i64::from(self.grid_height))?;
        positive("tick_interval_ms", saturating_i64(self.tick_interval_ms))?;
        positive("initial_snake_length", saturating_i64(self.initial_snake_length))?;

        for (field, value) in [("grid_width", self.grid_width), ("grid_height", self.grid_height)] {
            if value % self.unit_size != 0 {
                return Err(ConfigError::NotUnitAligned {
                    field,
                    value,
                    unit: self.unit_size,
                });
            }
        }

        let grid = self.grid();
        // The starting body lies along the top row.
        if self.initial_snake_length > grid.columns() as usize {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                columns: grid.columns(),
            });
        }
        if self.initial_snake_length >= grid.cell_count() {
            return Err(ConfigError::NoRoomForFood {
                length: self.initial_snake_length,
                cells: grid.cell_count(),
            });
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height, self.unit_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields the defaults. The result is always validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = match fs::read_to_string(path) {
            Ok(json) => {
                let settings: Settings =
                    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

/// Unsigned values above `i64::MAX` stay positive instead of wrapping.
fn saturating_i64<T: TryInto<i64>>(value: T) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("grid-snake-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid().columns(), 20);
        assert_eq!(settings.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_unaligned_grid() {
        let settings = Settings {
            grid_width: 510,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NotUnitAligned { field: "grid_width", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let zero_tick = Settings {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_tick.validate(),
            Err(ConfigError::NotPositive { field: "tick_interval_ms", .. })
        ));

        let negative_unit = Settings {
            unit_size: -25,
            ..Default::default()
        };
        assert!(matches!(
            negative_unit.validate(),
            Err(ConfigError::NotPositive { field: "unit_size", .. })
        ));
    }

    #[test]
    fn test_huge_unsigned_values_do_not_wrap() {
        let slow = Settings {
            tick_interval_ms: u64::MAX,
            ..Default::default()
        };
        assert!(slow.validate().is_ok());

        let long = Settings {
            initial_snake_length: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            long.validate(),
            Err(ConfigError::SnakeTooLong { columns: 20, .. })
        ));
    }

    #[test]
    fn test_rejects_snake_longer_than_row() {
        let settings = Settings {
            grid_width: 100,
            initial_snake_length: 5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::SnakeTooLong { length: 5, columns: 4 })
        ));
    }

    #[test]
    fn test_rejects_board_without_room_for_food() {
        let settings = Settings {
            grid_width: 125,
            grid_height: 25,
            initial_snake_length: 5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NoRoomForFood { length: 5, cells: 5 })
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = scratch_path("missing-settings.json");
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let path = scratch_path("partial-settings.json");
        fs::write(&path, r#"{ "tick_interval_ms": 150 }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.tick_interval_ms, 150);
        assert_eq!(settings.unit_size, UNIT_SIZE);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = scratch_path("bad-settings.json");
        fs::write(&path, r#"{ "grid_height": 13 }"#).unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::NotUnitAligned { field: "grid_height", .. })
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("saved-settings.json");
        let settings = Settings {
            grid_width: 250,
            grid_height: 300,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        fs::remove_file(&path).unwrap();
    }
}
