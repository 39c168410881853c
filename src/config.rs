use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "difficulties.toml";

/// Largest board side accepted, so every coordinate fits comfortably in `i32`.
pub const MAX_BOARD_SIDE: u32 = 4096;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub num_enemies: u32,
    pub num_food: u32,
    pub max_moves: u32,
    /// Playback speed for the terminal renderer. The engine ignores it.
    #[serde(default = "default_moves_per_second")]
    pub moves_per_second: f32,
}

fn default_moves_per_second() -> f32 {
    10.0
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 10,
            height: 10,
            num_enemies: 1,
            num_food: 5,
            max_moves: 1000,
            moves_per_second: default_moves_per_second(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_BOARD_SIDE
            || self.height > MAX_BOARD_SIDE
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.num_food == 0 {
            return Err(ConfigError::NoFood);
        }
        if self.max_moves == 0 {
            return Err(ConfigError::NoMoves);
        }

        // Every snake needs its own empty cell after the food has been placed.
        let required = u64::from(self.num_food) + u64::from(self.num_enemies) + 1;
        if required > u64::from(self.width) * u64::from(self.height) {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                required,
            });
        }
        Ok(())
    }
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Named configuration profiles, e.g. the contents of `difficulties.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DifficultyTable {
    #[serde(default = "default_difficulty")]
    pub default_difficulty: String,
    pub difficulties: BTreeMap<String, GameConfig>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let preset = |width, height, num_enemies, num_food, max_moves, moves_per_second| {
            GameConfig {
                width,
                height,
                num_enemies,
                num_food,
                max_moves,
                moves_per_second,
            }
        };

        let mut difficulties = BTreeMap::new();
        difficulties.insert("easy".to_string(), preset(10, 10, 1, 5, 1000, 10.0));
        difficulties.insert("medium".to_string(), preset(15, 15, 3, 4, 1000, 12.0));
        difficulties.insert("hard".to_string(), preset(20, 20, 6, 3, 1000, 15.0));
        difficulties.insert("chaos".to_string(), preset(25, 25, 12, 6, 1500, 20.0));

        DifficultyTable {
            default_difficulty: default_difficulty(),
            difficulties,
        }
    }
}

impl DifficultyTable {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: DifficultyTable = toml::from_str(content)?;
        for config in table.difficulties.values() {
            config.validate()?;
        }
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise falls back to the built-in presets.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no difficulty file, using built-in presets");
            Ok(Self::default())
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.difficulties.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Result<&GameConfig, ConfigError> {
        self.difficulties
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDifficulty {
                name: name.to_string(),
                available: self.names(),
            })
    }
}
