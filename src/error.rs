use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown difficulty '{name}' (available: {})", available.join(", "))]
    UnknownDifficulty { name: String, available: Vec<String> },
    #[error(
        "board sides must be between 1 and {}, got {width}x{height}",
        crate::config::MAX_BOARD_SIDE
    )]
    InvalidDimensions { width: u32, height: u32 },
    #[error("num_food must be at least 1")]
    NoFood,
    #[error("max_moves must be at least 1")]
    NoMoves,
    #[error("a {width}x{height} board cannot hold {required} food items and snakes")]
    BoardTooSmall {
        width: u32,
        height: u32,
        required: u64,
    },
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
}
