use snake_arena::config::{DifficultyTable, GameConfig, DEFAULT_CONFIG_PATH};
use snake_arena::error::ConfigError;

#[test]
fn bundled_difficulty_file_matches_builtin_presets() {
    let table = DifficultyTable::load(DEFAULT_CONFIG_PATH).expect("bundled file should parse");
    assert_eq!(table, DifficultyTable::default());
    assert_eq!(table.default_difficulty, "medium");
    assert_eq!(table.names(), vec!["chaos", "easy", "hard", "medium"]);
}

#[test]
fn missing_file_falls_back_to_presets() {
    let table = DifficultyTable::load_or_default("does/not/exist.toml").expect("defaults");
    assert_eq!(table, DifficultyTable::default());

    match DifficultyTable::load("does/not/exist.toml") {
        Err(ConfigError::Io { path, .. }) => assert!(path.ends_with("exist.toml")),
        other => panic!("expected an io error, got {:?}", other),
    }
}

#[test]
fn parses_a_custom_table() {
    let table = DifficultyTable::from_toml_str(
        r#"
        [difficulties.tiny]
        width = 4
        height = 3
        num_enemies = 0
        num_food = 1
        max_moves = 20
        "#,
    )
    .expect("valid table");

    let tiny = table.get("tiny").expect("tiny exists");
    assert_eq!((tiny.width, tiny.height), (4, 3));
    assert_eq!(tiny.moves_per_second, 10.0);
    assert_eq!(table.default_difficulty, "medium");
}

#[test]
fn unknown_difficulty_lists_the_available_ones() {
    let table = DifficultyTable::default();
    let err = table.get("nightmare").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownDifficulty { .. }));
    assert_eq!(
        err.to_string(),
        "unknown difficulty 'nightmare' (available: chaos, easy, hard, medium)"
    );
}

#[test]
fn invalid_profiles_are_rejected_on_load() {
    let result = DifficultyTable::from_toml_str(
        r#"
        [difficulties.broken]
        width = 0
        height = 5
        num_enemies = 1
        num_food = 1
        max_moves = 10
        "#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidDimensions { width: 0, height: 5 })
    ));

    let result = DifficultyTable::from_toml_str("difficulties = 3");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn validate_checks_every_limit() {
    let base = GameConfig::default();
    assert!(base.validate().is_ok());

    let cases = vec![
        (
            GameConfig { num_food: 0, ..base.clone() },
            "num_food must be at least 1",
        ),
        (
            GameConfig { max_moves: 0, ..base.clone() },
            "max_moves must be at least 1",
        ),
        (
            GameConfig { width: 5000, ..base.clone() },
            "board sides must be between 1 and 4096, got 5000x10",
        ),
        (
            GameConfig {
                width: 2,
                height: 2,
                num_enemies: 2,
                num_food: 2,
                ..base.clone()
            },
            "a 2x2 board cannot hold 5 food items and snakes",
        ),
    ];

    for (config, message) in cases {
        let err = config.validate().expect_err("config should be rejected");
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn smallest_legal_board_fits_exactly() {
    let config = GameConfig {
        width: 2,
        height: 2,
        num_enemies: 2,
        num_food: 1,
        ..GameConfig::default()
    };
    assert!(config.validate().is_ok());
}
