use flight_shooter::config::{CurveWeight, GameConfig};
use flight_shooter::curve::CurveKind;
use flight_shooter::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    config.validate().unwrap();
    assert_eq!(config.waves.size, 5);
    assert_eq!(config.scoring.coin, 10);
    assert_eq!(config.scoring.enemy, 20);
    assert_eq!(config.player.start_health, 100);
    assert_eq!(
        config.curve_weights().unwrap(),
        vec![
            (CurveKind::Circle, 35),
            (CurveKind::Ellipse, 35),
            (CurveKind::Line, 30),
        ]
    );
}

#[test]
fn toml_round_trip_keeps_every_value() {
    let mut config = GameConfig::default();
    config.waves.size = 7;
    config.timers.wave_jitter_ms = 250.0;
    let text = config.to_toml().unwrap();
    assert_eq!(GameConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let config = GameConfig::from_toml("[waves]\nsize = 3\n").unwrap();
    assert_eq!(config.waves.size, 3);
    assert_eq!(config.waves.curves, GameConfig::default().waves.curves);
    assert_eq!(config.player, GameConfig::default().player);

    assert_eq!(GameConfig::from_toml("").unwrap(), GameConfig::default());
}

#[test]
fn curve_table_replaces_the_default() {
    let text = "[[waves.curves]]\nkind = \"vline\"\nweight = 4\n";
    let config = GameConfig::from_toml(text).unwrap();
    assert_eq!(config.curve_weights().unwrap(), vec![(CurveKind::Line, 4)]);
}

#[test]
fn unknown_curve_name_is_fatal() {
    let text = "[[waves.curves]]\nkind = \"spiral\"\nweight = 1\n";
    match GameConfig::from_toml(text) {
        Err(ConfigError::UnknownCurve(name)) => assert_eq!(name, "spiral"),
        other => panic!("expected UnknownCurve, got {:?}", other),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        GameConfig::from_toml("[waves\nsize = "),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        GameConfig::from_toml("[waves]\nsize = \"five\"\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn invalid_values_are_rejected() {
    let mut config = GameConfig::default();
    config.waves.size = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.waves.curves = vec![CurveWeight {
        kind: "circle".into(),
        weight: 0,
    }];
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.waves.curves.clear();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.player.min_x = 1.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = GameConfig::default();
    config.motion.slow_motion_divisor = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn only_toml_files_load() {
    match GameConfig::load_from_file("settings.json") {
        Err(ConfigError::UnsupportedFormat(path)) => assert_eq!(path, "settings.json"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("flight_shooter_missing_config.toml");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(
        GameConfig::load_from_file(&path),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn save_then_load() {
    let path = std::env::temp_dir().join(format!(
        "flight_shooter_config_{}.toml",
        std::process::id()
    ));
    let mut config = GameConfig::default();
    config.scoring.coin = 15;
    config.save_to_file(&path).unwrap();

    let loaded = GameConfig::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, config);
}
