use alien_invaders::config::*;

#[test]
fn defaults_match_classic_layout() {
    let c = GameConfig::default();
    assert_eq!((c.game_width, c.game_height), (800.0, 700.0));
    assert_eq!((c.alien_rows, c.aliens_in_row), (5, 12));
    assert_eq!(c.ship_lives, 3);
    assert_eq!(c.bolt_rate, 5);
    assert_eq!(c.seed, None);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let c = GameConfig::from_toml_str("alien_rows = 3\nseed = 7\nalien_speed = 0.5\n").unwrap();
    assert_eq!(c.alien_rows, 3);
    assert_eq!(c.seed, Some(7));
    assert_eq!(c.alien_speed, 0.5);
    assert_eq!(c.aliens_in_row, 12);
    assert_eq!(c.defense_line, 100.0);
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn zero_bolt_rate_is_rejected() {
    let err = GameConfig::from_toml_str("bolt_rate = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn empty_grid_is_rejected() {
    let err = GameConfig::from_toml_str("aliens_in_row = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn non_positive_speed_is_rejected() {
    let err = GameConfig::from_toml_str("bolt_speed = -1.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("bolt_speed")));
}

#[test]
fn defense_line_outside_playfield_is_rejected() {
    let err = GameConfig::from_toml_str("defense_line = 900.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let err = GameConfig::from_toml_str("alien_rows = \"five\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GameConfig::load("/nonexistent/invaders.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
