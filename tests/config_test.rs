//! Tests for config.rs

use txt_stats::config::AppConfig;
use txt_stats::dates::DisplayZone;
use txt_stats::nlp::EXTRA_STOPWORDS;
use txt_stats::TxtStatsError;

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_imessage_config() {
    let config = AppConfig::default();

    assert_eq!(config.imessage.database_path, "");
    assert_eq!(config.imessage.timezone, "utc");
    assert_eq!(config.display_zone().expect("valid zone"), DisplayZone::Utc);
}

#[test]
fn test_default_charts_config() {
    let config = AppConfig::default();

    assert_eq!(config.extract.output_path, "messages.csv");
    assert_eq!(config.charts.output_dir, ".");
    assert_eq!(config.charts.text_length_cap, 800);
    assert_eq!(config.charts.num_words_cap, 202);
    assert_eq!(config.charts.histogram_bins, 50);
    assert!(config.charts.parallel);
    assert_eq!(config.charts.extra_stopwords.len(), EXTRA_STOPWORDS.len());
    assert_eq!(config.font_path(), None);
}

#[test]
fn test_invalid_log_level_rejected() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(matches!(config.validate(), Err(TxtStatsError::InvalidConfig(_))));
}

#[test]
fn test_invalid_log_format_rejected() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_caps_rejected() {
    let mut config = AppConfig::default();
    config.charts.text_length_cap = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.charts.num_words_cap = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_output_path_rejected() {
    let mut config = AppConfig::default();
    config.extract.output_path = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_local_timezone_accepted() {
    let mut config = AppConfig::default();
    config.imessage.timezone = "local".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.display_zone().expect("valid zone"), DisplayZone::Local);
}

#[test]
fn test_font_path_trimmed() {
    let mut config = AppConfig::default();
    config.charts.font_path = "  /fonts/Arial.ttf ".to_string();
    assert_eq!(config.font_path(), Some(std::path::PathBuf::from("/fonts/Arial.ttf")));
}

#[test]
fn test_config_serialization() {
    let defaults = AppConfig::default();
    let built = config::Config::try_from(&defaults).expect("Failed to serialize config");
    let restored: AppConfig = built.try_deserialize().expect("Failed to deserialize config");

    assert_eq!(restored.charts.histogram_bins, defaults.charts.histogram_bins);
    assert_eq!(restored.imessage.timezone, defaults.imessage.timezone);
    assert_eq!(restored.charts.extra_stopwords, defaults.charts.extra_stopwords);
}
