//! Integration tests for configuration files, presets and discovery.

use edge_tts_client::config::{ConfigManager, TtsConfig};
use edge_tts_client::tts::AudioFormat;
use edge_tts_client::Error;
use std::path::PathBuf;

fn field_of(err: &Error) -> Option<String> {
    err.context().and_then(|c| c.field_path.clone())
}

#[test]
fn test_partial_json_takes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tts_config.json");
    std::fs::write(
        &path,
        r#"{ "default_voice": "en-GB-SoniaNeural", "max_concurrent": 6, "unknown_key": true }"#,
    )
    .unwrap();

    let config = TtsConfig::from_file(&path).unwrap();
    assert_eq!(config.default_voice, "en-GB-SoniaNeural");
    assert_eq!(config.max_concurrent, 6);
    assert_eq!(config.batch_size, 5);
    assert_eq!(config.output_format, AudioFormat::Mp3);
    assert_eq!(config.timeout_ms, 30_000);
}

#[test]
fn test_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(
        &path,
        "output_format: wav\nbatch_size: 12\nssml: true\nendpoint: http://localhost:8880/v1/audio/speech\n",
    )
    .unwrap();

    let config = TtsConfig::from_file(&path).unwrap();
    assert_eq!(config.output_format, AudioFormat::Wav);
    assert_eq!(config.batch_size, 12);
    assert!(config.ssml);
    assert_eq!(
        config.endpoint.as_deref(),
        Some("http://localhost:8880/v1/audio/speech")
    );
}

#[test]
fn test_out_of_range_values_name_the_field() {
    let dir = tempfile::tempdir().unwrap();
    for (body, field) in [
        (r#"{ "batch_size": 0 }"#, "batch_size"),
        (r#"{ "max_concurrent": 0 }"#, "max_concurrent"),
        (r#"{ "timeout_ms": 0 }"#, "timeout_ms"),
        (r#"{ "default_voice": "  " }"#, "default_voice"),
        (r#"{ "endpoint": "not a url" }"#, "endpoint"),
    ] {
        let path = dir.path().join(format!("{}.json", field));
        std::fs::write(&path, body).unwrap();
        let err = TtsConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{}", err);
        assert_eq!(field_of(&err).as_deref(), Some(field), "{}", err);
    }
}

#[test]
fn test_unsupported_extension_and_bad_syntax() {
    let dir = tempfile::tempdir().unwrap();

    let toml = dir.path().join("config.toml");
    std::fs::write(&toml, "batch_size = 3").unwrap();
    assert!(matches!(
        TtsConfig::from_file(&toml),
        Err(Error::Configuration { .. })
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        TtsConfig::from_file(&broken),
        Err(Error::Configuration { .. })
    ));

    assert!(TtsConfig::from_file(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_every_preset_validates() {
    for name in TtsConfig::preset_names() {
        let config = TtsConfig::preset(name).unwrap();
        config.validate().unwrap();
    }
    let err = TtsConfig::preset("loudest").unwrap_err();
    assert!(err.to_string().contains("batch_processing"));
}

#[test]
fn test_preset_prosody_defaults_are_valid_markup() {
    use edge_tts_client::ssml::{create_prosody_ssml, SsmlValidator};

    for name in TtsConfig::preset_names() {
        let config = TtsConfig::preset(name).unwrap();
        let doc = create_prosody_ssml(
            "Hello",
            &config.default_voice,
            Some(&config.rate),
            Some(&config.pitch),
            Some(&config.volume),
        );
        assert!(SsmlValidator::is_valid(&doc), "preset {}: {}", name, doc);
    }
}

#[test]
fn test_save_and_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    for file in ["nested/config.json", "nested/config.yaml"] {
        let path = dir.path().join(file);
        let written = ConfigManager::create_default_config(&path, "batch_processing").unwrap();
        let loaded = TtsConfig::from_file(&path).unwrap();
        assert_eq!(loaded, written);
        assert_eq!(loaded.max_concurrent, 8);
    }
}

#[test]
fn test_manager_uses_first_existing_path() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.yaml");
    std::fs::write(&second, "batch_size: 7\n").unwrap();

    let manager = ConfigManager::with_search_paths(vec![first.clone(), second]);
    assert_eq!(manager.load(None).unwrap().batch_size, 7);

    std::fs::write(&first, r#"{ "batch_size": 9 }"#).unwrap();
    assert_eq!(manager.load(None).unwrap().batch_size, 9);
}

#[test]
fn test_manager_falls_back_to_defaults() {
    let manager = ConfigManager::with_search_paths(vec![PathBuf::from(
        "/nonexistent/edge-tts-client/config.json",
    )]);
    assert_eq!(manager.load(None).unwrap(), TtsConfig::default());
}

#[test]
fn test_explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("explicit.json");
    std::fs::write(&explicit, r#"{ "rate": "slow" }"#).unwrap();
    let manager = ConfigManager::with_search_paths(Vec::new());
    assert_eq!(manager.load(Some(&explicit)).unwrap().rate, "slow");
}
