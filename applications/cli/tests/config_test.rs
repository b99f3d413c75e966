//! Configuration loading tests

use outport_cli::{AppConfig, AppError};
use outport_cpal::AudioBackend;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_client_and_tone_sections() {
    let file = write_config(
        r#"
[client]
client_name = "bench"
device_name = "USB DAC"
chunk_frames = 256
ring_size = 4

[tone]
frequency = 1000.0
seconds = 0.5
"#,
    );

    let config = AppConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.client.client_name, "bench");
    assert_eq!(config.client.device_name.as_deref(), Some("USB DAC"));
    assert_eq!(config.client.chunk_frames, 256);
    assert_eq!(config.client.ring_size, 4);
    assert_eq!(config.client.backend, AudioBackend::Default);
    assert_eq!(config.tone.frequency, 1000.0);
    assert_eq!(config.tone.seconds, 0.5);
    assert_eq!(config.tone.amplitude, 0.2, "unset fields keep defaults");
    assert!(config.validate().is_ok());
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");

    let config = AppConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.client, outport_cpal::ClientConfig::default());
    assert_eq!(config.tone, outport_cli::ToneSettings::default());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = AppConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_config(
        r#"
[client]
ring_size = 1
"#,
    );

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert!(matches!(config.validate(), Err(AppError::Config(_))));
}

#[test]
fn malformed_file_is_a_config_error() {
    let file = write_config("[client\nchunk_frames = ");

    let err = AppConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
