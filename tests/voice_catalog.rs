//! Integration tests for voice catalogs against a mock voice list.

use edge_tts_client::voice::{
    filter_by_gender, filter_by_language, find_voice_by_name, languages, locales,
    CachedVoiceCatalog, HttpVoiceCatalog, VoiceCatalog,
};
use mockito::Server;
use std::time::Duration;

const VOICE_LIST: &str = r#"[
  {"Name": "Microsoft Server Speech Text to Speech Voice (en-US, AriaNeural)", "ShortName": "en-US-AriaNeural", "FriendlyName": "Microsoft Aria Online (Natural) - English (United States)", "Locale": "en-US", "Gender": "Female", "Status": "GA"},
  {"Name": "Microsoft Server Speech Text to Speech Voice (en-GB, RyanNeural)", "ShortName": "en-GB-RyanNeural", "FriendlyName": "Microsoft Ryan Online (Natural) - English (United Kingdom)", "Locale": "en-GB", "Gender": "Male", "Status": "GA"},
  {"Name": "Microsoft Server Speech Text to Speech Voice (fr-FR, DeniseNeural)", "ShortName": "fr-FR-DeniseNeural", "FriendlyName": "Microsoft Denise Online (Natural) - French (France)", "Locale": "fr-FR", "Gender": "Female", "Status": "GA"}
]"#;

fn catalog(server: &Server) -> HttpVoiceCatalog {
    HttpVoiceCatalog::new(format!("{}/voices/list", server.url()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_parses_edge_voice_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/voices/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VOICE_LIST)
        .create_async()
        .await;

    let voices = catalog(&server).list_voices().await.unwrap();
    assert_eq!(voices.len(), 3);
    assert_eq!(voices[0].name, "en-US-AriaNeural");
    assert_eq!(voices[0].locale, "en-US");
    assert_eq!(voices[1].gender, "Male");

    assert_eq!(filter_by_language(&voices, "en").len(), 2);
    assert_eq!(filter_by_language(&voices, "en-GB").len(), 1);
    assert_eq!(filter_by_gender(&voices, "female").len(), 2);
    assert!(find_voice_by_name(&voices, "fr-FR-DeniseNeural").is_some());
    assert_eq!(languages(&voices), vec!["en".to_string(), "fr".to_string()]);
    assert_eq!(locales(&voices).len(), 3);
}

#[tokio::test]
async fn test_cache_hits_network_once_until_cleared() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/voices/list")
        .with_status(200)
        .with_body(VOICE_LIST)
        .expect(2)
        .create_async()
        .await;

    let cached = CachedVoiceCatalog::new(catalog(&server));
    assert!(!cached.is_cached());
    assert_eq!(cached.list_voices().await.unwrap().len(), 3);
    assert!(cached.is_cached());
    assert_eq!(cached.list_voices().await.unwrap().len(), 3);

    cached.clear_cache();
    assert!(!cached.is_cached());
    assert_eq!(cached.list_voices().await.unwrap().len(), 3);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_listing_is_not_cached() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/voices/list")
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let cached = CachedVoiceCatalog::new(catalog(&server));
    let err = cached.list_voices().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!cached.is_cached());
}

#[tokio::test]
async fn test_malformed_list_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/voices/list")
        .with_status(200)
        .with_body("{\"not\": \"a list\"}")
        .create_async()
        .await;

    assert!(catalog(&server).list_voices().await.is_err());
}
