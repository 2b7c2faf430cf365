//! Integration tests for the extractor pipeline against a mocked Picta API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use picta_dl::extractor::{ErrorKind, ExtractContext, ExtractorConfig, build_default_registry};
use picta_dl::{FormatSelector, StreamContent};
use serde_json::{Value, json};
use support::socket_guard::start_mock_server_or_skip;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SLUG: &str = "orishas-everyday-2019-01-16-16-36-42-443003";

const SINGLE_MUXED_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static">
  <Period id="0">
    <AdaptationSet id="0" mimeType="video/mp4">
      <Representation id="1" codecs="avc1.4d401e,mp4a.40.2" bandwidth="1200000" width="640" height="360"/>
    </AdaptationSet>
  </Period>
</MPD>"#;

const SEPARATE_TRACKS_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static">
  <Period id="0">
    <AdaptationSet id="0" contentType="video" mimeType="video/webm">
      <Representation id="1" codecs="vp9" bandwidth="350000" width="426" height="240"/>
      <Representation id="2" codecs="vp9" bandwidth="900000" width="854" height="480"/>
    </AdaptationSet>
    <AdaptationSet id="1" contentType="audio" mimeType="audio/webm" lang="es">
      <Representation id="3" codecs="opus" bandwidth="128000"/>
    </AdaptationSet>
  </Period>
</MPD>"#;

const EMPTY_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static">
  <Period id="0"/>
</MPD>"#;

const PERIODLESS_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static"></MPD>"#;

fn config_for(server: &MockServer) -> ExtractorConfig {
    ExtractorConfig {
        host: "example.org".to_string(),
        api_base_url: format!("{}/api/v2/", server.uri()),
        ..ExtractorConfig::default()
    }
}

fn publication(server: &MockServer, manifest_path: Option<&str>) -> Value {
    json!({
        "count": 1,
        "results": [{
            "id": SLUG,
            "nombre": "Orishas - Everyday",
            "descripcion": "Orishas - Everyday (Video Oficial)",
            "usuario": {"username": "admin"},
            "fecha_creacion": "2019-01-16T16:36:42",
            "url_imagen": "https://www.example.org/imagen/orishas.png",
            "url_manifiesto": manifest_path.map(|p| format!("{}{p}", server.uri())),
            "canal": {"nombre": "Música"}
        }]
    })
}

async fn mount_publication(server: &MockServer, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v2/publicacion/"))
        .and(query_param("format", "json"))
        .and(query_param("slug_url_raw", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_manifest(server: &MockServer, manifest_path: &str, xml: &str) {
    Mock::given(method("GET"))
        .and(path(manifest_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/dash+xml")
                .set_body_string(xml),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_canonical_url_end_to_end() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, Some("/videos/manifest.mpd"))).await;
    mount_manifest(&server, "/videos/manifest.mpd", SINGLE_MUXED_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let media = registry
        .resolve_url(
            &format!("https://www.example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(media.id(), SLUG);
    assert_eq!(media.metadata.title.as_deref(), Some("Orishas - Everyday"));
    assert_eq!(media.metadata.timestamp, Some(1_547_656_602));
    assert_eq!(media.metadata.upload_date.as_deref(), Some("20190116"));
    assert_eq!(media.metadata.uploader.as_deref(), Some("admin"));
    assert_eq!(media.metadata.category, Some(vec!["Música".to_string()]));
    assert_eq!(media.formats.len(), 1);
    assert_eq!(media.formats[0].content, StreamContent::AudioVideo);
    assert_eq!(media.formats[0].height, Some(360));
}

#[tokio::test]
async fn test_resolve_embed_url_delegates_to_canonical() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    // The numeric id is what gets looked up; the document answers with the slug.
    mount_publication(&server, "818", publication(&server, Some("/videos/manifest.mpd"))).await;
    mount_manifest(&server, "/videos/manifest.mpd", SINGLE_MUXED_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let media = registry
        .resolve_url("https://www.example.org/embed/?v=818", &ExtractContext::default())
        .await
        .unwrap();

    assert_eq!(media.id(), SLUG);
    assert_ne!(media.id(), "818");
}

#[tokio::test]
async fn test_resolve_embed_and_canonical_agree() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, "818", publication(&server, Some("/videos/manifest.mpd"))).await;
    mount_manifest(&server, "/videos/manifest.mpd", SEPARATE_TRACKS_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let ctx = ExtractContext::default();
    let via_embed = registry
        .resolve_url("https://www.example.org/embed/?v=818", &ctx)
        .await
        .unwrap();
    let via_canonical = registry
        .resolve_url("https://example.org/medias/818", &ctx)
        .await
        .unwrap();

    assert_eq!(via_embed, via_canonical);
}

#[tokio::test]
async fn test_resolve_ranks_and_selects_separate_tracks() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, Some("/videos/manifest.mpd"))).await;
    mount_manifest(&server, "/videos/manifest.mpd", SEPARATE_TRACKS_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let media = registry
        .resolve_url(
            &format!("https://example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = media.formats.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "3"]);
    assert_eq!(media.select(&FormatSelector::BestAudio).unwrap().format_id, "3");
    assert_eq!(media.select(&FormatSelector::Worst).unwrap().format_id, "3");
    assert_eq!(
        media
            .select(&FormatSelector::Id("9".to_string()))
            .unwrap_err()
            .kind(),
        ErrorKind::Selection
    );
}

#[tokio::test]
async fn test_resolve_without_manifest_fails_no_formats() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, None)).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(
            &format!("https://example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoFormats);
    assert!(err.to_string().contains("cannot find video formats"));
}

#[tokio::test]
async fn test_resolve_empty_manifest_fails_no_formats() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, Some("/videos/empty.mpd"))).await;
    mount_manifest(&server, "/videos/empty.mpd", EMPTY_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(
            &format!("https://example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoFormats);
}

#[tokio::test]
async fn test_resolve_periodless_manifest_fails_no_formats() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, Some("/videos/bare.mpd"))).await;
    mount_manifest(&server, "/videos/bare.mpd", PERIODLESS_MPD).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(
            &format!("https://example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoFormats);
}

#[tokio::test]
async fn test_resolve_unreachable_manifest_fails_manifest() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, publication(&server, Some("/videos/missing.mpd"))).await;
    Mock::given(method("GET"))
        .and(path("/videos/missing.mpd"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(
            &format!("https://example.org/medias/{SLUG}"),
            &ExtractContext::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Manifest);
}

#[tokio::test]
async fn test_resolve_unknown_publication_fails_upstream() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/api/v2/publicacion/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url("https://example.org/medias/missing", &ExtractContext::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn test_resolve_invalid_json_fails_upstream() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/api/v2/publicacion/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(&format!("https://example.org/medias/{SLUG}"), &ExtractContext::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().contains("unexpected format"));
}

#[tokio::test]
async fn test_resolve_missing_title_fails_metadata() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_publication(&server, SLUG, json!({"results": [{"id": SLUG}]})).await;

    let registry = build_default_registry(&config_for(&server)).unwrap();
    let err = registry
        .resolve_url(&format!("https://example.org/medias/{SLUG}"), &ExtractContext::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Metadata);
}

#[tokio::test]
async fn test_resolve_foreign_url_fails_no_match() {
    let registry = build_default_registry(&ExtractorConfig::default()).unwrap();
    let err = registry
        .resolve_url("https://www.youtube.com/watch?v=abc", &ExtractContext::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatch);
}
