//! Tests for the storage client against a mock Storage API.

use serde_json::json;
use std::time::Duration;
use vex_core::{Catalog, Track};
use vex_storage_client::{StorageClient, StorageClientError, StorageConfig, UploadOptions};
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "v3xv0id-music";
const LIST_PATH: &str = "/storage/v1/object/list/v3xv0id-music";

fn client_for(server: &MockServer) -> StorageClient {
    StorageClient::new(StorageConfig::new(server.uri()).with_api_key("service-key")).unwrap()
}

fn listed(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "id": format!("id-{name}"),
        "updated_at": "2025-06-16T10:00:00.000Z",
        "created_at": "2025-06-16T10:00:00.000Z",
        "last_accessed_at": "2025-06-16T10:00:00.000Z",
        "metadata": { "size": 4_200_000, "mimetype": "audio/mpeg", "cacheControl": "max-age=31536000" }
    })
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_https_url() {
        assert!(StorageClient::new(StorageConfig::new("https://abc.supabase.co")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match StorageClient::new(StorageConfig::new("")) {
            Err(StorageClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        assert!(matches!(
            StorageClient::new(StorageConfig::new("abc.supabase.co")),
            Err(StorageClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let config = StorageConfig::new("https://abc.supabase.co").with_bucket("");
        assert!(matches!(
            StorageClient::new(config),
            Err(StorageClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let client = StorageClient::new(StorageConfig::new("https://abc.supabase.co///")).unwrap();
        assert_eq!(client.url(), "https://abc.supabase.co");
        assert_eq!(client.bucket(), BUCKET);
    }
}

// =============================================================================
// Listing Tests
// =============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_list_objects_sends_list_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .and(body_json(json!({
                "prefix": "",
                "limit": 1000,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([listed("Echoes in the Fog.mp3"), listed("Silent Shadows.mp3")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let objects = client_for(&server).list_objects().await.unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].name, "Echoes in the Fog.mp3");
        assert_eq!(objects[0].size(), Some(4_200_000));
        assert!(objects[0].updated_at.is_some());
        assert!(!objects[0].is_folder());
    }

    #[tokio::test]
    async fn test_list_objects_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "statusCode": "404",
                "error": "Bucket not found",
                "message": "Bucket not found"
            })))
            .mount(&server)
            .await;

        match client_for(&server).list_objects().await {
            Err(StorageClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bucket not found");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_uploaded_filenames_skips_folders() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "archive", "id": null, "updated_at": null, "created_at": null, "metadata": null },
                listed("Midnight Reverie.mp3")
            ])))
            .mount(&server)
            .await;

        let names = client_for(&server).uploaded_filenames().await;
        assert_eq!(names, vec!["Midnight Reverie.mp3".to_string()]);
    }

    #[tokio::test]
    async fn test_uploaded_filenames_empty_on_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        assert!(client_for(&server).uploaded_filenames().await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_status_against_catalog() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([listed("a.mp3"), listed("stray.mp3"), listed("c.mp3")])),
            )
            .mount(&server)
            .await;

        let catalog = Catalog::from_tracks(vec![
            Track::new("a", "A", "a.mp3"),
            Track::new("b", "B", "b.mp3"),
            Track::new("c", "C", "c.mp3"),
        ])
        .unwrap();

        let status = client_for(&server).upload_status(&catalog).await;

        assert_eq!(status.total, 3);
        assert_eq!(status.uploaded, 2);
        assert_eq!(status.remaining, 1);
        assert_eq!(status.missing().collect::<Vec<_>>(), vec!["b.mp3"]);
    }
}

// =============================================================================
// Upload Tests
// =============================================================================

mod upload {
    use super::*;

    #[tokio::test]
    async fn test_upload_bytes_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/Echoes%20in%20the%20Abyss%20(1).mp3"))
            .and(header("x-upsert", "true"))
            .and(header("cache-control", "max-age=31536000"))
            .and(header("content-type", "audio/mpeg"))
            .and(header("apikey", "service-key"))
            .and(body_bytes(b"ID3fake".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Key": "v3xv0id-music/Echoes in the Abyss (1).mp3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .upload()
            .upload_bytes(
                "Echoes in the Abyss (1).mp3",
                b"ID3fake".to_vec(),
                &UploadOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(response.key, "v3xv0id-music/Echoes in the Abyss (1).mp3");
    }

    #[tokio::test]
    async fn test_upload_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/a.mp3"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "15"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .upload()
            .upload_bytes("a.mp3", vec![1, 2, 3], &UploadOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(StorageClientError::RateLimited { retry_after_secs: 15 })
        ));
    }

    #[tokio::test]
    async fn test_upload_file_not_found() {
        let server = MockServer::start().await;

        let result = client_for(&server)
            .upload()
            .upload_file("/definitely/not/here.mp3".as_ref())
            .await;

        assert!(matches!(result, Err(StorageClientError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_directory_missing() {
        let server = MockServer::start().await;

        let result = client_for(&server)
            .upload()
            .upload_directory("/definitely/not/here".as_ref(), Duration::ZERO, |_| {})
            .await;

        assert!(matches!(result, Err(StorageClientError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_directory_filters_and_reports() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join("b.wav"), b"RIFF").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"ID3").unwrap();
        std::fs::write(dir.path().join("cover.png"), b"PNG").unwrap();
        std::fs::write(dir.path().join("broken.m4a"), b"ftyp").unwrap();

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/a.mp3"))
            .and(header("content-type", "audio/mpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "v3xv0id-music/a.mp3" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/b.wav"))
            .and(header("content-type", "audio/wav"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "v3xv0id-music/b.wav" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/broken.m4a"))
            .respond_with(ResponseTemplate::new(413).set_body_string("Payload too large"))
            .expect(1)
            .mount(&server)
            .await;

        let mut seen = Vec::new();
        let summary = client_for(&server)
            .upload()
            .upload_directory(dir.path(), Duration::from_millis(1), |progress| {
                assert_eq!(progress.total_files, 3);
                seen.push((progress.file_index, progress.current_file));
            })
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (0, "a.mp3".to_string()),
                (1, "b.wav".to_string()),
                (2, "broken.m4a".to_string()),
            ]
        );
        assert_eq!(summary.total(), 3);
        assert_eq!(
            summary.uploaded,
            vec!["v3xv0id-music/a.mp3".to_string(), "v3xv0id-music/b.wav".to_string()]
        );
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "broken.m4a");
        assert!(summary.failed[0].1.contains("413"));
        assert_eq!(summary.bytes_uploaded, 7);
        assert!(!summary.is_complete());
    }

    #[tokio::test]
    async fn test_upload_forbidden_without_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/v3xv0id-music/a.mp3"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "statusCode": "403",
                "error": "Unauthorized",
                "message": "new row violates row-level security policy"
            })))
            .mount(&server)
            .await;

        let client = StorageClient::new(StorageConfig::new(server.uri())).unwrap();
        let result = client
            .upload()
            .upload_bytes("a.mp3", vec![0], &UploadOptions::default())
            .await;

        match result {
            Err(StorageClientError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("row-level security"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }
}
