use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use file_uploader::{UploadSession, UploadSubmitter, UploaderError};
use progress_tracking::UploadProgressTracker;
use serde_json::json;
use upload_client::{FilePayload, MemoryClient, RemoteClient};
use upload_config::UploaderConfig;
use upload_types::{FileId, FolderId};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(endpoint: &str) -> UploaderConfig {
    let mut config = UploaderConfig::default().with_endpoint(endpoint);
    config.tracking.poll_interval = Duration::from_millis(50);
    config
}

fn entry(indexed: bool, status: &str, pct: u32, name: &str) -> serde_json::Value {
    json!({
        "indexed": indexed,
        "status": status,
        "progress_percentage": pct,
        "is_ocr_processing": false,
        "file_name": name,
    })
}

#[tokio::test]
async fn test_upload_then_track_until_ready() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/file/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 101, "name": "a.txt"},
            {"id": 102, "name": "b.txt"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/file/upload-progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "101": entry(false, "IN_PROGRESS", 40, "a.txt"),
            "102": entry(false, "IN_PROGRESS", 60, "b.txt"),
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/file/upload-progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "101": entry(true, "IN_PROGRESS", 100, "a.txt"),
            "102": entry(false, "SUCCESS", 100, "b.txt"),
        })))
        .mount(&server)
        .await;

    let client = Arc::new(RemoteClient::new(&config(&server.uri()).client).unwrap());
    let mut session = UploadSession::new(client, &config(&server.uri()));

    let uploaded = session
        .upload(vec![FilePayload::new("a.txt", "aaa"), FilePayload::new("b.txt", "bbb")], Some(FolderId(3)))
        .await
        .unwrap();
    assert_eq!(uploaded.iter().map(|f| f.id).collect::<Vec<_>>(), vec![FileId(101), FileId(102)]);
    assert_eq!(session.pending().len(), 2);

    let status = session.wait().await;
    assert!(status.is_complete());
    assert!(session.pending().is_empty());
    assert_eq!(session.render(Utc::now()).await, "Files ready for chat!");

    // Nothing is pending once the batch is ready.
    assert!(!session.resume_tracking().await);
}

#[tokio::test]
async fn test_upload_failure_is_shown_and_nothing_is_tracked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/file/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/file/upload-progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = Arc::new(RemoteClient::new(&config(&server.uri()).client).unwrap());
    let mut session = UploadSession::new(client, &config(&server.uri()));

    let err = session.upload(vec![FilePayload::new("a.txt", "a")], None).await.unwrap_err();
    assert!(matches!(err, UploaderError::Client(_)));
    assert_eq!(session.render(Utc::now()).await, "Upload failed: Internal Server Error");
    assert!(!session.status().await.is_polling());
    assert!(!session.submitter().is_uploading());
}

#[tokio::test]
async fn test_failed_tracking_can_be_resumed() {
    let client = Arc::new(MemoryClient::new(2));
    let mut session = UploadSession::new(client.clone(), &config("http://unused"));

    client.fail_next_queries(1).await;
    session.upload(vec![FilePayload::new("notes.txt", "n")], None).await.unwrap();

    let status = session.wait().await;
    assert!(status.is_failed());
    assert_eq!(session.pending().len(), 1);
    assert!(session.render(Utc::now()).await.starts_with("Error tracking progress: Failed to fetch file progress: 500"));

    assert!(session.resume_tracking().await);
    let status = session.wait().await;
    assert!(status.is_complete());
    assert_eq!(status.snapshot.get(&FileId(1)).unwrap().file_name.as_deref(), Some("notes.txt"));
}

#[tokio::test]
async fn test_empty_selection_does_not_start_tracking() {
    let client = Arc::new(MemoryClient::default());
    let mut session = UploadSession::new(client.clone(), &config("http://unused"));

    assert!(session.upload(Vec::new(), None).await.unwrap().is_empty());
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(client.upload_count().await, 0);
    assert_eq!(client.query_count().await, 0);
    assert_eq!(session.render(Utc::now()).await, "No progress data available.");
}

#[tokio::test]
async fn test_tracker_follows_submitter_uploads() {
    let client = Arc::new(MemoryClient::new(2));
    let tracker = Arc::new(UploadProgressTracker::new(client.clone(), Duration::from_millis(50)));
    let mut submitter = UploadSubmitter::new(client.clone());
    submitter.add_listener(tracker.clone());

    let uploaded = submitter
        .submit(vec![FilePayload::new("a.txt", "a"), FilePayload::new("b.txt", "b")], None)
        .await
        .unwrap();
    let ids: Vec<FileId> = uploaded.iter().map(|f| f.id).collect();
    assert_eq!(tracker.status().await.file_ids, ids);

    let status = tracker.wait().await;
    assert!(status.is_complete());
    assert_eq!(status.snapshot.ids().collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn test_session_tracks_uploads_made_through_its_submitter() {
    let client = Arc::new(MemoryClient::new(1));
    let session = UploadSession::new(client.clone(), &config("http://unused"));

    let uploaded = session.submitter().submit(vec![FilePayload::new("c.txt", "c")], None).await.unwrap();
    assert_eq!(session.status().await.file_ids, vec![uploaded[0].id]);

    let status = session.tracker().wait().await;
    assert!(status.is_complete());
    assert!(client.query_count().await >= 1);
}

#[tokio::test]
async fn test_payload_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let payload = FilePayload::from_path(file.path()).await.unwrap();
    assert_eq!(payload.data, b"hello");
    assert_eq!(Some(payload.file_name.as_str()), file.path().file_name().and_then(|n| n.to_str()));
}
