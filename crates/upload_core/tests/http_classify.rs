use serde_json::json;
use std::time::Instant;
use tokio::net::TcpListener;
use upload_core::{
    ClassificationClient, ClassificationFailure, PageLayout, PageSession, UploadCandidate,
};
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hen_png() -> UploadCandidate {
    UploadCandidate::from_bytes("hen.png", "image/png", b"\x89PNG\r\n\x1a\nfeathers".to_vec())
}

async fn mount_classify(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/classify"))
        .and(header_regex("content-type", "^multipart/form-data; boundary=.+"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn success_body_is_returned_verbatim() {
    let server = MockServer::start().await;
    mount_classify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"label": "healthy", "confidence": 0.92})),
    )
    .await;

    let client = ClassificationClient::new(server.uri());
    let result = client.classify(&hen_png()).await.unwrap();
    assert_eq!(
        result.into_value(),
        json!({"label": "healthy", "confidence": 0.92})
    );
}

#[tokio::test]
async fn file_is_sent_under_the_file_field() {
    let server = MockServer::start().await;
    mount_classify(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let client = ClassificationClient::new(format!("{}/", server.uri()));
    client.classify(&hen_png()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="file"; filename="hen.png""#), "{body}");
    assert!(body.contains("Content-Type: image/png"), "{body}");
    assert!(body.contains("feathers"), "{body}");
}

#[tokio::test]
async fn malformed_media_type_is_forwarded_without_content_type() {
    let server = MockServer::start().await;
    mount_classify(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let odd = UploadCandidate::from_bytes("odd.bin", "not a mime", b"raw".to_vec());
    let client = ClassificationClient::new(server.uri());
    client.classify(&odd).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"filename="odd.bin""#), "{body}");
    assert!(!body.contains("not a mime"), "{body}");
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let server = MockServer::start().await;
    mount_classify(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"error": "Classification failed"})),
    )
    .await;

    let client = ClassificationClient::new(server.uri());
    let err = client.classify(&hen_png()).await.unwrap_err();
    assert!(matches!(err, ClassificationFailure::Status(500)));
}

#[tokio::test]
async fn dropped_connection_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    let client = ClassificationClient::new(format!("http://{addr}"));
    let err = client.classify(&hen_png()).await.unwrap_err();
    assert!(err.is_transport(), "unexpected failure: {err}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = ClassificationClient::new(format!("http://{addr}"));
    let err = client.classify(&hen_png()).await.unwrap_err();
    assert!(err.is_transport(), "unexpected failure: {err}");
}

#[tokio::test]
async fn vanished_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hen.jpg");
    std::fs::write(&file, b"jpeg").unwrap();
    let candidate = UploadCandidate::from_path(&file).unwrap();
    std::fs::remove_file(&file).unwrap();

    let client = ClassificationClient::new(server.uri());
    let err = client.classify(&candidate).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn session_only_submits_accepted_files() {
    let server = MockServer::start().await;
    mount_classify(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"prediction": "Healthy"})),
    )
    .await;

    let mut session = PageSession::new(
        ClassificationClient::new(server.uri()),
        PageLayout::default(),
        Default::default(),
    );
    let now = Instant::now();

    let gif_too_big = UploadCandidate::from_bytes(
        "flock.gif",
        "image/gif",
        vec![0u8; upload_core::MAX_UPLOAD_BYTES as usize + 1],
    );
    assert!(!session.select_file(gif_too_big, now).is_accepted());
    assert!(session.classify_current().await.is_err());

    assert!(session.select_file(hen_png(), now).is_accepted());
    let result = session.classify_current().await.unwrap();
    assert_eq!(result.as_value()["prediction"], "Healthy");
}
