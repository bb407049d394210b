//! Lead capture through the trait object, as callers use it

use std::sync::Arc;

use beacon_lead::{
    HttpLeadClient, LeadCapture, LeadError, LeadOutcome, LeadRequest, MemoryLeadStore,
};

#[tokio::test]
async fn first_capture_creates_and_repeat_is_already_registered() {
    let store = Arc::new(MemoryLeadStore::new());
    let capture: Arc<dyn LeadCapture> = store.clone();

    let first = capture
        .capture(
            LeadRequest::new("ada@example.test")
                .with_name("Ada")
                .with_message("Tell me more"),
        )
        .await
        .unwrap();
    let second = capture
        .capture(LeadRequest::new("ada@example.test"))
        .await
        .unwrap();

    match first {
        LeadOutcome::Created(Some(lead)) => {
            assert_eq!(lead.email, "ada@example.test");
            assert_eq!(lead.name.as_deref(), Some("Ada"));
            assert_eq!(lead.status, "new");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(second, LeadOutcome::AlreadyRegistered);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn missing_email_is_rejected_before_storage() {
    let store = MemoryLeadStore::new();

    let err = store.capture(LeadRequest::new(" ")).await.unwrap_err();

    assert!(matches!(err, LeadError::MissingEmail));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn distinct_emails_get_distinct_ids() {
    let store = MemoryLeadStore::new();
    store.capture(LeadRequest::new("a@example.test")).await.unwrap();
    store.capture(LeadRequest::new("b@example.test")).await.unwrap();

    let leads = store.leads().await;
    assert_eq!(leads.len(), 2);
    assert_ne!(leads[0].id, leads[1].id);
}

/// Serve one request on a loopback port and hand back its body.
async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/api/lead", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        let body = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the body arrived");
            raw.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&raw).into_owned();
            let Some(split) = text.find("\r\n\r\n") else {
                continue;
            };
            let length: usize = text[..split]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let body = &text[split + 4..];
            if body.len() >= length {
                break body.to_string();
            }
        };

        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.len(),
            response
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        body
    });

    (endpoint, handle)
}

#[tokio::test]
async fn http_client_posts_the_trimmed_email() {
    let (endpoint, server) = serve_once(r#"{"success":true,"data":null}"#).await;
    let client = HttpLeadClient::new(endpoint);
    let request = LeadRequest {
        email: "  ada@example.test \n".to_string(),
        name: Some("Ada".to_string()),
        message: None,
    };

    let outcome = client.capture(request).await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();

    assert_eq!(outcome, LeadOutcome::Created(None));
    assert_eq!(
        body,
        serde_json::json!({"email": "ada@example.test", "name": "Ada"})
    );
}

#[tokio::test]
async fn memory_store_trims_before_checking_duplicates() {
    let store = MemoryLeadStore::new();

    store
        .capture(LeadRequest {
            email: " ada@example.test ".to_string(),
            name: None,
            message: None,
        })
        .await
        .unwrap();
    let repeat = store
        .capture(LeadRequest::new("ada@example.test"))
        .await
        .unwrap();

    assert_eq!(repeat, LeadOutcome::AlreadyRegistered);
}
