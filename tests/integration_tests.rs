use std::{collections::VecDeque, sync::{Arc, Mutex}, time::Duration};
use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpListener};

use api_logviewer::logrecords::{AllLogRecords, LogId};
use api_logviewer::utility;
use api_logviewer::viewer::{HttpLogSource, LogViewer, Phase, FETCH_FAILURE_MESSAGE};

const THREE_RECORDS: &str = r#"[
  {"logId": 3, "serviceName": "order-service", "apiEndpoint": "/api/orders", "httpMethod": "POST", "responseStatus": 201, "createdAt": "2024-05-01T12:30:45", "clientIp": "10.0.0.7", "requestPayload": "{\"item\":\"book\"}", "responsePayload": "{\"orderId\":3}"},
  {"logId": 1, "serviceName": "order-service", "apiEndpoint": "/api/orders/9", "httpMethod": "GET", "responseStatus": 404, "createdAt": "2024-05-01T12:31:00", "clientIp": "10.0.0.8", "requestPayload": "", "responsePayload": "not found"},
  {"logId": 2, "serviceName": "user-service", "apiEndpoint": "/api/users", "httpMethod": "GET", "responseStatus": 500, "createdAt": "2024-05-01T12:32:10", "clientIp": "10.0.0.9"}
]"#;

/// Serve the responses in order, one per connection; the last one is repeated.
/// Returns the url of the log collection.
async fn serve(responses: Vec<(&'static str, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let responses = Arc::new(Mutex::new(VecDeque::from(responses)));

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            let (status_line, body) = {
                let mut responses = responses.lock().unwrap();
                if responses.len() > 1 {
                    responses.pop_front().unwrap()
                } else {
                    responses.front().cloned().unwrap()
                }
            };
            tokio::spawn(async move {
                // read the request head before answering
                let mut request = Vec::new();
                let mut buffer = [0_u8; 1024];
                while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buffer[..read]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/{}", address, utility::LOGS_PATH)
}

fn viewer_for(url: String) -> LogViewer {
    let client = utility::build_client(Duration::from_secs(5), false).unwrap();
    LogViewer::new(Arc::new(HttpLogSource::new(client, url)))
}

#[tokio::test]
async fn integration_initial_load() {
    let url = serve(vec![("200 OK", THREE_RECORDS.to_string())]).await;
    let viewer = viewer_for(url);

    viewer.initialize().await;

    let state = viewer.state();
    assert_eq!(state.phase, Phase::Ready);
    let ids: Vec<LogId> = state.records.iter().map(|record| record.log_id.clone()).collect();
    assert_eq!(ids, vec![LogId::Number(3), LogId::Number(1), LogId::Number(2)]);
    assert_eq!(state.records[1].request_payload.as_deref(), Some(""));
    assert_eq!(state.records[2].response_payload, None);
}

#[tokio::test]
async fn integration_server_error_keeps_records() {
    let url = serve(vec![
        ("200 OK", THREE_RECORDS.to_string()),
        ("500 Internal Server Error", r#"{"error":"database down"}"#.to_string()),
    ]).await;
    let viewer = viewer_for(url);

    viewer.initialize().await;
    let loaded = viewer.state().records;
    viewer.refresh().await;

    let state = viewer.state();
    assert_eq!(state.phase, Phase::Error(FETCH_FAILURE_MESSAGE.to_string()));
    assert_eq!(state.records, loaded);
    assert_eq!(state.records.len(), 3);
}

#[tokio::test]
async fn integration_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let viewer = viewer_for(format!("http://{}/{}", address, utility::LOGS_PATH));

    viewer.initialize().await;

    let state = viewer.state();
    assert_eq!(state.phase, Phase::Error(FETCH_FAILURE_MESSAGE.to_string()));
    assert!(state.records.is_empty());
}

#[tokio::test]
async fn integration_body_not_an_array() {
    let url = serve(vec![("200 OK", r#"{"logs": []}"#.to_string())]).await;
    let viewer = viewer_for(url);

    viewer.initialize().await;

    assert_eq!(viewer.state().phase, Phase::Error(FETCH_FAILURE_MESSAGE.to_string()));
}

#[tokio::test]
async fn integration_refresh_twice_same_state() {
    let url = serve(vec![("200 OK", THREE_RECORDS.to_string())]).await;
    let viewer = viewer_for(url);

    viewer.refresh().await;
    let first = viewer.state();
    viewer.refresh().await;

    assert_eq!(first, viewer.state());
    assert_eq!(first.phase, Phase::Ready);
}

#[tokio::test]
async fn integration_render_page() {
    colored::control::set_override(false);
    let url = serve(vec![("200 OK", THREE_RECORDS.to_string())]).await;
    let viewer = viewer_for(url);

    viewer.initialize().await;
    let page = viewer.render();

    assert!(page.starts_with("API Event Logs"));
    assert!(page.contains("● 201"));
    assert!(page.contains("\"orderId\": 3"));
    assert!(page.contains("not found"));
}

#[tokio::test]
async fn integration_read_logrecords() {
    let url = serve(vec![("200 OK", THREE_RECORDS.to_string())]).await;
    let client = utility::build_client(Duration::from_secs(5), false).unwrap();

    let alllogrecords = AllLogRecords::read_logrecords(&client, &url).await.unwrap();
    assert_eq!(alllogrecords.logrecords.len(), 3);
    assert_eq!(alllogrecords.logrecords[0].service_name, "order-service");
}

#[tokio::test]
async fn integration_http_get_non_success() {
    let url = serve(vec![("404 Not Found", "missing".to_string())]).await;
    let client = utility::build_client(Duration::from_secs(5), false).unwrap();

    assert!(utility::http_get(&client, &url).await.is_err());
}
