// End-to-end checks of the HTTP transport against a fake scan server
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use scan_client::{
    ClientConfig, CommandSequence, Comment, Delay, Patch, ScanClient, ScanError, ScanId,
};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    fn push(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn all(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

const SCAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<scan>
    <id>42</id>
    <name>my scan</name>
    <created>1424465207911</created>
    <state>Running</state>
    <runtime>1200</runtime>
    <total_work_units>22</total_work_units>
    <performed_work_units>11</performed_work_units>
    <address>3</address>
    <command>Delay 1.0 sec</command>
</scan>"#;

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

async fn list_scans() -> &'static str {
    "<scans/>"
}

async fn submit(
    State(recorded): State<Recorded>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: String,
) -> &'static str {
    recorded.push(format!("POST /scan/{name} {} {body}", content_type(&headers)));
    "<id>42</id>"
}

async fn scan_info(State(recorded): State<Recorded>, Path(id): Path<String>) -> Response {
    recorded.push(format!("GET /scan/{id}"));
    if id == "404" {
        return (StatusCode::NOT_FOUND, "Unknown scan ID 404").into_response();
    }
    SCAN_XML.into_response()
}

async fn delete_scan(State(recorded): State<Recorded>, Path(id): Path<String>) -> StatusCode {
    recorded.push(format!("DELETE /scan/{id}"));
    StatusCode::OK
}

async fn scan_resource(
    State(recorded): State<Recorded>,
    Path((id, resource)): Path<(String, String)>,
) -> Response {
    recorded.push(format!("GET /scan/{id}/{resource}"));
    match resource.as_str() {
        "data" => "<data><device><name>xpos</name><samples>\
                   <sample id=\"1\"><time>2</time><value>0.5</value></sample>\
                   <sample id=\"0\"><time>1</time><value>0.25</value></sample>\
                   </samples></device></data>"
            .into_response(),
        "last_serial" => "<serial>1</serial>".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn scan_update(
    State(recorded): State<Recorded>,
    Path((id, action)): Path<(String, String)>,
    body: String,
) -> StatusCode {
    recorded.push(format!("PUT /scan/{id}/{action} {body}").trim_end().to_string());
    StatusCode::OK
}

async fn clear_completed(State(recorded): State<Recorded>) -> StatusCode {
    recorded.push("DELETE /scans/completed".to_string());
    StatusCode::OK
}

async fn spawn_fake_server() -> (ClientConfig, Recorded) {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/scans", get(list_scans))
        .route("/scans/completed", delete(clear_completed))
        .route("/scan/:id", post(submit).get(scan_info).delete(delete_scan))
        .route("/scan/:id/:resource", get(scan_resource).put(scan_update))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let mut config = ClientConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    (config, recorded)
}

#[tokio::test]
async fn test_submit_and_read_back() {
    let (config, recorded) = spawn_fake_server().await;
    let client = ScanClient::connect(&config).await.unwrap();

    let sequence = CommandSequence::new()
        .with(Comment::new("start"))
        .with(Delay::new(1.0).unwrap());
    let id = client.submit("my scan", sequence).await.unwrap();
    assert_eq!(id, ScanId(42));

    let info = client.scan_info(id).await.unwrap();
    assert!(info.is_running());
    assert_eq!(info.progress(), Some(50.0));
    assert_eq!(info.command, "Delay 1.0 sec");

    let data = client.scan_data(id).await.unwrap();
    assert_eq!(data.times("xpos").unwrap(), &[1.0, 2.0]);
    assert_eq!(data.values("xpos").unwrap(), &[0.25, 0.5]);

    assert_eq!(client.last_serial(id).await.unwrap(), 1);

    assert_eq!(
        recorded.all(),
        vec![
            "POST /scan/my scan text/xml <commands><comment><text>start</text></comment>\
             <delay><seconds>1.0</seconds></delay></commands>",
            "GET /scan/42",
            "GET /scan/42/data",
            "GET /scan/42/last_serial",
        ]
    );
}

#[tokio::test]
async fn test_control_requests() {
    let (config, recorded) = spawn_fake_server().await;
    let client = ScanClient::connect(&config).await.unwrap();
    let id = ScanId(7);

    client.pause(id).await.unwrap();
    client.resume(id).await.unwrap();
    client.abort(id).await.unwrap();
    client
        .patch(id, &Patch::new(2, "seconds", 4.0).unwrap())
        .await
        .unwrap();
    client.delete(id).await.unwrap();
    client.clear_completed().await.unwrap();

    assert_eq!(
        recorded.all(),
        vec![
            "PUT /scan/7/pause",
            "PUT /scan/7/resume",
            "PUT /scan/7/abort",
            "PUT /scan/7/patch <patch><address>2</address><property>seconds</property>\
             <value>4</value></patch>",
            "DELETE /scan/7",
            "DELETE /scans/completed",
        ]
    );
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (config, _) = spawn_fake_server().await;
    let client = ScanClient::connect(&config).await.unwrap();

    match client.scan_info(ScanId(404)).await {
        Err(ScanError::Status { status, url, body }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/scan/404"));
            assert_eq!(body, "Unknown scan ID 404");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        client.scan_devices(ScanId(1)).await,
        Err(ScanError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut config = ClientConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;

    assert!(matches!(
        ScanClient::connect(&config).await,
        Err(ScanError::Transport(_))
    ));
}
