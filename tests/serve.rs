mod common;

use std::net::SocketAddr;

use encoding_rs::UTF_8;

use payment_dashboard::{loader::CsvSource, location::DataLocation, serve};

use common::{SCENARIO_CSV, TestWorkspace};

async fn spawn_server(location: DataLocation) -> SocketAddr {
    let state = serve::AppState::new(CsvSource::new(location, None, UTF_8)).expect("state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, serve::router(state)).await });
    addr
}

// One test per binary: the dataset cache is process-wide.
#[tokio::test]
async fn every_request_rerenders_from_cached_dataset() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("payments.csv", SCENARIO_CSV);
    let addr = spawn_server(DataLocation::Path(path.clone())).await;

    let first = reqwest::get(format!("http://{addr}/")).await.expect("first request");
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    let body = first.text().await.expect("body");
    assert!(body.contains("<td>credit_card</td>"), "{body}");
    assert!(body.contains("150.00"));

    std::fs::remove_file(&path).expect("remove source file");
    let second = reqwest::get(format!("http://{addr}/")).await.expect("second request");
    assert_eq!(second.status(), reqwest::StatusCode::OK);
    assert_eq!(second.text().await.expect("body"), body);

    let health = reqwest::get(format!("http://{addr}/health")).await.expect("health");
    assert_eq!(health.text().await.expect("body"), "ok");
}
