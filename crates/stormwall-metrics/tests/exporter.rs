//! ---
//! sw_section: "04-observability"
//! sw_subsection: "tests"
//! sw_type: "source"
//! sw_scope: "test"
//! sw_description: "End-to-end scrape of the metrics exporter."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::net::SocketAddr;

use stormwall_metrics::{new_registry, spawn_http_server, SimulationMetrics};
use stormwall_sim::Engine;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn serves_simulation_metrics() {
    let registry = new_registry();
    let metrics = SimulationMetrics::new(registry.clone()).unwrap();
    let mut engine = Engine::with_defaults();
    let tick = engine.tick();
    metrics.observe(&tick, &engine.snapshot_stats());

    let server = spawn_http_server(registry, SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = server.addr();
    assert_ne!(addr.port(), 0);

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("stormwall_server_health"));
    assert!(response.contains("stormwall_requests_total{kind=\"successful_legitimate\"}"));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = spawn_http_server(new_registry(), SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 404"));
    server.shutdown().await.unwrap();
}
