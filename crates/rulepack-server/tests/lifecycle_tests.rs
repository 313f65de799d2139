//! Shutdown and drain tests against a real listener
//!
//! Requests are written as raw HTTP/1.1 over a TCP stream so the tests can
//! hold a request in flight while shutdown starts.

use axum::{routing::get, Router};
use rulepack_server::lifecycle::{serve_until, ShutdownOutcome};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    started: Arc<Notify>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<ShutdownOutcome>>,
}

/// Start a server whose `/slow` handler takes `delay` to answer
async fn start(delay: Duration, grace: Duration) -> TestServer {
    let started = Arc::new(Notify::new());
    let notify = started.clone();

    let app = Router::new().route(
        "/slow",
        get(move || {
            let notify = notify.clone();
            async move {
                notify.notify_one();
                tokio::time::sleep(delay).await;
                "done"
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(serve_until(
        listener,
        app,
        async move {
            let _ = rx.await;
        },
        grace,
    ));

    TestServer {
        addr,
        started,
        shutdown,
        handle,
    }
}

async fn send_slow_request(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    stream
}

#[tokio::test]
async fn test_in_flight_request_completes_during_drain() {
    let server = start(Duration::from_secs(1), Duration::from_secs(5)).await;

    let mut stream = send_slow_request(server.addr).await;
    server.started.notified().await;

    server.shutdown.send(()).unwrap();

    // New connections are refused while the slow request is still running
    let refused = tokio::time::timeout(Duration::from_millis(500), async {
        while TcpStream::connect(server.addr).await.is_ok() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(refused.is_ok());
    assert!(!server.handle.is_finished());

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("done"));

    let outcome = server.handle.await.unwrap().unwrap();
    assert_eq!(outcome, ShutdownOutcome::Drained);

    // The listener is closed once shutdown completes
    assert!(TcpStream::connect(server.addr).await.is_err());
}

#[tokio::test]
async fn test_drain_times_out_on_stuck_request() {
    let server = start(Duration::from_secs(30), Duration::from_millis(100)).await;

    let _stream = send_slow_request(server.addr).await;
    server.started.notified().await;

    let begun = Instant::now();
    server.shutdown.send(()).unwrap();

    let outcome = server.handle.await.unwrap().unwrap();
    assert_eq!(outcome, ShutdownOutcome::TimedOut);
    assert!(begun.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_idle_shutdown_is_drained() {
    let server = start(Duration::from_millis(10), Duration::from_secs(5)).await;

    server.shutdown.send(()).unwrap();

    let outcome = server.handle.await.unwrap().unwrap();
    assert_eq!(outcome, ShutdownOutcome::Drained);
}
