//! Channel lifecycle tests on loopback.
//!
//! Event naming and payload mapping are covered by the unit tests in
//! `transport.rs`; these pin what the task reports when the handshake cannot
//! complete.

use std::time::Duration;

use parlor_client::{socket_url, transport};
use parlor_proto::{ClientEvent, ServerEvent};
use reqwest::Url;
use tokio::{io::AsyncReadExt, net::TcpListener, sync::mpsc};

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(events: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    tokio::time::timeout(WAIT, events.recv()).await.expect("timed out").expect("channel ended")
}

#[tokio::test]
async fn refused_connection_reports_connect_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();

    let (tx, mut events) = mpsc::unbounded_channel();
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let channel = transport::connect(socket_url(&base).unwrap(), tx);

    match next_event(&mut events).await {
        ServerEvent::ConnectError(error) => assert!(error.message.is_some()),
        other => panic!("expected connect_error, got {other:?}"),
    }
    // No disconnect follows a connection that never opened.
    assert!(tokio::time::timeout(Duration::from_millis(200), events.recv()).await.is_err_or_none());
    assert!(channel.send(ClientEvent::join("general", "Jane")).await.is_err());
}

#[tokio::test]
async fn handshake_hits_the_socket_io_path() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut tcp, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 1024];
        let n = tcp.read(&mut buf).await.unwrap();
        // Dropping the socket without answering fails the handshake.
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });

    let (tx, mut events) = mpsc::unbounded_channel();
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let _channel = transport::connect(socket_url(&base).unwrap(), tx);

    let request = tokio::time::timeout(WAIT, server).await.unwrap().unwrap();
    assert!(request.starts_with("GET /socket.io/?"), "unexpected request: {request}");
    assert!(request.contains("transport=polling"), "unexpected request: {request}");

    assert!(matches!(next_event(&mut events).await, ServerEvent::ConnectError(_)));
}

#[tokio::test]
async fn stop_during_handshake_reports_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        // Accept and hold the connection open without answering.
        let (tcp, _) = listener.accept().await.unwrap();
        tokio::time::sleep(WAIT).await;
        drop(tcp);
    });

    let (tx, mut events) = mpsc::unbounded_channel();
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let channel = transport::connect(socket_url(&base).unwrap(), tx);

    tokio::time::sleep(Duration::from_millis(100)).await;
    channel.stop();

    assert!(tokio::time::timeout(Duration::from_millis(300), events.recv()).await.is_err_or_none());
    server.abort();
}

/// Helper for "nothing else arrived": either the wait timed out or the
/// channel ended.
trait NothingArrived {
    fn is_err_or_none(&self) -> bool;
}

impl NothingArrived for Result<Option<ServerEvent>, tokio::time::error::Elapsed> {
    fn is_err_or_none(&self) -> bool {
        matches!(self, Err(_) | Ok(None))
    }
}
