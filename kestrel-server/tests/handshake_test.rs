use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use kestrel_common::ErrorCode;
use kestrel_protocol::codec::{Decodable, Encodable};
use kestrel_protocol::{
    encode_frame, read_frame, ApiDescriptor, ApiRegistry, ApiVersionsResponse, RequestHeader,
    DEFAULT_MAX_FRAME_BYTES,
};
use kestrel_server::{Server, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

async fn start_server(
    config: ServerConfig,
) -> (SocketAddr, broadcast::Sender<()>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    let (server, shutdown_tx) = Server::new(listener, config, Arc::new(ApiRegistry::default()));

    let handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            eprintln!("Server error: {}", e);
        }
    });

    (local_addr, shutdown_tx, handle)
}

async fn send_request(stream: &mut TcpStream, header: &RequestHeader) {
    let mut payload = BytesMut::new();
    header.encode(&mut payload).unwrap();
    stream.write_all(&encode_frame(&payload).unwrap()).await.unwrap();
}

async fn read_response(stream: &mut TcpStream) -> ApiVersionsResponse {
    let mut payload = read_frame(stream, DEFAULT_MAX_FRAME_BYTES)
        .await
        .unwrap()
        .expect("response frame");
    ApiVersionsResponse::decode(&mut payload).unwrap()
}

fn catalogue() -> Vec<ApiDescriptor> {
    vec![ApiDescriptor::new(18, 0, 4), ApiDescriptor::new(75, 0, 0)]
}

#[tokio::test]
async fn test_api_versions_supported() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    send_request(&mut stream, &RequestHeader::new(18i16, 3, 7)).await;
    let response = read_response(&mut stream).await;

    assert_eq!(response.correlation_id, 7);
    assert_eq!(response.error_code, ErrorCode::None);
    assert_eq!(response.apis, catalogue());
    assert_eq!(response.throttle_time_ms, 0);
}

#[tokio::test]
async fn test_api_versions_unsupported_version() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    send_request(&mut stream, &RequestHeader::new(18i16, 99, 7)).await;
    let response = read_response(&mut stream).await;

    assert_eq!(response.correlation_id, 7);
    assert_eq!(response.error_code, ErrorCode::UnsupportedVersion);
    assert_eq!(response.apis, catalogue());
}

#[tokio::test]
async fn test_unknown_api_key_answers_unsupported_version() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    send_request(&mut stream, &RequestHeader::new(3i16, 0, 21)).await;
    let response = read_response(&mut stream).await;

    assert_eq!(response.correlation_id, 21);
    assert_eq!(response.error_code, ErrorCode::UnsupportedVersion);
    assert_eq!(response.apis, catalogue());
}

#[tokio::test]
async fn test_exact_wire_bytes() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    // size, api_key 18, version 4, correlation_id 7, null client id
    let request = [0, 0, 0, 10, 0, 18, 0, 4, 0, 0, 0, 7, 0xff, 0xff];
    stream.write_all(&request).await.unwrap();

    let mut response = [0u8; 30];
    stream.read_exact(&mut response).await.unwrap();

    #[rustfmt::skip]
    let expected: [u8; 30] = [
        0, 0, 0, 26,
        0, 0, 0, 7,
        0, 0,
        2,
        0, 18, 0, 0, 0, 4, 0,
        0, 75, 0, 0, 0, 0, 0,
        0, 0, 0, 0,
        0,
    ];
    assert_eq!(response, expected);
}

#[tokio::test]
async fn test_sequential_requests_on_one_connection() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    for (version, correlation_id) in [(0, 100), (4, -5), (5, i32::MIN)] {
        send_request(
            &mut stream,
            &RequestHeader::new(18i16, version, correlation_id).with_client_id("kestrel-test"),
        )
        .await;
        let response = read_response(&mut stream).await;
        assert_eq!(response.correlation_id, correlation_id);
        assert_eq!(response.error_code.is_ok(), version <= 4);
    }
}

#[tokio::test]
async fn test_malformed_header_closes_only_that_connection() {
    let (addr, _shutdown_tx, _handle) = start_server(ServerConfig::default()).await;

    let mut healthy = TcpStream::connect(addr).await.unwrap();
    let mut broken = TcpStream::connect(addr).await.unwrap();

    // 8-byte payload: no room for the client-id length
    broken
        .write_all(&[0, 0, 0, 8, 0, 18, 0, 3, 0, 0, 0, 7])
        .await
        .unwrap();
    let mut rest = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(5), broken.read_to_end(&mut rest))
        .await
        .expect("server should close the connection");
    assert!(rest.is_empty());

    send_request(&mut healthy, &RequestHeader::new(18i16, 1, 9)).await;
    let response = read_response(&mut healthy).await;
    assert_eq!(response.correlation_id, 9);
    assert_eq!(response.error_code, ErrorCode::None);
}

#[tokio::test]
async fn test_oversized_frame_closes_connection() {
    let config = ServerConfig {
        max_frame_bytes: 64,
        ..ServerConfig::default()
    };
    let (addr, _shutdown_tx, _handle) = start_server(config).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream.write_all(&4096i32.to_be_bytes()).await.unwrap();
    let mut rest = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut rest))
        .await
        .expect("server should close the connection");
    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_shutdown_stops_accept_loop() {
    let (_addr, shutdown_tx, handle) = start_server(ServerConfig::default()).await;
    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop")
        .unwrap();
}

#[tokio::test]
async fn test_server_outlives_dropped_shutdown_sender() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (server, shutdown_tx) = Server::new(
        listener,
        ServerConfig::default(),
        Arc::new(ApiRegistry::default()),
    );
    let shutdown_handle = server.shutdown_handle();
    drop(shutdown_tx);

    let handle = tokio::spawn(async move { server.run().await.unwrap() });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    let mut stream = TcpStream::connect(addr).await.unwrap();
    send_request(&mut stream, &RequestHeader::new(18i16, 2, 13)).await;
    let response = read_response(&mut stream).await;
    assert_eq!(response.correlation_id, 13);
    assert_eq!(response.error_code, ErrorCode::None);

    shutdown_handle.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop")
        .unwrap();
}
