//! End-to-end tests for the greet service over a real TCP listener.

use std::sync::Arc;
use std::time::Duration;

use greet_rpc::config::{ClientConfig, ServerConfig};
use greet_rpc::greet_proto::{HelloRequest, NamesList};
use greet_rpc::grpc::{self, GreetClient, GreetServiceClient, GreetServiceImpl};
use greet_rpc::session::SessionRegistry;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Code;

async fn spawn_server(config: ServerConfig) -> (String, Arc<SessionRegistry>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let service = GreetServiceImpl::new(&config);
    let registry = service.registry();
    tokio::spawn(grpc::serve(listener, service));

    (endpoint, registry)
}

async fn connect(endpoint: &str) -> GreetClient {
    let config = ClientConfig::builder().endpoint(endpoint).build();
    GreetClient::connect(&config).await.unwrap()
}

/// Sessions are released by the server task after the response stream ends,
/// so give it a moment to catch up.
async fn wait_for_no_sessions(registry: &SessionRegistry) {
    for _ in 0..100 {
        if registry.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} session(s) still registered", registry.len());
}

#[tokio::test]
async fn test_unary_greeting() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = connect(&endpoint).await;

    assert_eq!(client.say_hello().await.unwrap(), "Hello");
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_server_streaming_greetings_in_order() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = connect(&endpoint).await;

    let messages = client
        .say_hello_server_streaming(vec!["Alice".to_string(), "Bob".to_string()])
        .await
        .unwrap();

    assert_eq!(messages, ["HelloAlice", "HelloBob"]);
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_server_streaming_empty_list() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = connect(&endpoint).await;

    let messages = client.say_hello_server_streaming(Vec::new()).await.unwrap();

    assert!(messages.is_empty());
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_bidirectional_greetings_alternate() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = connect(&endpoint).await;

    let names = ["X", "Y", "Z"].map(String::from).to_vec();
    let messages = client.say_hello_bidirectional(names).await.unwrap();

    assert_eq!(messages, ["HelloX", "HelloY", "HelloZ"]);
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_bidirectional_without_requests_closes_cleanly() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = connect(&endpoint).await;

    let messages = client.say_hello_bidirectional(Vec::new()).await.unwrap();

    assert!(messages.is_empty());
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_client_going_away_releases_session() {
    let (endpoint, registry) = spawn_server(ServerConfig::default()).await;
    let mut client = GreetServiceClient::connect(endpoint).await.unwrap();

    let (tx, rx) = mpsc::channel(1);
    let mut inbound = client
        .say_hello_bidirectional_streaming(ReceiverStream::new(rx))
        .await
        .unwrap()
        .into_inner();

    tx.send(HelloRequest {
        name: "X".to_string(),
    })
    .await
    .unwrap();
    let reply = inbound.message().await.unwrap().unwrap();
    assert_eq!(reply.message, "HelloX");
    assert_eq!(registry.len(), 1);

    drop(inbound);
    drop(tx);
    drop(client);
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_session_deadline_fails_idle_stream() {
    let config = ServerConfig::builder()
        .session_timeout(Duration::from_millis(100))
        .build();
    let (endpoint, registry) = spawn_server(config).await;
    let mut client = GreetServiceClient::connect(endpoint).await.unwrap();

    // Keep the request side open without sending anything.
    let (_tx, rx) = mpsc::channel::<HelloRequest>(1);
    let mut inbound = client
        .say_hello_bidirectional_streaming(ReceiverStream::new(rx))
        .await
        .unwrap()
        .into_inner();

    let status = inbound.message().await.unwrap_err();
    assert_eq!(status.code(), Code::DeadlineExceeded);
    wait_for_no_sessions(&registry).await;
}

#[tokio::test]
async fn test_session_deadline_releases_stalled_reader() {
    let config = ServerConfig::builder()
        .session_timeout(Duration::from_millis(200))
        .build();
    let (endpoint, registry) = spawn_server(config).await;
    let mut client = GreetServiceClient::connect(endpoint).await.unwrap();

    // Enough output to exhaust the HTTP/2 window and the outbound channel.
    let name = "x".repeat(64);
    let names = vec![name; 20_000];
    let inbound = client
        .say_hello_server_streaming(NamesList { names })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(registry.len(), 1);

    // Never read from the response stream.
    tokio::time::sleep(Duration::from_millis(200)).await;
    wait_for_no_sessions(&registry).await;
    drop(inbound);
}
