use anyhow::Result;
use greet_rpc::config::ClientConfig;
use greet_rpc::grpc::GreetClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        names = vec!["Alice".to_string(), "Bob".to_string()];
    }

    let config = ClientConfig::from_env();
    let mut client = GreetClient::connect(&config).await?;

    let message = client.say_hello().await?;
    info!(%message, "Unary greeting");

    for message in client.say_hello_server_streaming(names.clone()).await? {
        info!(%message, "Server-streamed greeting");
    }

    for message in client.say_hello_bidirectional(names).await? {
        info!(%message, "Bidirectional greeting");
    }

    Ok(())
}
