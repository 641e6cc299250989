use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::greet_proto::greet_service_client::GreetServiceClient;
use crate::greet_proto::{HelloRequest, NamesList, NoParam};

/// Typed client for the greet service.
///
/// Every wait for a server reply is bounded by the configured timeout, so a
/// server-streaming call paced slower than that timeout fails with
/// [`ClientError::Timeout`].
#[derive(Debug, Clone)]
pub struct GreetClient {
    inner: GreetServiceClient<Channel>,
    timeout: Duration,
}

impl GreetClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        info!(endpoint = %config.endpoint, "Connecting to greet service");
        let inner = GreetServiceClient::connect(config.endpoint.clone()).await?;

        Ok(Self {
            inner,
            timeout: config.timeout,
        })
    }

    pub async fn say_hello(&mut self) -> Result<String, ClientError> {
        let response = timeout(self.timeout, self.inner.say_hello(NoParam {})).await??;
        Ok(response.into_inner().message)
    }

    /// Request one greeting per name and collect them in arrival order.
    pub async fn say_hello_server_streaming(
        &mut self,
        names: Vec<String>,
    ) -> Result<Vec<String>, ClientError> {
        let mut stream = timeout(
            self.timeout,
            self.inner.say_hello_server_streaming(NamesList { names }),
        )
        .await??
        .into_inner();

        let mut messages = Vec::new();
        while let Some(response) = timeout(self.timeout, stream.message()).await?? {
            debug!(message = %response.message, "Received greeting");
            messages.push(response.message);
        }

        Ok(messages)
    }

    /// Greet each name over one bidirectional stream.
    ///
    /// Each request is sent only after the reply to the previous one arrived.
    /// Once every name is answered the request side is closed and the call
    /// waits for the server to close the stream.
    pub async fn say_hello_bidirectional(
        &mut self,
        names: Vec<String>,
    ) -> Result<Vec<String>, ClientError> {
        let (tx, rx) = mpsc::channel(1);
        let mut stream = timeout(
            self.timeout,
            self.inner
                .say_hello_bidirectional_streaming(ReceiverStream::new(rx)),
        )
        .await??
        .into_inner();

        let mut messages = Vec::with_capacity(names.len());
        for name in names {
            tx.send(HelloRequest { name })
                .await
                .map_err(|_| ClientError::StreamClosed)?;

            let reply = timeout(self.timeout, stream.message())
                .await??
                .ok_or(ClientError::StreamClosed)?;
            debug!(message = %reply.message, "Received greeting");
            messages.push(reply.message);
        }

        drop(tx);
        while let Some(extra) = timeout(self.timeout, stream.message()).await?? {
            warn!(message = %extra.message, "Unexpected greeting after end of input");
        }

        Ok(messages)
    }
}
