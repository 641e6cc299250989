//! The three greet entry points.
//!
//! [`GreetHandler`] knows nothing about tonic: it drives the abstract
//! [`SendStream`] and [`DuplexStream`] handles and records how each session
//! ends. The dispatcher in [`crate::grpc`] owns the handles and the
//! [`Session`] for the duration of the call.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::SessionError;
use crate::greet_proto::{HelloRequest, HelloResponse, NamesList, NoParam};
use crate::greeting::{GREETING_PREFIX, greeting};
use crate::session::{DuplexStream, SendStream, Session};

#[derive(Debug, Clone, Default)]
pub struct GreetHandler {
    stream_interval: Duration,
}

impl GreetHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause for `interval` between consecutive server-streaming responses.
    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        self.stream_interval = interval;
        self
    }

    pub fn unary(&self, _request: NoParam) -> HelloResponse {
        HelloResponse {
            message: GREETING_PREFIX.to_string(),
        }
    }

    /// Send one greeting per name, in order.
    ///
    /// The first failed send aborts the call; nothing reports how many
    /// greetings made it out before that.
    pub async fn server_stream<S>(
        &self,
        request: NamesList,
        stream: &mut S,
        session: &mut Session,
    ) -> Result<(), SessionError>
    where
        S: SendStream<HelloResponse>,
    {
        info!(session_id = %session.id(), names = ?request.names, "Got request with names");

        for (index, name) in request.names.into_iter().enumerate() {
            if index > 0 && !self.stream_interval.is_zero() {
                tokio::time::sleep(self.stream_interval).await;
            }

            let response = HelloResponse {
                message: greeting(&name),
            };
            if let Err(e) = stream.send(response).await {
                return Err(session.fail(e));
            }
        }

        session.mark_closing();
        Ok(())
    }

    /// Answer each request with its greeting until the peer ends its input.
    ///
    /// Requests are handled strictly one at a time: the response to a request
    /// is sent before the next one is received.
    pub async fn bidi_stream<S>(
        &self,
        stream: &mut S,
        session: &mut Session,
    ) -> Result<(), SessionError>
    where
        S: DuplexStream<HelloRequest, HelloResponse>,
    {
        loop {
            let request = match stream.receive().await {
                Ok(Some(request)) => request,
                Ok(None) => {
                    debug!(session_id = %session.id(), "Client finished sending");
                    session.mark_closing();
                    return Ok(());
                }
                Err(e) => return Err(session.fail(e)),
            };

            debug!(session_id = %session.id(), name = %request.name, "Got request with name");

            let response = HelloResponse {
                message: greeting(&request.name),
            };
            if let Err(e) = stream.send(response).await {
                return Err(session.fail(e));
            }
        }
    }
}
