//! Stream handles the session handlers read from and write to.
//!
//! The handlers only see [`SendStream`] and [`DuplexStream`]. The concrete
//! handles here adapt them to tonic: the inbound half is any stream of
//! `Result<Req, Status>` (a [`tonic::Streaming`] in the server), the outbound
//! half is a bounded channel whose receiver becomes the response body.

use std::future::Future;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tonic::Status;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Write half of a session.
pub trait SendStream<T>: Send {
    /// Send one message, suspending until the outbound side accepts it.
    fn send(&mut self, item: T) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Read and write halves of a bidirectional session.
pub trait DuplexStream<Req, Resp>: SendStream<Resp> {
    /// Receive the next message.
    ///
    /// Returns `Ok(None)` once the peer has signaled the end of its input.
    fn receive(&mut self) -> impl Future<Output = Result<Option<Req>, SessionError>> + Send;
}

/// Outbound half backed by a bounded channel.
#[derive(Debug)]
pub struct SendHandle<T> {
    outbound: mpsc::Sender<Result<T, Status>>,
}

impl<T> SendHandle<T> {
    pub fn new(outbound: mpsc::Sender<Result<T, Status>>) -> Self {
        Self { outbound }
    }

    /// Create a handle and the receiver that drains it.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Result<T, Status>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }

    /// Report a terminal status to the peer and release the handle.
    ///
    /// Never waits for channel capacity. When the peer has stopped reading
    /// the status is dropped along with the sender, which still ends the
    /// response stream.
    pub fn fail(self, status: Status) {
        match self.outbound.try_send(Err(status)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Outbound channel full, dropping final status");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Peer gone before final status");
            }
        }
    }
}

impl<T: Send> SendStream<T> for SendHandle<T> {
    async fn send(&mut self, item: T) -> Result<(), SessionError> {
        self.outbound
            .send(Ok(item))
            .await
            .map_err(|_| SessionError::SendFailure)
    }
}

/// Duplex handle pairing an inbound message stream with a [`SendHandle`].
#[derive(Debug)]
pub struct StreamHandle<In, Resp> {
    inbound: In,
    outbound: SendHandle<Resp>,
}

impl<In, Resp> StreamHandle<In, Resp> {
    pub fn new(inbound: In, outbound: SendHandle<Resp>) -> Self {
        Self { inbound, outbound }
    }

    /// Split the handle, dropping the inbound half.
    pub fn into_outbound(self) -> SendHandle<Resp> {
        self.outbound
    }
}

impl<In, Resp> SendStream<Resp> for StreamHandle<In, Resp>
where
    In: Send,
    Resp: Send,
{
    async fn send(&mut self, item: Resp) -> Result<(), SessionError> {
        self.outbound.send(item).await
    }
}

impl<In, Req, Resp> DuplexStream<Req, Resp> for StreamHandle<In, Resp>
where
    In: Stream<Item = Result<Req, Status>> + Unpin + Send,
    Req: Send,
    Resp: Send,
{
    async fn receive(&mut self) -> Result<Option<Req>, SessionError> {
        match self.inbound.next().await {
            Some(Ok(request)) => Ok(Some(request)),
            Some(Err(status)) => Err(SessionError::Transport(status)),
            None => Ok(None),
        }
    }
}
