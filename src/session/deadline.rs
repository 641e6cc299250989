use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use super::stream::{DuplexStream, SendStream};
use crate::error::SessionError;

/// Wraps a stream handle so that every receive and send gives up once the
/// session deadline has passed.
///
/// Without a deadline the wrapper is a pass-through.
#[derive(Debug)]
pub struct Deadline<S> {
    inner: S,
    deadline: Option<Instant>,
}

impl<S> Deadline<S> {
    /// Start the clock now, expiring after `timeout` if one is given.
    pub fn new(inner: S, timeout: Option<Duration>) -> Self {
        Self {
            inner,
            deadline: timeout.map(|timeout| Instant::now() + timeout),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, T> SendStream<T> for Deadline<S>
where
    S: SendStream<T>,
    T: Send,
{
    async fn send(&mut self, item: T) -> Result<(), SessionError> {
        match self.deadline {
            Some(deadline) => timeout_at(deadline, self.inner.send(item)).await?,
            None => self.inner.send(item).await,
        }
    }
}

impl<S, Req, Resp> DuplexStream<Req, Resp> for Deadline<S>
where
    S: DuplexStream<Req, Resp>,
    Resp: Send,
{
    async fn receive(&mut self) -> Result<Option<Req>, SessionError> {
        match self.deadline {
            Some(deadline) => timeout_at(deadline, self.inner.receive()).await?,
            None => self.inner.receive().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::stream::{SendHandle, StreamHandle};
    use tokio_stream::wrappers::ReceiverStream;
    use tonic::Status;

    #[tokio::test]
    async fn test_pending_receive_unblocks_at_deadline() {
        let (_in_tx, in_rx) = tokio::sync::mpsc::channel::<Result<String, Status>>(1);
        let (outbound, _out_rx) = SendHandle::<String>::channel(1);
        let handle = StreamHandle::new(ReceiverStream::new(in_rx), outbound);
        let mut handle = Deadline::new(handle, Some(Duration::from_millis(20)));

        let result = handle.receive().await;
        assert!(matches!(result, Err(SessionError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_blocked_send_unblocks_at_deadline() {
        let (outbound, _out_rx) = SendHandle::<u32>::channel(1);
        let mut handle = Deadline::new(outbound, Some(Duration::from_millis(20)));

        // The first send fills the channel, the second waits for capacity.
        handle.send(1).await.unwrap();
        let result = handle.send(2).await;
        assert!(matches!(result, Err(SessionError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_through() {
        let (outbound, mut out_rx) = SendHandle::<u32>::channel(1);
        let mut handle = Deadline::new(outbound, None);

        handle.send(7).await.unwrap();
        assert_eq!(out_rx.recv().await.unwrap().unwrap(), 7);
    }
}
