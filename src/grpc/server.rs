use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::greet_proto::greet_service_server::{GreetService, GreetServiceServer};
use crate::greet_proto::{HelloRequest, HelloResponse, NamesList, NoParam};
use crate::handler::GreetHandler;
use crate::session::{Deadline, SendHandle, Session, SessionRegistry, StreamHandle};
use crate::{
    SAY_HELLO, SAY_HELLO_BIDIRECTIONAL_STREAMING, SAY_HELLO_SERVER_STREAMING, SERVICE_NAME,
};

/// Serve the greet service on `config.addr` until `shutdown` resolves.
pub async fn start_server(
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config.addr;
    let service = GreetServiceImpl::new(&config);

    info!(address = %addr, service = SERVICE_NAME, "gRPC server starting");

    tonic::transport::Server::builder()
        .add_service(GreetServiceServer::new(service))
        .serve_with_shutdown(addr, shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}

/// Serve `service` on an already bound listener.
pub async fn serve(listener: TcpListener, service: GreetServiceImpl) -> anyhow::Result<()> {
    info!(address = %listener.local_addr()?, service = SERVICE_NAME, "gRPC server starting");

    tonic::transport::Server::builder()
        .add_service(GreetServiceServer::new(service))
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await?;

    Ok(())
}

type ResponseStream = Pin<Box<dyn futures::Stream<Item = Result<HelloResponse, Status>> + Send>>;

pub struct GreetServiceImpl {
    handler: GreetHandler,
    registry: Arc<SessionRegistry>,
    session_timeout: Option<Duration>,
    outbound_buffer: usize,
}

impl GreetServiceImpl {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            handler: GreetHandler::new().with_stream_interval(config.stream_interval),
            registry: Arc::new(SessionRegistry::new()),
            session_timeout: config.session_timeout,
            outbound_buffer: config.outbound_buffer,
        }
    }

    /// Registry of the sessions currently being served.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }
}

#[tonic::async_trait]
impl GreetService for GreetServiceImpl {
    type SayHelloServerStreamingStream = ResponseStream;
    type SayHelloBidirectionalStreamingStream = ResponseStream;

    async fn say_hello(&self, request: Request<NoParam>) -> Result<Response<HelloResponse>, Status> {
        let mut session = self.registry.open(SAY_HELLO);
        let response = self.handler.unary(request.into_inner());

        session.mark_closing();
        session.finish();
        Ok(Response::new(response))
    }

    async fn say_hello_server_streaming(
        &self,
        request: Request<NamesList>,
    ) -> Result<Response<Self::SayHelloServerStreamingStream>, Status> {
        let names = request.into_inner();
        let mut session = self.registry.open(SAY_HELLO_SERVER_STREAMING);

        let (outbound, rx) = SendHandle::channel(self.outbound_buffer);
        let mut stream = Deadline::new(outbound, self.session_timeout);
        let handler = self.handler.clone();

        tokio::spawn(async move {
            let result = handler.server_stream(names, &mut stream, &mut session).await;
            release(stream.into_inner(), result, &mut session);
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn say_hello_bidirectional_streaming(
        &self,
        request: Request<Streaming<HelloRequest>>,
    ) -> Result<Response<Self::SayHelloBidirectionalStreamingStream>, Status> {
        let inbound = request.into_inner();
        let mut session = self.registry.open(SAY_HELLO_BIDIRECTIONAL_STREAMING);

        let (outbound, rx) = SendHandle::channel(self.outbound_buffer);
        let mut stream = Deadline::new(StreamHandle::new(inbound, outbound), self.session_timeout);
        let handler = self.handler.clone();

        tokio::spawn(async move {
            let result = handler.bidi_stream(&mut stream, &mut session).await;
            release(stream.into_inner().into_outbound(), result, &mut session);
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}

/// Release the outbound handle once the handler returned.
///
/// A clean return closes the response stream with an OK status, an error is
/// forwarded to the client as the final status.
fn release(
    outbound: SendHandle<HelloResponse>,
    result: Result<(), SessionError>,
    session: &mut Session,
) {
    match result {
        Ok(()) => {
            drop(outbound);
            session.finish();
        }
        Err(e) => {
            debug!(session_id = %session.id(), error = %e, "Reporting session failure to client");
            outbound.fail(e.into());
        }
    }
}
