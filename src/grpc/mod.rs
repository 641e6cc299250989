mod client;
mod server;

pub use client::GreetClient;
pub use server::{GreetServiceImpl, serve, start_server};

pub use crate::greet_proto::greet_service_client::GreetServiceClient;
pub use crate::greet_proto::greet_service_server::{GreetService, GreetServiceServer};
