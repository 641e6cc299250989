pub mod config;
pub mod error;
pub mod greeting;
pub mod grpc;
pub mod handler;
pub mod session;

pub use greeting::greeting;

pub mod greet_proto {
    /// Empty request for the unary `SayHello` call.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct NoParam {}

    /// A single name, one per message on the bidirectional stream.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HelloRequest {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
    }

    /// Ordered names for the server-streaming call. Duplicates are allowed.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct NamesList {
        #[prost(string, repeated, tag = "1")]
        pub names: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HelloResponse {
        #[prost(string, tag = "1")]
        pub message: ::prost::alloc::string::String,
    }

    include!(concat!(env!("OUT_DIR"), "/greet.GreetService.rs"));
}

/// Fully qualified gRPC service name.
pub const SERVICE_NAME: &str = "greet.GreetService";

pub const SAY_HELLO: &str = "SayHello";
pub const SAY_HELLO_SERVER_STREAMING: &str = "SayHelloServerStreaming";
pub const SAY_HELLO_BIDIRECTIONAL_STREAMING: &str = "SayHelloBidirectionalStreaming";
