fn main() {
    let codec = "tonic_prost::ProstCodec";

    let greet_service = tonic_build::manual::Service::builder()
        .name("GreetService")
        .package("greet")
        .method(
            tonic_build::manual::Method::builder()
                .name("say_hello")
                .route_name("SayHello")
                .input_type("crate::greet_proto::NoParam")
                .output_type("crate::greet_proto::HelloResponse")
                .codec_path(codec)
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("say_hello_server_streaming")
                .route_name("SayHelloServerStreaming")
                .input_type("crate::greet_proto::NamesList")
                .output_type("crate::greet_proto::HelloResponse")
                .codec_path(codec)
                .server_streaming()
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("say_hello_bidirectional_streaming")
                .route_name("SayHelloBidirectionalStreaming")
                .input_type("crate::greet_proto::HelloRequest")
                .output_type("crate::greet_proto::HelloResponse")
                .codec_path(codec)
                .client_streaming()
                .server_streaming()
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[greet_service]);
}
