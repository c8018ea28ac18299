#![cfg(feature = "tokio_support")]

use packrpc::frame::{FrameStreamDecoder, read_frame};
use packrpc::rpc::RpcRequest;
use rmpv::Value;
use std::io;
use tokio::io::AsyncWriteExt;

fn sample_request_bytes() -> Vec<u8> {
    RpcRequest::call(
        3,
        "concat",
        vec![Value::from("a fairly long string parameter"), Value::from(12345)],
    )
    .encode()
    .unwrap()
}

#[tokio::test]
async fn read_frame_reads_one_frame_from_a_stream() {
    let bytes = sample_request_bytes();
    let (mut client, mut server) = tokio::io::duplex(16);

    let writer = tokio::spawn(async move {
        client.write_all(&bytes).await.unwrap();
        client
    });

    let mut decoder = FrameStreamDecoder::new();
    let value = read_frame(&mut server, &mut decoder).await.unwrap();
    let request = RpcRequest::from_value(value).unwrap();

    assert_eq!(request.rpc_method_name, "concat");
    assert_eq!(request.rpc_msg_id, 3);
    drop(writer.await.unwrap());
}

#[tokio::test]
async fn read_frame_reports_eof_before_frame_completes() {
    let bytes = sample_request_bytes();
    let (mut client, mut server) = tokio::io::duplex(1024);

    client.write_all(&bytes[..4]).await.unwrap();
    drop(client);

    let mut decoder = FrameStreamDecoder::new();
    let err = read_frame(&mut server, &mut decoder).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}
