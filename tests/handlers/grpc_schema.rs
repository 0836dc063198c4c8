use std::sync::Arc;

use tcp_h2_describe::handlers::{GrpcDataHandler, GrpcSchemaRegistry, HandlerCtx, HandlerTable};
use tcp_h2_describe::hpack::HpackDecoder;
use tcp_h2_describe::registry::{FrameType, Registry};

#[test]
fn data_frames_use_default_handler_until_grpc_handler_is_registered() {
    let handlers = HandlerTable::new();
    let mut hpack = HpackDecoder::new();
    let settings = Registry::new();
    let schemas = GrpcSchemaRegistry::new();
    let mut ctx = HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };

    let handler = handlers.resolve(FrameType::Data);
    let out = handler.handle(b"plain bytes", 0, &mut ctx).unwrap();
    assert!(out.contains("b'plain bytes'"));

    handlers.register("DATA", Arc::new(GrpcDataHandler::new())).unwrap();
    let handler = handlers.resolve(FrameType::Data);
    let payload = [0x00, 0x00, 0x00, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o'];
    let out = handler.handle(&payload, 0, &mut ctx).unwrap();
    assert!(out.contains("gRPC Compressed Flag = 0 (00)"));
}

#[test]
fn empty_registry_never_matches_and_always_falls_back() {
    let schemas = GrpcSchemaRegistry::empty();
    let mut hpack = HpackDecoder::new();
    let settings = Registry::new();
    let mut ctx = HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };
    let payload = [0x00, 0x00, 0x00, 0x00, 0x03, b'A', b'd', b'a'];
    let out = GrpcDataHandler::new().handle(&payload, 0, &mut ctx).unwrap();
    assert!(out.contains("gRPC Message Schema = <none>"));
    assert!(out.contains("b'Ada'"));
}

#[test]
fn custom_schema_registered_before_builtin_wins_first() {
    let schemas = GrpcSchemaRegistry::empty();
    schemas
        .register("demo.Anything", Arc::new(|_bytes: &[u8]| Some("matched!".to_string())))
        .unwrap();
    let mut hpack = HpackDecoder::new();
    let settings = Registry::new();
    let mut ctx = HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };
    let payload = [0x00, 0x00, 0x00, 0x00, 0x01, b'x'];
    let out = GrpcDataHandler::new().handle(&payload, 0, &mut ctx).unwrap();
    assert!(out.contains("gRPC Message Schema = demo.Anything"));
    assert!(out.contains("matched!"));
}
