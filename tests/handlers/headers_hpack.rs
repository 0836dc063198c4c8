use tcp_h2_describe::handlers::{GrpcSchemaRegistry, HandlerCtx, HandlerTable};
use tcp_h2_describe::hpack::HpackDecoder;
use tcp_h2_describe::registry::{FrameType, Registry};

fn literal_never_indexed(name: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = vec![0b0001_0000u8];
    out.push(name.len() as u8);
    out.extend_from_slice(name);
    out.push(value.len() as u8);
    out.extend_from_slice(value);
    out
}

#[test]
fn hpack_dynamic_table_persists_across_frames_on_the_same_direction() {
    let handlers = HandlerTable::new();
    let mut hpack = HpackDecoder::new();
    let settings = Registry::new();
    let schemas = GrpcSchemaRegistry::new();
    let headers_handler = handlers.resolve(FrameType::Headers);

    let first = literal_never_indexed(b"x-request-id", b"abc-123");
    let second = literal_never_indexed(b"x-request-id", b"def-456");

    {
        let mut ctx = HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };
        let out = headers_handler.handle(&first, 0, &mut ctx).unwrap();
        assert!(out.contains("b'x-request-id' -> b'abc-123'"));
    }
    {
        let mut ctx = HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };
        let out = headers_handler.handle(&second, 0, &mut ctx).unwrap();
        assert!(out.contains("b'x-request-id' -> b'def-456'"));
    }
}

#[test]
fn independent_directions_get_independent_dynamic_tables() {
    let handlers = HandlerTable::new();
    let settings = Registry::new();
    let schemas = GrpcSchemaRegistry::new();
    let headers_handler = handlers.resolve(FrameType::Headers);

    // Static table index 0x82 = ":method: GET", valid with no prior state.
    let static_indexed = [0x82u8];

    let mut hpack_a = HpackDecoder::new();
    let mut hpack_b = HpackDecoder::new();
    let mut ctx_a = HandlerCtx { hpack: &mut hpack_a, settings: &settings, grpc_schemas: &schemas };
    let mut ctx_b = HandlerCtx { hpack: &mut hpack_b, settings: &settings, grpc_schemas: &schemas };

    let out_a = headers_handler.handle(&static_indexed, 0, &mut ctx_a).unwrap();
    let out_b = headers_handler.handle(&static_indexed, 0, &mut ctx_b).unwrap();
    assert_eq!(out_a, out_b);
    assert!(out_a.contains("b':method' -> b'GET'"));
}
