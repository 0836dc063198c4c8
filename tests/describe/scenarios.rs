use std::sync::Arc;

use tcp_h2_describe::handlers::{GrpcDataHandler, GrpcSchemaRegistry, HandlerTable};
use tcp_h2_describe::registry::Registry;
use tcp_h2_describe::{DescribeError, Describer};

fn describer() -> Describer {
    Describer::new(HandlerTable::new(), Registry::new(), GrpcSchemaRegistry::new())
}

const PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

fn six_settings_entries() -> Vec<u8> {
    vec![
        0x00, 0x1, 0x00, 0x00, 0x10, 0x00, // HEADER_TABLE_SIZE = 4096
        0x00, 0x2, 0x00, 0x00, 0x00, 0x01, // ENABLE_PUSH = 1
        0x00, 0x4, 0x00, 0x00, 0xff, 0xff, // INITIAL_WINDOW_SIZE = 65535
        0x00, 0x5, 0x00, 0x00, 0x40, 0x00, // MAX_FRAME_SIZE = 16384
        0x00, 0x3, 0x00, 0x00, 0x00, 0x64, // MAX_CONCURRENT_STREAMS = 100
        0x00, 0x6, 0x00, 0x01, 0x00, 0x00, // MAX_HEADER_LIST_SIZE = 65536
    ]
}

/// Scenario 1: invalid preface on an empty buffer.
#[test]
fn scenario_1_invalid_preface() {
    let mut d = describer();
    let err = d.describe(b"", "client->server", true, None).unwrap_err();
    assert!(matches!(err, DescribeError::MissingPreface));
}

/// Scenario 2: preface followed by two SETTINGS frames, one with six
/// entries and one with a single ENABLE_PUSH=0 entry.
#[test]
fn scenario_2_preface_plus_two_settings_frames() {
    let mut d = describer();
    let mut buf = PREFACE.to_vec();
    buf.extend_from_slice(&[0, 0, 36, 0x4, 0, 0, 0, 0, 0]);
    buf.extend_from_slice(&six_settings_entries());
    buf.extend_from_slice(&[0, 0, 6, 0x4, 0, 0, 0, 0, 0]);
    buf.extend_from_slice(&[0x00, 0x2, 0x00, 0x00, 0x00, 0x00]);

    let out = d.describe(&buf, "client->server", true, None).unwrap();

    assert!(out.starts_with("============================================================\nclient->server\n"));
    assert!(out.contains("Client Connection Preface = b'PRI * HTTP/2.0\\r\\n\\r\\nSM\\r\\n\\r\\n'"));
    assert!(out.contains("SETTINGS_HEADER_TABLE_SIZE:0x1 -> 4096"));
    assert!(out.contains("SETTINGS_ENABLE_PUSH:0x2 -> 1"));
    assert!(out.contains("SETTINGS_INITIAL_WINDOW_SIZE:0x4 -> 65535"));
    assert!(out.contains("SETTINGS_MAX_FRAME_SIZE:0x5 -> 16384"));
    assert!(out.contains("SETTINGS_MAX_CONCURRENT_STREAMS:0x3 -> 100"));
    assert!(out.contains("SETTINGS_MAX_HEADER_LIST_SIZE:0x6 -> 65536"));
    assert!(out.contains("SETTINGS_ENABLE_PUSH:0x2 -> 0"));

    let preface_idx = out.find("Client Connection Preface").unwrap();
    let first_settings_idx = out.find("SETTINGS_HEADER_TABLE_SIZE").unwrap();
    let second_push_idx = out.rfind("SETTINGS_ENABLE_PUSH:0x2 -> 0").unwrap();
    assert!(preface_idx < first_settings_idx);
    assert!(first_settings_idx < second_push_idx);

    assert_eq!(out.matches("Frame Type = SETTINGS").count(), 2);
}

/// Scenario 3: the 36-byte SETTINGS frame alone, with no preface, carries
/// ENABLE_PUSH = 0 this time (server-initiated SETTINGS).
#[test]
fn scenario_3_server_side_settings_only() {
    let mut d = describer();
    let mut entries = six_settings_entries();
    entries[7] = 0x00; // ENABLE_PUSH value byte -> 0
    let mut buf = vec![0, 0, 36, 0x4, 0, 0, 0, 0, 0];
    buf.extend_from_slice(&entries);

    let out = d.describe(&buf, "server->client", false, None).unwrap();
    assert!(!out.contains("Client Connection Preface"));
    assert!(out.contains("SETTINGS_ENABLE_PUSH:0x2 -> 0"));
    assert_eq!(out.matches("Frame Type = SETTINGS").count(), 1);
}

/// Scenario 4: a plain WINDOW_UPDATE frame, reserved bit unset.
#[test]
fn scenario_4_window_update() {
    let mut d = describer();
    let buf = [0, 0, 4, 0x8, 0, 0, 0, 0, 0, 0x00, 0x00, 0x00, 0xff];
    let out = d.describe(&buf, "client->server", false, None).unwrap();
    assert!(out.contains("Reserved Bit = 0, Window Size Increment = 255"));
}

/// Scenario 5: WINDOW_UPDATE with the reserved bit set.
#[test]
fn scenario_5_window_update_reserved_bit() {
    let mut d = describer();
    let buf = [0, 0, 4, 0x8, 0, 0, 0, 0, 0, 0x80, 0x00, 0x00, 0x01];
    let out = d.describe(&buf, "client->server", false, None).unwrap();
    assert!(out.contains("Reserved Bit = 1, Window Size Increment = 1"));
}

/// Scenario 6: a gRPC DATA frame whose message doesn't match any registered
/// schema, falling back to the raw quoted literal.
#[test]
fn scenario_6_grpc_data_unmatched_message() {
    let handlers = HandlerTable::new();
    handlers.register("DATA", Arc::new(GrpcDataHandler::new())).unwrap();
    let mut d = Describer::new(handlers, Registry::new(), GrpcSchemaRegistry::new());

    let grpc_payload = [0x00, 0x00, 0x00, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o'];
    let mut buf = vec![0, 0, grpc_payload.len() as u8, 0x0, 0, 0, 0, 0, 1];
    buf.extend_from_slice(&grpc_payload);

    let out = d.describe(&buf, "client->server", false, None).unwrap();
    assert!(out.contains("gRPC Compressed Flag = 0 (00)"));
    assert!(out.contains("gRPC Message Length = 5 (00 00 00 05)"));
    assert!(out.contains("gRPC Message Schema = <none>"));
    assert!(out.contains("b'Hello'"));
}

/// Boundary: empty buffer with `expect_preface=false` has only the header
/// rule, label, and a blank line.
#[test]
fn boundary_empty_buffer_without_preface() {
    let mut d = describer();
    let out = d.describe(b"", "client->server", false, None).unwrap();
    assert_eq!(out, "============================================================\nclient->server\n");
}

/// Boundary: a buffer of exactly 8 bytes fails short-header.
#[test]
fn boundary_eight_byte_buffer_is_short_header() {
    let mut d = describer();
    let err = d.describe(&[0u8; 8], "client->server", false, None).unwrap_err();
    assert!(matches!(err, DescribeError::ShortHeader { len: 8 }));
}

/// Boundary: a declared length exceeding the remaining payload fails
/// short-payload.
#[test]
fn boundary_declared_length_exceeds_remaining() {
    let mut d = describer();
    let buf = [0, 0, 10, 0x6, 0, 0, 0, 0, 0];
    let err = d.describe(&buf, "client->server", false, None).unwrap_err();
    assert!(matches!(err, DescribeError::ShortPayload { declared: 10, remaining: 0 }));
}

/// Invariant: accounting. Sum of `9 + Length` over every described frame
/// equals the buffer length, for a buffer with no preface and no proxy line.
#[test]
fn invariant_accounting_holds_across_multiple_frames() {
    let mut buf = vec![0, 0, 4, 0x8, 0, 0, 0, 0, 0, 0, 0, 0, 1]; // WINDOW_UPDATE
    buf.extend_from_slice(&[0, 0, 8, 0x6, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8]); // PING
    buf.extend_from_slice(&[0, 0, 0, 0x4, 0x1, 0, 0, 0, 0]); // empty SETTINGS ACK

    let mut d = describer();
    d.describe(&buf, "client->server", false, None).unwrap();

    let consumed: usize = {
        let handlers = HandlerTable::new();
        let mut hpack = tcp_h2_describe::HpackDecoder::new();
        let settings = Registry::new();
        let schemas = GrpcSchemaRegistry::new();
        let mut ctx = tcp_h2_describe::handlers::HandlerCtx { hpack: &mut hpack, settings: &settings, grpc_schemas: &schemas };
        let mut iter = tcp_h2_describe::FrameIterator::new(&buf);
        let mut total = 0;
        while let Some(result) = iter.advance(&handlers, &mut ctx) {
            total += result.unwrap().consumed;
        }
        total
    };
    assert_eq!(consumed, buf.len());
}

/// Invariant: preface gate. Describing with the preface stripped directly
/// produces the identical frame section as describing with the preface
/// present and `expect_preface=true`.
#[test]
fn invariant_preface_gate_matches_stripped_buffer() {
    let mut buf = PREFACE.to_vec();
    buf.extend_from_slice(&[0, 0, 4, 0x8, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    let mut with_preface = describer();
    let mut without_preface = describer();

    let a = with_preface.describe(&buf, "d", true, None).unwrap();
    let b = without_preface.describe(&buf[PREFACE.len()..], "d", false, None).unwrap();

    let frame_section = |s: &str| -> String {
        let start = s.find("Frame Length").unwrap();
        s[start..].to_string()
    };
    assert_eq!(frame_section(&a), frame_section(&b));
}
