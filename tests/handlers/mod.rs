mod grpc_schema;
mod headers_hpack;
