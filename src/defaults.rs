/// Largest CSV upload accepted by the bulk importer (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// HTTP body limit. Kept well above `MAX_UPLOAD_BYTES` so an oversize CSV
/// still reaches the importer's size check and gets the JSON 400 answer.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_LIST_LIMIT: i64 = 50;

pub const MAX_LIST_LIMIT: i64 = 500;
