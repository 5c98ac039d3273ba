pub const SIGNATURE_HEADER: &str = "x-signature";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

pub const SIGNATURE_TIMESTAMP_PREFIX: &str = "t=";
pub const SIGNATURE_DIGEST_PREFIX: &str = "v1=";

/// Maximum drift, in seconds, between the signing time and now
pub const DEFAULT_TOLERANCE_SECS: u64 = chrono::TimeDelta::minutes(5).num_seconds() as u64;

/// Chars of the signed string kept when it is logged after a failed check
pub const SIGNED_PAYLOAD_LOG_PREVIEW: usize = 64;

pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
