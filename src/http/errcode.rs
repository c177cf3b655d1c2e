//! Numeric error codes carried in the `Error` field of every envelope.
//!
//! The table is static and read-only; `describe` is the only lookup path and
//! is what fills the `Desc` field.

pub const SUCCESS: i64 = 0;

pub const SESSION_EXPIRED: i64 = 41001;
pub const SERVICE_CEILING: i64 = 41002;
pub const ILLEGAL_DATAFORMAT: i64 = 41003;
pub const OAUTH_TIMEOUT: i64 = 41004;

pub const INVALID_METHOD: i64 = 42001;
pub const INVALID_PARAMS: i64 = 42002;
pub const INVALID_TOKEN: i64 = 42003;

pub const INVALID_TRANSACTION: i64 = 43001;
pub const INVALID_ASSET: i64 = 43002;
pub const INVALID_BLOCK: i64 = 43003;

pub const UNKNOWN_TRANSACTION: i64 = 44001;
pub const UNKNOWN_ASSET: i64 = 44002;
pub const UNKNOWN_BLOCK: i64 = 44003;

pub const INVALID_VERSION: i64 = 45001;
pub const INTERNAL_ERROR: i64 = 45002;

pub const OAUTH_INVALID_APPID: i64 = 46001;
pub const OAUTH_INVALID_CHECKVAL: i64 = 46002;

pub const SMARTCODE_ERROR: i64 = 47001;

/// Code → description table.
pub const ERROR_TABLE: &[(i64, &str)] = &[
    (SUCCESS, "SUCCESS"),
    (SESSION_EXPIRED, "SESSION EXPIRED"),
    (SERVICE_CEILING, "SERVICE CEILING"),
    (ILLEGAL_DATAFORMAT, "ILLEGAL DATAFORMAT"),
    (OAUTH_TIMEOUT, "CONNECT TO OAUTH TIMEOUT"),
    (INVALID_METHOD, "INVALID METHOD"),
    (INVALID_PARAMS, "INVALID PARAMS"),
    (INVALID_TOKEN, "VERIFY TOKEN ERROR"),
    (INVALID_TRANSACTION, "INVALID TRANSACTION"),
    (INVALID_ASSET, "INVALID ASSET"),
    (INVALID_BLOCK, "INVALID BLOCK"),
    (UNKNOWN_TRANSACTION, "UNKNOWN TRANSACTION"),
    (UNKNOWN_ASSET, "UNKNOWN ASSET"),
    (UNKNOWN_BLOCK, "UNKNOWN BLOCK"),
    (INVALID_VERSION, "INVALID VERSION"),
    (INTERNAL_ERROR, "INTERNAL ERROR"),
    (OAUTH_INVALID_APPID, "INVALID APPID"),
    (OAUTH_INVALID_CHECKVAL, "INVALID CHECKVAL"),
    (SMARTCODE_ERROR, "SMARTCODE EXEC ERROR"),
];

/// Description for `code`, or an empty string for handler-private codes.
pub fn describe(code: i64) -> &'static str {
    ERROR_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
        .unwrap_or("")
}
