//! Scan error taxonomy.
//!
//! A scan is all-or-nothing: any of these aborts the whole scan and nothing
//! partial is returned. Assets whose checksum resolves to no URL are not
//! errors (they are dropped during resolution).

use thiserror::Error;

/// Errors that can abort a scan of a shared album.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The album URL carries no `#<token>` fragment. Raised before any
    /// network call.
    #[error("not a shared album URL (expected a '#' token): {0}")]
    InvalidUrl(String),

    /// The remote service answered with an unexpected status code. The
    /// custom host-redirect status is never reported here.
    #[error("HTTP {status} from {url}")]
    Protocol { status: u32, url: String },

    /// The transfer itself failed (DNS, connect, timeout, TLS).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The response body was not the JSON shape the protocol promises.
    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
