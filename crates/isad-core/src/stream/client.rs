//! HTTP client for the two sharedstreams protocol calls.
//!
//! Uses the curl crate (libcurl) with blocking handles. Runs in the current
//! thread; call from `spawn_blocking` if used from async code.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ScanError;
use crate::token::CollectionToken;

use super::metadata::{AssetUrlsResponse, StreamMetadata};

/// Status the service uses to say "reissue against this other host". The
/// body is still valid JSON carrying the corrected host, so it must be read
/// as content, never treated as an error.
const HOST_REDIRECT_STATUS: u32 = 330;

/// How many host redirects are followed. The service redirects at most once
/// in practice; a second override in the post-redirect response is logged
/// and ignored rather than followed.
pub const MAX_HOST_REDIRECTS: usize = 1;

/// Client for one album's metadata and asset-URL calls.
#[derive(Debug, Clone)]
pub struct StreamClient {
    default_host: String,
    scheme: String,
    connect_timeout: Duration,
}

impl StreamClient {
    pub fn new(default_host: &str, connect_timeout: Duration) -> Self {
        Self {
            default_host: default_host.to_string(),
            scheme: "https".to_string(),
            connect_timeout,
        }
    }

    /// Like [`StreamClient::new`] but with an explicit scheme. Integration
    /// tests point this at a plain-HTTP local server.
    pub fn with_scheme(default_host: &str, scheme: &str, connect_timeout: Duration) -> Self {
        Self {
            scheme: scheme.to_string(),
            ..Self::new(default_host, connect_timeout)
        }
    }

    fn base_url(&self, host: &str, token: &CollectionToken) -> String {
        format!("{}://{}/{}/sharedstreams", self.scheme, host, token)
    }

    /// Fetches the album metadata, transparently following at most
    /// [`MAX_HOST_REDIRECTS`] host redirects. Returns the metadata together
    /// with the base URL it finally came from (later calls need it).
    pub fn fetch_metadata(
        &self,
        token: &CollectionToken,
    ) -> Result<(StreamMetadata, String), ScanError> {
        let mut base_url = self.base_url(&self.default_host, token);
        let mut metadata = self.post_webstream(&base_url)?;

        for _ in 0..MAX_HOST_REDIRECTS {
            let Some(host) = metadata.host_override.take() else {
                break;
            };
            tracing::debug!(%host, "sharedstreams host redirect");
            base_url = self.base_url(&host, token);
            metadata = self.post_webstream(&base_url)?;
        }

        if metadata.host_override.is_some() {
            // One hop only; a stale host here would need a protocol change.
            tracing::warn!(
                "response after {} host redirect(s) carries another override; ignoring",
                MAX_HOST_REDIRECTS
            );
        }

        Ok((metadata, base_url))
    }

    fn post_webstream(&self, base_url: &str) -> Result<StreamMetadata, ScanError> {
        let url = format!("{base_url}/webstream");
        let body = self.post_json(&url, &serde_json::json!({ "streamCtag": null }))?;
        serde_json::from_slice(&body).map_err(|source| ScanError::Json {
            url,
            source,
        })
    }

    /// Resolves asset URLs for all guids in one batched call and returns the
    /// mapping checksum → download URL. Checksums the service does not
    /// answer for are simply absent from the map.
    pub fn resolve_asset_urls(
        &self,
        base_url: &str,
        photo_guids: &[String],
    ) -> Result<HashMap<String, String>, ScanError> {
        let url = format!("{base_url}/webasseturls");
        let body = self.post_json(&url, &serde_json::json!({ "photoGuids": photo_guids }))?;
        let parsed: AssetUrlsResponse =
            serde_json::from_slice(&body).map_err(|source| ScanError::Json {
                url,
                source,
            })?;

        Ok(parsed
            .items
            .into_iter()
            .map(|(checksum, loc)| (checksum, loc.download_url()))
            .collect())
    }

    /// POSTs `body` as JSON and returns the response body. Any status other
    /// than 2xx or the host-redirect code is a protocol error.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Vec<u8>, ScanError> {
        let payload = body.to_string();
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|e| transport(url, e))?;
        easy.post(true).map_err(|e| transport(url, e))?;
        easy.post_fields_copy(payload.as_bytes())
            .map_err(|e| transport(url, e))?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(|e| transport(url, e))?;
        easy.timeout(Duration::from_secs(60))
            .map_err(|e| transport(url, e))?;

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")
            .map_err(|e| transport(url, e))?;
        list.append("Accept: application/json")
            .map_err(|e| transport(url, e))?;
        easy.http_headers(list).map_err(|e| transport(url, e))?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    response.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| transport(url, e))?;
            transfer.perform().map_err(|e| transport(url, e))?;
        }

        let status = easy.response_code().map_err(|e| transport(url, e))?;
        if !(200..300).contains(&status) && status != HOST_REDIRECT_STATUS {
            return Err(ScanError::Protocol {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

fn transport(url: &str, source: curl::Error) -> ScanError {
    ScanError::Transport {
        url: url.to_string(),
        source,
    }
}
