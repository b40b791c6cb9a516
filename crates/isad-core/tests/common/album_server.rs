//! Minimal HTTP/1.1 server speaking the sharedstreams protocol for
//! integration tests.
//!
//! Serves `webstream` (with optional 330 host redirects), `webasseturls`,
//! and `GET /assets/<name>` for download tests. Requests are counted so
//! tests can assert how many protocol calls were made.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlbumServerOptions {
    /// Number of webstream responses that answer 330 with a host override
    /// (pointing back at this server) before real metadata is served.
    pub redirect_hops: usize,
    /// Every webstream response carries 330 plus an override (simulates a
    /// redirect loop).
    pub always_redirect: bool,
    /// Force this status on webstream (e.g. 500); body is an empty object.
    pub forced_status: Option<u32>,
    /// Serve metadata without any `photos` list.
    pub empty_album: bool,
}

pub struct AlbumServer {
    /// `host:port` of the listener, usable as a sharedstreams host.
    pub host: String,
    webstream_calls: Arc<AtomicUsize>,
    asseturl_calls: Arc<AtomicUsize>,
}

impl AlbumServer {
    pub fn webstream_calls(&self) -> usize {
        self.webstream_calls.load(Ordering::SeqCst)
    }

    pub fn asseturl_calls(&self) -> usize {
        self.asseturl_calls.load(Ordering::SeqCst)
    }

    /// URL of a served asset, for download tests (plain HTTP).
    pub fn asset_url(&self, name: &str) -> String {
        format!("http://{}/assets/{}?o=1", self.host, name)
    }
}

/// Body served for `GET /assets/<name>`; deterministic per name.
pub fn asset_body(name: &str) -> Vec<u8> {
    format!("asset body of {name}").into_bytes()
}

pub fn start(opts: AlbumServerOptions) -> AlbumServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    let webstream_calls = Arc::new(AtomicUsize::new(0));
    let asseturl_calls = Arc::new(AtomicUsize::new(0));

    let server = AlbumServer {
        host: host.clone(),
        webstream_calls: Arc::clone(&webstream_calls),
        asseturl_calls: Arc::clone(&asseturl_calls),
    };

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let host = host.clone();
            let webstream_calls = Arc::clone(&webstream_calls);
            let asseturl_calls = Arc::clone(&asseturl_calls);
            thread::spawn(move || {
                handle(stream, &host, opts, &webstream_calls, &asseturl_calls)
            });
        }
    });

    server
}

fn handle(
    mut stream: std::net::TcpStream,
    host: &str,
    opts: AlbumServerOptions,
    webstream_calls: &AtomicUsize,
    asseturl_calls: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, path) = match parse_request_line(&request) {
        Some(p) => p,
        None => return,
    };

    if method.eq_ignore_ascii_case("POST") && path.ends_with("/webstream") {
        let calls = webstream_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = opts.forced_status {
            respond_json(&mut stream, status, "{}");
            return;
        }
        if opts.always_redirect || calls < opts.redirect_hops {
            let body = format!(r#"{{"X-Apple-MMe-Host": "{host}"}}"#);
            respond_json(&mut stream, 330, &body);
            return;
        }
        let body = if opts.empty_album {
            "{}".to_string()
        } else {
            metadata_json()
        };
        respond_json(&mut stream, 200, &body);
        return;
    }

    if method.eq_ignore_ascii_case("POST") && path.ends_with("/webasseturls") {
        asseturl_calls.fetch_add(1, Ordering::SeqCst);
        respond_json(&mut stream, 200, &asset_urls_json(host));
        return;
    }

    if method.eq_ignore_ascii_case("GET") && path.starts_with("/assets/") {
        let name = path
            .trim_start_matches("/assets/")
            .split('?')
            .next()
            .unwrap_or_default();
        let body = asset_body(name);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(&body);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
}

/// Reads headers plus (per Content-Length) the body of one request.
fn read_request(stream: &mut std::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_header_end(&buf) {
            let headers = std::str::from_utf8(&buf[..header_end]).ok()?;
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: ").or_else(|| l.strip_prefix("content-length: ")))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8(buf).ok()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_request_line(request: &str) -> Option<(&str, &str)> {
    let mut parts = request.lines().next()?.split_whitespace();
    Some((parts.next()?, parts.next()?))
}

fn respond_json(stream: &mut std::net::TcpStream, status: u32, body: &str) {
    let reason = match status {
        200 => "OK",
        330 => "Host Redirect",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Album fixture: three downloadable assets, one asset without variants,
/// and one whose checksum never resolves to a URL.
fn metadata_json() -> String {
    r#"{
        "photos": [
            {
                "photoGuid": "p1",
                "dateCreated": "2024-06-01T10:00:00Z",
                "derivatives": {
                    "1":     {"checksum": "c1-small",  "fileSize": "100"},
                    "2048":  {"checksum": "c1-large",  "fileSize": "500"},
                    "720":   {"checksum": "c1-medium", "fileSize": "300"}
                }
            },
            {
                "photoGuid": "p2",
                "derivatives": {
                    "2048": {"checksum": "c2", "fileSize": 2048}
                }
            },
            {
                "photoGuid": "p3",
                "derivatives": {
                    "2048": {"checksum": "c3", "fileSize": "4096"}
                }
            },
            {
                "photoGuid": "p4",
                "derivatives": {}
            },
            {
                "photoGuid": "p5",
                "derivatives": {
                    "2048": {"checksum": "c5-unresolved", "fileSize": "123"}
                }
            }
        ]
    }"#
    .to_string()
}

/// `webasseturls` fixture: answers for the largest variants of p1..p3 only;
/// `c5-unresolved` is deliberately absent (thumbnail-only asset).
fn asset_urls_json(host: &str) -> String {
    format!(
        r#"{{
            "items": {{
                "c1-large": {{"url_location": "{host}", "url_path": "/assets/IMG_0001.JPG?o=1"}},
                "c2":       {{"url_location": "{host}", "url_path": "/assets/IMG_0002.HEIC?o=2"}},
                "c3":       {{"url_location": "{host}", "url_path": "/assets/MOV_0003.MOV?o=3"}}
            }}
        }}"#
    )
}
