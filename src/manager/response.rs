//! HTTP responses for `/<prefix>/*`.
//!
//! Lookup order for the prefix-relative remainder of the URL path:
//!
//! 1. a plain logical path (`js/main.js`) is served with `no-cache`;
//! 2. a fingerprinted path (`js/<token>-main.js`) serves the logical file,
//!    `immutable` when the token still matches its bytes, `no-cache`
//!    otherwise so a stale URL never pins old content;
//! 3. anything else is a 404.

use super::AssetManager;
use crate::error::AssetError;
use crate::fingerprint::{Token, hash, parse_fingerprinted};
use crate::utils::mime::{self, types::PLAIN};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::error::Error as _;
use std::io;
use tiny_http::{Header, Method, Request, Response, StatusCode};

pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const CACHE_NO_CACHE: &str = "no-cache";

/// A response, independent of the HTTP server that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    /// Empty for HEAD, 304 and errors answered without content.
    pub body: Vec<u8>,
}

impl AssetResponse {
    fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", PLAIN)
            .with_body(body.as_bytes().to_vec())
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Value of the first header named `name` (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn into_http(self) -> Response<io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in self.headers {
            if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response.add_header(header);
            }
        }
        response
    }
}

impl AssetManager {
    /// Answer a request for `url` (path and optional query).
    pub fn serve(&self, method: &Method, url: &str, if_none_match: Option<&str>) -> AssetResponse {
        let head = match method {
            Method::Get => false,
            Method::Head => true,
            _ => {
                return AssetResponse::text(405, "405 Method Not Allowed")
                    .with_header("Allow", "GET, HEAD");
            }
        };

        let Some(rest) = self.route(url) else {
            return not_found();
        };

        match self.respond(&rest, head, if_none_match) {
            Ok(response) => response,
            Err(AssetError::NotFound(_)) => not_found(),
            Err(err) => {
                let detail = err.source().map(ToString::to_string).unwrap_or_default();
                crate::log!("serve"; "{}: {}", err, detail);
                AssetResponse::text(500, "500 Internal Server Error")
            }
        }
    }

    /// Serve a `tiny_http` request.
    pub fn handle(&self, request: Request) -> io::Result<()> {
        let if_none_match = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("If-None-Match"))
            .map(|h| h.value.to_string());
        let response = self.serve(request.method(), request.url(), if_none_match.as_deref());
        crate::debug!("serve"; "{} {} {}", request.method(), request.url(), response.status);
        request.respond(response.into_http())
    }

    /// Strip the query, percent-decode, and remove `/<prefix>/`.
    fn route<'a>(&self, url: &'a str) -> Option<Cow<'a, str>> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let prefix = self.prefix();

        match decoded {
            Cow::Borrowed(path) => strip_route(path, prefix).map(Cow::Borrowed),
            Cow::Owned(path) => strip_route(&path, prefix).map(|rest| Cow::Owned(rest.to_string())),
        }
    }

    fn respond(&self, rest: &str, head: bool, if_none_match: Option<&str>) -> Result<AssetResponse, AssetError> {
        let (logical, requested) = self.locate(rest)?;
        let bytes = self.fs.read_all(&logical)?;

        // Live files may change between the index lookup and the read, so
        // the token always describes the bytes actually sent.
        let token = if self.mode().is_live() {
            hash(&bytes)
        } else {
            // `logical` is already prefix-relative.
            self.index.entry_normalized(self.fs.as_ref(), &logical)?.token
        };

        let etag = format!("\"{token}\"");
        let cache = if requested == Some(token) {
            CACHE_IMMUTABLE
        } else {
            CACHE_NO_CACHE
        };

        let response = AssetResponse::new(200)
            .with_header("Content-Type", mime::from_logical(&logical))
            .with_header("Cache-Control", cache)
            .with_header("ETag", etag.clone());

        if if_none_match.is_some_and(|value| etag_matches(value, &etag)) {
            return Ok(AssetResponse { status: 304, ..response });
        }
        if head {
            return Ok(response);
        }
        Ok(response.with_body(bytes.into_owned()))
    }

    /// Find the logical file behind `rest` and the token it was requested
    /// under, if any.
    fn locate(&self, rest: &str) -> Result<(String, Option<Token>), AssetError> {
        if self.fs.exists(rest) {
            return Ok((rest.to_string(), None));
        }
        match parse_fingerprinted(rest) {
            Some((logical, token)) if self.fs.exists(&logical) => Ok((logical, Some(token))),
            _ => Err(AssetError::not_found(rest)),
        }
    }
}

fn not_found() -> AssetResponse {
    AssetResponse::text(404, "404 Not Found")
}

fn strip_route<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}

/// `If-None-Match` check: `*`, or any listed tag equal to `etag`
/// (weak tags compare by value).
fn etag_matches(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|tag| {
        tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
    })
}
