// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal HTTP/1.1 framing over raw tokio streams.
//
// One request per connection: read the head up to the blank line, read
// exactly `Content-Length` body bytes, answer, close. Clients sending
// `Expect: 100-continue` get the interim response before the body is read.
// Chunked request bodies and keep-alive are not supported.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use thiserror::Error;

use textpress_core::human_errors::humanize_error;
use textpress_core::types::ExportArtifact;
use textpress_core::TextpressError;

/// Largest accepted request head (request line plus headers).
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024; // 32 MiB

const CONTINUE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// Reasons a request could not be framed.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed HTTP request: {0}")]
    Malformed(String),

    #[error("request exceeds {0} bytes")]
    TooLarge(usize),

    #[error("connection closed before the request was complete")]
    Incomplete,

    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully read request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

struct RequestHead {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
}

/// Find the first occurrence of `needle` in `haystack`.
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_head(head: &[u8]) -> Result<RequestHead, HttpError> {
    let text = std::str::from_utf8(head)
        .map_err(|_| HttpError::Malformed("request head is not UTF-8".into()))?;
    let mut lines = text.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::Malformed(format!(
            "bad request line: {request_line:?}"
        )));
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed(format!("unsupported version {version}")));
    }

    let path = target.split(['?', '#']).next().unwrap_or("/").to_string();

    let mut headers = Vec::new();
    for line in lines.filter(|line| !line.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("bad header line: {line:?}")))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    Ok(RequestHead {
        method: method.to_ascii_uppercase(),
        path,
        headers,
    })
}

impl RequestHead {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Read one request from `stream`.
///
/// Returns `Ok(None)` if the peer closed the connection without sending
/// anything. Writes `100 Continue` when the client asked for it and the
/// body has not arrived yet.
pub async fn read_request<S>(stream: &mut S) -> Result<Option<HttpRequest>, HttpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(HttpError::TooLarge(MAX_HEAD_BYTES));
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(HttpError::Incomplete);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = parse_head(&buf[..header_end])?;
    let body_offset = header_end + 4;

    let is_chunked = head
        .header("transfer-encoding")
        .is_some_and(|value| value.to_ascii_lowercase().contains("chunked"));
    if is_chunked {
        return Err(HttpError::Malformed("chunked request bodies are not supported".into()));
    }

    let content_length = match head.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| HttpError::Malformed(format!("bad Content-Length: {value:?}")))?,
        None => 0,
    };
    if content_length > MAX_BODY_BYTES {
        return Err(HttpError::TooLarge(MAX_BODY_BYTES));
    }

    let mut body = buf.split_off(body_offset.min(buf.len()));
    if body.len() < content_length {
        let expects_continue = head
            .header("expect")
            .is_some_and(|value| value.eq_ignore_ascii_case("100-continue"));
        if expects_continue {
            stream.write_all(CONTINUE).await?;
            stream.flush().await?;
        }

        let mut rest = (&mut *stream).take((content_length - body.len()) as u64);
        rest.read_to_end(&mut body).await?;
        if body.len() < content_length {
            return Err(HttpError::Incomplete);
        }
    }
    body.truncate(content_length);

    Ok(Some(HttpRequest {
        method: head.method,
        path: head.path,
        headers: head.headers,
        body,
    }))
}

/// A response ready to be written.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, "application/json", value.to_string().into_bytes())
    }

    pub fn html(page: &str) -> Self {
        Self::new(200, "text/html; charset=utf-8", page.as_bytes().to_vec())
    }

    /// `{"success": false, "error": message}` with `status`.
    pub fn failure(status: u16, message: &str) -> Self {
        Self::json(
            status,
            &serde_json::json!({ "success": false, "error": message }),
        )
    }

    /// Error envelope for a pipeline error.
    pub fn from_error(err: &TextpressError) -> Self {
        let human = humanize_error(err);
        Self::failure(human.status, &human.envelope_text())
    }

    /// Download response for an export.
    pub fn attachment(artifact: ExportArtifact) -> Self {
        let mut response = Self::new(200, artifact.kind.mime_type(), artifact.bytes);
        response.headers.push((
            "Content-Disposition".into(),
            format!("attachment; filename=\"{}\"", artifact.kind.filename()),
        ));
        response
    }

    /// Status line and headers.
    pub fn head(&self) -> String {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");
        head
    }

    pub async fn write_to<W>(&self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(self.head().as_bytes()).await?;
        stream.write_all(&self.body).await?;
        stream.flush().await
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
