//! HTTP Request Parsing
//!
//! Just enough HTTP/1.x to serve the queue API: request line, headers,
//! a percent-decoded path and query string. Request bodies are read and
//! discarded so keep-alive connections stay in sync.

use std::fmt;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Upper bound on request line + headers
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

/// Upper bound on a request body we are willing to skip over
pub const MAX_DISCARDED_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request head exceeds {} bytes", MAX_HEAD_BYTES)]
    HeadTooLarge,

    #[error("request body exceeds {} bytes", MAX_DISCARDED_BODY_BYTES)]
    BodyTooLarge,

    #[error("unsupported transfer encoding")]
    UnsupportedTransferEncoding,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Other(String),
}

impl Method {
    fn parse(raw: &str) -> Self {
        match raw {
            "GET" => Method::Get,
            "PUT" => Method::Put,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Put => f.write_str("PUT"),
            Method::Other(m) => f.write_str(m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// Parsed request head
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    version: Version,
    /// Decoded path with the leading `/` removed
    queue: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl Request {
    /// Parse a complete request head (everything up to the blank line)
    pub fn parse_head(head: &str) -> Result<Self, RequestError> {
        let mut lines = head.lines();

        let request_line = lines
            .next()
            .ok_or_else(|| RequestError::Malformed("empty request".to_string()))?;
        let mut parts = request_line.split_whitespace();
        let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(m), Some(t), Some(v), None) => (m, t, v),
            _ => {
                return Err(RequestError::Malformed(format!(
                    "bad request line {:?}",
                    request_line
                )))
            }
        };

        let version = match version {
            "HTTP/1.1" => Version::Http11,
            "HTTP/1.0" => Version::Http10,
            other => {
                return Err(RequestError::Malformed(format!(
                    "unsupported version {}",
                    other
                )))
            }
        };

        let target = origin_form(target)
            .strip_prefix('/')
            .ok_or_else(|| RequestError::Malformed(format!("bad request target {}", target)))?;
        let (raw_path, raw_query) = target.split_once('?').unwrap_or((target, ""));

        let queue = percent_decode(raw_path, false)?;
        let query = parse_query(raw_query)?;

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| RequestError::Malformed(format!("bad header line {:?}", line)))?;
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }

        Ok(Self {
            method: Method::parse(method),
            version,
            queue,
            query,
            headers,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Queue name addressed by the request path (may be empty)
    pub fn queue_name(&self) -> &str {
        &self.queue
    }

    /// First value of a query parameter, decoded
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a header (name is case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the connection may carry another request after this one
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(str::to_ascii_lowercase);
        match self.version {
            Version::Http11 => !connection.is_some_and(|c| c.contains("close")),
            Version::Http10 => connection.is_some_and(|c| c.contains("keep-alive")),
        }
    }

    /// Body length announced by the client
    pub fn content_length(&self) -> Result<u64, RequestError> {
        if self.header("transfer-encoding").is_some() {
            return Err(RequestError::UnsupportedTransferEncoding);
        }
        match self.header("content-length") {
            None => Ok(0),
            Some(raw) => raw
                .parse()
                .map_err(|_| RequestError::Malformed(format!("bad content-length {:?}", raw))),
        }
    }
}

/// Read one request from `reader`
///
/// Returns `Ok(None)` on a clean end of stream between requests.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<Request>, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = Vec::with_capacity(512);

    loop {
        let remaining = MAX_HEAD_BYTES.saturating_sub(head.len());
        if remaining == 0 {
            return Err(RequestError::HeadTooLarge);
        }

        let n = (&mut *reader)
            .take(remaining as u64)
            .read_until(b'\n', &mut head)
            .await?;

        if n == 0 {
            if head.is_empty() {
                return Ok(None);
            }
            return Err(RequestError::Malformed("connection closed mid-request".to_string()));
        }
        if !head.ends_with(b"\n") {
            // Either the size cap cut the line or the peer went away
            if head.len() >= MAX_HEAD_BYTES {
                return Err(RequestError::HeadTooLarge);
            }
            return Err(RequestError::Malformed("connection closed mid-request".to_string()));
        }

        // Tolerate stray blank lines before the request line
        if head == b"\r\n" || head == b"\n" {
            head.clear();
            continue;
        }
        if head.ends_with(b"\r\n\r\n") || head.ends_with(b"\n\n") {
            break;
        }
    }

    let head = std::str::from_utf8(&head)
        .map_err(|_| RequestError::Malformed("request head is not UTF-8".to_string()))?;
    let request = Request::parse_head(head)?;

    let body_len = request.content_length()?;
    if body_len > MAX_DISCARDED_BODY_BYTES {
        return Err(RequestError::BodyTooLarge);
    }
    if body_len > 0 {
        let skipped = tokio::io::copy(&mut (&mut *reader).take(body_len), &mut tokio::io::sink()).await?;
        if skipped < body_len {
            return Err(RequestError::Malformed("truncated body".to_string()));
        }
    }

    Ok(Some(request))
}

/// Drop `scheme://authority` from an absolute-form target (`http://host/q`)
fn origin_form(target: &str) -> &str {
    let rest = match target
        .strip_prefix("http://")
        .or_else(|| target.strip_prefix("https://"))
    {
        Some(rest) => rest,
        None => return target,
    };
    match rest.find('/') {
        Some(i) => &rest[i..],
        None => "/",
    }
}

fn parse_query(raw: &str) -> Result<Vec<(String, String)>, RequestError> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((percent_decode(key, true)?, percent_decode(value, true)?))
        })
        .collect()
}

/// Decode `%XX` escapes (and `+` as space in query components)
fn percent_decode(raw: &str, plus_as_space: bool) -> Result<String, RequestError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| RequestError::Malformed(format!("bad escape in {:?}", raw)))?;
                out.push(escape);
                i += 3;
            }
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| RequestError::Malformed(format!("non UTF-8 in {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn read(raw: &str) -> Result<Option<Request>, RequestError> {
        let mut reader = BufReader::new(raw.as_bytes());
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parses_put_with_query() {
        let req = read("PUT /orders?v=x1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(req.method(), &Method::Put);
        assert_eq!(req.queue_name(), "orders");
        assert_eq!(req.query_param("v"), Some("x1"));
        assert_eq!(req.header("HOST"), Some("localhost"));
        assert!(req.keep_alive());
    }

    #[tokio::test]
    async fn test_decodes_path_and_query() {
        let req = read("GET /my%20queue?timeout=%2B3&v=a+b%26c HTTP/1.1\r\n\r\n")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(req.queue_name(), "my queue");
        assert_eq!(req.query_param("timeout"), Some("+3"));
        assert_eq!(req.query_param("v"), Some("a b&c"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[tokio::test]
    async fn test_accepts_absolute_form_target() {
        let request = read("PUT http://localhost:8080/orders?v=x1 HTTP/1.1\r\n\r\n")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.queue_name(), "orders");
        assert_eq!(request.query_param("v"), Some("x1"));

        let bare = read("GET http://localhost HTTP/1.1\r\n\r\n")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bare.queue_name(), "");
    }

    #[tokio::test]
    async fn test_first_query_value_wins() {
        let req = read("PUT /q?v=first&v=second HTTP/1.1\r\n\r\n")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(req.query_param("v"), Some("first"));
    }

    #[tokio::test]
    async fn test_clean_eof_is_none() {
        assert!(read("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_truncated_head_is_malformed() {
        let err = read("GET /q HTTP/1.1\r\nHost: x").await.unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_rejects_bad_request_line() {
        assert!(matches!(
            read("GET\r\n\r\n").await.unwrap_err(),
            RequestError::Malformed(_)
        ));
        assert!(matches!(
            read("GET /q HTTP/2.0\r\n\r\n").await.unwrap_err(),
            RequestError::Malformed(_)
        ));
        assert!(matches!(
            read("GET q HTTP/1.1\r\n\r\n").await.unwrap_err(),
            RequestError::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_bad_escape() {
        let err = read("GET /q%zz HTTP/1.1\r\n\r\n").await.unwrap_err();
        assert!(err.to_string().contains("bad escape"));
    }

    #[tokio::test]
    async fn test_rejects_oversized_head() {
        let raw = format!(
            "GET /q HTTP/1.1\r\nX-Big: {}\r\n\r\n",
            "a".repeat(MAX_HEAD_BYTES)
        );
        assert!(matches!(
            read(&raw).await.unwrap_err(),
            RequestError::HeadTooLarge
        ));
    }

    #[tokio::test]
    async fn test_body_is_skipped_for_next_request() {
        let raw = "PUT /q?v=1 HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloGET /q HTTP/1.1\r\n\r\n";
        let mut reader = BufReader::new(raw.as_bytes());

        let first = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.method(), &Method::Put);

        let second = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(second.method(), &Method::Get);
    }

    #[tokio::test]
    async fn test_chunked_body_is_rejected() {
        let err = read("PUT /q?v=1 HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n")
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedTransferEncoding));
    }

    #[tokio::test]
    async fn test_keep_alive_rules() {
        let close = read("GET /q HTTP/1.1\r\nConnection: close\r\n\r\n")
            .await
            .unwrap()
            .unwrap();
        assert!(!close.keep_alive());

        let http10 = read("GET /q HTTP/1.0\r\n\r\n").await.unwrap().unwrap();
        assert_eq!(http10.version(), Version::Http10);
        assert!(!http10.keep_alive());

        let http10_ka = read("GET /q HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n")
            .await
            .unwrap()
            .unwrap();
        assert!(http10_ka.keep_alive());
    }

    #[tokio::test]
    async fn test_other_methods_are_preserved() {
        let req = read("DELETE /q HTTP/1.1\r\n\r\n").await.unwrap().unwrap();
        assert_eq!(req.method(), &Method::Other("DELETE".to_string()));
        assert_eq!(req.method().to_string(), "DELETE");
    }
}
