//! HTTP Responses
//!
//! Every response is `text/plain`. Error bodies carry a trailing newline so
//! they read well from `curl`.

use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    body: String,
    allow: Option<&'static str>,
}

impl Response {
    /// 200 with the payload as body, byte for byte
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            body: body.into(),
            allow: None,
        }
    }

    pub fn empty_ok() -> Self {
        Self::ok(String::new())
    }

    /// Error response with a one-line message body
    pub fn error(status: Status, message: impl Into<String>) -> Self {
        let mut body = message.into();
        body.push('\n');
        Self {
            status,
            body,
            allow: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(Status::BadRequest, message)
    }

    pub fn not_found() -> Self {
        Self::error(Status::NotFound, "Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self {
            allow: Some("GET, PUT"),
            ..Self::error(Status::MethodNotAllowed, "Method Not Allowed")
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self, keep_alive: bool) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\n",
            self.status.code(),
            self.status.reason(),
            self.body.len()
        );
        if self.status != Status::Ok {
            head.push_str("X-Content-Type-Options: nosniff\r\n");
        }
        if let Some(allow) = self.allow {
            head.push_str(&format!("Allow: {}\r\n", allow));
        }
        head.push_str(if keep_alive {
            "Connection: keep-alive\r\n\r\n"
        } else {
            "Connection: close\r\n\r\n"
        });

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }

    pub async fn write_to<W>(&self, writer: &mut W, keep_alive: bool) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_bytes(keep_alive)).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_body_is_verbatim() {
        let raw = String::from_utf8(Response::ok("x1").to_bytes(true)).unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains("Content-Length: 2\r\n"));
        assert!(raw.contains("Connection: keep-alive\r\n"));
        assert!(raw.ends_with("\r\n\r\nx1"));
    }

    #[test]
    fn test_error_body_has_newline() {
        let response = Response::not_found();
        assert_eq!(response.status().code(), 404);
        assert_eq!(response.body(), "Not Found\n");
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let raw = String::from_utf8(Response::method_not_allowed().to_bytes(false)).unwrap();
        assert!(raw.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
        assert!(raw.contains("Allow: GET, PUT\r\n"));
        assert!(raw.contains("Connection: close\r\n"));
    }
}
