//! HTTP Method Handlers
//!
//! Routes a parsed request to the queue service.

use crate::error::to_http_response;
use crate::request::{Method, Request};
use crate::response::Response;
use lineup_core::application::queue::{wait_budget, GetRequest, PutRequest};
use lineup_core::application::{QueueService, ShutdownToken};
use std::sync::Arc;

/// HTTP Handler with injected dependencies
pub struct HttpHandler {
    service: Arc<QueueService>,
}

impl HttpHandler {
    pub fn new(service: Arc<QueueService>) -> Self {
        Self { service }
    }

    /// Dispatch on method; `cancel` releases a blocked GET early
    pub async fn handle(&self, request: &Request, cancel: ShutdownToken) -> Response {
        match request.method() {
            Method::Put => self.put(request).await,
            Method::Get => self.get(request, cancel).await,
            Method::Other(_) => Response::method_not_allowed(),
        }
    }

    /// PUT /<queue>?v=<value>
    async fn put(&self, request: &Request) -> Response {
        let value = match request.query_param("v") {
            Some(v) if !v.is_empty() => v,
            _ => return Response::bad_request("Bad Request: Missing parameter 'v'"),
        };

        let req = PutRequest {
            queue: request.queue_name().to_string(),
            value: value.to_string(),
        };

        match self.service.put(req).await {
            Ok(_) => Response::empty_ok(),
            Err(e) => to_http_response(e),
        }
    }

    /// True for a GET that may wait for a payload (`timeout` > 0)
    ///
    /// Everything else completes without suspending on the queue.
    pub fn may_block(request: &Request) -> bool {
        *request.method() == Method::Get && matches!(timeout_secs(request), Some(secs) if secs > 0)
    }

    /// GET /<queue>[?timeout=<secs>]
    async fn get(&self, request: &Request, cancel: ShutdownToken) -> Response {
        let timeout_secs = match timeout_secs(request) {
            Some(secs) => secs,
            None => return Response::bad_request("Bad Request: Invalid 'timeout' parameter"),
        };

        let req = GetRequest::new(request.queue_name(), wait_budget(timeout_secs));

        match self.service.get(req, Some(cancel)).await {
            Ok(Some(message)) => Response::ok(message.into_payload()),
            Ok(None) => Response::not_found(),
            Err(e) => to_http_response(e),
        }
    }
}

/// `timeout` query parameter in seconds; absent or empty means 0, `None` if unparseable
fn timeout_secs(request: &Request) -> Option<i64> {
    match request.query_param("timeout") {
        None | Some("") => Some(0),
        Some(raw) => raw.parse().ok(),
    }
}
