//! HTTP Server
//!
//! One tokio task per connection, HTTP/1.1 keep-alive, graceful drain on
//! shutdown.

use crate::handler::HttpHandler;
use crate::request::{read_request, RequestError};
use crate::response::Response;
use lineup_core::application::{QueueService, ShutdownToken};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// How long open connections get to finish after shutdown is signalled
const CONNECTION_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Back-off after a failed accept (e.g. out of file descriptors)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// HTTP Server
pub struct HttpServer {
    listener: TcpListener,
    handler: Arc<HttpHandler>,
}

impl HttpServer {
    /// Bind the listening socket (port 0 picks a free port)
    pub async fn bind(config: HttpServerConfig, service: Arc<QueueService>) -> std::io::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await?;

        Ok(Self {
            listener,
            handler: Arc::new(HttpHandler::new(service)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` fires, then drain
    pub async fn run(self, shutdown: ShutdownToken) -> std::io::Result<()> {
        info!(addr = %self.local_addr()?, "HTTP server listening");

        let mut connections = JoinSet::new();
        let mut stop = shutdown.clone();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(peer = %peer, "Connection accepted");
                        let handler = self.handler.clone();
                        let shutdown = shutdown.clone();
                        connections.spawn(async move {
                            if let Err(e) = handle_connection(stream, handler, shutdown).await {
                                warn!(peer = %peer, error = %e, "Connection error");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                _ = stop.wait() => break,
            }
        }

        info!(open_connections = connections.len(), "HTTP server draining connections");

        let drained = tokio::time::timeout(CONNECTION_DRAIN_TIMEOUT, async {
            while connections.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                open_connections = connections.len(),
                "Drain timed out, aborting remaining connections"
            );
            connections.abort_all();
        }

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    handler: Arc<HttpHandler>,
    shutdown: ShutdownToken,
) -> std::io::Result<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut stop = shutdown.clone();

    loop {
        let read = tokio::select! {
            read = read_request(&mut reader) => read,
            _ = stop.wait() => return Ok(()),
        };

        let request = match read {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("Connection closed by client");
                return Ok(());
            }
            Err(RequestError::Io(e)) => return Err(e),
            Err(e) => {
                debug!(error = %e, "Rejecting unreadable request");
                Response::bad_request(format!("Bad Request: {}", e))
                    .write_to(&mut writer, false)
                    .await?;
                return Ok(());
            }
        };

        let started = Instant::now();
        let mut keep_alive = request.keep_alive();

        let response = if HttpHandler::may_block(&request) {
            // Only a waiting GET watches the socket. EOF abandons the wait
            // and a half-closed peer still gets its 404.
            tokio::select! {
                biased;
                response = handler.handle(&request, shutdown.clone()) => response,
                _ = peer_closed(&mut reader) => {
                    debug!(
                        queue = %request.queue_name(),
                        "Client stopped sending, abandoning wait"
                    );
                    keep_alive = false;
                    Response::not_found()
                }
            }
        } else {
            handler.handle(&request, shutdown.clone()).await
        };

        debug!(
            method = %request.method(),
            queue = %request.queue_name(),
            status = response.status().code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request handled"
        );

        let keep_alive = keep_alive && !shutdown.is_shutdown();
        if let Err(e) = response.write_to(&mut writer, keep_alive).await {
            debug!(error = %e, "Client went away before the response");
            return Ok(());
        }
        if !keep_alive {
            return Ok(());
        }
    }
}

/// Resolves once the peer closes its side (EOF or read error)
///
/// Pipelined bytes are left in the buffer for the next `read_request`.
async fn peer_closed<R>(reader: &mut R)
where
    R: AsyncBufRead + Unpin,
{
    match reader.fill_buf().await {
        Ok(buf) if !buf.is_empty() => std::future::pending().await,
        _ => {}
    }
}
