// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP listener.
//
// One accept loop, one task per connection, one request per connection.
// A client that does not finish sending its request within the read timeout
// gets a 408. Shutdown is signalled through a `Notify`; in-flight
// connections finish on their own tasks.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use textpress_core::error::{Result, TextpressError};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::http::{self, HttpError, HttpResponse};
use crate::routes;
use crate::services::app_services::AppServices;

/// Read timeout used unless configured otherwise.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// The Textpress HTTP server.
pub struct HttpServer {
    /// Address to bind, e.g. `127.0.0.1`.
    bind_address: String,
    /// Port to bind; `0` picks a free one.
    port: u16,
    /// Address actually bound, once started.
    local_addr: Option<SocketAddr>,
    /// Deadline for receiving a complete request.
    read_timeout: Duration,
    shutdown_signal: Arc<Notify>,
    task_handle: Option<JoinHandle<()>>,
}

impl HttpServer {
    pub fn new(bind_address: impl Into<String>, port: u16) -> Self {
        Self {
            bind_address: bind_address.into(),
            port,
            local_addr: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// The bound address, if the server is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.is_some()
    }

    /// Bind the listener and spawn the accept loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or already in use.
    pub async fn start(&mut self, services: AppServices) -> Result<()> {
        if self.is_running() {
            debug!(addr = ?self.local_addr, "HTTP server already running");
            return Ok(());
        }

        let bind_addr = format!("{}:{}", self.bind_address, self.port);
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            TextpressError::Io(std::io::Error::new(e.kind(), format!("bind {bind_addr}: {e}")))
        })?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "HTTP server listening");

        let shutdown = Arc::clone(&self.shutdown_signal);
        let services = Arc::new(services);
        let read_timeout = self.read_timeout;
        let handle = tokio::spawn(async move {
            Self::accept_loop(listener, shutdown, services, read_timeout).await;
        });

        self.local_addr = Some(local_addr);
        self.task_handle = Some(handle);
        Ok(())
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.task_handle.take() else {
            return Ok(());
        };

        info!(addr = ?self.local_addr, "stopping HTTP server");
        self.shutdown_signal.notify_one();

        handle.await.map_err(|e| {
            TextpressError::Io(std::io::Error::other(format!("accept loop join: {e}")))
        })?;

        self.local_addr = None;
        info!("HTTP server stopped");
        Ok(())
    }

    async fn accept_loop(
        listener: TcpListener,
        shutdown: Arc<Notify>,
        services: Arc<AppServices>,
        read_timeout: Duration,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    debug!("accept loop received shutdown signal");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            debug!(peer = %peer_addr, "incoming connection");
                            let services = Arc::clone(&services);
                            tokio::spawn(async move {
                                if let Err(e) = Self::handle_connection(stream, peer_addr, &services, read_timeout).await {
                                    warn!(peer = %peer_addr, error = %e, "connection handler error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }
            }
        }
    }

    /// Read one request, answer it, close.
    async fn handle_connection(
        mut stream: TcpStream,
        peer_addr: SocketAddr,
        services: &AppServices,
        read_timeout: Duration,
    ) -> std::io::Result<()> {
        let read = tokio::time::timeout(read_timeout, http::read_request(&mut stream)).await;
        let Ok(read) = read else {
            warn!(
                peer = %peer_addr,
                timeout_ms = read_timeout.as_millis() as u64,
                "request not received in time"
            );
            return HttpResponse::failure(408, "Request timed out")
                .write_to(&mut stream)
                .await;
        };

        let request = match read {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(peer = %peer_addr, "empty connection, closing");
                return Ok(());
            }
            Err(HttpError::Io(e)) => return Err(e),
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "unreadable request");
                let status = match e {
                    HttpError::TooLarge(_) => 413,
                    _ => 400,
                };
                return HttpResponse::failure(status, &e.to_string())
                    .write_to(&mut stream)
                    .await;
            }
        };

        let method = request.method.clone();
        let path = request.path.clone();
        let response = routes::handle(services, request).await;
        response.write_to(&mut stream).await?;

        info!(
            peer = %peer_addr,
            %method,
            %path,
            status = response.status,
            bytes = response.body.len(),
            "response sent"
        );
        Ok(())
    }
}
