//! HTTP/1.1 transport for a sealed [`App`].
//!
//! ```text
//! TcpListener::accept
//!   → one tokio task per connection (TCP_NODELAY)
//!     → hyper http1 connection
//!       → collect body (size-limited), percent-decode path
//!         → App::handle (sync pipeline)
//!           → Date + Server headers, Full<Bytes> body
//! ```
//!
//! The pipeline runs inline on the connection task. Transport errors are
//! logged here and never reach the pipeline.

use std::convert::Infallible;
use std::future::Future;
use std::time::SystemTime;

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::app::App;
use crate::config::Config;
use crate::error::{EtudeError, EtudeResult};
use crate::http::{Request, Response};

static SERVER_NAME: HeaderValue = HeaderValue::from_static("etude");

impl App {
    /// Bind `addr` and serve until ctrl-c.
    pub async fn run(self, addr: &str) -> EtudeResult<()> {
        let listener = TcpListener::bind(addr).await?;
        self.run_until(listener, shutdown_signal()).await
    }

    /// Bind the address from `config` and serve until ctrl-c.
    pub async fn run_with_config(self, config: &Config) -> EtudeResult<()> {
        self.run(&config.server_addr()).await
    }

    /// Serve connections from `listener` until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> EtudeResult<()>
    where
        F: Future<Output = ()>,
    {
        let local = listener.local_addr()?;
        tracing::info!(
            "Etude server running on http://{} ({} routes)",
            local,
            self.routes().len()
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::error!("TCP accept error: {}", e);
                            continue;
                        }
                    };
                    let _ = stream.set_nodelay(true);
                    let app = self.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req: hyper::Request<Incoming>| {
                            let app = app.clone();
                            async move { Ok::<_, Infallible>(app.serve(req).await) }
                        });
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutting down Etude server...");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn serve(&self, req: hyper::Request<Incoming>) -> hyper::Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();
        let limit = self.max_body_size();
        let body = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let err = body_error(e, limit);
                tracing::debug!(error = %err, "failed to read request body");
                let mut res = Response::new();
                res.write_status(err.status_code());
                return into_hyper(res);
            }
        };

        let raw_path = parts.uri.path();
        let path = urlencoding::decode(raw_path)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| raw_path.to_string());
        let query = parts.uri.query().map(str::to_string);

        let request = Request {
            method: parts.method,
            path,
            query,
            headers: parts.headers,
            body,
        };
        into_hyper(self.handle(request))
    }
}

fn body_error(e: Box<dyn std::error::Error + Send + Sync>, limit: usize) -> EtudeError {
    if e.is::<LengthLimitError>() {
        return EtudeError::PayloadTooLarge { limit };
    }
    match e.downcast::<hyper::Error>() {
        Ok(e) => EtudeError::from(*e),
        Err(e) => EtudeError::Io(std::io::Error::other(e)),
    }
}

fn into_hyper(res: Response) -> hyper::Response<Full<Bytes>> {
    let (status, headers, body) = res.into_parts();
    let mut out = hyper::Response::new(Full::new(Bytes::from(body)));
    *out.status_mut() = status;
    *out.headers_mut() = headers;

    let out_headers = out.headers_mut();
    if let Ok(date) = HeaderValue::from_str(&httpdate::fmt_http_date(SystemTime::now())) {
        out_headers.insert(header::DATE, date);
    }
    out_headers
        .entry(header::SERVER)
        .or_insert_with(|| SERVER_NAME.clone());
    out
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
