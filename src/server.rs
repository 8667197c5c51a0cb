//! Local aggregation endpoint.
//!
//! Serves the `{fetchedAt, measurements}` payload over HTTP so dashboards can
//! poll one place instead of probing every exchange themselves.
//!
//! ## Routes
//!
//! | Method | Path           | Response                               |
//! |--------|----------------|----------------------------------------|
//! | GET    | `/api/latency` | one fresh probe cycle as JSON          |
//! | GET    | `/health`      | `OK`                                   |
//! | other  | either path    | 405                                    |
//! | any    | anything else  | 404                                    |

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, ALLOW, CACHE_CONTROL, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use latencyscope_types::Target;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::probe::Prober;

pub const LATENCY_PATH: &str = "/api/latency";
pub const HEALTH_PATH: &str = "/health";

/// What the endpoint probes on every request.
#[derive(Debug)]
pub struct Aggregator {
    prober: Prober,
    targets: Vec<Target>,
}

impl Aggregator {
    pub fn new(prober: Prober, targets: Vec<Target>) -> Self {
        Self { prober, targets }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    aggregator: Arc<Aggregator>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        targets = aggregator.targets.len(),
        "Aggregation endpoint listening"
    );

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Aggregation endpoint shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };
                spawn_connection(stream, peer, aggregator.clone());
            }
        }
    }
}

fn spawn_connection(stream: tokio::net::TcpStream, peer: SocketAddr, aggregator: Arc<Aggregator>) {
    let io = TokioIo::new(stream);

    tokio::spawn(async move {
        let service = service_fn(move |req: Request<Incoming>| {
            let aggregator = aggregator.clone();
            async move { handle_request(req, &aggregator).await }
        });

        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            debug!(peer = %peer, error = %e, "Connection error");
        }
    });
}

async fn handle_request(
    req: Request<Incoming>,
    aggregator: &Aggregator,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, LATENCY_PATH) => latency_response(aggregator).await,
        (&Method::GET, HEALTH_PATH) => text_response(StatusCode::OK, "OK"),
        (_, LATENCY_PATH | HEALTH_PATH) => {
            let mut response = text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            response.headers_mut().insert(ALLOW, HeaderValue::from_static("GET"));
            response
        }
        _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
    };
    Ok(response)
}

async fn latency_response(aggregator: &Aggregator) -> Response<Full<Bytes>> {
    let report = aggregator.prober.probe_all(&aggregator.targets).await;

    match serde_json::to_vec(&report) {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            response
        }
        Err(e) => {
            error!(error = %e, "Failed to encode latency report");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}
