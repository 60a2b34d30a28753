//! Dashboard HTTP endpoint
//!
//! Serves the aggregation API and the static dashboard page. Uses
//! hyper for the HTTP server. API responses carry a permissive CORS
//! header because the dashboard page may be fronted from another
//! origin.

use crate::domain::window::WindowParams;
use crate::services::dashboard::{Dashboard, QueryError};
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Parse the raw query string into window parameters
///
/// Unknown keys are ignored; values are percent-decoded ('+' means
/// space, as browsers encode form values).
fn parse_window_params(query: &str) -> WindowParams {
    let mut params = WindowParams::default();
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = percent_decode(value);
        match percent_decode(key).as_str() {
            "start_date" => params.start_date = Some(value),
            "start_time" => params.start_time = Some(value),
            "end_date" => params.end_date = Some(value),
            "end_time" => params.end_time = Some(value),
            _ => {}
        }
    }
    params
}

/// Minimal percent-decoding; an invalid escape passes through verbatim
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

/// Map a query failure to the 500 body. Internal detail stays in the
/// logs; the client gets a stable message.
fn error_response(err: QueryError) -> Response<Full<Bytes>> {
    let message = match &err {
        QueryError::Disconnected => "Database connection failed".to_string(),
        QueryError::Parameter(e) => e.to_string(),
        QueryError::Unexpected(e) => {
            error!(error = ?e, "dashboard_query_failed");
            "internal server error".to_string()
        }
    };
    let body = serde_json::json!({ "error": message }).to_string();
    json_response(StatusCode::INTERNAL_SERVER_ERROR, body.into_bytes())
}

async fn dashboard_data(
    req: &Request<hyper::body::Incoming>,
    dashboard: &Dashboard,
) -> Response<Full<Bytes>> {
    let params = parse_window_params(req.uri().query().unwrap_or(""));
    match dashboard.query(&params).await {
        Ok(summary) => match serde_json::to_vec(&summary) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => error_response(QueryError::Unexpected(e.into())),
        },
        Err(e) => error_response(e),
    }
}

async fn dashboard_page(page_path: &str) -> Response<Full<Bytes>> {
    match tokio::fs::read(page_path).await {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(Full::new(Bytes::from(body)))
            .expect("static response should not fail"),
        Err(e) => {
            error!(error = %e, path = %page_path, "dashboard_page_read_failed");
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from("Not Found")))
                .expect("static response should not fail")
        }
    }
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    dashboard: Arc<Dashboard>,
    page_path: Arc<String>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/api/dashboard_data") => Ok(dashboard_data(&req, &dashboard).await),
        // CORS preflight for the API
        (&Method::OPTIONS, "/api/dashboard_data") => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Full::new(Bytes::from("")))
            .expect("static response should not fail")),
        (&Method::GET, "/") => Ok(dashboard_page(&page_path).await),
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .expect("static response should not fail")),
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Start the dashboard HTTP server
pub async fn start_dashboard_server(
    port: u16,
    dashboard: Arc<Dashboard>,
    page_path: String,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    let page_path = Arc::new(page_path);

    info!(port = %port, "dashboard_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let dashboard = dashboard.clone();
                        let page_path = page_path.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let dashboard = dashboard.clone();
                                let page_path = page_path.clone();
                                async move { handle_request(req, dashboard, page_path).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "dashboard_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "dashboard_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("dashboard_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}
