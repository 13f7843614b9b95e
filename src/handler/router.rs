//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Matches the fixed routes first,
//! then the static directory, then falls through to the 404 catch-all.
//! Unmatched methods take the same catch-all, there is no 405 surface.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Request context shared by the route handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let is_head = method == Method::HEAD;

    let ctx = RequestContext {
        path: &path,
        is_head,
        if_none_match: header_string(&req, "if-none-match"),
        range_header: header_string(&req, "range"),
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        path.clone(),
    );
    entry.query = query;
    entry.http_version = http_version_label(req.version()).to_string();
    entry.referer = header_string(&req, "referer");
    entry.user_agent = header_string(&req, "user-agent");

    let response = route_request(&method, &ctx, &state).await;

    if state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed)
    {
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // Only GET/HEAD are routed, everything else hits the catch-all
    if *method != Method::GET && *method != Method::HEAD {
        return http::build_404_response();
    }

    // 1. Fixed routes (exact match)
    match ctx.path {
        "/" => return pages::index(state, ctx.is_head),
        "/about" => return pages::about(ctx.is_head),
        "/weather" => return pages::weather(ctx.is_head),
        _ => {}
    }

    // 2. Static directory
    if let Some(resp) = static_files::serve(ctx, &state.config.site).await {
        return resp;
    }

    // 3. Catch-all
    http::build_404_response()
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state() -> Arc<AppState> {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should load");
        Arc::new(AppState::new(cfg))
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body collect")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn test_homepage_route() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/"), &state).await;
        assert_eq!(resp.status(), 200);
        let body = body_string(resp).await;
        assert!(body.contains("Hey everyone! This is my webpage!"));
    }

    #[tokio::test]
    async fn test_about_route() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/about"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "Welcome to my about page!");
    }

    #[tokio::test]
    async fn test_weather_route() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/weather"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "The current weather is NICE.");
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/nonexistent"), &state).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_string(resp).await, "404!");
    }

    #[tokio::test]
    async fn test_unmatched_method_is_404() {
        let state = test_state();
        let resp = route_request(&Method::POST, &ctx("/about"), &state).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_string(resp).await, "404!");

        let resp = route_request(&Method::DELETE, &ctx("/"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_static_file_route() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/hello.txt"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
        let body = body_string(resp).await;
        let on_disk = std::fs::read_to_string("public/hello.txt").expect("fixture exists");
        assert_eq!(body, on_disk);
    }

    #[tokio::test]
    async fn test_static_directory_serves_index() {
        let state = test_state();
        let resp = route_request(&Method::GET, &ctx("/docs/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        let body = body_string(resp).await;
        assert!(body.contains("<h1>Docs</h1>"));
    }

    #[tokio::test]
    async fn test_head_on_route_has_no_body() {
        let state = test_state();
        let request_ctx = RequestContext {
            path: "/about",
            is_head: true,
            if_none_match: None,
            range_header: None,
        };
        let resp = route_request(&Method::HEAD, &request_ctx, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "25");
        assert!(body_string(resp).await.is_empty());
    }
}
