//! Static file serving module
//!
//! Resolves request paths under the public directory, with directory index
//! support, path traversal protection, MIME detection, and conditional /
//! range request handling.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;

/// Serve a request from the static directory
///
/// Returns None when no file matches, the caller falls through to the 404
/// catch-all.
pub async fn serve(ctx: &RequestContext<'_>, site: &SiteConfig) -> Option<Response<Full<Bytes>>> {
    let file_path = resolve_file_path(&site.static_dir, ctx.path, &site.index_files)?;

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some(build_static_file_response(
        &content,
        content_type,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
        ctx.range_header.as_deref(),
    ))
}

/// Resolve a request path to a file under the static directory
///
/// Directories resolve through the configured index files. The resolved
/// path must stay inside the static root after canonicalization.
pub fn resolve_file_path(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<PathBuf> {
    // Remove leading slash and reject traversal segments outright
    let relative_path = path.trim_start_matches('/').replace("..", "");

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = Path::new(static_dir).join(&relative_path);

    // Directory requests fall back to index files
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // Missing files are a routine 404, not worth a log line
    let file_path_canonical = file_path.canonicalize().ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    Some(file_path_canonical)
}

/// Build static file response with `ETag` and Range support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Client already has this version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            http::response::build_cached_response(body, content_type, &etag, is_head)
        }
    }
}
